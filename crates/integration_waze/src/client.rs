//! Waze route calculator client
//!
//! Resolves both route endpoints, fetches routes from the region's routing
//! server and aggregates every returned alternative.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::aggregate::summarize_route;
use crate::config::WazeConfig;
use crate::coordinates::{
    geocode_query_params, is_coordinate_literal, parse_coordinate_literal,
    select_geocode_candidate,
};
use crate::error::WazeError;
use crate::models::{AggregateOptions, Coordinate, RawRoute, RouteOptions, RouteResult};
use crate::region::Region;
use crate::routing::{parse_route_response, route_query_params};
use crate::transport::{ClientOwnership, HttpTransport};

/// Trait for route calculators
#[async_trait]
pub trait RouteCalculator: Send + Sync {
    /// Resolve a location string, parsing literal coordinates or geocoding an address
    async fn ensure_coords(&self, location: &str) -> Result<Coordinate, WazeError>;

    /// Geocode a free-text address
    async fn address_to_coords(&self, address: &str) -> Result<Coordinate, WazeError>;

    /// Fetch raw routes between two resolved coordinates
    async fn get_route(
        &self,
        start: &Coordinate,
        end: &Coordinate,
        options: &RouteOptions,
    ) -> Result<Vec<RawRoute>, WazeError>;

    /// Resolve both ends, fetch routes and aggregate each alternative
    async fn calc_routes(
        &self,
        start: &str,
        end: &str,
        options: &RouteOptions,
        aggregate: AggregateOptions,
    ) -> Result<Vec<RouteResult>, WazeError>;

    /// Check if the Waze service is reachable
    async fn is_healthy(&self) -> bool;
}

/// Route calculator backed by the Waze live-map endpoints
#[derive(Debug)]
pub struct WazeRouteCalculator {
    transport: HttpTransport,
    config: WazeConfig,
}

impl WazeRouteCalculator {
    /// Create a calculator that owns its HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &WazeConfig) -> Result<Self, WazeError> {
        config.validate().map_err(WazeError::ConfigurationError)?;
        Ok(Self {
            transport: HttpTransport::owned(config)?,
            config: config.clone(),
        })
    }

    /// Create a calculator on a caller-supplied HTTP client
    ///
    /// The client is never torn down by the calculator.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_client(config: &WazeConfig, client: Client) -> Result<Self, WazeError> {
        config.validate().map_err(WazeError::ConfigurationError)?;
        Ok(Self {
            transport: HttpTransport::borrowed(client, config),
            config: config.clone(),
        })
    }

    /// Configured region
    #[must_use]
    pub const fn region(&self) -> Region {
        self.config.region
    }

    /// Whether the HTTP client is released together with this calculator
    #[must_use]
    pub fn owns_client(&self) -> bool {
        self.transport.ownership() == ClientOwnership::Owned
    }

    /// Release the transport
    ///
    /// Dropping the calculator has the same effect on every exit path.
    pub fn close(self) {
        debug!(region = %self.config.region, "Closing route calculator");
    }

    /// Whether `location` is already a `lat,lon` pair
    #[must_use]
    pub fn already_coords(&self, location: &str) -> bool {
        is_coordinate_literal(location)
    }

    /// Best route between two locations using the configured options
    ///
    /// # Errors
    ///
    /// Propagates resolution, transport and response errors.
    pub async fn calc_route_info(
        &self,
        start: &str,
        end: &str,
        aggregate: AggregateOptions,
    ) -> Result<RouteResult, WazeError> {
        let options = self.config.route_options.with_alternatives(1);
        self.calc_routes(start, end, &options, aggregate)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| WazeError::WrongResponse("no route returned".to_string()))
    }

    /// All alternatives between two locations using the configured options
    ///
    /// # Errors
    ///
    /// Propagates resolution, transport and response errors.
    pub async fn calc_all_routes_info(
        &self,
        start: &str,
        end: &str,
        aggregate: AggregateOptions,
    ) -> Result<Vec<RouteResult>, WazeError> {
        let options = self.config.route_options;
        self.calc_routes(start, end, &options, aggregate)
            .await
    }
}

#[async_trait]
impl RouteCalculator for WazeRouteCalculator {
    async fn ensure_coords(&self, location: &str) -> Result<Coordinate, WazeError> {
        if let Some(coordinate) = parse_coordinate_literal(location) {
            debug!(%location, "Location is already a coordinate pair");
            return Ok(coordinate);
        }
        self.address_to_coords(location).await
    }

    #[instrument(skip(self))]
    async fn address_to_coords(&self, address: &str) -> Result<Coordinate, WazeError> {
        let url = self.config.endpoint(self.config.region.profile().search_path);
        let params = geocode_query_params(address, self.config.region);

        debug!(?url, "Geocoding address");

        let response = self.transport.get(&url, &params).await?;
        if !(200..300).contains(&response.status) {
            return Err(WazeError::ServerError {
                status: response.status,
                body: response.body,
            });
        }

        let coordinate = select_geocode_candidate(address, &response.body)?;
        debug!(%address, %coordinate, "Geocoded address");
        Ok(coordinate)
    }

    #[instrument(skip(self), fields(from = %start, to = %end))]
    async fn get_route(
        &self,
        start: &Coordinate,
        end: &Coordinate,
        options: &RouteOptions,
    ) -> Result<Vec<RawRoute>, WazeError> {
        let url = self
            .config
            .endpoint(self.config.region.profile().routing_path);
        let params = route_query_params(start, end, options);

        debug!(?url, alternatives = options.alternatives, "Requesting routes");

        let response = self.transport.get(&url, &params).await?;
        let routes = parse_route_response(response.status, &response.body)?;

        debug!(count = routes.len(), "Routes received");
        Ok(routes)
    }

    #[instrument(skip(self, options))]
    async fn calc_routes(
        &self,
        start: &str,
        end: &str,
        options: &RouteOptions,
        aggregate: AggregateOptions,
    ) -> Result<Vec<RouteResult>, WazeError> {
        let (start, end) = tokio::try_join!(self.ensure_coords(start), self.ensure_coords(end))?;

        let routes = self.get_route(&start, &end, options).await?;

        routes
            .iter()
            .map(|route| {
                summarize_route(route, start.bounds.as_ref(), end.bounds.as_ref(), aggregate)
            })
            .collect()
    }

    async fn is_healthy(&self) -> bool {
        let url = self.config.endpoint(self.config.region.profile().search_path);
        let params = geocode_query_params("test", self.config.region);
        self.transport
            .get(&url, &params)
            .await
            .is_ok_and(|response| (200..300).contains(&response.status))
    }
}
