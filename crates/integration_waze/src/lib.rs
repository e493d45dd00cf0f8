//! Waze route calculator integration
//!
//! Estimates travel time and distance between two locations using the
//! unofficial [Waze live map](https://www.waze.com/live-map) web endpoints.
//! Locations are either literal `lat,lon` pairs or free-text addresses, which
//! are geocoded against the region's search server first.
//!
//! # Architecture
//!
//! [`RouteCalculator`] defines the interface, implemented by
//! [`WazeRouteCalculator`]. The calculator owns its HTTP client unless one is
//! supplied with [`WazeRouteCalculator::with_client`], in which case the client
//! is shared and never torn down by this crate.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_waze::{AggregateOptions, RouteCalculator, RouteOptions, WazeConfig, WazeRouteCalculator};
//!
//! let calculator = WazeRouteCalculator::new(&WazeConfig::default())?;
//!
//! let routes = calculator.calc_routes(
//!     "Kaiserstraße 30 55116 Mainz, Germany",
//!     "50.08414976707619,8.247836017342934",
//!     &RouteOptions::default().with_alternatives(3),
//!     AggregateOptions::default(),
//! ).await?;
//!
//! for route in routes {
//!     println!("{route}");
//! }
//! ```

mod aggregate;
mod client;
mod config;
mod coordinates;
mod error;
mod models;
mod region;
mod routing;
mod transport;

pub use aggregate::{add_up_route, summarize_route};
pub use client::{RouteCalculator, WazeRouteCalculator};
pub use config::{MAX_ALTERNATIVES, SERVER_TIMEOUT_MS, WazeConfig};
pub use coordinates::{is_coordinate_literal, parse_coordinate_literal};
pub use error::WazeError;
pub use models::{
    AggregateOptions, BoundingBox, Coordinate, PathPoint, RawRoute, RouteOptions, RouteResult,
    RouteSegment, RouteTotals, VehicleType,
};
pub use region::{Region, RegionProfile};
pub use transport::ClientOwnership;
