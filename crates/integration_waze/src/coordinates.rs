//! Coordinate resolution
//!
//! Decides whether a location string is already a `lat,lon` pair and, for
//! free-text addresses, picks the coordinates out of a geocoding response.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::WazeError;
use crate::models::{BoundingBox, Coordinate};
use crate::region::Region;

/// `<lat>,<lon>` with 1-2 latitude digits, mandatory latitude decimals,
/// 1-3 longitude digits and optional longitude decimals
static COORD_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // Infallible with a valid static pattern
    Regex::new(r"^[-+]?[0-9]{1,2}\.[0-9]+,\s*[-+]?[0-9]{1,3}(\.[0-9]+)?$")
        .expect("Failed to compile coordinate pattern")
});

/// Whether `location` is already a coordinate pair
#[must_use]
pub fn is_coordinate_literal(location: &str) -> bool {
    COORD_LITERAL.is_match(location)
}

/// Parse a coordinate literal; bounds are always empty
#[must_use]
pub fn parse_coordinate_literal(location: &str) -> Option<Coordinate> {
    if !is_coordinate_literal(location) {
        return None;
    }
    let (lat, lon) = location.split_once(',')?;
    let lat = lat.trim().parse().ok()?;
    let lon = lon.trim().parse().ok()?;
    Some(Coordinate::new(lat, lon))
}

/// Query parameters for a geocoding request
#[must_use]
pub fn geocode_query_params(address: &str, region: Region) -> Vec<(&'static str, String)> {
    let profile = region.profile();
    vec![
        ("q", address.to_string()),
        ("lang", "eng".to_string()),
        ("origin", "livemap".to_string()),
        ("lat", profile.base_lat.to_string()),
        ("lon", profile.base_lon.to_string()),
    ]
}

/// Pick the first candidate with a populated city from a geocoding response body
///
/// Candidates are scanned in order; entries after the first hit are never decoded.
///
/// # Errors
///
/// - `EmptyResponse` if the body is not a JSON array
/// - `AddressNotFound` if no candidate has a city
/// - `WrongResponse` if the chosen candidate is malformed or has no location
pub fn select_geocode_candidate(address: &str, body: &str) -> Result<Coordinate, WazeError> {
    let candidates: Vec<Value> =
        serde_json::from_str(body).map_err(|_| WazeError::EmptyResponse)?;

    debug!(%address, count = candidates.len(), "Geocoding candidates received");

    let hit = candidates
        .into_iter()
        .find(has_city)
        .ok_or_else(|| WazeError::AddressNotFound(address.to_string()))?;

    let candidate: GeocodeCandidate = serde_json::from_value(hit).map_err(|e| {
        WazeError::WrongResponse(format!("geocoding candidate for {address}: {e}"))
    })?;

    let location = candidate.location.ok_or_else(|| {
        WazeError::WrongResponse(format!("geocoding candidate for {address} has no location"))
    })?;

    let coordinate = Coordinate::new(location.lat, location.lon);
    match candidate.bounds {
        Some(bounds) => Ok(coordinate.with_bounds(bounds)),
        None => {
            warn!(%address, "Geocoding candidate has no bounds");
            Ok(coordinate)
        },
    }
}

fn has_city(candidate: &Value) -> bool {
    candidate
        .get("city")
        .and_then(Value::as_str)
        .is_some_and(|city| !city.is_empty())
}

#[derive(Debug, Deserialize)]
struct GeocodeCandidate {
    #[serde(default)]
    location: Option<GeocodeLocation>,
    #[serde(default)]
    bounds: Option<BoundingBox>,
}

#[derive(Debug, Deserialize)]
struct GeocodeLocation {
    lat: f64,
    lon: f64,
}
