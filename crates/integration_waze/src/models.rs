//! Route calculator data models
//!
//! Resolved coordinates, routing options, the raw route shapes returned by the
//! Waze routing server, and the aggregated per-route result.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WazeError;

/// Rectangular extent the geocoder associates with a resolved location
///
/// Always normalized so that `top >= bottom` and `left <= right`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    top: f64,
    bottom: f64,
    left: f64,
    right: f64,
}

impl BoundingBox {
    /// Create a bounding box, swapping edges that arrive out of order
    #[must_use]
    pub fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top: top.max(bottom),
            bottom: top.min(bottom),
            left: left.min(right),
            right: left.max(right),
        }
    }

    /// Northern edge (latitude)
    #[must_use]
    pub const fn top(&self) -> f64 {
        self.top
    }

    /// Southern edge (latitude)
    #[must_use]
    pub const fn bottom(&self) -> f64 {
        self.bottom
    }

    /// Western edge (longitude)
    #[must_use]
    pub const fn left(&self) -> f64 {
        self.left
    }

    /// Eastern edge (longitude)
    #[must_use]
    pub const fn right(&self) -> f64 {
        self.right
    }

    /// Whether a path point lies strictly inside the box
    ///
    /// Points on an edge are not contained.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.left < x && x < self.right && self.bottom < y && y < self.top
    }
}

impl<'de> Deserialize<'de> for BoundingBox {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawBounds {
            top: f64,
            bottom: f64,
            left: f64,
            right: f64,
        }

        let raw = RawBounds::deserialize(deserializer)?;
        Ok(Self::new(raw.top, raw.bottom, raw.left, raw.right))
    }
}

/// A resolved location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Geocoder extent, absent for literal coordinates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundingBox>,
}

impl Coordinate {
    /// Create a coordinate without bounds
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            bounds: None,
        }
    }

    /// Attach a bounding box
    #[must_use]
    pub const fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Point in the `x:<lon> y:<lat>` form the routing server expects
    #[must_use]
    pub fn to_waze_point(&self) -> String {
        format!("x:{} y:{}", self.lon, self.lat)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// Vehicle type understood by the routing server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VehicleType {
    /// Taxi lanes and restrictions apply
    Taxi,
    /// Motorcycle routing
    Motorcycle,
}

impl VehicleType {
    /// Value of the `vehicleType` query parameter
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::Taxi => "TAXI",
            Self::Motorcycle => "MOTORCYCLE",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

impl FromStr for VehicleType {
    type Err = WazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TAXI" => Ok(Self::Taxi),
            "MOTORCYCLE" => Ok(Self::Motorcycle),
            _ => Err(WazeError::UnknownVehicleType(s.to_string())),
        }
    }
}

/// Options sent with a routing request
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteOptions {
    /// Vehicle type, `None` for a regular car
    #[serde(default)]
    pub vehicle_type: Option<VehicleType>,

    /// Avoid toll roads
    #[serde(default)]
    pub avoid_toll_roads: bool,

    /// Avoid roads that require a vignette or subscription
    #[serde(default)]
    pub avoid_subscription_roads: bool,

    /// Avoid ferries
    #[serde(default)]
    pub avoid_ferries: bool,

    /// Number of alternative routes to request
    #[serde(default = "default_alternatives")]
    pub alternatives: u8,

    /// Departure offset, passed to the server verbatim as `at`
    #[serde(default)]
    pub time_delta: i64,
}

const fn default_alternatives() -> u8 {
    1
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            vehicle_type: None,
            avoid_toll_roads: false,
            avoid_subscription_roads: false,
            avoid_ferries: false,
            alternatives: default_alternatives(),
            time_delta: 0,
        }
    }
}

impl RouteOptions {
    /// Set the vehicle type
    #[must_use]
    pub const fn with_vehicle_type(mut self, vehicle_type: VehicleType) -> Self {
        self.vehicle_type = Some(vehicle_type);
        self
    }

    /// Avoid toll roads
    #[must_use]
    pub const fn avoiding_toll_roads(mut self) -> Self {
        self.avoid_toll_roads = true;
        self
    }

    /// Avoid vignette / subscription roads
    #[must_use]
    pub const fn avoiding_subscription_roads(mut self) -> Self {
        self.avoid_subscription_roads = true;
        self
    }

    /// Avoid ferries
    #[must_use]
    pub const fn avoiding_ferries(mut self) -> Self {
        self.avoid_ferries = true;
        self
    }

    /// Request `count` alternative routes
    #[must_use]
    pub const fn with_alternatives(mut self, count: u8) -> Self {
        self.alternatives = count;
        self
    }

    /// Shift the departure time
    #[must_use]
    pub const fn with_time_delta(mut self, time_delta: i64) -> Self {
        self.time_delta = time_delta;
        self
    }

    /// Combined `options` query parameter
    ///
    /// Trails are always avoided.
    #[must_use]
    pub fn options_param(&self) -> String {
        [
            ("AVOID_TRAILS", true),
            ("AVOID_TOLL_ROADS", self.avoid_toll_roads),
            ("AVOID_FERRIES", self.avoid_ferries),
        ]
        .iter()
        .map(|(flag, value)| format!("{flag}:{}", flag_str(*value)))
        .collect::<Vec<_>>()
        .join(",")
    }
}

/// Convert bool to the `t`/`f` form used in the options string
const fn flag_str(val: bool) -> &'static str {
    if val { "t" } else { "f" }
}

/// How a route's segments are summed up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateOptions {
    /// Use live-traffic durations instead of typical ones
    #[serde(default = "default_real_time")]
    pub real_time: bool,

    /// Skip segments inside the start or end bounding box
    #[serde(default)]
    pub stop_at_bounds: bool,
}

const fn default_real_time() -> bool {
    true
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            real_time: default_real_time(),
            stop_at_bounds: false,
        }
    }
}

/// Path point attached to a segment
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PathPoint {
    /// Longitude
    pub x: f64,
    /// Latitude
    pub y: f64,
}

/// One leg of a route as returned by the routing server
///
/// The server uses either camelCase (`crossTime`) or snake_case
/// (`cross_time`) duration keys depending on the backend.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RouteSegment {
    #[serde(rename = "crossTime")]
    cross_time: Option<f64>,
    #[serde(rename = "crossTimeWithoutRealTime")]
    cross_time_without_real_time: Option<f64>,
    #[serde(rename = "cross_time")]
    legacy_cross_time: Option<f64>,
    #[serde(rename = "cross_time_without_real_time")]
    legacy_cross_time_without_real_time: Option<f64>,
    length: Option<f64>,
    #[serde(default)]
    path: Option<PathPoint>,
}

impl RouteSegment {
    /// Create a segment with camelCase durations (seconds) and a length in meters
    #[must_use]
    pub const fn new(cross_time: f64, cross_time_without_real_time: f64, length: f64) -> Self {
        Self {
            cross_time: Some(cross_time),
            cross_time_without_real_time: Some(cross_time_without_real_time),
            legacy_cross_time: None,
            legacy_cross_time_without_real_time: None,
            length: Some(length),
            path: None,
        }
    }

    /// Attach a path point
    #[must_use]
    pub const fn with_path(mut self, x: f64, y: f64) -> Self {
        self.path = Some(PathPoint { x, y });
        self
    }

    /// Duration in seconds
    ///
    /// The camelCase pair wins whenever `crossTime` is present.
    #[must_use]
    pub const fn cross_time_secs(&self, real_time: bool) -> Option<f64> {
        match (self.cross_time.is_some(), real_time) {
            (true, true) => self.cross_time,
            (true, false) => self.cross_time_without_real_time,
            (false, true) => self.legacy_cross_time,
            (false, false) => self.legacy_cross_time_without_real_time,
        }
    }

    /// Length in meters
    #[must_use]
    pub const fn length_meters(&self) -> Option<f64> {
        self.length
    }

    /// Path point used for bounding-box filtering
    #[must_use]
    pub const fn path(&self) -> Option<PathPoint> {
        self.path
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
enum RouteTypeField {
    List(Vec<String>),
    Single(String),
}

/// A route as returned by the routing server, before aggregation
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRoute {
    #[serde(default)]
    results: Option<Vec<RouteSegment>>,
    #[serde(default)]
    result: Option<Vec<RouteSegment>>,
    #[serde(default)]
    route_name: Option<String>,
    #[serde(default)]
    street_names: Option<Vec<Option<String>>>,
    #[serde(default)]
    route_type: Option<RouteTypeField>,
    #[serde(default)]
    short_route_name: Option<String>,
}

impl RawRoute {
    /// Create a route from a segment list (stored under `results`)
    #[must_use]
    pub fn from_segments(segments: Vec<RouteSegment>) -> Self {
        Self {
            results: Some(segments),
            ..Self::default()
        }
    }

    /// Segment list, preferring `results` over `result`
    ///
    /// # Errors
    ///
    /// Returns `WrongResponse` if neither key is present.
    pub fn segments(&self) -> Result<&[RouteSegment], WazeError> {
        self.results
            .as_deref()
            .or(self.result.as_deref())
            .ok_or_else(|| WazeError::WrongResponse("route has no result list".to_string()))
    }

    /// Display name, empty when absent
    #[must_use]
    pub fn name(&self) -> &str {
        self.route_name.as_deref().unwrap_or_default()
    }

    /// Street names in route order, nulls dropped
    #[must_use]
    pub fn street_names(&self) -> Vec<String> {
        self.street_names
            .iter()
            .flatten()
            .flatten()
            .cloned()
            .collect()
    }

    /// First route type tag (e.g. `BEST`, `FASTEST`)
    #[must_use]
    pub fn route_type(&self) -> Option<&str> {
        match self.route_type.as_ref()? {
            RouteTypeField::List(types) => types.first().map(String::as_str),
            RouteTypeField::Single(kind) => Some(kind.as_str()),
        }
    }

    /// Short route name (e.g. `A643`)
    #[must_use]
    pub fn short_name(&self) -> Option<&str> {
        self.short_route_name.as_deref()
    }
}

/// Summed duration and distance of a segment list
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteTotals {
    /// Total duration in minutes
    pub duration_minutes: f64,
    /// Total distance in kilometers
    pub distance_km: f64,
}

/// Aggregated information about one route alternative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    /// Total duration in minutes
    pub duration_minutes: f64,
    /// Total distance in kilometers
    pub distance_km: f64,
    /// Route display name (empty when the server sends none)
    pub name: String,
    /// Street names along the route, in order
    pub street_names: Vec<String>,
    /// First route type tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_type: Option<String>,
    /// Short route name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
}

impl RouteResult {
    /// Label in `<type initial>-<short name>` form, e.g. `F-A643`
    #[must_use]
    pub fn route_key(&self) -> String {
        let initial = self
            .route_type
            .as_deref()
            .and_then(|t| t.chars().next())
            .map(String::from)
            .unwrap_or_default();
        let short_name = self.short_name.as_deref().unwrap_or("unknown");
        format!("{initial}-{short_name}")
    }
}

impl fmt::Display for RouteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.1} min, {:.2} km",
            self.name, self.duration_minutes, self.distance_km
        )
    }
}
