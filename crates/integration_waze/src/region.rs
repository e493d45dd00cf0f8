//! Waze service regions
//!
//! Waze partitions its live-map backend per region. Each region has its own
//! search and routing server prefix and a bias point the geocoder uses to
//! prefer nearby matches.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WazeError;

/// A Waze routing-service partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Region {
    /// United States
    Us,
    /// North America (served by the US backend)
    Na,
    /// Europe
    #[default]
    Eu,
    /// Israel
    Il,
    /// Australia (served by the rest-of-world backend)
    Au,
}

/// Static endpoint and bias data for a region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionProfile {
    /// Path of the geocoding endpoint, relative to the service host
    pub search_path: &'static str,
    /// Path of the routing endpoint, relative to the service host
    pub routing_path: &'static str,
    /// Latitude of the geocoding bias point
    pub base_lat: f64,
    /// Longitude of the geocoding bias point
    pub base_lon: f64,
}

const US_PROFILE: RegionProfile = RegionProfile {
    search_path: "SearchServer/mozi",
    routing_path: "RoutingManager/routingRequest",
    base_lat: 40.713,
    base_lon: -74.006,
};

const EU_PROFILE: RegionProfile = RegionProfile {
    search_path: "row-SearchServer/mozi",
    routing_path: "row-RoutingManager/routingRequest",
    base_lat: 47.498,
    base_lon: 19.040,
};

const IL_PROFILE: RegionProfile = RegionProfile {
    search_path: "il-SearchServer/mozi",
    routing_path: "il-RoutingManager/routingRequest",
    base_lat: 31.768,
    base_lon: 35.214,
};

const AU_PROFILE: RegionProfile = RegionProfile {
    search_path: "row-SearchServer/mozi",
    routing_path: "row-RoutingManager/routingRequest",
    base_lat: -35.281,
    base_lon: 149.128,
};

impl Region {
    /// All supported regions
    pub const ALL: [Self; 5] = [Self::Us, Self::Na, Self::Eu, Self::Il, Self::Au];

    /// Endpoint paths and bias point for this region
    #[must_use]
    pub const fn profile(self) -> &'static RegionProfile {
        match self {
            Self::Us | Self::Na => &US_PROFILE,
            Self::Eu => &EU_PROFILE,
            Self::Il => &IL_PROFILE,
            Self::Au => &AU_PROFILE,
        }
    }

    /// Two-letter region code as used by Waze
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Us => "US",
            Self::Na => "NA",
            Self::Eu => "EU",
            Self::Il => "IL",
            Self::Au => "AU",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Region {
    type Err = WazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "US" => Ok(Self::Us),
            "NA" => Ok(Self::Na),
            "EU" => Ok(Self::Eu),
            "IL" => Ok(Self::Il),
            "AU" => Ok(Self::Au),
            _ => Err(WazeError::UnknownRegion(s.to_string())),
        }
    }
}

impl TryFrom<String> for Region {
    type Error = WazeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.code().to_string()
    }
}
