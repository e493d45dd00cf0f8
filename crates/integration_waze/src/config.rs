//! Route calculator configuration

use serde::{Deserialize, Serialize};
use url::Url;

use crate::models::RouteOptions;
use crate::region::Region;

/// Server-side routing timeout sent with every routing request (milliseconds)
pub const SERVER_TIMEOUT_MS: u32 = 60_000;

/// Maximum number of alternatives the routing server will compute
pub const MAX_ALTERNATIVES: u8 = 10;

/// Configuration for the Waze route calculator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WazeConfig {
    /// Base URL of the Waze live-map host
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Service region
    #[serde(default)]
    pub region: Region,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Options used by the convenience calls
    #[serde(default = "default_route_options")]
    pub route_options: RouteOptions,
}

fn default_base_url() -> String {
    "https://www.waze.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    20
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

fn default_route_options() -> RouteOptions {
    RouteOptions::default().with_alternatives(3)
}

impl Default for WazeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            region: Region::default(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            route_options: default_route_options(),
        }
    }
}

impl WazeConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Same configuration pointed at another host
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Same configuration for another region
    #[must_use]
    pub const fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    /// Full URL of an endpoint path on the configured host
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Value of the `referer` header
    #[must_use]
    pub fn referer(&self) -> String {
        format!("{}/", self.base_url.trim_end_matches('/'))
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        Url::parse(&self.base_url).map_err(|e| format!("base_url is not a valid URL: {e}"))?;

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.route_options.alternatives == 0 {
            return Err("route_options.alternatives must be greater than 0".to_string());
        }

        if self.route_options.alternatives > MAX_ALTERNATIVES {
            return Err(format!(
                "route_options.alternatives must be {MAX_ALTERNATIVES} or less"
            ));
        }

        Ok(())
    }
}
