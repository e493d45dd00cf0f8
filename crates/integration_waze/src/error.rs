//! Route calculator error types

use thiserror::Error;

/// Errors that can occur while resolving locations or calculating routes
#[derive(Debug, Error)]
pub enum WazeError {
    /// Connection to the Waze service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request did not complete within the configured timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// No geocoding candidate with a populated city was found
    #[error("Cannot get coords for {0}")]
    AddressNotFound(String),

    /// The service answered with a non-success HTTP status
    #[error("Server error (HTTP {status}): {body}")]
    ServerError {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Success status but the body was not valid JSON
    #[error("empty response")]
    EmptyResponse,

    /// The routing server reported an error in its payload
    #[error("{0}")]
    Upstream(String),

    /// The JSON body did not have the expected shape
    #[error("wrong response: {0}")]
    WrongResponse(String),

    /// Region code is not one of US, NA, EU, IL, AU
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    /// Vehicle type is not one of TAXI, MOTORCYCLE
    #[error("Unknown vehicle type: {0}")]
    UnknownVehicleType(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl WazeError {
    /// Returns true if this is the timeout error kind
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionFailed(_) | Self::Timeout { .. } => true,
            Self::ServerError { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Classify a transport error, keeping timeouts distinct
    pub(crate) fn from_transport(err: &reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_secs }
        } else {
            Self::ConnectionFailed(err.to_string())
        }
    }
}
