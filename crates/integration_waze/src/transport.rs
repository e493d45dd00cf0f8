//! HTTP transport with explicit ownership
//!
//! The calculator either builds its own `reqwest::Client` or runs on one the
//! caller shares across several clients. Owned clients are released when the
//! transport is dropped; borrowed clients are left to their owner.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{REFERER, USER_AGENT};
use tracing::{debug, instrument};

use crate::config::WazeConfig;
use crate::error::WazeError;

/// Who is responsible for tearing down the HTTP client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientOwnership {
    /// Built by the calculator and released with it
    Owned,
    /// Supplied by the caller, never torn down here
    Borrowed,
}

/// Raw HTTP answer: status code and body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Scoped HTTP transport shared by geocoding and routing requests
#[derive(Debug)]
pub(crate) struct HttpTransport {
    client: Client,
    ownership: ClientOwnership,
    timeout_secs: u64,
    user_agent: String,
    referer: String,
}

impl HttpTransport {
    /// Build and own a new HTTP client
    pub fn owned(config: &WazeConfig) -> Result<Self, WazeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| WazeError::ConnectionFailed(e.to_string()))?;

        Ok(Self::with_ownership(client, ClientOwnership::Owned, config))
    }

    /// Run on a caller-supplied HTTP client
    pub fn borrowed(client: Client, config: &WazeConfig) -> Self {
        Self::with_ownership(client, ClientOwnership::Borrowed, config)
    }

    fn with_ownership(client: Client, ownership: ClientOwnership, config: &WazeConfig) -> Self {
        Self {
            client,
            ownership,
            timeout_secs: config.timeout_secs,
            user_agent: config.user_agent.clone(),
            referer: config.referer(),
        }
    }

    pub const fn ownership(&self) -> ClientOwnership {
        self.ownership
    }

    /// Issue a GET request with the Waze headers and the configured timeout
    ///
    /// The timeout is applied per request so it also holds for borrowed clients.
    #[instrument(skip(self, params))]
    pub async fn get(
        &self,
        url: &str,
        params: &[(&'static str, String)],
    ) -> Result<RawResponse, WazeError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .header(USER_AGENT, self.user_agent.as_str())
            .header(REFERER, self.referer.as_str())
            .timeout(Duration::from_secs(self.timeout_secs))
            .send()
            .await
            .map_err(|e| WazeError::from_transport(&e, self.timeout_secs))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| WazeError::from_transport(&e, self.timeout_secs))?;

        debug!(status, bytes = body.len(), "Response received");
        Ok(RawResponse { status, body })
    }
}

impl Drop for HttpTransport {
    fn drop(&mut self) {
        match self.ownership {
            ClientOwnership::Owned => debug!("Releasing owned HTTP client"),
            ClientOwnership::Borrowed => debug!("Leaving borrowed HTTP client to its owner"),
        }
    }
}
