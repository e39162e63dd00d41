use std::time::Duration;

use bytes::Bytes;

use crate::error::{Result, TransportError};
use crate::transport::Transport;

/// HTTP(S) transport backed by `reqwest`.
///
/// Only the connection is configured here. Per-attempt deadlines belong to
/// the [`AttemptController`](crate::AttemptController), which knows whether
/// further sources remain.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with default client settings.
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self> { Self::builder().build() }

    pub fn builder() -> ReqwestTransportBuilder { ReqwestTransportBuilder::default() }

    /// Wrap an already configured client.
    pub fn from_client(client: reqwest::Client) -> Self { Self { client } }
}

impl Transport for ReqwestTransport {
    async fn fetch(&self, source: &str) -> Result<Bytes> {
        let response = self.client.get(source).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(response.bytes().await?)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransportBuilder {
    user_agent:      Option<String>,
    connect_timeout: Option<Duration>,
}

impl ReqwestTransportBuilder {
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialised.
    pub fn build(self) -> Result<ReqwestTransport> {
        let mut builder = reqwest::Client::builder();
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Transport(e.to_string()))?;
        Ok(ReqwestTransport { client })
    }
}
