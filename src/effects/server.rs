//! HTTP client for the companion server.

use super::error::SyncError;
use crate::sync::ServerMessage;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Posts [`ServerMessage`]s as JSON to the server's base URL.
#[derive(Clone, Debug)]
pub struct ServerClient {
    client: Client,
    url: Url,
}

impl ServerClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, SyncError> {
        let url = Url::parse(url).map_err(|e| SyncError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Transport(e.to_string()))?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Stamp `message` with the presentation name and post it. Any non-2xx
    /// answer means the server is not connected.
    pub async fn send(
        &self,
        mut message: ServerMessage,
        presentation: &str,
    ) -> Result<(), SyncError> {
        message.stamp(presentation);
        self.post(&message).await
    }

    async fn post(&self, message: &ServerMessage) -> Result<(), SyncError> {
        let kind = message.kind();
        let response = self
            .client
            .post(self.url.clone())
            .json(message)
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            debug!(kind, status = status.as_u16(), "server rejected message");
            return Err(SyncError::NotConnected {
                status: status.as_u16(),
            });
        }

        debug!(kind, url = %self.url, "message delivered");
        Ok(())
    }

    /// One-shot connectivity check.
    pub async fn probe(&self) -> bool {
        match self.post(&ServerMessage::Probe).await {
            Ok(()) => {
                info!(url = %self.url, "server connected, recording enabled");
                true
            }
            Err(e) => {
                warn!(url = %self.url, error = %e, "server not connected, recording disabled");
                false
            }
        }
    }
}
