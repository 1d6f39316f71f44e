//! Query interface to the remote rules server.

use crate::config::ClientConfig;
use crate::error::ProtocolError;
use crate::protocol::{Color, Position, Sentinels};
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

/// The four queries the rules server answers.
///
/// Each answer is the raw body text. Interpreting sentinels is left to
/// the caller so alternative transports only have to move strings.
#[async_trait::async_trait]
pub trait GameServer: Send + Sync {
    /// Asks what occupies `position`.
    async fn cell(&self, position: Position) -> Result<String, ProtocolError>;

    /// Submits the human move at `position`.
    async fn play(&self, position: Position) -> Result<String, ProtocolError>;

    /// Asks the CPU to take its turn.
    async fn respond(&self) -> Result<String, ProtocolError>;

    /// Asks for the current score of `color`.
    async fn count(&self, color: Color) -> Result<String, ProtocolError>;
}

#[async_trait::async_trait]
impl<T: GameServer + ?Sized> GameServer for Arc<T> {
    async fn cell(&self, position: Position) -> Result<String, ProtocolError> {
        (**self).cell(position).await
    }

    async fn play(&self, position: Position) -> Result<String, ProtocolError> {
        (**self).play(position).await
    }

    async fn respond(&self) -> Result<String, ProtocolError> {
        (**self).respond().await
    }

    async fn count(&self, color: Color) -> Result<String, ProtocolError> {
        (**self).count(color).await
    }
}

/// HTTP transport for the rules server.
#[derive(Debug, Clone)]
pub struct HttpGameServer {
    /// Base URL of the server, without trailing slash.
    base_url: String,
    /// HTTP client carrying the request timeout.
    client: reqwest::Client,
    /// Codes used for the `color` parameter.
    sentinels: Sentinels,
}

impl HttpGameServer {
    /// Creates a transport from the client configuration.
    #[instrument(skip_all, fields(base_url = %config.server_url()))]
    pub fn new(config: &ClientConfig) -> Result<Self, ProtocolError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| {
                error!(error = %e, "Failed to build HTTP client");
                ProtocolError::network(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            base_url: config.server_url().trim_end_matches('/').to_string(),
            client,
            sentinels: config.sentinels().clone(),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one GET and returns the body text.
    #[instrument(level = "debug", skip(self))]
    async fn get(&self, path: &str) -> Result<String, ProtocolError> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(error = %e, url = %url, "Request failed");
            ProtocolError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, url = %url, "Server returned error status");
            return Err(ProtocolError::network(format!("HTTP {} from {}", status, url)));
        }

        let bytes = response.bytes().await.map_err(|e| {
            warn!(error = %e, url = %url, "Failed to read response body");
            ProtocolError::from(e)
        })?;

        let text = String::from_utf8(bytes.to_vec()).map_err(|e| {
            warn!(error = %e, url = %url, "Response body is not UTF-8");
            ProtocolError::malformed(format!("Response from {} is not UTF-8: {}", url, e))
        })?;

        debug!(response = %text, "Response body");
        Ok(text)
    }
}

#[async_trait::async_trait]
impl GameServer for HttpGameServer {
    async fn cell(&self, position: Position) -> Result<String, ProtocolError> {
        self.get(&format!("cell?i={}&j={}", position.row(), position.col()))
            .await
    }

    async fn play(&self, position: Position) -> Result<String, ProtocolError> {
        self.get(&format!("play?i={}&j={}", position.row(), position.col()))
            .await
    }

    async fn respond(&self) -> Result<String, ProtocolError> {
        self.get("respond?param=null").await
    }

    async fn count(&self, color: Color) -> Result<String, ProtocolError> {
        self.get(&format!("count?color={}", self.sentinels.code(color)))
            .await
    }
}
