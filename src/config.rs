//! Client configuration loaded from TOML with environment overrides.

use crate::protocol::Sentinels;
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Environment variable overriding the configured server URL.
pub const SERVER_URL_ENV: &str = "OTHELLO_SERVER_URL";

/// Configuration for a game session and its HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[serde(default)]
#[setters(prefix = "with_")]
pub struct ClientConfig {
    /// Base URL of the rules server.
    #[setters(into)]
    server_url: String,

    /// Per-request timeout in milliseconds.
    request_timeout_ms: u64,

    /// Consecutive pass answers tolerated in one CPU turn before giving up.
    max_consecutive_passes: u32,

    /// Extra attempts for a cell or score query after a transient failure.
    refresh_retries: u32,

    /// Wire vocabulary.
    sentinels: Sentinels,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".to_string(),
            // The server sleeps a few seconds before answering a pass
            request_timeout_ms: 30_000,
            // One CPU move per initially empty square at most
            max_consecutive_passes: 60,
            refresh_retries: 1,
            sentinels: Sentinels::default(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        info!(server_url = %config.server_url, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file if it exists, otherwise starts from defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Applies a server URL override such as the value of [`SERVER_URL_ENV`].
    #[instrument(skip(self))]
    pub fn with_server_override(self, server_url: Option<String>) -> Self {
        match server_url {
            Some(url) if !url.trim().is_empty() => {
                info!(url = %url, "Overriding server URL");
                self.with_server_url(url)
            }
            _ => self,
        }
    }

    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Checks the values a session cannot run with.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(ConfigError::new(format!(
                "server_url must be an http(s) URL, got {:?}",
                self.server_url
            )));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::new("request_timeout_ms must be positive"));
        }
        let codes = [
            self.sentinels.black(),
            self.sentinels.white(),
            self.sentinels.rejected(),
            self.sentinels.pass(),
        ];
        if codes.iter().any(|code| code.trim().is_empty()) {
            return Err(ConfigError::new("sentinels must not be blank"));
        }
        if self.sentinels.black() == self.sentinels.white() {
            return Err(ConfigError::new("black and white codes must differ"));
        }
        // Color codes go into the score query string unencoded
        for code in [self.sentinels.black(), self.sentinels.white()] {
            if !code.chars().all(is_url_unreserved) {
                return Err(ConfigError::new(format!(
                    "color code {:?} must only use letters, digits, '-', '.', '_' or '~'",
                    code
                )));
            }
        }
        Ok(())
    }
}

fn is_url_unreserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
