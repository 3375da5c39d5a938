//! Explorer configuration
//!
//! The configuration is read once at startup and handed to the API client
//! constructor; nothing in the crate consults ambient globals afterwards.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{ExplorerError, Result};

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "EXPLORER_API_URL";

/// Environment variable enabling mock mode
pub const MOCK_ENV: &str = "EXPLORER_MOCK";

/// Default base URL of the backend API
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/api";

/// Default request timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Runtime configuration of the API layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Base URL the `/exchanges` and `/flowchart` paths are appended to
    pub base_url: String,
    /// Serve a fixed catalog and canned diagram instead of calling the network
    pub mock_mode: bool,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            mock_mode: false,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ExplorerConfig {
    /// Defaults overlaid with `EXPLORER_API_URL` and `EXPLORER_MOCK`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.base_url = url;
        }
        if let Ok(flag) = std::env::var(MOCK_ENV) {
            config.mock_mode = parse_flag(&flag);
        }
        debug!(base_url = %config.base_url, mock_mode = config.mock_mode, "Loaded configuration from environment");
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_mock_mode(mut self, mock_mode: bool) -> Self {
        self.mock_mode = mock_mode;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Check the configuration and normalise the base URL
    pub fn validated(mut self) -> Result<Self> {
        let trimmed = self.base_url.trim().trim_end_matches('/').to_string();
        if trimmed.is_empty() && !self.mock_mode {
            return Err(ExplorerError::config_error("base URL must not be empty"));
        }
        if self.timeout_ms == 0 {
            return Err(ExplorerError::config_error("timeout must be greater than zero"));
        }
        self.base_url = trimmed;
        Ok(self)
    }

    /// Full URL of an API path such as `/exchanges`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
