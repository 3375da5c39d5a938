//! Core error types for the explorer
//!
//! Every failure is scoped to a single view operation: a catalog load, a
//! flowchart fetch or a diagram render. None of them is retried here.

use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, ExplorerError>;

/// Core error types for catalog and flowchart operations
///
/// The `Network`, `Render` and `Format` variants display their message
/// verbatim, since that text is what ends up in notifications.
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// Non-2xx HTTP status or transport failure
    #[error("{message}")]
    Network { message: String },

    /// The external renderer rejected the diagram source
    #[error("{message}")]
    Render { message: String },

    /// The response did not have an expected shape
    #[error("{message}")]
    Format { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ExplorerError {
    /// Create a new network error
    pub fn network_error(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new render error
    pub fn render_error(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Create a new format error
    pub fn format_error(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Short classification used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::Render { .. } => "render",
            Self::Format { .. } => "format",
            Self::Config { .. } => "config",
            Self::Io { .. } => "io",
        }
    }
}
