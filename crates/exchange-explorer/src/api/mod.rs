//! Backend API contract
//!
//! Two operations are consumed from the backend: listing the exchange catalog
//! and fetching the flowchart of one exchange. [`ExchangeApi`] is the seam the
//! rest of the crate talks to; [`HttpApiClient`] speaks HTTP and
//! [`MockApiClient`] serves canned data for offline use.

#[cfg(not(target_arch = "wasm32"))]
mod http;
mod mock;

#[cfg(not(target_arch = "wasm32"))]
pub use http::HttpApiClient;
pub use mock::MockApiClient;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::{Direction, ExchangeCatalog, ExplorerConfig, ExplorerError, Result};

/// Message used when the catalog request fails
pub const EXCHANGES_FAILED: &str = "Failed to fetch exchanges";

/// Message used when the flowchart request fails without a server message
pub const FLOWCHART_FAILED: &str = "Failed to fetch flowchart";

/// Message used when the flowchart response is neither text nor a JSON failure
pub const UNEXPECTED_FORMAT: &str = "Unexpected response format from API";

/// `Accept` header sent with flowchart requests
pub const FLOWCHART_ACCEPT: &str = "text/vnd.mermaid, text/plain";

/// Content types whose body is returned verbatim
const TEXT_CONTENT_TYPES: [&str; 3] = ["text/plain", "text/vnd.mermaid", "image/svg+xml"];

/// Client side of the exchange backend
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    /// Fetch the full exchange catalog
    async fn fetch_exchanges(&self) -> Result<ExchangeCatalog>;

    /// Fetch the flowchart text (diagram source or SVG) for one exchange
    async fn fetch_flowchart(&self, exchange: &str, direction: Direction) -> Result<String>;

    /// Name used in log fields
    fn name(&self) -> &'static str;
}

/// Build the API implementation selected by the configuration
#[cfg(not(target_arch = "wasm32"))]
pub fn build_api(config: &ExplorerConfig) -> Result<Box<dyn ExchangeApi>> {
    let config = config.clone().validated()?;
    if config.mock_mode {
        tracing::info!("Mock mode enabled, serving canned catalog");
        Ok(Box::new(MockApiClient::new()))
    } else {
        Ok(Box::new(HttpApiClient::new(config)?))
    }
}

/// Build the API implementation selected by the configuration
///
/// Only mock mode is available in browser builds; the host page performs real
/// requests itself.
#[cfg(target_arch = "wasm32")]
pub fn build_api(config: &ExplorerConfig) -> Result<Box<dyn ExchangeApi>> {
    if config.mock_mode {
        Ok(Box::new(MockApiClient::new()))
    } else {
        Err(ExplorerError::config_error(
            "HTTP client is not available in browser builds",
        ))
    }
}

/// Map a flowchart response to its text or to an error
///
/// `content_type` is the raw `Content-Type` header value, if any.
pub fn interpret_flowchart_response(
    success: bool,
    content_type: Option<&str>,
    body: &str,
) -> Result<String> {
    if !success {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|json| json.get("message").and_then(Value::as_str).map(String::from))
            .unwrap_or_else(|| FLOWCHART_FAILED.to_string());
        return Err(ExplorerError::network_error(message));
    }

    if let Some(content_type) = content_type {
        let content_type = content_type.to_ascii_lowercase();
        if TEXT_CONTENT_TYPES.iter().any(|t| content_type.contains(t)) {
            return Ok(body.to_string());
        }
    }

    // A success-flagged JSON body has nothing this client can display
    let json: Value = serde_json::from_str(body)
        .map_err(|_| ExplorerError::format_error(UNEXPECTED_FORMAT))?;
    if !is_truthy(json.get("success")) {
        let message = json
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(FLOWCHART_FAILED);
        return Err(ExplorerError::network_error(message));
    }
    Err(ExplorerError::format_error(UNEXPECTED_FORMAT))
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
