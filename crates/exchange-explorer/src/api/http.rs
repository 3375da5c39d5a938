//! HTTP implementation of the exchange API

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{debug, info, info_span, warn, Instrument};

use super::{interpret_flowchart_response, ExchangeApi, EXCHANGES_FAILED, FLOWCHART_ACCEPT};
use crate::core::{
    Direction, ExchangeCatalog, ExchangesResponse, ExplorerConfig, ExplorerError,
    FlowchartRequest, Result,
};

/// REST client for the `/exchanges` and `/flowchart` endpoints
///
/// No caching or retry happens here; every call is one request.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    config: ExplorerConfig,
    http: reqwest::Client,
}

impl HttpApiClient {
    /// Create a client for the given configuration
    pub fn new(config: ExplorerConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ExplorerError::config_error(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { config, http })
    }

    /// Configuration the client was built with, including the base URL
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }
}

#[async_trait]
impl ExchangeApi for HttpApiClient {
    async fn fetch_exchanges(&self) -> Result<ExchangeCatalog> {
        let url = self.config.endpoint("/exchanges");
        let span = info_span!("fetch_exchanges", url = %url);

        async move {
            let response = self.http.get(&url).send().await.map_err(|e| {
                warn!(error = %e, "Catalog request failed");
                ExplorerError::network_error(e.to_string())
            })?;

            let status = response.status();
            if !status.is_success() {
                warn!(status = status.as_u16(), "Catalog request returned an error status");
                return Err(ExplorerError::network_error(EXCHANGES_FAILED));
            }

            let body = response
                .text()
                .await
                .map_err(|e| ExplorerError::network_error(e.to_string()))?;
            let envelope: ExchangesResponse = serde_json::from_str(&body).map_err(|e| {
                warn!(error = %e, "Catalog body did not decode");
                ExplorerError::format_error(format!("Malformed exchanges response: {}", e))
            })?;

            info!(
                prefix = %envelope.data.prefix,
                count = envelope.data.exchanges.len(),
                "Fetched exchange catalog"
            );
            Ok(envelope.data)
        }
        .instrument(span)
        .await
    }

    async fn fetch_flowchart(&self, exchange: &str, direction: Direction) -> Result<String> {
        let url = self.config.endpoint("/flowchart");
        let request = FlowchartRequest::new(exchange, direction);
        let span = info_span!(
            "fetch_flowchart",
            exchange = %request.exchange,
            filename = %request.filename,
            direction = %direction
        );

        async move {
            let response = self
                .http
                .post(&url)
                .header(ACCEPT, FLOWCHART_ACCEPT)
                .json(&request)
                .send()
                .await
                .map_err(|e| {
                    warn!(error = %e, "Flowchart request failed");
                    ExplorerError::network_error(e.to_string())
                })?;

            let status = response.status();
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response
                .text()
                .await
                .map_err(|e| ExplorerError::network_error(e.to_string()))?;

            debug!(
                status = status.as_u16(),
                content_type = content_type.as_deref().unwrap_or(""),
                body_len = body.len(),
                "Received flowchart response"
            );

            let text = interpret_flowchart_response(status.is_success(), content_type.as_deref(), &body)
                .inspect_err(|e| warn!(kind = e.kind(), error = %e, "Flowchart response rejected"))?;
            info!(len = text.len(), "Fetched flowchart");
            Ok(text)
        }
        .instrument(span)
        .await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
