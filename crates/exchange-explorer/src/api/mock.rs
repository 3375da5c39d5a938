//! In-memory API used in mock mode
//!
//! Serves a fixed catalog and a canned flowchart so the explorer can be
//! demonstrated without a backend.

use async_trait::async_trait;
use tracing::{debug, warn};

use super::ExchangeApi;
use crate::core::{Direction, ExchangeCatalog, ExplorerError, Result};

const MOCK_PREFIX: &str = "moirai";

const MOCK_EXCHANGES: [&str; 8] = [
    "moirai.topic.database.clone",
    "moirai.topic.database.backup",
    "moirai.topic.database.restore",
    "moirai.topic.user.created",
    "moirai.topic.user.deleted",
    "moirai.direct.billing.invoice",
    "moirai.direct.billing.refund",
    "moirai.fanout.audit.log",
];

/// API implementation backed by fixed data
#[derive(Debug, Clone)]
pub struct MockApiClient {
    catalog: ExchangeCatalog,
}

impl MockApiClient {
    /// Mock client serving the built-in demo catalog
    pub fn new() -> Self {
        let exchanges = MOCK_EXCHANGES.iter().map(|s| s.to_string()).collect();
        Self {
            catalog: ExchangeCatalog::new(MOCK_PREFIX, exchanges),
        }
    }

    /// Mock client serving a caller-provided catalog
    pub fn with_catalog(catalog: ExchangeCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ExchangeCatalog {
        &self.catalog
    }
}

impl Default for MockApiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Canned Mermaid flowchart describing a generic message handler
pub fn canned_flowchart(exchange: &str, direction: Direction) -> String {
    let label = exchange.replace('"', "'");
    format!(
        "flowchart {direction}\n\
         \x20   received([Message received]) --> exchange[\"{label}\"]\n\
         \x20   exchange --> validate{{Valid payload?}}\n\
         \x20   validate -->|yes| handle[Handle message]\n\
         \x20   validate -->|no| reject[Reject and log]\n\
         \x20   handle --> ack([Ack])\n\
         \x20   reject --> nack([Nack])\n"
    )
}

#[async_trait]
impl ExchangeApi for MockApiClient {
    async fn fetch_exchanges(&self) -> Result<ExchangeCatalog> {
        debug!(count = self.catalog.exchanges.len(), "Serving mock catalog");
        Ok(self.catalog.clone())
    }

    async fn fetch_flowchart(&self, exchange: &str, direction: Direction) -> Result<String> {
        if !self.catalog.exchanges.iter().any(|e| e == exchange) {
            warn!(exchange, "Mock catalog has no such exchange");
            return Err(ExplorerError::network_error(format!(
                "Exchange not found: {}",
                exchange
            )));
        }
        debug!(exchange, %direction, "Serving canned flowchart");
        Ok(canned_flowchart(exchange, direction))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
