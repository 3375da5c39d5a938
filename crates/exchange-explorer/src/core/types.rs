//! Shared data types for the exchange catalog and flowchart requests

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Snapshot of the exchange catalog returned by one fetch
///
/// Replaced wholesale on refetch, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExchangeCatalog {
    pub prefix: String,
    pub count: u64,
    pub exchanges: Vec<String>,
}

impl ExchangeCatalog {
    pub fn new(prefix: impl Into<String>, exchanges: Vec<String>) -> Self {
        Self {
            prefix: prefix.into(),
            count: exchanges.len() as u64,
            exchanges,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }
}

/// Envelope of `GET /exchanges`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangesResponse {
    pub data: ExchangeCatalog,
}

/// Layout direction requested from the flowchart endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Left to right
    #[default]
    LR,
    /// Top down
    TD,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::LR => "LR",
            Direction::TD => "TD",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LR" => Ok(Direction::LR),
            "TD" | "TB" => Ok(Direction::TD),
            _ => Err(format!("Unknown direction: {} (expected LR or TD)", s)),
        }
    }
}

/// Body of `POST /flowchart`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowchartRequest {
    pub exchange: String,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl FlowchartRequest {
    /// Build a request, deriving `filename` from the exchange name
    pub fn new(exchange: impl Into<String>, direction: Direction) -> Self {
        let exchange = exchange.into();
        let filename = sanitize_filename(&exchange);
        Self {
            exchange,
            filename,
            direction: Some(direction),
        }
    }
}

/// Replace every character outside `[A-Za-z0-9_-]` with `_`
///
/// Idempotent: the output only contains allowed characters.
pub fn sanitize_filename(exchange: &str) -> String {
    exchange
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Display split of a dot-delimited exchange name
///
/// `prefix` is the first two segments, `action` the remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeName<'a> {
    pub full: &'a str,
    pub prefix: String,
    pub action: String,
}

impl<'a> ExchangeName<'a> {
    pub fn parse(full: &'a str) -> Self {
        let parts: Vec<&str> = full.split('.').collect();
        let split = parts.len().min(2);
        Self {
            full,
            prefix: parts[..split].join("."),
            action: parts[split..].join("."),
        }
    }
}
