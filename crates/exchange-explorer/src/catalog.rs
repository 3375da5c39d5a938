//! Exchange list filtering and listing state
//!
//! Filtering is a pure projection recomputed whenever the catalog or the
//! search term changes. A linear scan is enough for catalogs of a few
//! thousand names.

use crate::core::ExchangeCatalog;

/// Case-insensitive substring filter over the catalog
///
/// An empty term returns every exchange in catalog order. Otherwise the
/// result is the order-preserving subsequence of exchanges whose lowercase
/// form contains the lowercase term.
pub fn filter<'a>(catalog: &'a ExchangeCatalog, term: &str) -> Vec<&'a str> {
    if term.is_empty() {
        return catalog.exchanges.iter().map(String::as_str).collect();
    }
    let term = term.to_lowercase();
    catalog
        .exchanges
        .iter()
        .filter(|exchange| exchange.to_lowercase().contains(&term))
        .map(String::as_str)
        .collect()
}

/// Why the listing has nothing to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyKind {
    /// The catalog itself is empty
    NoData,
    /// The search term matched nothing
    NoResults { term: String },
}

impl EmptyKind {
    pub fn title(&self) -> &'static str {
        match self {
            EmptyKind::NoData => "No exchanges available",
            EmptyKind::NoResults { .. } => "No exchanges found",
        }
    }

    pub fn detail(&self) -> String {
        match self {
            EmptyKind::NoData => "Check your API connection".to_string(),
            EmptyKind::NoResults { term } => format!("No results for \"{}\"", term),
        }
    }
}

/// What the exchange list currently displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing<'a> {
    Loading,
    /// Catalog fetch failed; the user can retry
    Failed { message: String },
    Empty(EmptyKind),
    Exchanges {
        items: Vec<&'a str>,
        /// Match summary, only present while a search term is active
        matches: Option<String>,
    },
}

/// Catalog fetch lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogState {
    #[default]
    Loading,
    Loaded(ExchangeCatalog),
    Failed(String),
}

/// Catalog snapshot plus the current search term
#[derive(Debug, Clone, Default)]
pub struct CatalogView {
    state: CatalogState,
    search_term: String,
}

impl CatalogView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    /// Mark a (re)fetch as started; the previous snapshot is dropped
    pub fn begin_loading(&mut self) {
        self.state = CatalogState::Loading;
    }

    /// Replace the snapshot wholesale
    pub fn set_catalog(&mut self, catalog: ExchangeCatalog) {
        self.state = CatalogState::Loaded(catalog);
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.state = CatalogState::Failed(message.into());
    }

    pub fn catalog(&self) -> Option<&ExchangeCatalog> {
        match &self.state {
            CatalogState::Loaded(catalog) => Some(catalog),
            _ => None,
        }
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Header data: catalog prefix and total count
    pub fn header(&self) -> Option<(&str, u64)> {
        self.catalog().map(|c| (c.prefix.as_str(), c.count))
    }

    /// Exchanges matching the current term, empty unless loaded
    pub fn filtered(&self) -> Vec<&str> {
        self.catalog()
            .map(|c| filter(c, &self.search_term))
            .unwrap_or_default()
    }

    /// Derive what the list should display
    pub fn listing(&self) -> Listing<'_> {
        match &self.state {
            CatalogState::Loading => Listing::Loading,
            CatalogState::Failed(message) => Listing::Failed {
                message: message.clone(),
            },
            CatalogState::Loaded(catalog) => {
                let items = filter(catalog, &self.search_term);
                if items.is_empty() {
                    if self.search_term.is_empty() {
                        Listing::Empty(EmptyKind::NoData)
                    } else {
                        Listing::Empty(EmptyKind::NoResults {
                            term: self.search_term.clone(),
                        })
                    }
                } else {
                    let matches = if self.search_term.is_empty() {
                        None
                    } else {
                        Some(match_summary(items.len()))
                    };
                    Listing::Exchanges { items, matches }
                }
            }
        }
    }
}

/// "Found N exchange(s)" summary line
pub fn match_summary(count: usize) -> String {
    let noun = if count == 1 { "exchange" } else { "exchanges" };
    format!("Found {} {}", count, noun)
}
