//! Exchange Explorer - browse a message-exchange catalog and its flowcharts
//!
//! Lists the exchanges a backend knows about, filters them client-side and,
//! for a selected exchange, fetches a flowchart (Mermaid source or raw SVG)
//! and renders it through an external diagram renderer.
//!
//! # Quick Start
//!
//! ```rust
//! use exchange_explorer::{filter, ExchangeCatalog};
//!
//! let catalog = ExchangeCatalog::new(
//!     "moirai",
//!     vec!["moirai.topic.database.clone".to_string()],
//! );
//! assert_eq!(filter(&catalog, "DATABASE"), vec!["moirai.topic.database.clone"]);
//! assert!(filter(&catalog, "zzz").is_empty());
//! ```
//!
//! # Driving the viewer
//!
//! ```rust
//! use exchange_explorer::prelude::*;
//!
//! # tokio_test_block(async {
//! let mut explorer = Explorer::new(Box::new(MockApiClient::new()), default_renderer());
//! explorer.load_catalog().await.unwrap();
//! explorer.set_search_term("billing");
//! let _ = explorer.open_exchange("moirai.direct.billing.invoice").await;
//! explorer.viewer_mut().transform_mut().zoom_in();
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

pub mod api;
pub mod app;
pub mod catalog;
pub mod core;
pub mod viewer;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use crate::app::{Explorer, Notification, Severity};
pub use crate::catalog::filter;
pub use crate::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::api::{ExchangeApi, MockApiClient};
    #[cfg(not(target_arch = "wasm32"))]
    pub use crate::api::HttpApiClient;
    pub use crate::app::{Explorer, Notification, Severity};
    pub use crate::catalog::{filter, CatalogView, EmptyKind, Listing};
    pub use crate::core::{
        sanitize_filename, Direction, ExchangeCatalog, ExplorerConfig, ExplorerError,
        FlowchartRequest,
    };
    pub use crate::viewer::{
        classify, default_renderer, sanitize_svg, DiagramRenderer, PayloadKind, Point,
        PointerButton, SvgDownload, ViewerController, ViewerState, ViewportTransform,
        ZoomProfile,
    };
}

/// Fetch the catalog with the given configuration and filter it
///
/// # Example
/// ```rust
/// use exchange_explorer::{search, ExplorerConfig};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let config = ExplorerConfig::default().with_mock_mode(true);
/// let matches = search(&config, "database").await.unwrap();
/// assert!(matches.iter().all(|m| m.contains("database")));
/// # });
/// ```
pub async fn search(config: &ExplorerConfig, term: &str) -> Result<Vec<String>> {
    let api = api::build_api(config)?;
    let catalog = api.fetch_exchanges().await?;
    Ok(filter(&catalog, term).into_iter().map(String::from).collect())
}
