//! Explorer orchestration
//!
//! Wires the API client, the catalog view and the flowchart viewer together
//! the way a front end drives them: load the catalog, filter it, open an
//! exchange, switch direction, close. Fetch failures are additionally
//! surfaced as notifications.

use tracing::{info, info_span, warn, Instrument};

use crate::api::{build_api, ExchangeApi};
use crate::catalog::{CatalogView, Listing};
use crate::core::{Direction, ExplorerConfig, ExplorerError, Result};
use crate::viewer::{default_renderer, DiagramRenderer, ViewerController, ZoomProfile};

/// Title of the notification raised when a flowchart cannot be loaded
pub const FLOWCHART_ERROR_TITLE: &str = "Error loading flowchart";

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Destructive,
}

/// Transient message for the user (a toast in a browser host)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

/// The explorer: catalog, search term, viewer and pending notifications
pub struct Explorer {
    api: Box<dyn ExchangeApi>,
    renderer: Box<dyn DiagramRenderer>,
    catalog: CatalogView,
    viewer: ViewerController,
    notifications: Vec<Notification>,
}

impl Explorer {
    pub fn new(api: Box<dyn ExchangeApi>, renderer: Box<dyn DiagramRenderer>) -> Self {
        Self {
            api,
            renderer,
            catalog: CatalogView::new(),
            viewer: ViewerController::new(ZoomProfile::PANNING),
            notifications: Vec::new(),
        }
    }

    /// Build from configuration with this build's default renderer
    pub fn from_config(config: &ExplorerConfig) -> Result<Self> {
        Ok(Self::new(build_api(config)?, default_renderer()))
    }

    /// Switch the viewer variant (panning or static)
    pub fn with_profile(mut self, profile: ZoomProfile) -> Self {
        self.viewer = ViewerController::new(profile);
        self
    }

    pub fn api_name(&self) -> &'static str {
        self.api.name()
    }

    pub fn catalog(&self) -> &CatalogView {
        &self.catalog
    }

    pub fn listing(&self) -> Listing<'_> {
        self.catalog.listing()
    }

    pub fn viewer(&self) -> &ViewerController {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut ViewerController {
        &mut self.viewer
    }

    /// Fetch the catalog, replacing any previous snapshot
    pub async fn load_catalog(&mut self) -> Result<()> {
        let span = info_span!("load_catalog", api = self.api.name());
        self.catalog.begin_loading();

        let result = self.api.fetch_exchanges().instrument(span).await;
        match result {
            Ok(catalog) => {
                info!(count = catalog.exchanges.len(), "Catalog loaded");
                self.catalog.set_catalog(catalog);
                Ok(())
            }
            Err(error) => {
                warn!(error = %error, "Catalog load failed");
                self.catalog.set_error(error.to_string());
                Err(error)
            }
        }
    }

    /// Manual retry after a failed catalog load
    pub async fn retry(&mut self) -> Result<()> {
        self.load_catalog().await
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.catalog.set_search_term(term);
    }

    /// Open an exchange's flowchart with the current direction
    pub async fn open_exchange(&mut self, exchange: &str) -> Result<()> {
        let ticket = self.viewer.open(exchange);
        let result = self
            .viewer
            .run(ticket, self.api.as_ref(), self.renderer.as_ref())
            .await;
        self.notify_failure(result)
    }

    /// Change the layout direction, refetching the open flowchart
    pub async fn change_direction(&mut self, direction: Direction) -> Result<()> {
        let Some(ticket) = self.viewer.set_direction(direction) else {
            return Ok(());
        };
        let result = self
            .viewer
            .run(ticket, self.api.as_ref(), self.renderer.as_ref())
            .await;
        self.notify_failure(result)
    }

    pub fn close_viewer(&mut self) {
        self.viewer.close();
    }

    /// Drain pending notifications
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    // Render failures only show inline; fetch failures also raise a notification
    fn notify_failure(&mut self, result: Result<()>) -> Result<()> {
        if let Err(error) = &result {
            if !matches!(error, ExplorerError::Render { .. }) {
                self.notifications.push(Notification {
                    title: FLOWCHART_ERROR_TITLE.to_string(),
                    description: error.to_string(),
                    severity: Severity::Destructive,
                });
            }
        }
        result
    }
}
