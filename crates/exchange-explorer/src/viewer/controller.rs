//! Diagram viewer state machine
//!
//! ```text
//! Idle ──open──▶ Loading ──svg payload──────────────▶ Rendered
//!                  │  └──diagram source──▶ render ──▶ Rendered
//!                  │                          └─────▶ RenderFailed
//!                  └──fetch failure─────────────────▶ RenderFailed
//! Rendered/RenderFailed ──open / set_direction──▶ Loading
//! any ──close──▶ Idle
//! ```
//!
//! Only the most recently started fetch is reflected in the state. Every
//! transition into `Loading` or `Idle` bumps a generation counter; fetch and
//! render results carry the generation they were started under and are
//! dropped when it no longer matches. Nothing is cancelled on the network
//! side.

use tracing::{debug, info, warn};

use super::detector::{classify, PayloadKind};
use super::download::SvgDownload;
use super::renderer::{new_render_id, DiagramRenderer, RENDER_FAILED};
use super::sanitize::sanitize_svg;
use super::transform::{ViewportTransform, ZoomProfile};
use crate::api::ExchangeApi;
use crate::core::{Direction, ExplorerError, Result};

/// Message used when the backend returns a blank payload
pub const EMPTY_PAYLOAD: &str = "Empty flowchart response";

/// What the viewer currently shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewerState {
    #[default]
    Idle,
    Loading {
        exchange: String,
        direction: Direction,
    },
    Rendered {
        exchange: String,
        direction: Direction,
        kind: PayloadKind,
        /// Sanitized markup ready for display
        svg: String,
        /// Payload as fetched
        source: String,
    },
    RenderFailed {
        exchange: String,
        direction: Direction,
        message: String,
        /// Unrendered payload for inspection, absent when the fetch failed
        source: Option<String>,
    },
}

impl ViewerState {
    pub fn name(&self) -> &'static str {
        match self {
            ViewerState::Idle => "idle",
            ViewerState::Loading { .. } => "loading",
            ViewerState::Rendered { .. } => "rendered",
            ViewerState::RenderFailed { .. } => "render_failed",
        }
    }

    pub fn exchange(&self) -> Option<&str> {
        match self {
            ViewerState::Idle => None,
            ViewerState::Loading { exchange, .. }
            | ViewerState::Rendered { exchange, .. }
            | ViewerState::RenderFailed { exchange, .. } => Some(exchange),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewerState::Loading { .. })
    }
}

/// A flowchart fetch the caller has to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub exchange: String,
    pub direction: Direction,
}

/// A render the caller has to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    pub generation: u64,
    /// Unique id for the renderer call
    pub render_id: String,
    pub exchange: String,
    pub direction: Direction,
    pub source: String,
}

/// Result of feeding a fetch or render result back into the controller
#[derive(Debug)]
pub enum Outcome {
    /// Superseded by a newer request; nothing changed
    Stale,
    Rendered,
    /// Diagram source must go through the renderer next
    NeedsRender(RenderJob),
    /// The viewer moved to `RenderFailed`
    Failed(ExplorerError),
}

/// Owner of render state and viewport transform while the viewer is open
#[derive(Debug, Clone)]
pub struct ViewerController {
    state: ViewerState,
    generation: u64,
    direction: Direction,
    transform: ViewportTransform,
}

impl ViewerController {
    pub fn new(profile: ZoomProfile) -> Self {
        Self {
            state: ViewerState::Idle,
            generation: 0,
            direction: Direction::default(),
            transform: ViewportTransform::new(profile),
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn transform(&self) -> &ViewportTransform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut ViewportTransform {
        &mut self.transform
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Select an exchange; returns the fetch to perform
    pub fn open(&mut self, exchange: impl Into<String>) -> FetchTicket {
        let exchange = exchange.into();
        info!(%exchange, direction = %self.direction, "Opening flowchart");
        self.begin_fetch(exchange)
    }

    /// Change the layout direction; re-fetches when an exchange is open
    pub fn set_direction(&mut self, direction: Direction) -> Option<FetchTicket> {
        self.direction = direction;
        let exchange = self.state.exchange()?.to_string();
        debug!(%exchange, %direction, "Direction changed, refetching");
        Some(self.begin_fetch(exchange))
    }

    /// Close the viewer, discarding render state and in-flight interest
    pub fn close(&mut self) {
        self.generation += 1;
        self.state = ViewerState::Idle;
        self.transform.reset();
        debug!(generation = self.generation, "Viewer closed");
    }

    fn begin_fetch(&mut self, exchange: String) -> FetchTicket {
        self.generation += 1;
        self.transform.reset();
        self.state = ViewerState::Loading {
            exchange: exchange.clone(),
            direction: self.direction,
        };
        FetchTicket {
            generation: self.generation,
            exchange,
            direction: self.direction,
        }
    }

    /// Apply the result of a flowchart fetch
    pub fn complete_fetch(&mut self, ticket: &FetchTicket, result: Result<String>) -> Outcome {
        if !self.is_current(ticket.generation) {
            debug!(
                exchange = %ticket.exchange,
                stale = ticket.generation,
                current = self.generation,
                "Discarding stale flowchart response"
            );
            return Outcome::Stale;
        }

        let text = match result {
            Ok(text) => text,
            Err(error) => {
                warn!(exchange = %ticket.exchange, error = %error, "Flowchart fetch failed");
                self.fail(&ticket.exchange, ticket.direction, error.to_string(), None);
                return Outcome::Failed(error);
            }
        };

        match classify(&text) {
            Some(PayloadKind::Svg) => {
                info!(exchange = %ticket.exchange, "Displaying SVG payload directly");
                self.state = ViewerState::Rendered {
                    exchange: ticket.exchange.clone(),
                    direction: ticket.direction,
                    kind: PayloadKind::Svg,
                    svg: sanitize_svg(&text),
                    source: text,
                };
                Outcome::Rendered
            }
            Some(PayloadKind::DiagramSource) => Outcome::NeedsRender(RenderJob {
                generation: ticket.generation,
                render_id: new_render_id(),
                exchange: ticket.exchange.clone(),
                direction: ticket.direction,
                source: text,
            }),
            None => {
                warn!(exchange = %ticket.exchange, "Flowchart payload is blank");
                self.fail(&ticket.exchange, ticket.direction, EMPTY_PAYLOAD.to_string(), Some(text));
                Outcome::Failed(ExplorerError::format_error(EMPTY_PAYLOAD))
            }
        }
    }

    /// Apply the result of a renderer call
    pub fn complete_render(&mut self, job: RenderJob, result: Result<String>) -> Outcome {
        if !self.is_current(job.generation) {
            debug!(render_id = %job.render_id, "Discarding stale render result");
            return Outcome::Stale;
        }

        match result {
            Ok(svg) => {
                info!(exchange = %job.exchange, svg_len = svg.len(), "Rendered flowchart");
                self.state = ViewerState::Rendered {
                    exchange: job.exchange,
                    direction: job.direction,
                    kind: PayloadKind::DiagramSource,
                    svg: sanitize_svg(&svg),
                    source: job.source,
                };
                Outcome::Rendered
            }
            Err(error) => {
                warn!(exchange = %job.exchange, error = %error, "Renderer rejected flowchart");
                self.fail(&job.exchange, job.direction, RENDER_FAILED.to_string(), Some(job.source));
                Outcome::Failed(error)
            }
        }
    }

    fn fail(&mut self, exchange: &str, direction: Direction, message: String, source: Option<String>) {
        self.state = ViewerState::RenderFailed {
            exchange: exchange.to_string(),
            direction,
            message,
            source,
        };
    }

    /// Fetch and, if needed, render the ticket's flowchart
    ///
    /// Returns the failure that moved the viewer to `RenderFailed`, if any.
    pub async fn run(
        &mut self,
        ticket: FetchTicket,
        api: &dyn ExchangeApi,
        renderer: &dyn DiagramRenderer,
    ) -> Result<()> {
        let fetched = api.fetch_flowchart(&ticket.exchange, ticket.direction).await;
        let job = match self.complete_fetch(&ticket, fetched) {
            Outcome::Stale | Outcome::Rendered => return Ok(()),
            Outcome::Failed(error) => return Err(error),
            Outcome::NeedsRender(job) => job,
        };

        debug!(render_id = %job.render_id, renderer = renderer.name(), "Handing source to renderer");
        let rendered = renderer.render(&job.render_id, &job.source).await;
        match self.complete_render(job, rendered) {
            Outcome::Failed(error) => Err(error),
            _ => Ok(()),
        }
    }

    /// SVG download of the current diagram, `None` unless rendered
    pub fn download(&self) -> Option<SvgDownload> {
        match &self.state {
            ViewerState::Rendered { exchange, svg, .. } => Some(SvgDownload::new(exchange, svg)),
            _ => None,
        }
    }
}

impl Default for ViewerController {
    fn default() -> Self {
        Self::new(ZoomProfile::default())
    }
}
