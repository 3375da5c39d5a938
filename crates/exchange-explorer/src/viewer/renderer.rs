//! External diagram renderer seam
//!
//! The viewer never lays out diagrams itself. Diagram source is handed to a
//! [`DiagramRenderer`], which yields SVG markup or rejects the source.

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::{ExplorerError, Result};

/// Generic message shown when the renderer rejects a diagram
pub const RENDER_FAILED: &str = "Failed to render flowchart";

/// Asynchronous diagram-source to SVG compiler
#[async_trait]
pub trait DiagramRenderer: Send + Sync {
    /// Render `source` to SVG markup
    ///
    /// `id` is unique per call so concurrent renders never collide on
    /// element ids inside the produced markup.
    async fn render(&self, id: &str, source: &str) -> Result<String>;

    /// Name used in log fields
    fn name(&self) -> &'static str;
}

/// Fresh identifier for one render call
pub fn new_render_id() -> String {
    format!("mermaid-{}", Uuid::new_v4().simple())
}

/// Renderer used when no diagram backend is compiled in
///
/// Rejects every source, so the viewer shows the raw text instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableRenderer;

#[async_trait]
impl DiagramRenderer for UnavailableRenderer {
    async fn render(&self, _id: &str, _source: &str) -> Result<String> {
        Err(ExplorerError::render_error(
            "No diagram renderer available in this build",
        ))
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }
}

/// Default renderer for this build
pub fn default_renderer() -> Box<dyn DiagramRenderer> {
    #[cfg(all(feature = "mermaid", not(target_arch = "wasm32")))]
    {
        Box::new(mermaid::MermaidRenderer::new())
    }
    #[cfg(not(all(feature = "mermaid", not(target_arch = "wasm32"))))]
    {
        Box::new(UnavailableRenderer)
    }
}

#[cfg(all(feature = "mermaid", not(target_arch = "wasm32")))]
pub use mermaid::MermaidRenderer;

#[cfg(all(feature = "mermaid", not(target_arch = "wasm32")))]
mod mermaid {
    use std::panic::{self, AssertUnwindSafe};

    use async_trait::async_trait;
    use mermaid_rs_renderer::{
        config::LayoutConfig, layout::compute_layout, parser::parse_mermaid, render::render_svg,
        theme::Theme,
    };
    use tracing::{debug, info_span, warn, Instrument};

    use super::DiagramRenderer;
    use crate::core::{ExplorerError, Result};

    /// Renderer backed by `mermaid-rs-renderer`
    ///
    /// Parsing, layout and SVG generation run on the blocking pool.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct MermaidRenderer;

    impl MermaidRenderer {
        pub fn new() -> Self {
            Self
        }
    }

    /// Dark Monokai palette
    fn monokai_theme() -> Theme {
        Theme {
            background: "#272822".to_string(),
            primary_color: "#3E3D32".to_string(),
            primary_text_color: "#F8F8F2".to_string(),
            primary_border_color: "#A6E22E".to_string(),
            line_color: "#66D9EF".to_string(),
            secondary_color: "#272822".to_string(),
            tertiary_color: "#3E3D32".to_string(),
            edge_label_background: "#272822".to_string(),
            cluster_background: "#272822".to_string(),
            cluster_border: "#75715E".to_string(),
            text_color: "#F8F8F2".to_string(),
            ..Theme::modern()
        }
    }

    fn render_blocking(source: &str) -> std::result::Result<String, String> {
        let parsed = parse_mermaid(source).map_err(|e| format!("Parse error: {}", e))?;
        let theme = monokai_theme();
        let layout_config = LayoutConfig::default();
        let layout = compute_layout(&parsed.graph, &theme, &layout_config);
        Ok(render_svg(&layout, &theme, &layout_config))
    }

    #[async_trait]
    impl DiagramRenderer for MermaidRenderer {
        async fn render(&self, id: &str, source: &str) -> Result<String> {
            let span = info_span!("render_diagram", render_id = id, source_len = source.len());
            let owned = source.to_string();

            async move {
                let joined = tokio::task::spawn_blocking(move || {
                    panic::catch_unwind(AssertUnwindSafe(|| render_blocking(&owned)))
                })
                .await
                .map_err(|e| ExplorerError::render_error(format!("render task failed: {}", e)))?;

                match joined {
                    Ok(Ok(svg)) => {
                        debug!(svg_len = svg.len(), "Rendered diagram");
                        Ok(svg)
                    }
                    Ok(Err(message)) => {
                        warn!(%message, "Renderer rejected diagram source");
                        Err(ExplorerError::render_error(message))
                    }
                    Err(_) => {
                        warn!("Renderer panicked");
                        Err(ExplorerError::render_error("renderer panicked"))
                    }
                }
            }
            .instrument(span)
            .await
        }

        fn name(&self) -> &'static str {
            "mermaid"
        }
    }
}
