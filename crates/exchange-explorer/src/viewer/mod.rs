//! Flowchart viewer: payload detection, rendering, viewport and download

mod controller;
pub mod detector;
mod download;
pub mod renderer;
mod sanitize;
mod transform;

pub use controller::*;
pub use detector::{classify, PayloadKind};
pub use download::*;
pub use renderer::{default_renderer, new_render_id, DiagramRenderer, UnavailableRenderer, RENDER_FAILED};
#[cfg(all(feature = "mermaid", not(target_arch = "wasm32")))]
pub use renderer::MermaidRenderer;
pub use sanitize::sanitize_svg;
pub use transform::*;
