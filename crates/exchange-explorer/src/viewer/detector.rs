//! Flowchart payload detection
//!
//! Payloads carry no explicit type tag. The first non-whitespace characters
//! decide whether the text is ready-to-display SVG or diagram source for the
//! external renderer.

use tracing::trace;

/// Prefixes that mark a payload as vector markup
const SVG_PREFIXES: [&str; 2] = ["<svg", "<?xml"];

/// Detects one kind of flowchart payload
pub trait Detector {
    /// Whether the payload belongs to this detector's kind
    fn detect(&self, input: &str) -> bool;
}

/// Matches SVG documents by prefix
#[derive(Debug, Default, Clone, Copy)]
pub struct SvgDetector;

impl Detector for SvgDetector {
    fn detect(&self, input: &str) -> bool {
        let input = input.trim_start();
        SVG_PREFIXES.iter().any(|p| input.starts_with(p))
    }
}

/// Matches any other non-blank text
#[derive(Debug, Default, Clone, Copy)]
pub struct DiagramSourceDetector;

impl Detector for DiagramSourceDetector {
    fn detect(&self, input: &str) -> bool {
        !input.trim().is_empty() && !SvgDetector.detect(input)
    }
}

/// Kind of a fetched flowchart payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// Ready-to-display vector markup
    Svg,
    /// Text the external renderer compiles into vector markup
    DiagramSource,
}

impl PayloadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadKind::Svg => "svg",
            PayloadKind::DiagramSource => "diagram-source",
        }
    }
}

/// Classify a payload, `None` for blank text
///
/// Diagram source that happens to begin with `<svg` or `<?xml` is
/// misclassified as SVG; no attempt is made to tell them apart.
pub fn classify(input: &str) -> Option<PayloadKind> {
    let kind = if SvgDetector.detect(input) {
        Some(PayloadKind::Svg)
    } else if DiagramSourceDetector.detect(input) {
        Some(PayloadKind::DiagramSource)
    } else {
        None
    };
    trace!(input_len = input.len(), kind = kind.map(|k| k.as_str()), "Classified payload");
    kind
}
