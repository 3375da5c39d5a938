//! WebAssembly bindings for browser hosts
//!
//! The host page owns networking and the Mermaid runtime; these exports cover
//! the pure parts of the explorer: filtering, request naming, payload
//! classification, SVG sanitization and the pan/zoom viewport.

use wasm_bindgen::prelude::*;

use crate::catalog::filter;
use crate::core::{sanitize_filename as sanitize, ExchangeName, ExchangesResponse};
use crate::viewer::{self, Point, PointerButton, ViewportTransform, ZoomProfile};

/// Initialize WASM module
///
/// Sets up the panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use crate::core::logging::init_logging;
    let _ = init_logging(Some("info"), None);
}

/// Filter the `data.exchanges` of an `/exchanges` response body
///
/// Returns a JSON array of matching names. Throws if the body does not
/// decode.
#[wasm_bindgen]
pub fn filter_exchanges(response_json: &str, term: &str) -> Result<String, JsValue> {
    let response: ExchangesResponse = serde_json::from_str(response_json)
        .map_err(|e| JsValue::from_str(&format!("Malformed exchanges response: {}", e)))?;
    let matches = filter(&response.data, term);
    serde_json::to_string(&matches).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Filename sent with flowchart requests for an exchange
#[wasm_bindgen]
pub fn sanitize_filename(exchange: &str) -> String {
    sanitize(exchange)
}

/// `"svg"`, `"diagram-source"` or `"empty"`
#[wasm_bindgen]
pub fn classify_payload(payload: &str) -> String {
    viewer::classify(payload)
        .map(|kind| kind.as_str())
        .unwrap_or("empty")
        .to_string()
}

/// Strip active content from SVG before injecting it into the page
#[wasm_bindgen]
pub fn sanitize_svg(markup: &str) -> String {
    viewer::sanitize_svg(markup)
}

/// JSON `{"prefix": ..., "action": ...}` display split of an exchange name
#[wasm_bindgen]
pub fn split_exchange_name(name: &str) -> String {
    let split = ExchangeName::parse(name);
    serde_json::json!({ "prefix": split.prefix, "action": split.action }).to_string()
}

/// Pan/zoom state of the diagram viewport
#[wasm_bindgen]
pub struct Viewport {
    inner: ViewportTransform,
}

#[wasm_bindgen]
impl Viewport {
    /// `panning = false` selects the static variant
    #[wasm_bindgen(constructor)]
    pub fn new(panning: bool) -> Viewport {
        let profile = if panning {
            ZoomProfile::PANNING
        } else {
            ZoomProfile::STATIC
        };
        Viewport {
            inner: ViewportTransform::new(profile),
        }
    }

    pub fn zoom_in(&mut self) {
        self.inner.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.inner.zoom_out();
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// `button` is the DOM `MouseEvent.button` code
    pub fn pointer_down(&mut self, button: i16, x: f64, y: f64) -> bool {
        self.inner
            .pointer_down(PointerButton::from_dom(button), Point::new(x, y))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.inner.pointer_move(Point::new(x, y))
    }

    pub fn pointer_up(&mut self) {
        self.inner.pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        self.inner.pointer_leave();
    }

    pub fn is_panning(&self) -> bool {
        self.inner.is_panning()
    }

    pub fn zoom(&self) -> f64 {
        self.inner.zoom()
    }

    pub fn zoom_percent(&self) -> u32 {
        self.inner.zoom_percent()
    }

    pub fn css_transform(&self) -> String {
        self.inner.css_transform()
    }

    pub fn css_origin(&self) -> String {
        self.inner.css_origin().to_string()
    }
}
