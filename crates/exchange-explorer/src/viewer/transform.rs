//! Pan and zoom transform of the diagram viewport
//!
//! The transform is pure view state: it does not care whether a diagram is
//! rendered, failed or still loading. Panning is an optional capability
//! selected through [`ZoomProfile`], so the static and the panning viewer
//! share one contract.

use serde::{Deserialize, Serialize};

/// Zoom bounds, step and default of one viewer variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomProfile {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
    pub pan_enabled: bool,
}

impl ZoomProfile {
    /// Viewer with drag-to-pan: zoom in `[0.5, 6.0]`, step `0.5`, default `1.5`
    pub const PANNING: ZoomProfile = ZoomProfile {
        min: 0.5,
        max: 6.0,
        step: 0.5,
        default: 1.5,
        pan_enabled: true,
    };

    /// Viewer without panning: zoom in `[0.25, 3.0]`, step `0.25`, default `1.0`
    pub const STATIC: ZoomProfile = ZoomProfile {
        min: 0.25,
        max: 3.0,
        step: 0.25,
        default: 1.0,
        pan_enabled: false,
    };

    pub fn clamp(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min, self.max)
    }
}

impl Default for ZoomProfile {
    fn default() -> Self {
        Self::PANNING
    }
}

/// 2D point or offset in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Pointer button that triggered an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` code
    pub fn from_dom(code: i16) -> Self {
        match code {
            0 => PointerButton::Primary,
            1 => PointerButton::Middle,
            _ => PointerButton::Secondary,
        }
    }
}

/// Zoom factor, pan offset and drag state of the open viewer
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportTransform {
    profile: ZoomProfile,
    zoom: f64,
    pan: Point,
    /// Pointer offset from the pan translation captured at drag start
    grab: Option<Point>,
}

impl ViewportTransform {
    pub fn new(profile: ZoomProfile) -> Self {
        Self {
            profile,
            zoom: profile.default,
            pan: Point::ORIGIN,
            grab: None,
        }
    }

    pub fn profile(&self) -> ZoomProfile {
        self.profile
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn is_panning(&self) -> bool {
        self.grab.is_some()
    }

    /// Zoom as a rounded percentage for display
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    pub fn can_zoom_in(&self) -> bool {
        self.zoom < self.profile.max
    }

    pub fn can_zoom_out(&self) -> bool {
        self.zoom > self.profile.min
    }

    pub fn zoom_in(&mut self) {
        self.zoom = self.profile.clamp(self.zoom + self.profile.step);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.profile.clamp(self.zoom - self.profile.step);
    }

    /// Default zoom, pan back to the origin, any drag dropped
    pub fn reset(&mut self) {
        self.zoom = self.profile.default;
        self.pan = Point::ORIGIN;
        self.grab = None;
    }

    /// Start a drag; returns whether panning began
    pub fn pointer_down(&mut self, button: PointerButton, position: Point) -> bool {
        if !self.profile.pan_enabled || button != PointerButton::Primary {
            return false;
        }
        self.grab = Some(position - self.pan);
        true
    }

    /// Follow the pointer while dragging; returns whether the pan changed
    pub fn pointer_move(&mut self, position: Point) -> bool {
        match self.grab {
            Some(grab) => {
                self.pan = position - grab;
                true
            }
            None => false,
        }
    }

    pub fn pointer_up(&mut self) {
        self.grab = None;
    }

    pub fn pointer_leave(&mut self) {
        self.grab = None;
    }

    /// CSS transform: translate by pan, then scale, origin at the center
    ///
    /// Scaling happens around the center after the translation, so zooming
    /// while panned keeps the same anchor as zooming from the center.
    pub fn css_transform(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.pan.x, self.pan.y, self.zoom
        )
    }

    /// Matching `transform-origin`
    pub fn css_origin(&self) -> &'static str {
        "center center"
    }

    /// Map a content point to viewport coordinates
    ///
    /// `center` is the viewport center the scale is anchored at.
    pub fn apply(&self, point: Point, center: Point) -> Point {
        Point::new(
            center.x + (point.x - center.x) * self.zoom + self.pan.x,
            center.y + (point.y - center.y) * self.zoom + self.pan.y,
        )
    }
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::new(ZoomProfile::default())
    }
}
