use crate::geometry::{Rect, Vec2};

pub const SCROLL_ZOOM_STEP: f32 = 1.1;
pub const KEY_ZOOM_STEP: f32 = 1.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Pan and zoom applied to logical node positions.
///
/// `screen = center + (logical + pan - center) * zoom`, where `center` is the
/// center of the canvas rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    rect: Rect,
    zoom: f32,
    pan: Vec2,
    min_zoom: f32,
    max_zoom: f32,
}

impl Viewport {
    pub const DEFAULT_MIN_ZOOM: f32 = 0.5;
    pub const DEFAULT_MAX_ZOOM: f32 = 3.0;

    pub fn new(rect: Rect) -> Self {
        Self::with_zoom_range(rect, Self::DEFAULT_MIN_ZOOM, Self::DEFAULT_MAX_ZOOM)
    }

    pub fn with_zoom_range(rect: Rect, min_zoom: f32, max_zoom: f32) -> Self {
        let (min_zoom, max_zoom) = if min_zoom <= max_zoom {
            (min_zoom, max_zoom)
        } else {
            (max_zoom, min_zoom)
        };
        Self {
            rect,
            zoom: 1.0f32.clamp(min_zoom, max_zoom),
            pan: Vec2::ZERO,
            min_zoom,
            max_zoom,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// The canvas moved or resized; pan and zoom are kept.
    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    pub fn zoom_range(&self) -> (f32, f32) {
        (self.min_zoom, self.max_zoom)
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn zoom_by(&mut self, factor: f32) {
        self.set_zoom(self.zoom * factor);
    }

    /// Positive ticks zoom in, negative ticks zoom out.
    pub fn scroll(&mut self, ticks: i32) {
        self.zoom_by(SCROLL_ZOOM_STEP.powi(ticks));
    }

    pub fn key_zoom(&mut self, direction: ZoomDirection) {
        match direction {
            ZoomDirection::In => self.zoom_by(KEY_ZOOM_STEP),
            ZoomDirection::Out => self.zoom_by(1.0 / KEY_ZOOM_STEP),
        }
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    pub fn reset(&mut self) {
        self.zoom = 1.0f32.clamp(self.min_zoom, self.max_zoom);
        self.pan = Vec2::ZERO;
    }

    pub fn to_screen(&self, logical: Vec2) -> Vec2 {
        let center = self.rect.center();
        center + (logical + self.pan - center) * self.zoom
    }

    pub fn to_logical(&self, screen: Vec2) -> Vec2 {
        let center = self.rect.center();
        (screen - center) / self.zoom + center - self.pan
    }

    /// A length in logical units as it appears on screen.
    pub fn scale(&self, length: f32) -> f32 {
        length * self.zoom
    }
}
