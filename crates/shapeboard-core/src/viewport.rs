//! Viewport module for pan/zoom transforms.

use crate::config::CanvasConfig;
use kurbo::{Affine, Point, Vec2};

/// Viewport manages the view transform for the canvas.
///
/// `pan_offset` is the screen position of the world origin and `scale` is
/// the uniform world-to-screen factor, so a world point `w` appears at
/// `w * scale + pan_offset` on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Screen-space translation of the world origin.
    pan_offset: Vec2,
    /// Current scale factor (1.0 = 100%).
    scale: f64,
    /// Scale multiplier per wheel tick.
    zoom_factor: f64,
    /// Minimum allowed scale.
    min_scale: f64,
    /// Maximum allowed scale.
    max_scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::with_config(&CanvasConfig::default())
    }
}

impl Viewport {
    /// Create a viewport with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a viewport at identity using the zoom settings from `config`.
    ///
    /// An invalid config is replaced by the defaults, so `min_scale <= max_scale`
    /// and `zoom_factor > 1` always hold.
    pub fn with_config(config: &CanvasConfig) -> Self {
        let config = config.clone().validated_or_default();
        Self {
            pan_offset: Vec2::ZERO,
            scale: 1.0,
            zoom_factor: config.zoom_factor,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn pan_offset(&self) -> Vec2 {
        self.pan_offset
    }

    pub fn zoom_factor(&self) -> f64 {
        self.zoom_factor
    }

    /// Get the affine transform for rendering (world to screen).
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan_offset) * Affine::scale(self.scale)
    }

    /// Get the inverse transform for input handling (screen to world).
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.pan_offset)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        ((screen_point - self.pan_offset.to_point()) / self.scale).to_point()
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        (world_point.to_vec2() * self.scale + self.pan_offset).to_point()
    }

    /// Zoom one wheel tick, keeping the world point under `pointer` fixed.
    ///
    /// A negative `wheel_delta` zooms in, anything else zooms out. The new
    /// scale is clamped to the configured range; a non-finite result leaves
    /// the viewport unchanged.
    pub fn apply_zoom(&mut self, pointer: Point, wheel_delta: f64) {
        let old_scale = self.scale;
        let anchor = self.screen_to_world(pointer);

        let new_scale = if wheel_delta < 0.0 {
            old_scale * self.zoom_factor
        } else {
            old_scale / self.zoom_factor
        }
        .clamp(self.min_scale, self.max_scale);

        let new_offset = pointer.to_vec2() - anchor.to_vec2() * new_scale;
        if !(new_scale.is_finite() && new_scale > 0.0 && new_offset.is_finite()) {
            log::warn!("Rejected degenerate zoom result: scale {}", new_scale);
            return;
        }

        self.scale = new_scale;
        self.pan_offset = new_offset;
        log::debug!("Zoomed {:.4} -> {:.4} at {:?}", old_scale, new_scale, pointer);
    }

    /// Replace the pan offset.
    pub fn apply_pan(&mut self, pan_offset: Vec2) {
        if !pan_offset.is_finite() {
            log::warn!("Rejected non-finite pan offset {:?}", pan_offset);
            return;
        }
        self.pan_offset = pan_offset;
    }

    /// Pan the viewport by a delta in screen coordinates.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.apply_pan(self.pan_offset + delta);
    }

    /// Reset to identity scale and offset.
    pub fn reset(&mut self) {
        self.pan_offset = Vec2::ZERO;
        self.scale = 1.0;
    }
}
