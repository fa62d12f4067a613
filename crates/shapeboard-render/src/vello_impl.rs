//! Vello-based renderer implementation.

use crate::renderer::{RenderContext, Renderer, ShapeRenderer};
use kurbo::{Affine, Point, Rect, Stroke};
use peniko::{Color, Fill};
use shapeboard_core::shapes::Shape;
use vello::Scene;

/// Outline width of the dragged shape, in logical pixels.
const DRAG_OUTLINE_WIDTH: f64 = 2.0;

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Drag highlight color.
    highlight_color: Color,
    /// Current zoom level (for zoom-independent outlines).
    zoom: f64,
    /// Device pixel ratio of the current frame.
    scale_factor: f64,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            highlight_color: Color::from_rgba8(59, 130, 246, 255),
            zoom: 1.0,
            scale_factor: 1.0,
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Outline width in world units that lands on screen at a fixed pixel width.
    fn outline_width(&self) -> f64 {
        DRAG_OUTLINE_WIDTH * self.scale_factor / self.zoom
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();
        self.highlight_color = ctx.drag_highlight_color;
        self.zoom = ctx.canvas.current_viewport().scale();
        self.scale_factor = ctx.scale_factor;

        let transform = ctx.view_transform();
        let pad = DRAG_OUTLINE_WIDTH * self.scale_factor;
        let visible = Rect::from_origin_size(Point::ZERO, ctx.viewport_size).inflate(pad, pad);

        // Back to front; later shapes draw on top.
        for shape in ctx.canvas.current_shapes() {
            let screen_bounds = transform.transform_rect_bbox(shape.bounds());
            if screen_bounds.intersect(visible).area() <= 0.0 {
                continue;
            }
            self.render_shape(shape, transform, shape.is_dragging());
        }
    }
}

impl ShapeRenderer for VelloRenderer {
    fn render_shape(&mut self, shape: &Shape, transform: Affine, highlighted: bool) {
        let path = shape.to_path();
        let fill: Color = shape.fill().into();
        self.scene.fill(Fill::NonZero, transform, fill, None, &path);

        if highlighted {
            let stroke = Stroke::new(self.outline_width());
            self.scene
                .stroke(&stroke, transform, self.highlight_color, None, &path);
        }
    }
}
