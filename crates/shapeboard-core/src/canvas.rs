//! Canvas state and gesture dispatch.

use crate::config::CanvasConfig;
use crate::gesture::{CanvasEvent, GestureState};
use crate::shapes::{FillColor, Shape, ShapeDraft, ShapeId, ShapeKind};
use crate::store::ShapeStore;
use crate::tools::ToolKind;
use crate::viewport::Viewport;
use kurbo::{Point, Size, Vec2};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// The whole interactive state of one editing session.
///
/// Shapes and viewport are only changed through [`Canvas::dispatch`] (and
/// the few direct operations below), one event at a time.
#[derive(Debug, Clone)]
pub struct Canvas {
    store: ShapeStore,
    viewport: Viewport,
    tool: ToolKind,
    gesture: GestureState,
    /// Drawing surface size in physical pixels.
    surface_size: Size,
    config: CanvasConfig,
    /// Source of fill colors for new shapes.
    rng: StdRng,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create an empty canvas with default settings.
    pub fn new() -> Self {
        Self::with_config(CanvasConfig::default())
    }

    /// Create an empty canvas with the given config.
    ///
    /// An invalid config is logged and replaced by [`CanvasConfig::default`].
    pub fn with_config(config: CanvasConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create an empty canvas whose fill colors come from a fixed seed.
    pub fn with_seed(config: CanvasConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: CanvasConfig, rng: StdRng) -> Self {
        let config = config.validated_or_default();
        Self {
            store: ShapeStore::new(),
            viewport: Viewport::with_config(&config),
            tool: ToolKind::default(),
            gesture: GestureState::default(),
            surface_size: Size::new(800.0, 600.0),
            config,
            rng,
        }
    }

    /// Shapes in draw order.
    pub fn current_shapes(&self) -> &[Shape] {
        self.store.shapes()
    }

    /// Snapshot of the shape store.
    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    pub fn current_viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    pub fn surface_size(&self) -> Size {
        self.surface_size
    }

    /// Topmost shape under a screen-space point.
    pub fn shape_at_screen(&self, screen_point: Point) -> Option<&Shape> {
        self.store.shape_at(self.viewport.screen_to_world(screen_point))
    }

    /// Reset pan and zoom.
    pub fn reset_view(&mut self) {
        self.viewport.reset();
    }

    /// Pan by a screen-space delta regardless of tool or gesture.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.viewport.pan_by(delta);
    }

    /// Apply one gesture.
    pub fn dispatch(&mut self, event: CanvasEvent) {
        match event {
            CanvasEvent::SurfaceClick {
                target_is_background,
                screen_point,
            } => {
                if target_is_background && self.gesture.is_idle() {
                    if let Some(kind) = self.tool.shape_kind() {
                        self.place_shape(kind, screen_point);
                    }
                }
            }
            CanvasEvent::Wheel { pointer, delta_y } => {
                self.viewport.apply_zoom(pointer, delta_y);
            }
            CanvasEvent::ShapeDragStart { id, screen_point } => {
                self.begin_shape_drag(id, screen_point);
            }
            CanvasEvent::ShapeDragMove { screen_point } => {
                self.move_dragged_shape(screen_point);
            }
            CanvasEvent::ShapeDragEnd { screen_point } => {
                self.move_dragged_shape(screen_point);
                if let Some(id) = self.gesture.dragged_shape() {
                    log::debug!("Drag ended for shape {}", id);
                    self.gesture = GestureState::Idle;
                }
                self.store = self.store.clear_all_dragging();
            }
            CanvasEvent::CanvasDragStart { screen_point } => {
                if self.gesture.is_idle() && self.tool.is_select() {
                    self.gesture = GestureState::PanningCanvas {
                        origin_offset: self.viewport.pan_offset(),
                        grab_point: screen_point,
                    };
                }
            }
            CanvasEvent::CanvasDragMove { screen_point } => {
                self.pan_to(screen_point);
            }
            CanvasEvent::CanvasDragEnd { screen_point } => {
                self.pan_to(screen_point);
                if self.gesture.is_panning() {
                    self.gesture = GestureState::Idle;
                }
            }
            CanvasEvent::Resize { width, height } => {
                self.surface_size = Size::new(width, height);
            }
            CanvasEvent::SetTool(tool) => {
                self.tool = tool;
            }
        }
    }

    /// Reset the gesture to idle and clear every drag flag.
    ///
    /// Positions are left as they are.
    pub fn end_gestures(&mut self) {
        self.gesture = GestureState::Idle;
        self.store = self.store.clear_all_dragging();
    }

    fn place_shape(&mut self, kind: ShapeKind, screen_point: Point) {
        let side = self.config.default_shape_size;
        let draft = ShapeDraft::new(
            kind,
            self.viewport.screen_to_world(screen_point),
            Size::new(side, side),
            FillColor::random(&mut self.rng),
        );
        let (store, id) = self.store.append(draft);
        self.store = store;
        log::debug!("Placed {} {} at {:?}", kind.name(), id, screen_point);
    }

    fn begin_shape_drag(&mut self, id: ShapeId, screen_point: Point) {
        if !(self.gesture.is_idle() && self.tool.is_select()) {
            return;
        }
        let Some(shape) = self.store.get(id) else {
            log::debug!("Drag start on unknown shape {}", id);
            return;
        };
        let grab_offset = shape.position() - self.viewport.screen_to_world(screen_point);
        self.store = self.store.set_dragging(id);
        self.gesture = GestureState::Dragging { id, grab_offset };
        log::debug!("Drag started for shape {}", id);
    }

    fn move_dragged_shape(&mut self, screen_point: Point) {
        if let GestureState::Dragging { id, grab_offset } = self.gesture {
            let position = self.viewport.screen_to_world(screen_point) + grab_offset;
            self.store = self.store.update_position(id, position);
        }
    }

    fn pan_to(&mut self, screen_point: Point) {
        if let GestureState::PanningCanvas {
            origin_offset,
            grab_point,
        } = self.gesture
        {
            self.viewport
                .apply_pan(origin_offset + (screen_point - grab_point));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        Canvas::with_seed(CanvasConfig::default(), 1)
    }

    fn click(canvas: &mut Canvas, x: f64, y: f64) {
        canvas.dispatch(CanvasEvent::SurfaceClick {
            target_is_background: true,
            screen_point: Point::new(x, y),
        });
    }

    fn place(canvas: &mut Canvas, tool: ToolKind, x: f64, y: f64) -> ShapeId {
        canvas.dispatch(CanvasEvent::SetTool(tool));
        click(canvas, x, y);
        canvas.current_shapes().last().map(Shape::id).unwrap()
    }

    #[test]
    fn test_new_canvas() {
        let canvas = canvas();
        assert!(canvas.current_shapes().is_empty());
        assert_eq!(canvas.tool(), ToolKind::Select);
        assert!(canvas.gesture().is_idle());
    }

    #[test]
    fn test_click_with_select_tool_places_nothing() {
        let mut canvas = canvas();
        click(&mut canvas, 10.0, 10.0);
        assert!(canvas.current_shapes().is_empty());
    }

    #[test]
    fn test_click_with_shape_tool_places_shape() {
        let mut canvas = canvas();
        canvas.dispatch(CanvasEvent::SetTool(ToolKind::Circle));
        click(&mut canvas, 120.0, 80.0);

        let shapes = canvas.current_shapes();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].kind(), ShapeKind::Circle);
        assert_eq!(shapes[0].position(), Point::new(120.0, 80.0));
        assert_eq!(shapes[0].size(), Size::new(100.0, 100.0));
        assert_eq!(shapes[0].fill().a, 255);
        assert!(canvas.gesture().is_idle());
    }

    #[test]
    fn test_click_on_shape_places_nothing() {
        let mut canvas = canvas();
        canvas.dispatch(CanvasEvent::SetTool(ToolKind::Rectangle));
        canvas.dispatch(CanvasEvent::SurfaceClick {
            target_is_background: false,
            screen_point: Point::new(5.0, 5.0),
        });
        assert!(canvas.current_shapes().is_empty());
    }

    #[test]
    fn test_placement_respects_viewport() {
        let mut canvas = canvas();
        canvas.viewport = Viewport::with_config(&CanvasConfig {
            zoom_factor: 2.0,
            ..CanvasConfig::default()
        });
        canvas.viewport.apply_zoom(Point::ZERO, -1.0);
        canvas.viewport.apply_pan(Vec2::new(10.0, 10.0));
        assert!((canvas.current_viewport().scale() - 2.0).abs() < f64::EPSILON);

        place(&mut canvas, ToolKind::Triangle, 250.0, 90.0);
        let position = canvas.current_shapes()[0].position();
        assert!((position.x - 120.0).abs() < 1e-9);
        assert!((position.y - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_default_size_from_config() {
        let mut canvas = Canvas::with_seed(
            CanvasConfig {
                default_shape_size: 42.0,
                ..CanvasConfig::default()
            },
            3,
        );
        place(&mut canvas, ToolKind::Rectangle, 0.0, 0.0);
        assert_eq!(canvas.current_shapes()[0].size(), Size::new(42.0, 42.0));
    }

    #[test]
    fn test_inverted_scale_range_does_not_break_wheel() {
        let mut canvas = Canvas::with_seed(
            CanvasConfig {
                min_scale: 2.0,
                max_scale: 0.5,
                ..CanvasConfig::default()
            },
            4,
        );
        canvas.dispatch(CanvasEvent::Wheel {
            pointer: Point::new(50.0, 50.0),
            delta_y: -1.0,
        });
        assert!((canvas.current_viewport().scale() - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_zoom_factor_below_one_still_zooms_in() {
        let mut canvas = Canvas::with_config(CanvasConfig {
            zoom_factor: 0.5,
            default_shape_size: 30.0,
            ..CanvasConfig::default()
        });
        canvas.dispatch(CanvasEvent::Wheel {
            pointer: Point::ZERO,
            delta_y: -1.0,
        });
        assert!(canvas.current_viewport().scale() > 1.0);

        // The whole config is replaced, not just the bad field.
        place(&mut canvas, ToolKind::Rectangle, 0.0, 0.0);
        assert_eq!(canvas.current_shapes()[0].size(), Size::new(100.0, 100.0));
    }

    #[test]
    fn test_seeded_fill_colors_are_reproducible() {
        let fills = |seed| {
            let mut canvas = Canvas::with_seed(CanvasConfig::default(), seed);
            place(&mut canvas, ToolKind::Rectangle, 0.0, 0.0);
            place(&mut canvas, ToolKind::Circle, 10.0, 0.0);
            canvas.current_shapes().iter().map(Shape::fill).collect::<Vec<_>>()
        };
        assert_eq!(fills(9), fills(9));
    }

    #[test]
    fn test_shape_drag_moves_and_persists() {
        let mut canvas = canvas();
        let id = place(&mut canvas, ToolKind::Rectangle, 100.0, 100.0);
        canvas.dispatch(CanvasEvent::SetTool(ToolKind::Select));

        canvas.dispatch(CanvasEvent::ShapeDragStart {
            id,
            screen_point: Point::new(120.0, 130.0),
        });
        assert_eq!(canvas.gesture().dragged_shape(), Some(id));
        assert!(canvas.store().get(id).unwrap().is_dragging());

        canvas.dispatch(CanvasEvent::ShapeDragMove {
            screen_point: Point::new(150.0, 130.0),
        });
        assert_eq!(canvas.store().get(id).unwrap().position(), Point::new(130.0, 100.0));

        canvas.dispatch(CanvasEvent::ShapeDragEnd {
            screen_point: Point::new(170.0, 160.0),
        });
        let shape = canvas.store().get(id).unwrap();
        assert_eq!(shape.position(), Point::new(150.0, 130.0));
        assert!(!shape.is_dragging());
        assert!(canvas.gesture().is_idle());
    }

    #[test]
    fn test_shape_drag_under_zoom() {
        let mut canvas = canvas();
        let id = place(&mut canvas, ToolKind::Circle, 0.0, 0.0);
        canvas.dispatch(CanvasEvent::SetTool(ToolKind::Select));
        canvas.viewport = Viewport::with_config(&CanvasConfig {
            zoom_factor: 2.0,
            ..CanvasConfig::default()
        });
        canvas.viewport.apply_zoom(Point::ZERO, -1.0);

        canvas.dispatch(CanvasEvent::ShapeDragStart {
            id,
            screen_point: Point::new(0.0, 0.0),
        });
        canvas.dispatch(CanvasEvent::ShapeDragEnd {
            screen_point: Point::new(40.0, 20.0),
        });
        // 40 screen px at scale 2 is 20 world units.
        assert_eq!(canvas.store().get(id).unwrap().position(), Point::new(20.0, 10.0));
    }

    #[test]
    fn test_shape_drag_requires_select_tool() {
        let mut canvas = canvas();
        let id = place(&mut canvas, ToolKind::Rectangle, 0.0, 0.0);
        canvas.dispatch(CanvasEvent::ShapeDragStart {
            id,
            screen_point: Point::new(10.0, 10.0),
        });
        assert!(canvas.gesture().is_idle());
        assert!(canvas.store().dragging().is_none());
    }

    #[test]
    fn test_shape_drag_unknown_id_is_noop() {
        let mut canvas = canvas();
        place(&mut canvas, ToolKind::Rectangle, 0.0, 0.0);
        canvas.dispatch(CanvasEvent::SetTool(ToolKind::Select));
        canvas.dispatch(CanvasEvent::ShapeDragStart {
            id: ShapeId::new_v4(),
            screen_point: Point::ZERO,
        });
        assert!(canvas.gesture().is_idle());
        assert!(canvas.store().dragging().is_none());
    }

    #[test]
    fn test_only_one_shape_dragging() {
        let mut canvas = canvas();
        let a = place(&mut canvas, ToolKind::Rectangle, 0.0, 0.0);
        let b = place(&mut canvas, ToolKind::Rectangle, 300.0, 0.0);
        canvas.dispatch(CanvasEvent::SetTool(ToolKind::Select));

        canvas.dispatch(CanvasEvent::ShapeDragStart { id: a, screen_point: Point::ZERO });
        // A second drag start while one is in flight is ignored.
        canvas.dispatch(CanvasEvent::ShapeDragStart { id: b, screen_point: Point::ZERO });
        let dragging: Vec<_> = canvas.current_shapes().iter().filter(|s| s.is_dragging()).collect();
        assert_eq!(dragging.len(), 1);
        assert_eq!(dragging[0].id(), a);
    }

    #[test]
    fn test_tool_switch_does_not_cancel_drag() {
        let mut canvas = canvas();
        let id = place(&mut canvas, ToolKind::Rectangle, 0.0, 0.0);
        canvas.dispatch(CanvasEvent::SetTool(ToolKind::Select));
        canvas.dispatch(CanvasEvent::ShapeDragStart { id, screen_point: Point::ZERO });
        canvas.dispatch(CanvasEvent::SetTool(ToolKind::Triangle));

        assert_eq!(canvas.gesture().dragged_shape(), Some(id));
        canvas.dispatch(CanvasEvent::ShapeDragEnd {
            screen_point: Point::new(5.0, 5.0),
        });
        assert!(canvas.gesture().is_idle());
        assert_eq!(canvas.store().get(id).unwrap().position(), Point::new(5.0, 5.0));
    }

    #[test]
    fn test_stray_drag_end_clears_flags() {
        let mut canvas = canvas();
        place(&mut canvas, ToolKind::Rectangle, 0.0, 0.0);
        canvas.dispatch(CanvasEvent::ShapeDragEnd { screen_point: Point::ZERO });
        assert!(canvas.gesture().is_idle());
        assert!(canvas.store().dragging().is_none());
    }

    #[test]
    fn test_canvas_pan() {
        let mut canvas = canvas();
        canvas.dispatch(CanvasEvent::CanvasDragStart {
            screen_point: Point::new(100.0, 100.0),
        });
        assert!(canvas.gesture().is_panning());

        canvas.dispatch(CanvasEvent::CanvasDragMove {
            screen_point: Point::new(130.0, 90.0),
        });
        assert_eq!(canvas.current_viewport().pan_offset(), Vec2::new(30.0, -10.0));

        canvas.dispatch(CanvasEvent::CanvasDragEnd {
            screen_point: Point::new(150.0, 150.0),
        });
        assert_eq!(canvas.current_viewport().pan_offset(), Vec2::new(50.0, 50.0));
        assert!(canvas.gesture().is_idle());

        // A click after panning lands in the panned world.
        place(&mut canvas, ToolKind::Circle, 50.0, 50.0);
        assert_eq!(canvas.current_shapes()[0].position(), Point::ZERO);
    }

    #[test]
    fn test_canvas_pan_requires_select_tool() {
        let mut canvas = canvas();
        canvas.dispatch(CanvasEvent::SetTool(ToolKind::Rectangle));
        canvas.dispatch(CanvasEvent::CanvasDragStart { screen_point: Point::ZERO });
        assert!(canvas.gesture().is_idle());
    }

    #[test]
    fn test_wheel_zooms_in_any_state() {
        let mut canvas = canvas();
        let id = place(&mut canvas, ToolKind::Rectangle, 0.0, 0.0);
        canvas.dispatch(CanvasEvent::SetTool(ToolKind::Select));
        canvas.dispatch(CanvasEvent::ShapeDragStart { id, screen_point: Point::ZERO });

        canvas.dispatch(CanvasEvent::Wheel {
            pointer: Point::new(100.0, 100.0),
            delta_y: 1.0,
        });
        assert!((canvas.current_viewport().scale() - 1.0 / 1.1).abs() < 1e-12);
        assert_eq!(canvas.gesture().dragged_shape(), Some(id));
    }

    #[test]
    fn test_resize_updates_surface_only() {
        let mut canvas = canvas();
        canvas.dispatch(CanvasEvent::Resize {
            width: 1920.0,
            height: 1080.0,
        });
        assert_eq!(canvas.surface_size(), Size::new(1920.0, 1080.0));
        assert!(canvas.gesture().is_idle());
    }

    #[test]
    fn test_shape_at_screen_uses_viewport() {
        let mut canvas = canvas();
        let id = place(&mut canvas, ToolKind::Rectangle, 0.0, 0.0);
        canvas.dispatch(CanvasEvent::SetTool(ToolKind::Select));
        canvas.dispatch(CanvasEvent::CanvasDragStart { screen_point: Point::ZERO });
        canvas.dispatch(CanvasEvent::CanvasDragEnd {
            screen_point: Point::new(500.0, 0.0),
        });

        assert!(canvas.shape_at_screen(Point::new(50.0, 50.0)).is_none());
        assert_eq!(canvas.shape_at_screen(Point::new(550.0, 50.0)).map(Shape::id), Some(id));
    }

    #[test]
    fn test_pan_by_ignores_tool() {
        let mut canvas = canvas();
        canvas.dispatch(CanvasEvent::SetTool(ToolKind::Circle));
        canvas.pan_by(Vec2::new(7.0, -3.0));
        canvas.pan_by(Vec2::new(1.0, 1.0));
        assert_eq!(canvas.current_viewport().pan_offset(), Vec2::new(8.0, -2.0));
        assert!(canvas.gesture().is_idle());
    }

    #[test]
    fn test_end_gestures() {
        let mut canvas = canvas();
        let id = place(&mut canvas, ToolKind::Rectangle, 0.0, 0.0);
        canvas.dispatch(CanvasEvent::SetTool(ToolKind::Select));
        canvas.dispatch(CanvasEvent::ShapeDragStart { id, screen_point: Point::ZERO });
        canvas.dispatch(CanvasEvent::ShapeDragMove {
            screen_point: Point::new(30.0, 40.0),
        });
        canvas.end_gestures();
        assert!(canvas.gesture().is_idle());
        assert!(canvas.store().dragging().is_none());
        assert_eq!(canvas.store().get(id).unwrap().position(), Point::new(30.0, 40.0));
    }
}
