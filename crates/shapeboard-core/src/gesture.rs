//! Gesture events and the dispatcher's drag state.

use crate::shapes::ShapeId;
use crate::tools::ToolKind;
use kurbo::{Point, Vec2};

/// A user gesture as reported by the window/rendering boundary.
///
/// All points are in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasEvent {
    /// A click that did not turn into a drag.
    SurfaceClick {
        target_is_background: bool,
        screen_point: Point,
    },
    /// One wheel tick. Negative `delta_y` zooms in.
    Wheel { pointer: Point, delta_y: f64 },
    ShapeDragStart { id: ShapeId, screen_point: Point },
    ShapeDragMove { screen_point: Point },
    ShapeDragEnd { screen_point: Point },
    CanvasDragStart { screen_point: Point },
    CanvasDragMove { screen_point: Point },
    CanvasDragEnd { screen_point: Point },
    /// The drawing surface changed size (physical pixels).
    Resize { width: f64, height: f64 },
    /// The user picked a different tool.
    SetTool(ToolKind),
}

/// What the pointer is currently dragging.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// A shape drag in flight.
    Dragging {
        id: ShapeId,
        /// Shape position minus the world point that grabbed it.
        grab_offset: Vec2,
    },
    /// A canvas pan in flight.
    PanningCanvas {
        /// Pan offset when the drag started.
        origin_offset: Vec2,
        /// Screen point where the drag started.
        grab_point: Point,
    },
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }

    /// The shape being dragged, if any.
    pub fn dragged_shape(&self) -> Option<ShapeId> {
        match self {
            GestureState::Dragging { id, .. } => Some(*id),
            _ => None,
        }
    }

    pub fn is_panning(&self) -> bool {
        matches!(self, GestureState::PanningCanvas { .. })
    }
}
