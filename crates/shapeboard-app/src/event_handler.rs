//! Translation of raw pointer input into canvas gestures.

use kurbo::Point;
use shapeboard_core::canvas::Canvas;
use shapeboard_core::gesture::CanvasEvent;
use shapeboard_core::shapes::ShapeId;
use winit::event::{MouseButton, MouseScrollDelta};

/// Pointer travel (screen px) that turns a press into a drag.
pub const DRAG_THRESHOLD: f64 = 3.0;

/// Pixels per wheel line.
const LINE_SCROLL_PIXELS: f64 = 20.0;

/// What a drag in flight is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragKind {
    Shape,
    Canvas,
}

/// A left press that has not been released yet.
#[derive(Debug, Clone, Copy)]
struct Press {
    /// Screen point of the press.
    origin: Point,
    /// Shape under the press, `None` for background.
    target: Option<ShapeId>,
    /// Set once the press became a drag.
    drag: Option<DragKind>,
}

/// Handles raw pointer events and feeds the resulting gestures to the canvas.
///
/// Every handler returns `true` when the canvas may need a redraw.
#[derive(Debug, Default)]
pub struct EventHandler {
    /// Last known cursor position in physical pixels.
    cursor: Point,
    press: Option<Press>,
    /// Last cursor position of a middle-button pan.
    middle_pan: Option<Point>,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a press or pan is in flight.
    pub fn is_pointer_active(&self) -> bool {
        self.press.is_some() || self.middle_pan.is_some()
    }

    pub fn handle_cursor_moved(&mut self, canvas: &mut Canvas, position: Point) -> bool {
        self.cursor = position;
        let mut changed = false;

        if let Some(last) = self.middle_pan {
            canvas.pan_by(position - last);
            self.middle_pan = Some(position);
            changed = true;
        }

        let Some(press) = self.press.as_mut() else {
            return changed;
        };

        if press.drag.is_none() {
            if (position - press.origin).hypot() <= DRAG_THRESHOLD || !canvas.tool().is_select() {
                return changed;
            }
            let (kind, start) = match press.target {
                Some(id) => (
                    DragKind::Shape,
                    CanvasEvent::ShapeDragStart {
                        id,
                        screen_point: press.origin,
                    },
                ),
                None => (
                    DragKind::Canvas,
                    CanvasEvent::CanvasDragStart {
                        screen_point: press.origin,
                    },
                ),
            };
            press.drag = Some(kind);
            canvas.dispatch(start);
        }

        let event = match press.drag {
            Some(DragKind::Shape) => CanvasEvent::ShapeDragMove {
                screen_point: position,
            },
            Some(DragKind::Canvas) => CanvasEvent::CanvasDragMove {
                screen_point: position,
            },
            None => return changed,
        };
        canvas.dispatch(event);
        true
    }

    pub fn handle_button(&mut self, canvas: &mut Canvas, button: MouseButton, pressed: bool) -> bool {
        match (button, pressed) {
            (MouseButton::Left, true) => {
                let target = canvas.shape_at_screen(self.cursor).map(|shape| shape.id());
                self.press = Some(Press {
                    origin: self.cursor,
                    target,
                    drag: None,
                });
                false
            }
            (MouseButton::Left, false) => {
                let Some(press) = self.press.take() else {
                    return false;
                };
                let event = match press.drag {
                    Some(DragKind::Shape) => CanvasEvent::ShapeDragEnd {
                        screen_point: self.cursor,
                    },
                    Some(DragKind::Canvas) => CanvasEvent::CanvasDragEnd {
                        screen_point: self.cursor,
                    },
                    None => CanvasEvent::SurfaceClick {
                        target_is_background: press.target.is_none(),
                        screen_point: self.cursor,
                    },
                };
                canvas.dispatch(event);
                true
            }
            (MouseButton::Middle, true) => {
                self.middle_pan = Some(self.cursor);
                false
            }
            (MouseButton::Middle, false) => self.middle_pan.take().is_some(),
            _ => false,
        }
    }

    /// Zoom around the cursor. Scrolling up (away from the user) zooms in.
    pub fn handle_wheel(&mut self, canvas: &mut Canvas, delta: MouseScrollDelta) -> bool {
        let scroll_y = match delta {
            MouseScrollDelta::LineDelta(_, y) => y as f64 * LINE_SCROLL_PIXELS,
            MouseScrollDelta::PixelDelta(pos) => pos.y,
        };
        // Purely horizontal scrolling carries no zoom direction.
        if scroll_y == 0.0 {
            return false;
        }
        canvas.dispatch(CanvasEvent::Wheel {
            pointer: self.cursor,
            delta_y: -scroll_y,
        });
        true
    }

    /// Finish any press or pan in flight at the last cursor position.
    pub fn cancel(&mut self, canvas: &mut Canvas) {
        if let Some(press) = self.press.take() {
            match press.drag {
                Some(DragKind::Shape) => canvas.dispatch(CanvasEvent::ShapeDragEnd {
                    screen_point: self.cursor,
                }),
                Some(DragKind::Canvas) => canvas.dispatch(CanvasEvent::CanvasDragEnd {
                    screen_point: self.cursor,
                }),
                None => {}
            }
        }
        self.middle_pan = None;
        canvas.end_gestures();
    }
}
