//! Shape definitions for the canvas.

mod color;
mod geometry;

pub use color::FillColor;
pub use geometry::ShapeGeometry;

use kurbo::{BezPath, Point, Rect, Size};
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// The kinds of shape a user can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Triangle,
}

impl ShapeKind {
    /// All kinds, in toolbar order.
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Rectangle, ShapeKind::Circle, ShapeKind::Triangle];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Circle => "Circle",
            ShapeKind::Triangle => "Triangle",
        }
    }
}

/// Everything needed to create a shape, minus the identity the store assigns.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDraft {
    pub kind: ShapeKind,
    /// Top-left corner for rectangles, center for circles and triangles.
    pub position: Point,
    pub size: Size,
    pub fill: FillColor,
}

impl ShapeDraft {
    pub fn new(kind: ShapeKind, position: Point, size: Size, fill: FillColor) -> Self {
        Self {
            kind,
            position,
            size,
            fill,
        }
    }
}

/// A placed shape.
///
/// Identity, kind and fill are fixed at creation. Only `position` and the
/// drag flag change afterwards, and only through [`crate::store::ShapeStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub(crate) id: ShapeId,
    pub(crate) kind: ShapeKind,
    pub(crate) position: Point,
    pub(crate) size: Size,
    pub(crate) fill: FillColor,
    pub(crate) is_dragging: bool,
}

impl Shape {
    /// Build a shape from a draft with a freshly minted identity.
    pub(crate) fn from_draft(draft: ShapeDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: draft.kind,
            position: draft.position,
            size: draft.size,
            fill: draft.fill,
            is_dragging: false,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// World-space anchor (top-left for rectangles, center otherwise).
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn fill(&self) -> FillColor {
        self.fill
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    /// Compute the world-space geometry used for drawing and hit testing.
    pub fn geometry(&self) -> ShapeGeometry {
        match self.kind {
            ShapeKind::Rectangle => ShapeGeometry::rect(self.position, self.size),
            ShapeKind::Circle => ShapeGeometry::circle(self.position, self.size.width),
            ShapeKind::Triangle => ShapeGeometry::triangle(self.position, self.size.width),
        }
    }

    /// Bounding box in world coordinates.
    pub fn bounds(&self) -> Rect {
        self.geometry().bounds()
    }

    /// Path representation for rendering.
    pub fn to_path(&self) -> BezPath {
        self.geometry().to_path()
    }

    /// Check if a point (in world coordinates) hits this shape.
    pub fn hit_test(&self, point: Point) -> bool {
        self.geometry().contains(point)
    }

    /// Copy of this shape with a new position and every other field intact.
    pub(crate) fn with_position(&self, position: Point) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }

    /// Copy of this shape with the drag flag set to `dragging`.
    pub(crate) fn with_dragging(&self, dragging: bool) -> Self {
        Self {
            is_dragging: dragging,
            ..self.clone()
        }
    }
}
