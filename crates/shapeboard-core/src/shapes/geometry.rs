//! Render geometry for each shape kind.

use kurbo::{BezPath, Circle, Point, Rect, Shape as KurboShape, Size, Vec2};
use std::f64::consts::TAU;

/// Tolerance used when flattening curves into paths.
const PATH_TOLERANCE: f64 = 0.1;

/// Concrete world-space geometry of a shape, ready to be drawn or hit-tested.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeGeometry {
    /// Axis-aligned box.
    Rect(Rect),
    /// Disc.
    Circle(Circle),
    /// Regular triangle, vertices in drawing order.
    Triangle([Point; 3]),
}

impl ShapeGeometry {
    /// Box anchored at its top-left corner.
    pub fn rect(top_left: Point, size: Size) -> Self {
        ShapeGeometry::Rect(Rect::from_origin_size(top_left, size))
    }

    /// Disc centered at `center`, `diameter` wide.
    pub fn circle(center: Point, diameter: f64) -> Self {
        ShapeGeometry::Circle(Circle::new(center, diameter / 2.0))
    }

    /// Regular 3-gon centered at `center` whose circumcircle is `diameter` wide.
    ///
    /// The first vertex points straight up (screen y grows downward).
    pub fn triangle(center: Point, diameter: f64) -> Self {
        let radius = diameter / 2.0;
        let vertex = |i: usize| {
            let angle = i as f64 * TAU / 3.0;
            center + Vec2::new(radius * angle.sin(), -radius * angle.cos())
        };
        ShapeGeometry::Triangle([vertex(0), vertex(1), vertex(2)])
    }

    /// Bounding box in world coordinates.
    pub fn bounds(&self) -> Rect {
        match self {
            ShapeGeometry::Rect(rect) => *rect,
            ShapeGeometry::Circle(circle) => circle.bounding_box(),
            ShapeGeometry::Triangle([a, b, c]) => Rect::from_points(*a, *b).union_pt(*c),
        }
    }

    /// Path representation for rendering.
    pub fn to_path(&self) -> BezPath {
        match self {
            ShapeGeometry::Rect(rect) => rect.to_path(PATH_TOLERANCE),
            ShapeGeometry::Circle(circle) => circle.to_path(PATH_TOLERANCE),
            ShapeGeometry::Triangle([a, b, c]) => {
                let mut path = BezPath::new();
                path.move_to(*a);
                path.line_to(*b);
                path.line_to(*c);
                path.close_path();
                path
            }
        }
    }

    /// Check whether a world-space point lies inside the filled area.
    pub fn contains(&self, point: Point) -> bool {
        match self {
            ShapeGeometry::Rect(rect) => {
                let rect = rect.abs();
                point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
            }
            ShapeGeometry::Circle(circle) => {
                (point - circle.center).hypot2() <= circle.radius * circle.radius
            }
            ShapeGeometry::Triangle([a, b, c]) => point_in_triangle(point, *a, *b, *c),
        }
    }
}

/// Same-side test; points on an edge count as inside.
fn point_in_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    let cross = |o: Point, u: Point, v: Point| (u - o).cross(v - o);
    let d1 = cross(a, b, p);
    let d2 = cross(b, c, p);
    let d3 = cross(c, a, p);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}
