//! Ordered, append-only shape storage.
//!
//! Every mutating operation returns a new [`ShapeStore`] and leaves the
//! receiver untouched, so a renderer holding the previous snapshot never
//! observes a half-updated shape. Snapshots share storage through an `Arc`.

use crate::shapes::{Shape, ShapeDraft, ShapeId};
use kurbo::Point;
use std::sync::Arc;

/// Shapes in draw order (back to front).
#[derive(Debug, Clone, Default)]
pub struct ShapeStore {
    shapes: Arc<[Shape]>,
}

impl ShapeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn from_vec(shapes: Vec<Shape>) -> Self {
        Self {
            shapes: shapes.into(),
        }
    }

    /// Append a shape built from `draft` with a fresh id.
    ///
    /// Returns the updated store and the id of the new shape.
    #[must_use]
    pub fn append(&self, draft: ShapeDraft) -> (Self, ShapeId) {
        let shape = Shape::from_draft(draft);
        let id = shape.id;
        let mut shapes = Vec::with_capacity(self.shapes.len() + 1);
        shapes.extend_from_slice(&self.shapes);
        shapes.push(shape);
        log::debug!("Appended shape {} ({} total)", id, shapes.len());
        (Self::from_vec(shapes), id)
    }

    /// Flag `id` as the one shape being dragged and clear every other flag.
    ///
    /// An unknown id leaves the store unchanged.
    #[must_use]
    pub fn set_dragging(&self, id: ShapeId) -> Self {
        if !self.contains(id) {
            log::debug!("set_dragging: no shape with id {}", id);
            return self.clone();
        }
        self.map(|shape| shape.with_dragging(shape.id == id))
    }

    /// Clear the drag flag on every shape.
    #[must_use]
    pub fn clear_all_dragging(&self) -> Self {
        if self.shapes.iter().all(|shape| !shape.is_dragging) {
            return self.clone();
        }
        self.map(|shape| shape.with_dragging(false))
    }

    /// Replace the position of shape `id`, keeping every other field.
    ///
    /// An unknown id leaves the store unchanged.
    #[must_use]
    pub fn update_position(&self, id: ShapeId, position: Point) -> Self {
        if !self.contains(id) {
            log::debug!("update_position: no shape with id {}", id);
            return self.clone();
        }
        self.map(|shape| {
            if shape.id == id {
                shape.with_position(position)
            } else {
                shape.clone()
            }
        })
    }

    fn map(&self, f: impl Fn(&Shape) -> Shape) -> Self {
        Self::from_vec(self.shapes.iter().map(f).collect())
    }

    /// All shapes in draw order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    /// Get a shape by ID.
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.id == id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.get(id).is_some()
    }

    /// The shape currently flagged as dragged, if any.
    pub fn dragging(&self) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.is_dragging)
    }

    /// Topmost shape under a world-space point.
    pub fn shape_at(&self, point: Point) -> Option<&Shape> {
        self.shapes.iter().rev().find(|shape| shape.hit_test(point))
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
