//! Shapeboard Core Library
//!
//! Platform-agnostic state and interaction logic for the Shapeboard canvas.

pub mod canvas;
pub mod config;
pub mod gesture;
pub mod shapes;
pub mod store;
pub mod tools;
pub mod viewport;

pub use canvas::Canvas;
pub use config::{CanvasConfig, ConfigError, ConfigResult};
pub use gesture::{CanvasEvent, GestureState};
pub use shapes::{FillColor, Shape, ShapeDraft, ShapeGeometry, ShapeId, ShapeKind};
pub use store::ShapeStore;
pub use tools::ToolKind;
pub use viewport::Viewport;
