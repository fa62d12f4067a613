//! Tool system for the canvas.

use crate::shapes::ShapeKind;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToolKind {
    /// Drag shapes and pan the canvas.
    #[default]
    Select,
    Rectangle,
    Circle,
    Triangle,
}

impl ToolKind {
    /// The shape a click places with this tool, if it is a placement tool.
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            ToolKind::Select => None,
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Circle => Some(ShapeKind::Circle),
            ToolKind::Triangle => Some(ShapeKind::Triangle),
        }
    }

    /// The placement tool for a shape kind.
    pub fn placing(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Rectangle => ToolKind::Rectangle,
            ShapeKind::Circle => ToolKind::Circle,
            ShapeKind::Triangle => ToolKind::Triangle,
        }
    }

    pub fn is_select(self) -> bool {
        self == ToolKind::Select
    }

    /// Keyboard shortcut label.
    pub fn shortcut(self) -> &'static str {
        match self {
            ToolKind::Select => "V",
            ToolKind::Rectangle => "R",
            ToolKind::Circle => "C",
            ToolKind::Triangle => "T",
        }
    }
}
