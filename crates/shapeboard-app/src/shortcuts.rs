//! Keyboard shortcut registry.

use shapeboard_core::tools::ToolKind;

/// What a shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    SetTool(ToolKind),
    ResetView,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub description: &'static str,
    pub action: ShortcutAction,
}

impl Shortcut {
    pub const fn new(key: &'static str, description: &'static str, action: ShortcutAction) -> Self {
        Self {
            key,
            description,
            action,
        }
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("V", "Select (move shapes, pan canvas)", ShortcutAction::SetTool(ToolKind::Select)),
            Shortcut::new("R", "Place rectangles", ShortcutAction::SetTool(ToolKind::Rectangle)),
            Shortcut::new("C", "Place circles", ShortcutAction::SetTool(ToolKind::Circle)),
            Shortcut::new("T", "Place triangles", ShortcutAction::SetTool(ToolKind::Triangle)),
            Shortcut::new("0", "Reset view", ShortcutAction::ResetView),
        ]
    }

    /// Look up the action bound to a key (case-insensitive).
    pub fn lookup(key: &str) -> Option<ShortcutAction> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.key.eq_ignore_ascii_case(key))
            .map(|shortcut| shortcut.action)
    }

    /// Log all shortcuts at info level.
    pub fn log_all() {
        for shortcut in Self::all() {
            log::info!("  {:4} {}", shortcut.key, shortcut.description);
        }
    }
}
