//! Shapeboard Application
//!
//! The windowing shell: event loop, Vello surface, egui toolbar and the
//! translation of raw input into canvas gestures.

mod app;
mod event_handler;
mod shortcuts;
mod ui;

pub use app::{App, AppConfig, AppError, CONFIG_ENV};
pub use event_handler::{EventHandler, DRAG_THRESHOLD};
pub use shortcuts::{Shortcut, ShortcutAction, ShortcutRegistry};
pub use ui::{render_ui, UiAction, UiState};
