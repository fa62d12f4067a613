//! UI components using egui.

use egui::{
    vec2, Align2, Color32, Context, CornerRadius, CursorIcon, Frame, Margin, Sense, Stroke, Ui,
    Vec2,
};
use shapeboard_core::shapes::ShapeKind;
use shapeboard_core::tools::ToolKind;

const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);

/// UI state snapshot for one frame.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub current_tool: ToolKind,
    /// Viewport scale (1.0 = 100%).
    pub zoom: f64,
    pub shape_count: usize,
}

/// Actions triggered by UI interactions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiAction {
    /// Change the current tool.
    SetTool(ToolKind),
    /// Reset pan and zoom.
    ResetView,
}

/// Render all UI and return any triggered action.
pub fn render_ui(ctx: &Context, ui_state: &UiState) -> Option<UiAction> {
    let toolbar_action = render_toolbar(ctx, ui_state);
    let bottom_action = render_bottom_toolbar(ctx, ui_state);

    toolbar_action.or(bottom_action)
}

/// Top toolbar: shape selector and the move tool.
fn render_toolbar(ctx: &Context, ui_state: &UiState) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("toolbar"))
        .anchor(Align2::CENTER_TOP, Vec2::new(0.0, 12.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(4.0, 0.0);

                    for kind in ShapeKind::ALL {
                        let tool = ToolKind::placing(kind);
                        let label = format!("{} ({})", kind.name(), tool.shortcut());
                        if toggle_button(ui, &label, ui_state.current_tool == tool) {
                            action = Some(UiAction::SetTool(tool));
                        }
                    }

                    vertical_separator(ui);

                    let select = ToolKind::Select;
                    let label = format!("Select (Move) ({})", select.shortcut());
                    if toggle_button(ui, &label, ui_state.current_tool.is_select()) {
                        action = Some(UiAction::SetTool(select));
                    }
                });
            });
        });

    action
}

/// Bottom-left readout with zoom controls.
fn render_bottom_toolbar(ctx: &Context, ui_state: &UiState) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("bottom_toolbar"))
        .anchor(Align2::LEFT_BOTTOM, Vec2::new(12.0, -12.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(zoom_label(ui_state.zoom))
                            .size(12.0)
                            .color(Color32::from_gray(80)),
                    );
                    if toggle_button(ui, "Reset view (0)", false) {
                        action = Some(UiAction::ResetView);
                    }
                    vertical_separator(ui);
                    ui.label(
                        egui::RichText::new(format!("{} shapes", ui_state.shape_count))
                            .size(12.0)
                            .color(Color32::from_gray(120)),
                    );
                });
            });
        });

    action
}

/// Zoom percentage for display.
fn zoom_label(zoom: f64) -> String {
    format!("{:.0}%", zoom * 100.0)
}

/// Common panel frame style.
fn panel_frame() -> Frame {
    Frame::new()
        .fill(PANEL_BG)
        .corner_radius(CornerRadius::same(8))
        .stroke(Stroke::new(1.0, BORDER))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 8,
            offset: [0, 2],
            color: Color32::from_black_alpha(15),
        })
        .inner_margin(Margin::same(8))
}

/// Vertical separator for horizontal panels.
fn vertical_separator(ui: &mut Ui) {
    let rect = ui.available_rect_before_wrap();
    let height = 14.0;
    let x = rect.left() + 1.0;
    let top = rect.center().y - height / 2.0;
    ui.painter().line_segment(
        [egui::Pos2::new(x, top), egui::Pos2::new(x, top + height)],
        Stroke::new(1.0, Color32::from_gray(210)),
    );
    ui.add_space(3.0);
}

/// Text button with a solid accent background when selected.
fn toggle_button(ui: &mut Ui, label: &str, selected: bool) -> bool {
    let font_id = egui::FontId::proportional(12.0);
    let galley = ui
        .painter()
        .layout_no_wrap(label.to_string(), font_id.clone(), Color32::PLACEHOLDER);
    let size = vec2(galley.size().x + 16.0, 26.0);

    let (rect, response) = ui.allocate_exact_size(size, Sense::click());

    if ui.is_rect_visible(rect) {
        let bg_color = if selected {
            ACCENT
        } else if response.hovered() {
            Color32::from_gray(235)
        } else {
            Color32::from_gray(245)
        };
        let text_color = if selected {
            Color32::WHITE
        } else {
            Color32::from_gray(80)
        };

        ui.painter().rect_filled(rect, CornerRadius::same(4), bg_color);
        ui.painter()
            .text(rect.center(), Align2::CENTER_CENTER, label, font_id, text_color);
    }

    let clicked = response.clicked();
    response.on_hover_cursor(CursorIcon::PointingHand);
    clicked
}
