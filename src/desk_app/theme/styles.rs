//! Theme Styling Functions
//!
//! Global visuals and the frames shared by the views.

use eframe::egui::{self, Color32, CornerRadius, Stroke};

use super::colors;
use crate::desk_app::notifications::NotificationLevel;
use crate::shared::assurelog::TestCaseStatus;

/// Apply the global theme to the egui context
pub fn apply_global_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals.window_fill = colors::PANEL_BG;
    style.visuals.window_stroke = Stroke::new(1.0, colors::SEPARATOR);
    style.visuals.panel_fill = colors::BG_DARK;

    style.visuals.widgets.inactive.bg_fill = colors::BUTTON_SECONDARY;
    style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, colors::TEXT_LIGHT);
    style.visuals.widgets.hovered.bg_fill = colors::SELECTED_ITEM;
    style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, colors::TEXT_LIGHT);
    style.visuals.widgets.active.bg_fill = colors::ACCENT;
    style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, colors::TEXT_LIGHT);

    style.visuals.selection.bg_fill = colors::SELECTED_ITEM;
    style.visuals.selection.stroke = Stroke::new(1.0, colors::TEXT_LIGHT);

    ctx.set_style(style);
}

pub fn top_bar_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(colors::TOP_BAR_BG)
        .inner_margin(egui::Margin::symmetric(12, 8))
}

pub fn tab_bar_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(colors::TAB_BAR_BG)
        .inner_margin(egui::Margin::symmetric(12, 6))
}

/// Frame for catalog cards and report rows
pub fn card_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(colors::PANEL_BG)
        .stroke(Stroke::new(1.0, colors::SEPARATOR))
        .corner_radius(CornerRadius::same(8))
        .inner_margin(egui::Margin::same(12))
}

/// Frame for the floating quick-search results
pub fn popup_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(colors::PANEL_BG)
        .stroke(Stroke::new(1.0, colors::ACCENT))
        .corner_radius(CornerRadius::same(6))
        .inner_margin(egui::Margin::same(6))
        .shadow(egui::epaint::Shadow {
            offset: [0, 4],
            blur: 12,
            spread: 0,
            color: Color32::from_black_alpha(80),
        })
}

pub fn notification_color(level: NotificationLevel) -> Color32 {
    match level {
        NotificationLevel::Success => colors::SUCCESS,
        NotificationLevel::Info => colors::ACCENT,
        NotificationLevel::Error => colors::ERROR,
    }
}

pub fn status_color(status: Option<TestCaseStatus>) -> Color32 {
    match status {
        Some(TestCaseStatus::Pass) => colors::SUCCESS,
        Some(TestCaseStatus::Fail) => colors::ERROR,
        Some(TestCaseStatus::Blocked) => colors::WARNING,
        Some(TestCaseStatus::Pending) | None => colors::TEXT_SECONDARY,
    }
}
