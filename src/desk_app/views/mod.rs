use std::time::Instant;

use eframe::egui;

use crate::desk_app::state::AppState;
use crate::desk_app::theme::{colors, styles};
use crate::desk_app::types::AppView;

pub mod assurelog_view;
pub mod auth_view;
pub mod catalog_view;
pub mod landing_view;
pub mod report_views;

pub fn render_top_bar(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::top("top_panel")
        .frame(styles::top_bar_frame())
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(colors::TEXT_LIGHT, egui::RichText::new("🏪 bizdesk").size(18.0).strong());

                if state.auth.is_signed_in() && state.current_view != AppView::Landing {
                    ui.add_space(12.0);
                    if ui.button("⬅ Início").clicked() {
                        state.current_view = AppView::Landing;
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add_space(8.0);
                    if !state.auth.is_signed_in() {
                        return;
                    }
                    if ui.button("Sair").clicked() {
                        state.logout();
                        return;
                    }
                    if let Some(user) = state.auth.user() {
                        let label = if user.is_admin() {
                            format!("@{} (admin)", user.username)
                        } else {
                            format!("@{}", user.username)
                        };
                        ui.colored_label(colors::TEXT_LIGHT, label);
                    }
                    ui.add_space(16.0);

                    let badge = egui::RichText::new(format!("🛒 {}", state.cart_badge.get()))
                        .color(colors::BADGE)
                        .strong();
                    if ui.add(egui::Button::new(badge).frame(false)).clicked() {
                        state.open_catalog();
                    }
                });
            });
        });
}

pub fn render_main_panel(ctx: &egui::Context, state: &mut AppState) {
    let frame = egui::Frame::default()
        .fill(colors::BG_DARK)
        .inner_margin(egui::Margin::same(0));

    egui::CentralPanel::default()
        .frame(frame)
        .show(ctx, |ui| match state.current_view {
            AppView::Auth => auth_view::render(ui, state),
            AppView::Landing => landing_view::render(ui, state),
            AppView::Catalog => catalog_view::render(ui, state),
            AppView::AssureLog => assurelog_view::render(ui, state),
        });
}

/// Toasts stacked in the bottom-right corner
pub fn render_toasts(ctx: &egui::Context, state: &AppState) {
    let toasts = state.toasts.visible(Instant::now());
    if toasts.is_empty() {
        return;
    }
    egui::Area::new(egui::Id::new("toasts"))
        .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
        .show(ctx, |ui| {
            for toast in toasts {
                styles::card_frame().show(ui, |ui| {
                    ui.colored_label(styles::notification_color(toast.level), toast.message);
                });
                ui.add_space(6.0);
            }
        });
}
