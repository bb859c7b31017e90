use eframe::egui;

use crate::desk_app::state::AppState;
use crate::desk_app::theme::colors;
use crate::desk_app::types::AppView;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    egui::Frame::default().fill(colors::BG_DARK).show(ui, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.colored_label(colors::TEXT_LIGHT, egui::RichText::new("🏪 bizdesk").size(48.0).strong());
            ui.add_space(10.0);

            ui.colored_label(colors::TEXT_LIGHT, egui::RichText::new("Bem-vindo!").size(28.0));
            if let Some(user) = state.auth.user() {
                ui.colored_label(colors::TEXT_SECONDARY, egui::RichText::new(format!("@{}", user.username)).size(18.0));
            }
            ui.add_space(40.0);

            for app in AppView::APPS {
                let button = egui::Button::new(egui::RichText::new(app.title()).size(20.0))
                    .min_size(egui::vec2(220.0, 50.0))
                    .fill(colors::ACCENT);
                if ui.add(button).clicked() {
                    match app {
                        AppView::Catalog => state.open_catalog(),
                        AppView::AssureLog => state.open_assurelog(),
                        AppView::Auth | AppView::Landing => {}
                    }
                }
                ui.add_space(15.0);
            }
        });
    });
}
