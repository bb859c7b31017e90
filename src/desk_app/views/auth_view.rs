use eframe::egui;

use crate::desk_app::state::AppState;
use crate::desk_app::theme::colors;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let available_rect = ui.available_rect_before_wrap();
    ui.painter().rect_filled(available_rect, 0.0, colors::BG_DARK);

    ui.scope_builder(egui::UiBuilder::new().max_rect(available_rect), |ui| {
        ui.vertical_centered(|ui| {
            let top_space = (available_rect.height() - 280.0).max(0.0) / 2.0;
            ui.add_space(top_space);

            ui.label(egui::RichText::new("🏪 bizdesk").size(32.0).strong().color(colors::TEXT_LIGHT));
            ui.add_space(20.0);
            ui.label(egui::RichText::new("Entrar").size(24.0).color(colors::TEXT_LIGHT));
            ui.add_space(20.0);

            if let Some(ref error) = state.auth.error {
                ui.label(egui::RichText::new(error).color(colors::ERROR));
                ui.add_space(10.0);
            }

            let input_width = 280.0;
            let label_width = 80.0;
            let indent = (available_rect.width() - input_width - label_width - 20.0) / 2.0;

            ui.horizontal(|ui| {
                ui.add_space(indent);
                ui.add_sized([label_width, 24.0], egui::Label::new(
                    egui::RichText::new("Usuário:").color(colors::TEXT_SECONDARY)
                ));
                ui.add_sized([input_width, 28.0], egui::TextEdit::singleline(&mut state.username_input)
                    .text_color(colors::TEXT_LIGHT));
            });
            ui.add_space(8.0);

            let mut submitted = false;
            ui.horizontal(|ui| {
                ui.add_space(indent);
                ui.add_sized([label_width, 24.0], egui::Label::new(
                    egui::RichText::new("Senha:").color(colors::TEXT_SECONDARY)
                ));
                let response = ui.add_sized([input_width, 28.0], egui::TextEdit::singleline(&mut state.password_input)
                    .password(true)
                    .text_color(colors::TEXT_LIGHT));
                submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            });
            ui.add_space(20.0);

            let button = egui::Button::new(egui::RichText::new("Entrar").color(colors::TEXT_LIGHT))
                .fill(colors::ACCENT);
            let clicked = ui
                .add_enabled(!state.auth.loading, button.min_size(egui::vec2(120.0, 32.0)))
                .clicked();
            if (clicked || submitted) && !state.auth.loading {
                state.handle_login();
            }

            if state.auth.loading {
                ui.add_space(15.0);
                ui.horizontal(|ui| {
                    ui.add_space((available_rect.width() - 100.0) / 2.0);
                    ui.label(egui::RichText::new("Carregando...").color(colors::TEXT_LIGHT));
                    ui.spinner();
                });
            }
        });
    });
}
