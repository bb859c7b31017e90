//! AssureLog shell: tab strip, quick search, and the routed panel.

use eframe::egui;

use crate::desk_app::router::{self, MainView, Panel};
use crate::desk_app::search::SearchKey;
use crate::desk_app::state::AppState;
use crate::desk_app::theme::{colors, styles};
use crate::desk_app::views::report_views;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    styles::tab_bar_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        render_header(ui, state);
    });
    render_quick_search_results(ui, state);

    let selection = state.router.selection().clone();
    let user = state.auth.user().cloned();

    egui::Frame::default()
        .fill(colors::BG_DARK)
        .inner_margin(egui::Margin::same(16))
        .show(ui, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match router::panel(&selection, user.as_ref()) {
                Panel::Welcome { username } => render_welcome(ui, state, username),
                Panel::ReportList { search_mode } => report_views::render_list(ui, state, search_mode),
                Panel::ReportForm { .. } => report_views::render_report_form(ui, state),
                Panel::ReportView { .. } => report_views::render_report_view(ui, state),
                Panel::TestCaseForm { .. } => report_views::render_test_case_form(ui, state),
                Panel::Settings => report_views::render_settings(ui, state),
                Panel::Empty => {
                    ui.colored_label(colors::TEXT_SECONDARY, "Nenhum relatório selecionado.");
                }
            });
        });
}

fn render_header(ui: &mut egui::Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.colored_label(colors::TEXT_LIGHT, egui::RichText::new("📋 AssureLog").size(18.0).strong());
        ui.add_space(16.0);

        let current = state.router.selection().primary();
        for view in MainView::ALL {
            if ui.selectable_label(current == view, view.label()).clicked() {
                state.navigate(|r| r.change_main_view(view));
            }
        }
        ui.add_space(8.0);
        if ui.button("➕ Novo relatório").clicked() {
            state.navigate(|r| r.go_to_report_form());
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if state.quick_search.is_loading() {
                ui.spinner();
            }
            let response = ui.add(
                egui::TextEdit::singleline(&mut state.quick_search.query)
                    .hint_text("🔍 Busca rápida")
                    .desired_width(240.0),
            );
            if response.changed() {
                state.quick_search_edited();
            }
            if response.gained_focus() {
                state.quick_search.focus();
            }

            let key = if response.has_focus() {
                ui.input(|i| {
                    if i.key_pressed(egui::Key::ArrowDown) {
                        Some(SearchKey::Down)
                    } else if i.key_pressed(egui::Key::ArrowUp) {
                        Some(SearchKey::Up)
                    } else {
                        None
                    }
                })
            } else if response.lost_focus() {
                ui.input(|i| {
                    if i.key_pressed(egui::Key::Enter) {
                        Some(SearchKey::Enter)
                    } else if i.key_pressed(egui::Key::Escape) {
                        Some(SearchKey::Escape)
                    } else {
                        None
                    }
                })
            } else {
                None
            };
            if let Some(hit) = key.and_then(|key| state.quick_search.handle_key(key)) {
                state.open_search_hit(hit);
            }
        });
    });
}

fn render_quick_search_results(ui: &mut egui::Ui, state: &mut AppState) {
    if !state.quick_search.shows_results() {
        return;
    }
    let mut picked = None;
    let mut close = false;
    styles::popup_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        let results = state.quick_search.results();
        if results.is_empty() {
            ui.colored_label(colors::TEXT_SECONDARY, "Nenhum resultado.");
        }
        for (index, hit) in results.iter().enumerate() {
            let selected = state.quick_search.selected_index() == Some(index);
            let text = match &hit.subtitle {
                Some(subtitle) => format!("[{}] {} · {}", hit.kind.label(), hit.title, subtitle),
                None => format!("[{}] {}", hit.kind.label(), hit.title),
            };
            if ui.selectable_label(selected, text).clicked() {
                picked = Some(index);
            }
        }
        if ui.small_button("Fechar").clicked() {
            close = true;
        }
    });
    if close {
        state.quick_search.dismiss();
    }
    if let Some(hit) = picked.and_then(|index| state.quick_search.select(index)) {
        state.open_search_hit(hit);
    }
}

fn render_welcome(ui: &mut egui::Ui, state: &mut AppState, username: Option<&str>) {
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.colored_label(
            colors::TEXT_LIGHT,
            egui::RichText::new(format!("Olá, {}!", username.unwrap_or("visitante"))).size(28.0),
        );
        ui.add_space(12.0);
        ui.colored_label(colors::TEXT_SECONDARY, "Registre e acompanhe seus relatórios de teste.");
        ui.add_space(24.0);
        if ui.button("📄 Ver relatórios").clicked() {
            state.navigate(|r| r.change_main_view(MainView::Reports));
        }
        if ui.button("➕ Criar relatório").clicked() {
            state.navigate(|r| r.create_new());
        }
    });
}
