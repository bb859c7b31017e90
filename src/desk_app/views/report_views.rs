//! Panels of the reports tab

use eframe::egui;

use crate::desk_app::config::Config;
use crate::desk_app::router::MainView;
use crate::desk_app::state::AppState;
use crate::desk_app::theme::{colors, styles};
use crate::shared::assurelog::{evidence_label, Report, ReportId, TestCase, TestCaseId, TestCaseStatus};

const SORT_FIELDS: [(&str, &str); 4] = [
    ("created_at", "Criação"),
    ("date", "Data"),
    ("title", "Título"),
    ("made_by", "Responsável"),
];

fn heading(ui: &mut egui::Ui, text: &str) {
    ui.colored_label(colors::TEXT_LIGHT, egui::RichText::new(text).size(22.0).strong());
    ui.add_space(8.0);
}

fn error_line(ui: &mut egui::Ui, error: Option<&str>) {
    if let Some(error) = error {
        ui.colored_label(colors::ERROR, error);
        ui.add_space(6.0);
    }
}

/// Combo over suggested values; the empty entry clears the filter
fn suggestion_combo(ui: &mut egui::Ui, id: &str, value: &mut String, options: &[String]) {
    let shown = if value.is_empty() { "Todos".to_string() } else { value.clone() };
    egui::ComboBox::from_id_salt(id)
        .selected_text(shown)
        .show_ui(ui, |ui| {
            ui.selectable_value(value, String::new(), "Todos");
            for option in options {
                ui.selectable_value(value, option.clone(), option.as_str());
            }
        });
}

// ---- list ----

enum ListAction {
    View(ReportId),
    Edit(Report),
    Delete(ReportId),
}

pub fn render_list(ui: &mut egui::Ui, state: &mut AppState, search_mode: bool) {
    let mut apply = false;
    let mut clear = false;

    // Header with export and create
    ui.horizontal(|ui| {
        heading(ui, if search_mode { "Busca de relatórios" } else { "Relatórios" });
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("📥 Exportar todos (PDF)").clicked() {
                state.export_all_reports_pdf();
            }
            if ui.button("➕ Novo").clicked() {
                state.navigate(|r| r.create_new());
            }
        });
    });

    // Filters; search mode opens them by default
    let filters_open = search_mode || state.report_list.filters.is_active();
    egui::CollapsingHeader::new("Filtros")
        .default_open(filters_open)
        .show(ui, |ui| {
            let list = &mut state.report_list;
            egui::Grid::new("report_filters").num_columns(4).show(ui, |ui| {
                // Free text submits on Enter
                ui.label("Texto");
                let search = ui.text_edit_singleline(&mut list.filters.search);
                if search.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    apply = true;
                }
                ui.label("Responsável");
                suggestion_combo(ui, "filter_responsible", &mut list.filters.responsible, &list.suggestions.responsible);
                ui.end_row();

                ui.label("De (AAAA-MM-DD)");
                ui.text_edit_singleline(&mut list.filters.date_from);
                ui.label("Até");
                ui.text_edit_singleline(&mut list.filters.date_to);
                ui.end_row();

                ui.label("Funcionalidade");
                suggestion_combo(ui, "filter_feature", &mut list.filters.feature, &list.suggestions.feature);
                ui.label("Ambiente");
                suggestion_combo(ui, "filter_environment", &mut list.filters.environment, &list.suggestions.environment);
                ui.end_row();

                // Fall back to the form's statuses until suggestions arrive
                ui.label("Status");
                let statuses = if list.suggestions.status.is_empty() {
                    TestCaseStatus::FORM_CHOICES
                        .iter()
                        .map(|s| s.as_code().to_string())
                        .collect()
                } else {
                    list.suggestions.status.clone()
                };
                suggestion_combo(ui, "filter_status", &mut list.filters.status, &statuses);
                ui.label("Ordenar por");
                ui.horizontal(|ui| {
                    let current = SORT_FIELDS
                        .iter()
                        .find(|(key, _)| *key == list.filters.sort_by)
                        .map_or("Padrão", |(_, label)| *label);
                    egui::ComboBox::from_id_salt("filter_sort_by")
                        .selected_text(current)
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut list.filters.sort_by, String::new(), "Padrão");
                            for (key, label) in SORT_FIELDS {
                                ui.selectable_value(&mut list.filters.sort_by, key.to_string(), label);
                            }
                        });
                    // Toggling the order refetches right away
                    let arrow = if list.filters.sort_order == "asc" { "⬆" } else { "⬇" };
                    if ui.button(arrow).clicked() {
                        list.filters.toggle_sort_order();
                        apply = true;
                    }
                });
                ui.end_row();
            });
            ui.horizontal(|ui| {
                if ui.button("Aplicar").clicked() {
                    apply = true;
                }
                if ui.button("Limpar").clicked() {
                    clear = true;
                }
            });
        });

    if clear {
        state.clear_filters();
    } else if apply {
        state.apply_filters();
    }

    if !search_mode {
        render_excel_import(ui, state);
    }
    ui.separator();

    // Status line
    let list = &state.report_list;
    if list.loading {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.colored_label(colors::TEXT_SECONDARY, "Carregando relatórios...");
        });
    }
    error_line(ui, list.error.as_deref());
    if let Some(total) = list.total {
        ui.colored_label(colors::TEXT_SECONDARY, format!("{} relatório(s)", total));
    }
    if !list.loading && list.reports.is_empty() {
        ui.colored_label(colors::TEXT_SECONDARY, "Nenhum relatório encontrado.");
    }

    // Report cards
    let mut action = None;
    for report in &list.reports {
        styles::card_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.colored_label(colors::TEXT_LIGHT, egui::RichText::new(&report.title).size(17.0).strong());
                    let date = report.date.map(|d| d.format("%d/%m/%Y").to_string()).unwrap_or_default();
                    let made_by = report.made_by.as_deref().unwrap_or("-");
                    let env = report.test_environment.as_deref().unwrap_or("-");
                    ui.colored_label(
                        colors::TEXT_SECONDARY,
                        format!("{} · {} · {} · {} caso(s)", date, made_by, env, report.test_cases.len()),
                    );
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("🗑 Excluir").clicked() {
                        action = Some(ListAction::Delete(report.id));
                    }
                    if ui.button("✏ Editar").clicked() {
                        action = Some(ListAction::Edit(report.clone()));
                    }
                    if ui.button("👁 Ver").clicked() {
                        action = Some(ListAction::View(report.id));
                    }
                });
            });
        });
        ui.add_space(6.0);
    }

    match action {
        Some(ListAction::View(id)) => state.navigate(|r| r.view_report(id)),
        Some(ListAction::Edit(report)) => state.navigate(|r| r.edit_report(report)),
        Some(ListAction::Delete(id)) => state.delete_report(id),
        None => {}
    }
}

fn render_excel_import(ui: &mut egui::Ui, state: &mut AppState) {
    let mut validate = false;
    let mut import = false;
    let mut template = false;

    ui.collapsing("📊 Importar planilha", |ui| {
        let excel = &mut state.excel;
        egui::Grid::new("excel_import").num_columns(2).show(ui, |ui| {
            ui.label("Arquivo (.xlsx/.xls)");
            ui.text_edit_singleline(&mut excel.path);
            ui.end_row();
            ui.label("Título do relatório");
            ui.text_edit_singleline(&mut excel.metadata.report_title);
            ui.end_row();
            ui.label("Ambiente");
            ui.text_edit_singleline(&mut excel.metadata.test_environment);
            ui.end_row();
            ui.label("Funcionalidade");
            ui.text_edit_singleline(&mut excel.metadata.feature_scenario);
            ui.end_row();
        });

        error_line(ui, excel.error.as_deref());
        ui.horizontal(|ui| {
            validate = ui.add_enabled(!excel.busy, egui::Button::new("Validar")).clicked();
            import = ui.add_enabled(!excel.busy, egui::Button::new("Importar")).clicked();
            template = ui.button("Ver modelo").clicked();
            if excel.busy {
                ui.spinner();
            }
        });

        // Validation preview
        if let Some(validation) = &excel.validation {
            let color = if validation.valid { colors::SUCCESS } else { colors::WARNING };
            ui.colored_label(
                color,
                format!(
                    "{} de {} linha(s) válidas",
                    validation.valid_rows, validation.total_rows
                ),
            );
            if !validation.missing_columns.is_empty() {
                ui.colored_label(
                    colors::ERROR,
                    format!("Colunas ausentes: {}", validation.missing_columns.join(", ")),
                );
            }
            if !validation.invalid_rows.is_empty() {
                let rows: Vec<String> = validation.invalid_rows.iter().map(u64::to_string).collect();
                ui.colored_label(colors::WARNING, format!("Linhas inválidas: {}", rows.join(", ")));
            }
        }
        // Import outcome, with per-row errors
        if let Some(result) = &excel.result {
            ui.colored_label(
                colors::SUCCESS,
                format!("{} de {} linha(s) importadas", result.imported_count, result.total_rows),
            );
            for error in &result.errors {
                ui.colored_label(colors::WARNING, error);
            }
        }
        if let Some(template) = &excel.template {
            ui.label(egui::RichText::new(serde_json::to_string_pretty(template).unwrap_or_default()).monospace());
        }
    });

    if validate {
        state.validate_excel();
    }
    if import {
        state.import_excel();
    }
    if template {
        state.load_excel_template();
    }
}

// ---- report form ----

pub fn render_report_form(ui: &mut egui::Ui, state: &mut AppState) {
    let mut save = false;
    let mut cancel = false;

    {
        let Some(form) = state.report_form.as_mut() else {
            ui.colored_label(colors::TEXT_SECONDARY, "Formulário indisponível.");
            return;
        };
        heading(ui, if form.editing().is_some() { "Editar relatório" } else { "Novo relatório" });
        // Placeholder selection: wait for the record before showing fields
        if form.is_loading() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.colored_label(colors::TEXT_SECONDARY, "Carregando relatório...");
            });
            return;
        }

        egui::Grid::new("report_form").num_columns(2).spacing([12.0, 8.0]).show(ui, |ui| {
            ui.label("Título *");
            ui.add(egui::TextEdit::singleline(&mut form.draft.title).desired_width(400.0));
            ui.end_row();
            ui.label("Data");
            ui.add(egui::TextEdit::singleline(&mut form.date_input).hint_text("AAAA-MM-DD"));
            ui.end_row();
            ui.label("Responsável *");
            ui.add(egui::TextEdit::singleline(&mut form.draft.made_by).desired_width(400.0));
            ui.end_row();
            ui.label("Ambiente de teste");
            ui.add(egui::TextEdit::singleline(&mut form.draft.test_environment).desired_width(400.0));
            ui.end_row();
            ui.label("Link");
            ui.add(egui::TextEdit::singleline(&mut form.draft.link).desired_width(400.0));
            ui.end_row();
            ui.label("Funcionalidade / cenário");
            ui.add(egui::TextEdit::multiline(&mut form.draft.feature_scenario).desired_width(400.0));
            ui.end_row();
        });
        ui.add_space(8.0);
        error_line(ui, form.error.as_deref());

        // Save / cancel
        ui.horizontal(|ui| {
            let label = if form.saving { "Salvando..." } else { "💾 Salvar" };
            save = ui
                .add_enabled(!form.saving, egui::Button::new(label).fill(colors::ACCENT))
                .clicked();
            cancel = ui.button("Cancelar").clicked();
        });
    }

    if save {
        state.save_report();
    } else if cancel {
        state.navigate(|r| r.back_to_list());
    }
}

// ---- report view ----

enum ViewAction {
    Back,
    Edit(Report),
    Export,
    NewTestCase(ReportId),
    EditTestCase(TestCase),
    DeleteTestCase(TestCaseId),
    DeleteReport(ReportId),
}

pub fn render_report_view(ui: &mut egui::Ui, state: &mut AppState) {
    let mut action = None;

    if let Some(view) = state.report_view.as_ref() {
        if ui.button("⬅ Voltar").clicked() {
            action = Some(ViewAction::Back);
        }
        if view.loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.colored_label(colors::TEXT_SECONDARY, "Carregando relatório...");
            });
        }
        error_line(ui, view.error.as_deref());

        if let Some(report) = &view.report {
            heading(ui, &report.title);
            egui::Grid::new("report_details").num_columns(2).show(ui, |ui| {
                let rows = [
                    ("Data", report.date.map(|d| d.format("%d/%m/%Y").to_string())),
                    ("Responsável", report.made_by.clone()),
                    ("Ambiente", report.test_environment.clone()),
                    ("Link", report.link.clone()),
                    ("Funcionalidade", report.feature_scenario.clone()),
                ];
                for (label, value) in rows {
                    ui.colored_label(colors::TEXT_SECONDARY, label);
                    ui.label(value.unwrap_or_else(|| "-".to_string()));
                    ui.end_row();
                }
            });
            ui.add_space(8.0);

            // Report actions
            ui.horizontal(|ui| {
                if ui.button("✏ Editar").clicked() {
                    action = Some(ViewAction::Edit(report.clone()));
                }
                let export = if view.exporting { "Exportando..." } else { "📄 Exportar PDF" };
                if ui.add_enabled(!view.exporting, egui::Button::new(export)).clicked() {
                    action = Some(ViewAction::Export);
                }
                if ui.button("➕ Caso de teste").clicked() {
                    action = Some(ViewAction::NewTestCase(report.id));
                }
                if ui.button("🗑 Excluir relatório").clicked() {
                    action = Some(ViewAction::DeleteReport(report.id));
                }
            });
            ui.separator();

            // Test cases
            ui.colored_label(colors::TEXT_LIGHT, egui::RichText::new("Casos de teste").size(18.0));
            if report.test_cases.is_empty() {
                ui.colored_label(colors::TEXT_SECONDARY, "Nenhum caso de teste.");
            }
            for test_case in &report.test_cases {
                styles::card_frame().show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui| {
                        let status = test_case.status();
                        ui.colored_label(
                            styles::status_color(status),
                            status.map_or("-", |s| s.label()),
                        );
                        ui.colored_label(
                            colors::TEXT_LIGHT,
                            format!("{} · {}", test_case.tc_number, test_case.title),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("🗑").clicked() {
                                action = Some(ViewAction::DeleteTestCase(test_case.id));
                            }
                            if ui.button("✏").clicked() {
                                action = Some(ViewAction::EditTestCase(test_case.clone()));
                            }
                        });
                    });
                    if let Some(scenario) = &test_case.scenario_description {
                        ui.colored_label(colors::TEXT_SECONDARY, scenario);
                    }
                    ui.label(format!("Esperado: {}", test_case.expected_result));
                    ui.label(format!("Obtido: {}", test_case.actual_result));
                    if !test_case.evidence_files.is_empty() {
                        let names: Vec<String> = test_case.evidence_files.iter().map(evidence_label).collect();
                        ui.colored_label(colors::TEXT_SECONDARY, format!("📎 {}", names.join(", ")));
                    }
                });
                ui.add_space(6.0);
            }
        }
    }

    match action {
        Some(ViewAction::Back) => state.navigate(|r| r.back_to_list()),
        Some(ViewAction::Edit(report)) => state.navigate(|r| r.edit_report(report)),
        Some(ViewAction::Export) => state.export_report_pdf(),
        Some(ViewAction::NewTestCase(id)) => state.navigate(|r| r.new_test_case(id)),
        Some(ViewAction::EditTestCase(test_case)) => state.navigate(|r| r.edit_test_case(test_case)),
        Some(ViewAction::DeleteTestCase(id)) => state.delete_test_case(id),
        Some(ViewAction::DeleteReport(id)) => state.delete_report(id),
        None => {}
    }
}

// ---- test case form ----

pub fn render_test_case_form(ui: &mut egui::Ui, state: &mut AppState) {
    let mut save = false;
    let mut cancel = false;
    let mut upload = false;
    let mut remove = None;

    {
        let Some(form) = state.test_case_form.as_mut() else {
            ui.colored_label(colors::TEXT_SECONDARY, "Formulário indisponível.");
            return;
        };
        heading(ui, if form.editing().is_some() { "Editar caso de teste" } else { "Novo caso de teste" });

        egui::Grid::new("test_case_form").num_columns(2).spacing([12.0, 8.0]).show(ui, |ui| {
            ui.label("Nº TC *");
            ui.text_edit_singleline(&mut form.draft.tc_number);
            ui.end_row();
            ui.label("Título *");
            ui.add(egui::TextEdit::singleline(&mut form.draft.title).desired_width(400.0));
            ui.end_row();
            // Status picker shows labels, stores codes
            ui.label("Status");
            ui.horizontal(|ui| {
                for choice in TestCaseStatus::FORM_CHOICES {
                    let selected = form.draft.status == choice;
                    if ui.selectable_label(selected, choice.label()).clicked() {
                        form.draft.status = TestCaseStatus::from_label(choice.label());
                    }
                }
            });
            ui.end_row();
            ui.label("Descrição do cenário");
            ui.add(egui::TextEdit::multiline(&mut form.draft.scenario_description).desired_width(400.0));
            ui.end_row();
            ui.label("Resultado esperado *");
            ui.add(egui::TextEdit::multiline(&mut form.draft.expected_result).desired_width(400.0));
            ui.end_row();
            ui.label("Resultado obtido *");
            ui.add(egui::TextEdit::multiline(&mut form.draft.actual_result).desired_width(400.0));
            ui.end_row();
        });

        ui.add_space(8.0);
        // Evidence list and upload field
        ui.colored_label(colors::TEXT_LIGHT, "Evidências");
        for (index, entry) in form.draft.evidence_files.iter().enumerate() {
            ui.horizontal(|ui| {
                ui.label(format!("📎 {}", evidence_label(entry)));
                if ui.small_button("✖").clicked() {
                    remove = Some(index);
                }
            });
        }
        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(&mut form.evidence_path).hint_text("Caminho do arquivo"));
            upload = ui.add_enabled(!form.uploading, egui::Button::new("Enviar")).clicked();
            if form.uploading {
                ui.spinner();
            }
        });

        ui.add_space(8.0);
        error_line(ui, form.error.as_deref());
        // Saving waits for uploads in flight
        ui.horizontal(|ui| {
            let label = if form.saving { "Salvando..." } else { "💾 Salvar" };
            save = ui
                .add_enabled(!form.saving && !form.uploading, egui::Button::new(label).fill(colors::ACCENT))
                .clicked();
            cancel = ui.button("Cancelar").clicked();
        });
    }

    // Apply after the form borrow ends
    if let Some(index) = remove {
        state.remove_evidence(index);
    }
    if upload {
        state.upload_evidence();
    }
    if save {
        state.save_test_case();
    } else if cancel {
        state.cancel_test_case();
    }
}

// ---- settings ----

pub fn render_settings(ui: &mut egui::Ui, state: &mut AppState) {
    heading(ui, MainView::Settings.label());
    egui::Grid::new("settings").num_columns(2).show(ui, |ui| {
        ui.colored_label(colors::TEXT_SECONDARY, "Servidor");
        ui.label(state.config.server_url());
        ui.end_row();
        ui.colored_label(colors::TEXT_SECONDARY, "Dados locais");
        ui.label(state.config.data_dir().display().to_string());
        ui.end_row();
        ui.colored_label(colors::TEXT_SECONDARY, "PDFs exportados");
        ui.label(state.export_dir().display().to_string());
        ui.end_row();
        if let Some(path) = Config::config_file_path() {
            ui.colored_label(colors::TEXT_SECONDARY, "Arquivo de configuração");
            ui.label(path.display().to_string());
            ui.end_row();
        }
        if let Some(user) = state.auth.user() {
            ui.colored_label(colors::TEXT_SECONDARY, "Usuário");
            ui.label(format!("{} ({})", user.username, user.role));
            ui.end_row();
        }
    });
    ui.add_space(12.0);

    if ui.button("📊 Estatísticas de busca").clicked() {
        state.load_search_stats();
    }
    if let Some(stats) = &state.search_stats {
        ui.label(egui::RichText::new(serde_json::to_string_pretty(stats).unwrap_or_default()).monospace());
    }
}
