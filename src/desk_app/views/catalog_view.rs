use eframe::egui;

use crate::desk_app::state::AppState;
use crate::desk_app::theme::{colors, styles};
use crate::shared::catalog::format_price;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    egui::Frame::default()
        .fill(colors::BG_DARK)
        .inner_margin(egui::Margin::same(16))
        .show(ui, |ui| {
            // Title row with refresh
            ui.horizontal(|ui| {
                ui.colored_label(colors::TEXT_LIGHT, egui::RichText::new("Catálogo").size(24.0).strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("🔄 Atualizar").clicked() {
                        state.load_products();
                    }
                });
            });
            ui.add_space(8.0);
            render_cart_summary(ui, state);
            ui.separator();

            // Pending or failed loads replace the listing
            if state.products_loading {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.colored_label(colors::TEXT_SECONDARY, "Carregando produtos...");
                });
                return;
            }
            if let Some(error) = &state.products_error {
                ui.colored_label(colors::ERROR, format!("Erro ao carregar produtos: {}", error));
                return;
            }
            if state.products.is_empty() {
                ui.colored_label(colors::TEXT_SECONDARY, "Nenhum produto cadastrado.");
                return;
            }

            // Applied after the listing borrow ends
            let mut chosen = None;
            egui::ScrollArea::vertical().show(ui, |ui| {
                for product in &state.products {
                    styles::card_frame().show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.horizontal(|ui| {
                            // Name and description
                            ui.vertical(|ui| {
                                ui.colored_label(colors::TEXT_LIGHT, egui::RichText::new(&product.nome).size(18.0).strong());
                                if let Some(descricao) = &product.descricao {
                                    ui.colored_label(colors::TEXT_SECONDARY, descricao);
                                }
                            });
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                let add = egui::Button::new(
                                    egui::RichText::new("Adicionar ao carrinho").color(colors::TEXT_LIGHT),
                                )
                                .fill(colors::ACCENT);
                                if ui.add(add).clicked() {
                                    chosen = Some(product.id);
                                }
                                // Listing shows the sale price
                                ui.colored_label(
                                    colors::BADGE,
                                    egui::RichText::new(format_price(product.display_price())).size(16.0),
                                );
                            });
                        });
                    });
                    ui.add_space(8.0);
                }
            });

            if let Some(id) = chosen {
                state.add_product_to_cart(id);
            }
        });
}

fn render_cart_summary(ui: &mut egui::Ui, state: &mut AppState) {
    let items = state.cart.items();
    ui.collapsing(format!("🛒 Carrinho ({} itens)", state.cart_badge.get()), |ui| {
        if items.is_empty() {
            ui.colored_label(colors::TEXT_SECONDARY, "Carrinho vazio.");
            return;
        }
        egui::Grid::new("cart_items").num_columns(3).striped(true).show(ui, |ui| {
            for item in &items {
                ui.label(&item.name);
                ui.label(format!("× {}", item.counted_quantity()));
                ui.label(format_price(item.line_total()));
                ui.end_row();
            }
        });
        ui.add_space(6.0);

        // Total and clear
        ui.horizontal(|ui| {
            ui.colored_label(colors::TEXT_LIGHT, format!("Total: {}", format_price(state.cart.total())));
            if ui.button("Esvaziar").clicked() {
                state.clear_cart();
            }
        });
    });
}
