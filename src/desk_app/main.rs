/**
 * bizdesk Desktop App - Main Entry Point
 *
 * Installs logging, loads configuration, and runs the eframe app.
 */
use std::time::Duration;

use eframe::egui;
use bizdesk::desk_app::{theme, views, AppState, Config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "bizdesk=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = Config::load()?;
    tracing::info!(server = config.server_url(), "starting bizdesk");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "bizdesk",
        options,
        Box::new(move |cc| {
            theme::apply_global_theme(&cc.egui_ctx);
            Ok(Box::new(DeskApp {
                state: AppState::new(config),
            }))
        }),
    )?;
    Ok(())
}

/// Main application state
struct DeskApp {
    state: AppState,
}

impl eframe::App for DeskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll();

        views::render_top_bar(ctx, &mut self.state);
        views::render_main_panel(ctx, &mut self.state);
        views::render_toasts(ctx, &self.state);

        // keep polling workers, debounce timers and toast expiry
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
