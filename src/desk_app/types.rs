/**
 * Shared Types Module
 *
 * App-level screens of the desktop client.
 */

/// Current app screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppView {
    /// Login screen
    Auth,
    /// Landing page with app selection buttons
    Landing,
    /// Product catalog with the cart badge
    Catalog,
    /// AssureLog report authoring shell
    AssureLog,
}

impl AppView {
    /// Screens reachable from the landing page
    pub const APPS: [AppView; 2] = [AppView::Catalog, AppView::AssureLog];

    pub fn title(&self) -> &'static str {
        match self {
            AppView::Auth => "Entrar",
            AppView::Landing => "Início",
            AppView::Catalog => "🛍 Catálogo",
            AppView::AssureLog => "📋 AssureLog",
        }
    }
}
