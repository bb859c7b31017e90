//! Color Constants
//!
//! Slate and teal palette used by the desktop client.

use eframe::egui::Color32;

/// Dark background for main areas
pub const BG_DARK: Color32 = Color32::from_rgb(0x1E, 0x24, 0x2B);

/// Card and panel background
pub const PANEL_BG: Color32 = Color32::from_rgb(0x27, 0x2F, 0x38);

/// Top bar background
pub const TOP_BAR_BG: Color32 = Color32::from_rgb(0x15, 0x1A, 0x1F);

/// Tab strip under the top bar
pub const TAB_BAR_BG: Color32 = Color32::from_rgb(0x22, 0x29, 0x31);

/// Highlighted row (keyboard selection, active tab)
pub const SELECTED_ITEM: Color32 = Color32::from_rgb(0x2E, 0x5E, 0x63);

/// Text on dark backgrounds
pub const TEXT_LIGHT: Color32 = Color32::from_rgb(0xE8, 0xEE, 0xF2);

/// Secondary text color (muted)
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(0x93, 0xA1, 0xAD);

/// Accent color for primary buttons and prices
pub const ACCENT: Color32 = Color32::from_rgb(0x1F, 0x8A, 0x8A);

/// Secondary button background
pub const BUTTON_SECONDARY: Color32 = Color32::from_rgb(0x3A, 0x45, 0x50);

/// Cart count badge
pub const BADGE: Color32 = Color32::from_rgb(0xF2, 0x9E, 0x4C);

pub const SUCCESS: Color32 = Color32::from_rgb(0x4C, 0xAF, 0x50);

pub const ERROR: Color32 = Color32::from_rgb(0xE5, 0x73, 0x73);

pub const WARNING: Color32 = Color32::from_rgb(0xFF, 0xA7, 0x26);

pub const SEPARATOR: Color32 = Color32::from_rgb(0x3A, 0x45, 0x50);
