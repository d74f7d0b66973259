//! Editor window layout, colours and timings

use eframe::egui;

/// Editor window dimensions
pub const WINDOW_WIDTH: f32 = 1400.0;
pub const WINDOW_HEIGHT: f32 = 900.0;
pub const WINDOW_MIN_WIDTH: f32 = 900.0;
pub const WINDOW_MIN_HEIGHT: f32 = 600.0;

/// Control panel
pub const PANEL_WIDTH: f32 = 360.0;
pub const PANEL_MIN_WIDTH: f32 = 300.0;

/// Layout spacing
pub const SECTION_SPACING: f32 = 12.0;
pub const ITEM_SPACING: f32 = 6.0;
pub const FIELD_WIDTH: f32 = 64.0;

/// Viewport colours
pub const VIEWPORT_BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0x14, 0x17, 0x1c);
pub const PENDING_FILL: egui::Color32 = egui::Color32::from_rgb(0x1e, 0x22, 0x29);
pub const MIRROR_BORDER: egui::Color32 = egui::Color32::from_rgb(0x5e, 0xc8, 0xff);
pub const MIRROR_BORDER_ACTIVE: egui::Color32 = egui::Color32::from_rgb(0xff, 0xc8, 0x3c);
pub const SELECTION_STROKE: egui::Color32 = egui::Color32::from_rgb(0xff, 0xff, 0xff);
pub const SELECTION_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(0x20, 0x20, 0x20, 0x20);
pub const PROJECTOR_BORDER: egui::Color32 = egui::Color32::from_rgb(0xb0, 0x8c, 0xff);

/// Status colours
pub const STATUS_OK: egui::Color32 = egui::Color32::from_rgb(0, 200, 0);
pub const STATUS_ERROR: egui::Color32 = egui::Color32::from_rgb(200, 0, 0);
pub const STATUS_WARN: egui::Color32 = egui::Color32::from_rgb(200, 200, 0);

/// Largest source rect (in pixels) that gets its own keyed overlay texture
pub const MAX_OVERLAY_PIXELS: u32 = 2048 * 2048;

/// Repaint interval while a background is still decoding
pub const LOADING_REPAINT_MS: u64 = 100;
