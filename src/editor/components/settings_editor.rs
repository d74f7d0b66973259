//! Theme, window and tall overlay settings editor
//!
//! Each group is edited on a copy and handed back to [`AppState`] as raw JSON,
//! so the stored value always goes through the same normalizer as a load.
//! Free-text fields are buffered and committed when they lose focus.

use eframe::egui;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::app::AppState;
use crate::color::{key_to_rgb, rgb_to_hex};
use crate::editor::constants::*;
use crate::settings::{ANCHOR_POSITIONS, BackgroundType};

pub struct SettingsEditorState {
    background_png: String,
    cursor_theme: String,
    anchor_x: String,
    anchor_y: String,
    font_style: String,
}

impl SettingsEditorState {
    pub fn new(app: &AppState) -> Self {
        let mut state = Self {
            background_png: String::new(),
            cursor_theme: String::new(),
            anchor_x: String::new(),
            anchor_y: String::new(),
            font_style: String::new(),
        };
        state.sync(app);
        state
    }

    fn sync(&mut self, app: &AppState) {
        let theme = app.theme();
        self.background_png = theme.background_png.clone();
        self.cursor_theme = theme.cursor_theme.clone();
        self.anchor_x = theme.ninb_anchor_x.clone();
        self.anchor_y = theme.ninb_anchor_y.clone();
        self.font_style = app.tall_overlay().font_style.clone();
    }
}

fn raw<T: Serialize>(value: &T) -> Option<Value> {
    match serde_json::to_value(value) {
        Ok(raw) => Some(raw),
        Err(e) => {
            warn!(error = %e, "Failed to serialize settings edit");
            None
        }
    }
}

/// Single-line field that reports a commit when it loses focus
fn buffered_field(ui: &mut egui::Ui, label: &str, buffer: &mut String) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.text_edit_singleline(buffer).lost_focus()
    })
    .inner
}

/// `#rrggbb` colour button; returns the new hex when edited
fn color_button(ui: &mut egui::Ui, label: &str, hex: &str) -> Option<String> {
    ui.horizontal(|ui| {
        ui.label(label);
        let (r, g, b) = key_to_rgb(hex).unwrap_or((0, 0, 0));
        let mut rgb = [r, g, b];
        let changed = ui.color_edit_button_srgb(&mut rgb).changed();
        ui.label(hex);
        changed.then(|| rgb_to_hex(rgb[0], rgb[1], rgb[2]))
    })
    .inner
}

fn theme_ui(ui: &mut egui::Ui, app: &mut AppState, state: &mut SettingsEditorState) {
    let mut theme = app.theme().clone();
    let mut changed = false;

    ui.label(egui::RichText::new("Theme").strong());
    ui.add_space(ITEM_SPACING);

    ui.horizontal(|ui| {
        ui.label("Background:");
        for (kind, label) in [(BackgroundType::Color, "Color"), (BackgroundType::Image, "Image")] {
            changed |= ui.selectable_value(&mut theme.background_type, kind, label).changed();
        }
    });

    if let Some(hex) = color_button(ui, "Color:", theme.background_rgb()) {
        let alpha = theme.background.get(7..).unwrap_or("ff");
        theme.background = format!("{hex}{alpha}");
        changed = true;
    }
    ui.horizontal(|ui| {
        ui.label("Alpha:");
        changed |= ui
            .add(egui::Slider::new(&mut theme.background_alpha, 0.0..=1.0))
            .changed();
    });

    if theme.background_type == BackgroundType::Image
        && buffered_field(ui, "PNG path:", &mut state.background_png)
    {
        theme.background_png = state.background_png.clone();
        changed = true;
    }
    if buffered_field(ui, "Cursor theme:", &mut state.cursor_theme) {
        theme.cursor_theme = state.cursor_theme.clone();
        changed = true;
    }

    ui.horizontal(|ui| {
        ui.label("Ninjabrain anchor:");
        let selected = if theme.ninb_anchor_position.is_empty() {
            "none"
        } else {
            theme.ninb_anchor_position.as_str()
        };
        egui::ComboBox::from_id_salt("ninb_anchor_position")
            .selected_text(selected.to_string())
            .show_ui(ui, |ui| {
                for position in ANCHOR_POSITIONS {
                    let label = if position.is_empty() { "none" } else { position };
                    if ui
                        .selectable_label(theme.ninb_anchor_position == position, label)
                        .clicked()
                    {
                        theme.ninb_anchor_position = position.to_string();
                        changed = true;
                    }
                }
            });
    });
    if buffered_field(ui, "Anchor X:", &mut state.anchor_x) {
        theme.ninb_anchor_x = state.anchor_x.clone();
        changed = true;
    }
    if buffered_field(ui, "Anchor Y:", &mut state.anchor_y) {
        theme.ninb_anchor_y = state.anchor_y.clone();
        changed = true;
    }
    ui.horizontal(|ui| {
        ui.label("Ninjabrain opacity:");
        changed |= ui
            .add(egui::Slider::new(&mut theme.ninb_opacity, 0.0..=1.0))
            .changed();
    });

    if changed {
        if let Some(raw) = raw(&theme) {
            app.update_theme(&raw);
            state.sync(app);
        }
    }
}

fn window_ui(ui: &mut egui::Ui, app: &mut AppState) {
    let mut window = *app.window_settings();
    let mut changed = false;

    ui.label(egui::RichText::new("Fullscreen").strong());
    ui.horizontal(|ui| {
        ui.label("W:");
        changed |= ui.add(egui::DragValue::new(&mut window.fullscreen_width)).changed();
        ui.label("H:");
        changed |= ui.add(egui::DragValue::new(&mut window.fullscreen_height)).changed();
        ui.label("(0 = compositor default)");
    });

    if changed {
        if let Some(raw) = raw(&window) {
            app.update_window_settings(&raw);
        }
    }
}

fn tall_overlay_ui(ui: &mut egui::Ui, app: &mut AppState, state: &mut SettingsEditorState) {
    let mut overlay = app.tall_overlay().clone();
    let mut changed = false;

    ui.label(egui::RichText::new("Tall overlay").strong());
    ui.label(format!(
        "Canvas {}x{} (follows the base resolution)",
        overlay.canvas_width, overlay.canvas_height
    ));

    for (label, color) in [
        ("Color A:", &mut overlay.color_a),
        ("Color B:", &mut overlay.color_b),
        ("Text color:", &mut overlay.text_color),
    ] {
        if let Some(hex) = color_button(ui, label, color) {
            *color = hex;
            changed = true;
        }
    }

    egui::Grid::new("tall_overlay_numbers")
        .num_columns(2)
        .show(ui, |ui| {
            for (label, value, range) in [
                ("Pixel count", &mut overlay.pixel_count, 1..=50),
                ("Pixel height", &mut overlay.pixel_height, 1..=50),
                ("Pixel opacity", &mut overlay.opacity_pixels, 0..=100),
                ("Text opacity", &mut overlay.opacity_text, 0..=100),
                ("Text size", &mut overlay.text_size, 1..=200),
            ] {
                ui.label(label);
                changed |= ui.add(egui::DragValue::new(value).range(range)).changed();
                ui.end_row();
            }
        });

    if buffered_field(ui, "Font style:", &mut state.font_style) {
        overlay.font_style = state.font_style.clone();
        changed = true;
    }

    if changed {
        if let Some(raw) = raw(&overlay) {
            app.update_tall_overlay(&raw);
            state.sync(app);
        }
    }
}

pub fn ui(ui: &mut egui::Ui, app: &mut AppState, state: &mut SettingsEditorState) {
    ui.group(|ui| {
        theme_ui(ui, app, state);
        ui.add_space(SECTION_SPACING);
        window_ui(ui, app);
        ui.add_space(SECTION_SPACING);
        tall_overlay_ui(ui, app, state);
    });
}
