//! Resolution, GUI scale, display variant and zoom controls

use eframe::egui;

use crate::app::AppState;
use crate::constants::resolution::PRESETS;
use crate::editor::constants::*;
use crate::settings::{Action, preset_for};
use crate::types::DisplayVariant;

/// Typed width/height, kept as text until applied
pub struct ResolutionState {
    width_text: String,
    height_text: String,
}

impl ResolutionState {
    pub fn new(app: &AppState) -> Self {
        let base = app.base();
        Self {
            width_text: base.width.to_string(),
            height_text: base.height.to_string(),
        }
    }

    fn sync(&mut self, app: &AppState) {
        let window = app.window();
        self.width_text = window.width.to_string();
        self.height_text = window.height.to_string();
    }
}

// Unparsable text becomes NaN so the engine keeps the current value
fn parse_dimension(text: &str) -> f64 {
    text.trim().parse().unwrap_or(f64::NAN)
}

pub fn ui(ui: &mut egui::Ui, app: &mut AppState, state: &mut ResolutionState) {
    ui.group(|ui| {
        ui.label(egui::RichText::new("Resolution").strong());
        ui.add_space(ITEM_SPACING);

        let current = preset_for(app.base().window_size());
        egui::ComboBox::from_id_salt("resolution_preset")
            .selected_text(current)
            .show_ui(ui, |ui| {
                for (label, width, height) in PRESETS {
                    if ui.selectable_label(current == label, label).clicked() {
                        app.apply_user_resolution(f64::from(width), f64::from(height));
                        state.sync(app);
                    }
                }
            });

        ui.horizontal(|ui| {
            ui.label("W:");
            ui.add(egui::TextEdit::singleline(&mut state.width_text).desired_width(FIELD_WIDTH));
            ui.label("H:");
            ui.add(egui::TextEdit::singleline(&mut state.height_text).desired_width(FIELD_WIDTH));
            if ui.button("Apply").clicked() {
                app.apply_user_resolution(
                    parse_dimension(&state.width_text),
                    parse_dimension(&state.height_text),
                );
                state.sync(app);
            }
        });

        ui.add_space(ITEM_SPACING);
        ui.horizontal(|ui| {
            ui.label("GUI Scale:");
            let mut scale = app.gui_scale_setting();
            let drag = egui::DragValue::new(&mut scale).range(0..=16);
            if ui.add(drag).on_hover_text("0 = auto").changed() {
                app.set_gui_scale(scale);
            }
            let (w, h) = app.scaled_gui_size();
            ui.label(format!("effective {} ({w}x{h})", app.effective_gui_scale()));
        });
    });

    ui.add_space(SECTION_SPACING);

    ui.group(|ui| {
        ui.label(egui::RichText::new("View").strong());
        ui.add_space(ITEM_SPACING);
        ui.horizontal(|ui| {
            for (action, variant) in [
                (Action::Thin, DisplayVariant::Thin),
                (Action::Wide, DisplayVariant::Wide),
                (Action::Tall, DisplayVariant::Tall),
            ] {
                if ui.selectable_label(app.variant() == variant, action.label()).clicked() {
                    app.run_action(action);
                    state.sync(app);
                }
            }
        });

        ui.add_space(ITEM_SPACING);
        ui.horizontal(|ui| {
            ui.label(format!("Zoom: {:.0}%", app.zoom_pan().zoom() * 100.0));
            let (can_out, can_in, can_reset) = {
                let z = app.zoom_pan();
                (z.can_zoom_out(), z.can_zoom_in(), z.can_reset())
            };
            if ui.add_enabled(can_out, egui::Button::new("\u{2212}")).clicked() {
                app.zoom_out();
            }
            if ui.add_enabled(can_in, egui::Button::new("+")).clicked() {
                app.zoom_in();
            }
            if ui.add_enabled(can_reset, egui::Button::new("Reset")).clicked() {
                app.zoom_reset();
            }
        });
    });
}
