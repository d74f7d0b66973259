//! Action keybind rows with press-a-key capture

use eframe::egui;

use crate::app::AppState;
use crate::editor::constants::*;
use crate::keycodes::{export_key_name, format_keybind_label};
use crate::settings::Action;

pub fn ui(ui: &mut egui::Ui, app: &mut AppState) {
    ui.group(|ui| {
        ui.label(egui::RichText::new("Keybinds").strong());
        ui.add_space(ITEM_SPACING);

        egui::Grid::new("keybind_grid")
            .num_columns(3)
            .spacing([ITEM_SPACING, ITEM_SPACING])
            .show(ui, |ui| {
                for action in Action::ALL {
                    let code = app.keybinds().get(action).to_string();
                    ui.label(action.label());

                    let capturing = app.keybind_capture() == Some(action);
                    let text = if capturing {
                        "Press a key (Esc cancels)".to_string()
                    } else {
                        format_keybind_label(&code)
                    };
                    let mut button = ui.selectable_label(capturing, text);
                    if !code.is_empty() && export_key_name(&code).is_none() {
                        button = button.on_hover_text(format!("{code} has no compositor key name and is left out of the export"));
                    }
                    if button.clicked() {
                        app.begin_keybind_capture(action);
                    }

                    if ui.add_enabled(!code.is_empty(), egui::Button::new("Clear")).clicked() {
                        app.set_keybind(action, "");
                    }
                    ui.end_row();
                }
            });
    });
}
