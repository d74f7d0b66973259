//! Mirror list: creation, source-rect editing, visibility and colour keys

use std::collections::HashMap;

use eframe::egui;

use crate::app::AppState;
use crate::constants::mirror::MAX_COLOR_KEYS;
use crate::editor::constants::*;
use crate::types::Visibility;

/// Deferred edit collected while the list is drawn
enum MirrorEdit {
    Rect { id: String, x: u32, y: u32, w: u32, h: u32 },
    Visibility { id: String, visible_in: Visibility },
    Center(String),
    Remove(String),
    AddKey { id: String, key: String },
    RemoveKey { id: String, key: String },
    ClearKeys(String),
    PickColor(String),
}

pub struct MirrorListState {
    new_rect: [String; 4],
    /// Colour key text per mirror id
    key_inputs: HashMap<String, String>,
}

impl MirrorListState {
    pub fn new() -> Self {
        Self {
            new_rect: [
                "0".to_string(),
                "0".to_string(),
                "320".to_string(),
                "180".to_string(),
            ],
            key_inputs: HashMap::new(),
        }
    }
}

impl Default for MirrorListState {
    fn default() -> Self {
        Self::new()
    }
}

fn apply(app: &mut AppState, state: &mut MirrorListState, edit: MirrorEdit) {
    match edit {
        MirrorEdit::Rect { id, x, y, w, h } => {
            app.set_mirror_rect(&id, f64::from(x), f64::from(y), f64::from(w), f64::from(h));
        }
        MirrorEdit::Visibility { id, visible_in } => {
            app.set_mirror_visibility(&id, visible_in);
        }
        MirrorEdit::Center(id) => {
            app.center_mirror(&id);
        }
        MirrorEdit::Remove(id) => {
            app.remove_mirror(&id);
            state.key_inputs.remove(&id);
        }
        MirrorEdit::AddKey { id, key } => {
            if app.add_mirror_key(&id, &key) {
                state.key_inputs.remove(&id);
            }
        }
        MirrorEdit::RemoveKey { id, key } => {
            app.remove_mirror_key(&id, &key);
        }
        MirrorEdit::ClearKeys(id) => {
            app.clear_mirror_keys(&id);
        }
        MirrorEdit::PickColor(id) => {
            if app.interaction().color_pick_target() == Some(id.as_str()) {
                app.cancel_interaction();
            } else {
                app.start_color_pick(&id);
            }
        }
    }
}

pub fn ui(ui: &mut egui::Ui, app: &mut AppState, state: &mut MirrorListState) {
    let mut edits = Vec::new();

    ui.group(|ui| {
        ui.label(egui::RichText::new("Mirrors").strong());
        ui.add_space(ITEM_SPACING);

        ui.horizontal(|ui| {
            let picking = app.interaction().is_creating();
            if ui.selectable_label(picking, "Pick area").clicked() {
                app.toggle_selection_mode();
            }
            if ui
                .add_enabled(!app.mirrors().is_empty(), egui::Button::new("Clear all"))
                .clicked()
            {
                app.clear_mirrors();
                state.key_inputs.clear();
            }
        });
        ui.label(app.interaction().label());

        ui.horizontal(|ui| {
            for (label, text) in ["X", "Y", "W", "H"].iter().zip(state.new_rect.iter_mut()) {
                ui.label(*label);
                ui.add(egui::TextEdit::singleline(text).desired_width(FIELD_WIDTH * 0.7));
            }
            if ui.button("Add").clicked() {
                let [x, y, w, h] = state
                    .new_rect
                    .each_ref()
                    .map(|t| t.trim().parse::<f64>().unwrap_or(f64::NAN));
                app.add_mirror_from_fields(x, y, w, h);
            }
        });

        let variant = app.variant();
        let pick_target = app.interaction().color_pick_target().map(str::to_string);
        for (index, mirror) in app.mirrors().iter().enumerate() {
            ui.add_space(ITEM_SPACING);
            ui.separator();
            let shown = mirror.visible_in_variant(variant);
            let title = format!("#{} {}", index + 1, mirror.id);
            ui.label(if shown {
                egui::RichText::new(title).strong()
            } else {
                egui::RichText::new(format!("{title} (hidden in this view)")).weak()
            });

            ui.horizontal(|ui| {
                let mut rect = [mirror.rect.x, mirror.rect.y, mirror.rect.w, mirror.rect.h];
                let mut changed = false;
                for (label, value) in ["x", "y", "w", "h"].iter().zip(rect.iter_mut()) {
                    ui.label(*label);
                    changed |= ui.add(egui::DragValue::new(value)).changed();
                }
                if changed {
                    let [x, y, w, h] = rect;
                    edits.push(MirrorEdit::Rect { id: mirror.id.clone(), x, y, w, h });
                }
            });

            ui.horizontal(|ui| {
                let mut visible_in = mirror.visible_in;
                egui::ComboBox::from_id_salt(("mirror_visibility", &mirror.id))
                    .selected_text(visible_in.as_str())
                    .show_ui(ui, |ui| {
                        for option in Visibility::ALL {
                            ui.selectable_value(&mut visible_in, option, option.as_str());
                        }
                    });
                if visible_in != mirror.visible_in {
                    edits.push(MirrorEdit::Visibility { id: mirror.id.clone(), visible_in });
                }
                if ui.button("Center").clicked() {
                    edits.push(MirrorEdit::Center(mirror.id.clone()));
                }
                if ui.button("Remove").clicked() {
                    edits.push(MirrorEdit::Remove(mirror.id.clone()));
                }
            });

            ui.horizontal_wrapped(|ui| {
                ui.label(format!("Keys {}/{MAX_COLOR_KEYS}", mirror.keys.len()));
                for key in mirror.keys.iter() {
                    if ui.button(format!("{key} \u{00D7}")).clicked() {
                        edits.push(MirrorEdit::RemoveKey { id: mirror.id.clone(), key: key.to_string() });
                    }
                }
            });

            ui.horizontal(|ui| {
                let input = state.key_inputs.entry(mirror.id.clone()).or_default();
                let response = ui.add(
                    egui::TextEdit::singleline(input)
                        .hint_text("#rrggbb")
                        .desired_width(FIELD_WIDTH * 1.2),
                );
                let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if (ui.button("Add key").clicked() || submitted) && !input.trim().is_empty() {
                    edits.push(MirrorEdit::AddKey { id: mirror.id.clone(), key: input.clone() });
                }
                let picking = pick_target.as_deref() == Some(mirror.id.as_str());
                if ui.selectable_label(picking, "Pick color").clicked() {
                    edits.push(MirrorEdit::PickColor(mirror.id.clone()));
                }
                if ui.add_enabled(!mirror.keys.is_empty(), egui::Button::new("Clear keys")).clicked() {
                    edits.push(MirrorEdit::ClearKeys(mirror.id.clone()));
                }
            });
        }
    });

    for edit in edits {
        apply(app, state, edit);
    }
}
