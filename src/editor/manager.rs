//! Editor window implemented with egui/eframe

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, anyhow};
use eframe::{CreationContext, NativeOptions, egui};
use tracing::{error, info};

use crate::app::AppState;
use crate::export::write_export;

use super::canvas;
use super::components::{keybind_settings, mirror_list, resolution_panel, settings_editor};
use super::constants::*;
use super::textures::TextureCache;

struct StatusMessage {
    text: String,
    color: egui::Color32,
}

struct EditorApp {
    app: AppState,
    textures: TextureCache,
    resolution: resolution_panel::ResolutionState,
    mirrors: mirror_list::MirrorListState,
    settings: settings_editor::SettingsEditorState,
    export_path: String,
    status_message: Option<StatusMessage>,
}

impl EditorApp {
    fn new(_cc: &CreationContext<'_>, app: AppState, export_path: PathBuf) -> Self {
        info!(export = %export_path.display(), "Initializing editor window");
        Self {
            resolution: resolution_panel::ResolutionState::new(&app),
            mirrors: mirror_list::MirrorListState::new(),
            settings: settings_editor::SettingsEditorState::new(&app),
            textures: TextureCache::default(),
            export_path: export_path.display().to_string(),
            status_message: None,
            app,
        }
    }

    fn export(&mut self) {
        let path = PathBuf::from(self.export_path.trim());
        let result = self.app.export_json().and_then(|json| write_export(&json, &path));
        self.status_message = Some(match result {
            Ok(()) => {
                info!(path = %path.display(), "Exported compositor config");
                StatusMessage {
                    text: format!("Exported to {}", path.display()),
                    color: STATUS_OK,
                }
            }
            Err(err) => {
                error!(path = %path.display(), error = ?err, "Export failed");
                StatusMessage {
                    text: format!("Export failed: {err:#}"),
                    color: STATUS_ERROR,
                }
            }
        });
    }

    /// Write the eye-measure overlay PNG next to the export file
    fn export_overlay(&mut self) {
        let export_path = PathBuf::from(self.export_path.trim());
        let dir = export_path.parent().map(PathBuf::from).unwrap_or_default();
        let path = dir.join(self.app.tall_overlay_filename());
        self.status_message = Some(match self.app.export_tall_overlay(&path) {
            Ok(()) => StatusMessage {
                text: format!("Overlay saved to {}", path.display()),
                color: STATUS_OK,
            },
            Err(err) => {
                error!(path = %path.display(), error = ?err, "Overlay export failed");
                StatusMessage {
                    text: format!("Overlay export failed: {err:#}"),
                    color: STATUS_ERROR,
                }
            }
        });
    }

    fn copy_export(&mut self, ctx: &egui::Context) {
        self.status_message = Some(match self.app.export_json() {
            Ok(json) => {
                ctx.copy_text(json);
                StatusMessage {
                    text: "Export JSON copied to clipboard".to_string(),
                    color: STATUS_OK,
                }
            }
            Err(err) => StatusMessage {
                text: format!("Export failed: {err:#}"),
                color: STATUS_ERROR,
            },
        });
    }

    fn export_ui(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(egui::RichText::new("Export").strong());
            ui.add_space(ITEM_SPACING);
            ui.horizontal(|ui| {
                ui.label("File:");
                ui.text_edit_singleline(&mut self.export_path);
            });
            ui.horizontal(|ui| {
                if ui.button("\u{1F4BE} Export").clicked() {
                    self.export();
                }
                if ui.button("Copy JSON").clicked() {
                    self.copy_export(ui.ctx());
                }
                if ui.button("Overlay PNG").clicked() {
                    self.export_overlay();
                }
            });
            if let Some(message) = &self.status_message {
                ui.colored_label(message.color, &message.text);
            }
        });
    }
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.app.poll_backgrounds() {
            self.textures.invalidate();
        }

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(PANEL_WIDTH)
            .min_width(PANEL_MIN_WIDTH)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.heading("F3 Pie Preview");
                    ui.add_space(SECTION_SPACING);
                    resolution_panel::ui(ui, &mut self.app, &mut self.resolution);
                    ui.add_space(SECTION_SPACING);
                    keybind_settings::ui(ui, &mut self.app);
                    ui.add_space(SECTION_SPACING);
                    mirror_list::ui(ui, &mut self.app, &mut self.mirrors);
                    ui.add_space(SECTION_SPACING);
                    settings_editor::ui(ui, &mut self.app, &mut self.settings);
                    ui.add_space(SECTION_SPACING);
                    self.export_ui(ui);
                });
            });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            let color = if self.app.keying_blocked() {
                STATUS_WARN
            } else {
                ui.visuals().text_color()
            };
            let status = ui.colored_label(color, self.app.status_text());
            if let Some(reason) = self.app.active_background().failure() {
                status.on_hover_text(format!("Background failed to load: {reason}"));
            }
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(VIEWPORT_BACKGROUND))
            .show(ctx, |ui| {
                canvas::show(ui, &mut self.app, &mut self.textures);
            });

        if self.app.active_background().is_loading() {
            ctx.request_repaint_after(Duration::from_millis(LOADING_REPAINT_MS));
        }
    }
}

pub fn run_editor(app: AppState, export_path: PathBuf) -> Result<()> {
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
            .with_min_inner_size([WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT])
            .with_title("F3 Pie Preview"),
        ..Default::default()
    };

    eframe::run_native(
        "F3 Pie Preview",
        options,
        Box::new(|cc| Ok(Box::new(EditorApp::new(cc, app, export_path)))),
    )
    .map_err(|err| anyhow!("Failed to launch editor window: {err}"))?;
    info!("Editor exiting");
    Ok(())
}
