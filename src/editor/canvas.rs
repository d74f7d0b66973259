//! Central viewport: paints the virtual window and forwards raw input to
//! [`AppState`]. All geometry comes from the engine.

use eframe::egui;

use crate::app::{AppState, PointerButton};
use crate::constants::canvas::{BACKGROUND_DARKEN, FILL_RGB};
use crate::eye_overlay::OverlayStrip;
use crate::interaction::Interaction;
use crate::mirror::SourceRect;
use crate::pixels::PixelSource;
use crate::types::ScreenBox;
use crate::viewport::WheelInput;

use super::constants::*;
use super::keymap;
use super::textures::{TextureCache, source_uv};

fn to_rect(origin: egui::Pos2, b: &ScreenBox) -> egui::Rect {
    egui::Rect::from_min_size(
        origin + egui::vec2(b.left as f32, b.top as f32),
        egui::vec2(b.width as f32, b.height as f32),
    )
}

fn fill_color() -> egui::Color32 {
    egui::Color32::from_rgb(FILL_RGB[0], FILL_RGB[1], FILL_RGB[2])
}

/// Translucent black laid over painted background images. This is display
/// only; colour picking composes pixels through `pixels::CanvasPixels`.
fn darken_fill() -> egui::Color32 {
    egui::Color32::from_black_alpha((BACKGROUND_DARKEN * 255.0).round() as u8)
}

fn pointer_button(button: egui::PointerButton) -> PointerButton {
    match button {
        egui::PointerButton::Middle => PointerButton::Middle,
        egui::PointerButton::Primary => PointerButton::Primary,
        _ => PointerButton::Secondary,
    }
}

/// Forward this frame's raw events to the engine. Pointer presses only count
/// inside the viewport; releases always do so drags end cleanly.
fn forward_input(ui: &egui::Ui, rect: egui::Rect, app: &mut AppState) {
    let text_focus = ui.ctx().wants_keyboard_input();
    let local = |pos: egui::Pos2| ((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64);
    let events = ui.input(|i| i.events.clone());
    let mut current = ui.input(|i| keymap::modifiers(i.modifiers));

    for event in events {
        match event {
            egui::Event::PointerMoved(pos) => {
                if rect.contains(pos) || !app.interaction().is_idle() {
                    app.pointer_move(local(pos), current);
                }
            }
            egui::Event::PointerButton {
                pos,
                button,
                pressed,
                modifiers,
                ..
            } => {
                current = keymap::modifiers(modifiers);
                let button = pointer_button(button);
                if pressed {
                    if rect.contains(pos) {
                        app.pointer_down(button, local(pos));
                    }
                } else {
                    app.pointer_up(button, local(pos));
                }
            }
            egui::Event::PointerGone => app.pointer_left(),
            egui::Event::MouseWheel {
                unit,
                delta,
                modifiers,
                ..
            } => {
                let Some(pos) = ui.input(|i| i.pointer.hover_pos()) else {
                    continue;
                };
                if !rect.contains(pos) {
                    continue;
                }
                // egui deltas are positive when scrolling up
                app.wheel(WheelInput {
                    delta_x: -f64::from(delta.x),
                    delta_y: -f64::from(delta.y),
                    mode: keymap::wheel_mode(unit),
                    ctrl: modifiers.ctrl || modifiers.mac_cmd,
                    shift: modifiers.shift,
                    pointer: local(pos),
                });
            }
            egui::Event::Key {
                key,
                physical_key,
                pressed: true,
                repeat: false,
                modifiers,
                ..
            } => {
                current = keymap::modifiers(modifiers);
                if let Some(code) = keymap::key_code(physical_key.unwrap_or(key)) {
                    app.key_down(&code, current, text_focus);
                }
            }
            _ => {}
        }
    }
}

/// Paint the eye-measure strip over the projector box at `target`
fn paint_strip(painter: &egui::Painter, strip: &OverlayStrip, target: egui::Rect) {
    for rect in strip.rects() {
        let [r, g, b] = rect.rgb;
        let alpha = (rect.alpha * 255.0).round() as u8;
        let cell = egui::Rect::from_min_size(
            target.min + egui::vec2(rect.x as f32, rect.y as f32),
            egui::vec2(rect.w as f32, rect.h as f32),
        )
        .intersect(target);
        if cell.is_positive() {
            painter.rect_filled(cell, 0.0, egui::Color32::from_rgba_unmultiplied(r, g, b, alpha));
        }
    }
}

/// Paint the source `rect` of the active backdrop into `target`
fn paint_source(
    painter: &egui::Painter,
    app: &AppState,
    backdrop: Option<egui::TextureId>,
    rect: SourceRect,
    target: egui::Rect,
) {
    match (backdrop, app.active_background().image()) {
        (Some(texture), Some(image)) => {
            let uv = source_uv(app.window(), image.dimensions(), rect);
            painter.image(texture, target, uv, egui::Color32::WHITE);
            painter.rect_filled(target, 0.0, darken_fill());
        }
        _ if app.active_background().is_loading() => {
            painter.rect_filled(target, 0.0, PENDING_FILL);
        }
        _ => {
            painter.rect_filled(target, 0.0, fill_color());
        }
    }
}

fn active_mirror_id(interaction: &Interaction) -> Option<&str> {
    match interaction {
        Interaction::Moving(drag) => Some(&drag.mirror_id),
        Interaction::Resizing(drag) => Some(&drag.mirror_id),
        Interaction::ColorPicking { mirror_id } => Some(mirror_id),
        _ => None,
    }
}

pub fn show(ui: &mut egui::Ui, app: &mut AppState, textures: &mut TextureCache) {
    let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
    app.set_viewport(
        f64::from(rect.width()),
        f64::from(rect.height()),
        f64::from(ui.ctx().pixels_per_point()),
    );
    forward_input(ui, rect, app);

    if response.hovered() {
        let cursor = match app.interaction() {
            Interaction::Creating(_) | Interaction::ColorPicking { .. } => egui::CursorIcon::Crosshair,
            Interaction::Moving(_) | Interaction::Panning(_) => egui::CursorIcon::Grabbing,
            Interaction::Resizing(_) => egui::CursorIcon::ResizeNwSe,
            Interaction::Idle => egui::CursorIcon::Default,
        };
        ui.ctx().set_cursor_icon(cursor);
    }

    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, VIEWPORT_BACKGROUND);

    let ctx = ui.ctx().clone();
    let backdrop = textures.backdrop(&ctx, app);
    let window = app.window();
    let canvas = to_rect(rect.min, &app.canvas());
    let whole = SourceRect {
        x: 0,
        y: 0,
        w: window.width,
        h: window.height,
    };
    paint_source(&painter, app, backdrop, whole, canvas);

    textures.retain_mirrors(app.mirrors());
    let active = active_mirror_id(app.interaction()).map(str::to_string);
    for mirror_box in app.mirror_boxes() {
        let target = to_rect(rect.min, &mirror_box.screen);
        match textures.overlay(&ctx, app, mirror_box.index) {
            Some(texture) => {
                let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                painter.image(texture, target, uv, egui::Color32::WHITE);
            }
            None => {
                let source = app.mirrors()[mirror_box.index].rect;
                paint_source(&painter, app, backdrop, source, target);
            }
        }
        let is_active = active.as_deref() == Some(app.mirrors()[mirror_box.index].id.as_str());
        let color = if is_active { MIRROR_BORDER_ACTIVE } else { MIRROR_BORDER };
        painter.rect_stroke(target, 0.0, egui::Stroke::new(1.0, color), egui::StrokeKind::Outside);
    }

    if let (Some(projector), Some(source)) = (app.layout().projector, app.projector_source()) {
        let target = to_rect(rect.min, &projector);
        paint_source(&painter, app, backdrop, source, target);
        if let Some(strip) = app.projector_strip() {
            paint_strip(&painter, &strip, target);
        }
        painter.rect_stroke(
            target,
            0.0,
            egui::Stroke::new(1.0, PROJECTOR_BORDER),
            egui::StrokeKind::Outside,
        );
    }

    if let Some(selection) = app.selection_box() {
        let target = to_rect(rect.min, &selection);
        painter.rect_filled(target, 0.0, SELECTION_FILL);
        painter.rect_stroke(
            target,
            0.0,
            egui::Stroke::new(1.0, SELECTION_STROKE),
            egui::StrokeKind::Inside,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_darken_is_a_translucent_black_fill() {
        let fill = darken_fill();
        assert_eq!(fill, egui::Color32::from_black_alpha(36));
        assert_eq!(fill.a(), 36);
        assert_eq!((fill.r(), fill.g(), fill.b()), (0, 0, 0));
    }
}
