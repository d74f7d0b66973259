//! GPU textures for the canvas backdrop and keyed mirror overlays

use std::collections::HashMap;

use eframe::egui;
use tracing::debug;

use crate::app::AppState;
use crate::mirror::{Mirror, SourceRect};
use crate::pixels::{PixelImage, cover_rect};
use crate::types::{DisplayVariant, WindowSize};

use super::constants::MAX_OVERLAY_PIXELS;

/// UV rect of `rect` (window pixels) inside an image cover-fitted to `window`
pub fn source_uv(window: WindowSize, image: WindowSize, rect: SourceRect) -> egui::Rect {
    let (left, top, draw_w, draw_h) = cover_rect(window, image);
    let u = |x: f64| ((x - left) / draw_w.max(1.0)) as f32;
    let v = |y: f64| ((y - top) / draw_h.max(1.0)) as f32;
    egui::Rect::from_min_max(
        egui::pos2(u(f64::from(rect.x)), v(f64::from(rect.y))),
        egui::pos2(u(f64::from(rect.right())), v(f64::from(rect.bottom()))),
    )
}

/// Everything an overlay texture depends on
#[derive(Debug, Clone, PartialEq)]
struct OverlayKey {
    rect: SourceRect,
    keys: Vec<String>,
    window: WindowSize,
    variant: DisplayVariant,
    generation: u64,
}

#[derive(Default)]
pub struct TextureCache {
    main: Option<egui::TextureHandle>,
    tall: Option<egui::TextureHandle>,
    overlays: HashMap<String, (OverlayKey, egui::TextureHandle)>,
    /// Bumped whenever a background finishes loading
    generation: u64,
}

fn upload(ctx: &egui::Context, name: &str, image: &PixelImage) -> egui::TextureHandle {
    let size = [image.width() as usize, image.height() as usize];
    let color = egui::ColorImage::from_rgba_unmultiplied(size, image.rgba());
    ctx.load_texture(name, color, egui::TextureOptions::NEAREST)
}

impl TextureCache {
    /// Drop everything derived from the background images
    pub fn invalidate(&mut self) {
        self.main = None;
        self.tall = None;
        self.overlays.clear();
        self.generation += 1;
    }

    /// Texture of the active background, uploaded on first use
    pub fn backdrop(&mut self, ctx: &egui::Context, app: &AppState) -> Option<egui::TextureId> {
        let image = app.active_background().image()?;
        let (slot, name) = match app.variant() {
            DisplayVariant::Tall => (&mut self.tall, "background-tall"),
            _ => (&mut self.main, "background"),
        };
        let handle = slot.get_or_insert_with(|| upload(ctx, name, image));
        Some(handle.id())
    }

    /// Keyed overlay texture for mirror `index`; `None` when the mirror has no
    /// keys, is too large, or its pixels cannot be read
    pub fn overlay(
        &mut self,
        ctx: &egui::Context,
        app: &mut AppState,
        index: usize,
    ) -> Option<egui::TextureId> {
        let key = {
            let mirror: &Mirror = app.mirrors().get(index)?;
            if mirror.keys.is_empty() || mirror.rect.w.saturating_mul(mirror.rect.h) > MAX_OVERLAY_PIXELS {
                return None;
            }
            OverlayKey {
                rect: mirror.rect,
                keys: mirror.keys.iter().map(str::to_string).collect(),
                window: app.window(),
                variant: app.variant(),
                generation: self.generation,
            }
        };
        let id = app.mirrors()[index].id.clone();
        if let Some((cached, handle)) = self.overlays.get(&id) {
            if *cached == key {
                return Some(handle.id());
            }
        }

        let rgba = app.mirror_overlay(index)?;
        let size = [key.rect.w as usize, key.rect.h as usize];
        let color = egui::ColorImage::from_rgba_unmultiplied(size, &rgba);
        let handle = ctx.load_texture(format!("overlay-{id}"), color, egui::TextureOptions::NEAREST);
        debug!(mirror = %id, w = key.rect.w, h = key.rect.h, "Overlay texture rebuilt");
        let texture = handle.id();
        self.overlays.insert(id, (key, handle));
        Some(texture)
    }

    /// Forget overlays of mirrors that no longer exist
    pub fn retain_mirrors(&mut self, mirrors: &[Mirror]) {
        self.overlays
            .retain(|id, _| mirrors.iter().any(|m| &m.id == id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_uv_matching_aspect() {
        let window = WindowSize::new(1920, 1080);
        let image = WindowSize::new(960, 540);
        let uv = source_uv(window, image, SourceRect { x: 480, y: 270, w: 960, h: 540 });
        assert_eq!(uv.min, egui::pos2(0.25, 0.25));
        assert_eq!(uv.max, egui::pos2(0.75, 0.75));
    }

    #[test]
    fn test_source_uv_wider_image_is_cropped() {
        // 2:1 image over a 1:1 window: the image overflows left and right
        let window = WindowSize::new(100, 100);
        let image = WindowSize::new(200, 100);
        let uv = source_uv(window, image, SourceRect { x: 0, y: 0, w: 100, h: 100 });
        assert_eq!(uv.min, egui::pos2(0.25, 0.0));
        assert_eq!(uv.max, egui::pos2(0.75, 1.0));
    }
}
