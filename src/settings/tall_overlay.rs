use serde::Serialize;
use serde_json::Value;

use crate::color::normalize_hex_color;
use crate::constants::storage::TALL_OVERLAY;
use crate::math::floor_clamp_u32;
use crate::storage::{Store, load_json, save_json};
use crate::types::WindowSize;
use crate::untrusted::{nonzero_number_or, string};

/// Rendering options for the eye-measurement overlay image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TallOverlaySettings {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub color_a: String,
    pub color_b: String,
    pub text_color: String,
    pub pixel_count: u32,
    pub pixel_height: u32,
    pub opacity_pixels: u32,
    pub opacity_text: u32,
    pub text_size: u32,
    pub font_style: String,
}

impl Default for TallOverlaySettings {
    fn default() -> Self {
        Self {
            canvas_width: 1920,
            canvas_height: 1080,
            color_a: "#ffb0c5".to_string(),
            color_b: "#99cdf0".to_string(),
            text_color: "#000000".to_string(),
            pixel_count: 9,
            pixel_height: 8,
            opacity_pixels: 100,
            opacity_text: 100,
            text_size: 40,
            font_style: "Inter-400".to_string(),
        }
    }
}

// Zero and unparsable values take the default
fn int(raw: &Value, key: &str, default: u32, min: u32, max: u32) -> u32 {
    floor_clamp_u32(nonzero_number_or(raw, key, f64::from(default)), min, max)
}

impl TallOverlaySettings {
    pub fn normalize(raw: &Value) -> Self {
        let d = Self::default();
        Self {
            canvas_width: int(raw, "canvasWidth", d.canvas_width, 1, 16384),
            canvas_height: int(raw, "canvasHeight", d.canvas_height, 1, 16384),
            color_a: normalize_hex_color(string(raw, "colorA"), &d.color_a),
            color_b: normalize_hex_color(string(raw, "colorB"), &d.color_b),
            text_color: normalize_hex_color(string(raw, "textColor"), &d.text_color),
            pixel_count: int(raw, "pixelCount", d.pixel_count, 1, 50),
            pixel_height: int(raw, "pixelHeight", d.pixel_height, 1, 50),
            opacity_pixels: int(raw, "opacityPixels", d.opacity_pixels, 0, 100),
            opacity_text: int(raw, "opacityText", d.opacity_text, 0, 100),
            text_size: int(raw, "textSize", d.text_size, 1, 200),
            font_style: match string(raw, "fontStyle") {
                Some(style) if !style.is_empty() => style.to_string(),
                _ => d.font_style,
            },
        }
    }

    /// The overlay is always rendered at the base resolution
    pub fn sync_canvas_to(&mut self, size: WindowSize) {
        self.canvas_width = size.width;
        self.canvas_height = size.height;
    }

    pub fn load(store: &dyn Store) -> Self {
        load_json(store, TALL_OVERLAY)
            .map(|raw| Self::normalize(&raw))
            .unwrap_or_default()
    }

    pub fn save(&self, store: &dyn Store) {
        save_json(store, TALL_OVERLAY, self);
    }
}
