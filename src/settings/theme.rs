use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::{alpha_of, normalize_hex8, with_alpha};
use crate::constants::storage::THEME_SETTINGS;
use crate::math::{clamp, round_half_up};
use crate::storage::{Store, load_json, save_json};
use crate::untrusted::{coerce_number, field, string};

const DEFAULT_BACKGROUND: &str = "#000000ff";

/// Accepted Ninjabrain Bot anchor positions; "" leaves it unset
pub const ANCHOR_POSITIONS: [&str; 8] = [
    "",
    "topleft",
    "top",
    "topright",
    "left",
    "right",
    "bottomleft",
    "bottomright",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundType {
    Image,
    #[default]
    Color,
}

impl BackgroundType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Color => "color",
        }
    }
}

/// Compositor theme fields carried into the export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeSettings {
    pub background_type: BackgroundType,
    /// `#rrggbbaa`, alpha always agrees with `background_alpha`
    pub background: String,
    pub background_alpha: f64,
    pub background_png: String,
    pub cursor_theme: String,
    pub cursor_icon: String,
    pub cursor_size: u32,
    pub ninb_anchor_type: String,
    pub ninb_anchor_position: String,
    pub ninb_anchor_x: String,
    pub ninb_anchor_y: String,
    pub ninb_opacity: f64,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            background_type: BackgroundType::Color,
            background: DEFAULT_BACKGROUND.to_string(),
            background_alpha: 1.0,
            background_png: String::new(),
            cursor_theme: String::new(),
            cursor_icon: String::new(),
            cursor_size: 0,
            ninb_anchor_type: "string".to_string(),
            ninb_anchor_position: String::new(),
            ninb_anchor_x: String::new(),
            ninb_anchor_y: String::new(),
            ninb_opacity: 1.0,
        }
    }
}

// Integer string, or "" for blank and non-numeric input
fn anchor_offset(raw: &Value, key: &str) -> String {
    match field(raw, key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) if s.is_empty() => String::new(),
        value => match coerce_number(value) {
            // Adding 0.0 turns -0 into 0
            Some(n) => format!("{:.0}", round_half_up(n) + 0.0),
            None => String::new(),
        },
    }
}

impl ThemeSettings {
    pub fn normalize(raw: &Value) -> Self {
        let png = string(raw, "background_png");
        let background_type = match string(raw, "background_type") {
            Some("image") => BackgroundType::Image,
            Some("color") => BackgroundType::Color,
            _ if png.is_some_and(|p| !p.trim().is_empty()) => BackgroundType::Image,
            _ => BackgroundType::Color,
        };

        let hex = normalize_hex8(string(raw, "background"), DEFAULT_BACKGROUND);
        let background_alpha = match coerce_number(field(raw, "background_alpha")) {
            Some(alpha) => clamp(alpha, 0.0, 1.0),
            None => alpha_of(&hex, DEFAULT_BACKGROUND),
        };
        let background = with_alpha(&hex, background_alpha, DEFAULT_BACKGROUND);

        let position = string(raw, "ninb_anchor_position").unwrap_or_default();
        let ninb_anchor_position = if ANCHOR_POSITIONS.contains(&position) {
            position.to_string()
        } else {
            String::new()
        };

        Self {
            background_type,
            background,
            background_alpha,
            background_png: match background_type {
                BackgroundType::Image => png.unwrap_or_default().to_string(),
                BackgroundType::Color => String::new(),
            },
            cursor_theme: string(raw, "cursor_theme").unwrap_or_default().to_string(),
            ninb_anchor_position,
            ninb_anchor_x: anchor_offset(raw, "ninb_anchor_x"),
            ninb_anchor_y: anchor_offset(raw, "ninb_anchor_y"),
            ninb_opacity: coerce_number(field(raw, "ninb_opacity"))
                .map(|o| clamp(o, 0.0, 1.0))
                .unwrap_or(1.0),
            ..Self::default()
        }
    }

    /// `background` without its alpha byte, as shown in a colour field
    pub fn background_rgb(&self) -> &str {
        self.background.get(..7).unwrap_or(DEFAULT_BACKGROUND)
    }

    pub fn load(store: &dyn Store) -> Self {
        load_json(store, THEME_SETTINGS)
            .map(|raw| Self::normalize(&raw))
            .unwrap_or_default()
    }

    pub fn save(&self, store: &dyn Store) {
        save_json(store, THEME_SETTINGS, self);
    }
}
