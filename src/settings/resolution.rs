use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::constants::resolution::{
    DEFAULT_HEIGHT, DEFAULT_WIDTH, MAX_HEIGHT, MAX_WIDTH, MIN_HEIGHT, MIN_WIDTH, PRESETS,
};
use crate::constants::storage::BASE_RESOLUTION;
use crate::math::floor_clamp_u32;
use crate::storage::{Store, load_json, save_json};
use crate::types::WindowSize;
use crate::untrusted::{coerce_number, field};

/// The user's preset-variant resolution, restored when a variant toggles off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BaseResolution {
    pub width: u32,
    pub height: u32,
}

impl Default for BaseResolution {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl BaseResolution {
    /// Floor and clamp to the virtual window bounds.
    ///
    /// Non-finite input has no sensible nearest value and yields `None`.
    pub fn from_dimensions(width: f64, height: f64) -> Option<Self> {
        if !width.is_finite() || !height.is_finite() {
            return None;
        }
        Some(Self {
            width: floor_clamp_u32(width, MIN_WIDTH, MAX_WIDTH),
            height: floor_clamp_u32(height, MIN_HEIGHT, MAX_HEIGHT),
        })
    }

    pub fn normalize(raw: &Value) -> Self {
        if !raw.is_object() {
            return Self::default();
        }
        let width = coerce_number(field(raw, "width"));
        let height = coerce_number(field(raw, "height"));
        match (width, height) {
            (Some(w), Some(h)) => Self::from_dimensions(w, h).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    pub fn window_size(self) -> WindowSize {
        WindowSize::new(self.width, self.height)
    }

    pub fn load(store: &dyn Store) -> Self {
        let resolution = load_json(store, BASE_RESOLUTION)
            .map(|raw| Self::normalize(&raw))
            .unwrap_or_default();
        debug!(width = resolution.width, height = resolution.height, "Loaded base resolution");
        resolution
    }

    pub fn save(&self, store: &dyn Store) {
        save_json(store, BASE_RESOLUTION, self);
    }
}

/// Preset label matching `size`, or "Custom"
pub fn preset_for(size: WindowSize) -> &'static str {
    PRESETS
        .iter()
        .find(|(_, w, h)| *w == size.width && *h == size.height)
        .map(|(label, _, _)| *label)
        .unwrap_or("Custom")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_normalize_floors_and_clamps() {
        let r = BaseResolution::normalize(&json!({ "width": 1280.9, "height": "720" }));
        assert_eq!(r, BaseResolution { width: 1280, height: 720 });

        let r = BaseResolution::normalize(&json!({ "width": 10, "height": 99999 }));
        assert_eq!(r, BaseResolution { width: MIN_WIDTH, height: MAX_HEIGHT });
    }

    #[test]
    fn test_normalize_malformed_is_default() {
        for raw in [
            json!(null),
            json!([]),
            json!("1920x1080"),
            json!({}),
            json!({ "width": "wide", "height": 1080 }),
            json!({ "width": [1], "height": 1080 }),
        ] {
            assert_eq!(BaseResolution::normalize(&raw), BaseResolution::default(), "{raw}");
        }
    }

    #[test]
    fn test_normalize_idempotent() {
        for raw in [
            json!(null),
            json!({ "width": -1, "height": 1e9 }),
            json!({ "width": 2560.5, "height": 1440 }),
            json!({ "width": true, "height": null }),
        ] {
            let once = BaseResolution::normalize(&raw);
            let twice = BaseResolution::normalize(&serde_json::to_value(once).unwrap());
            assert_eq!(once, twice, "{raw}");
        }
    }

    #[test]
    fn test_preset_for() {
        assert_eq!(preset_for(WindowSize::new(1920, 1080)), "1920 x 1080");
        assert_eq!(preset_for(WindowSize::new(854, 480)), "854 x 480");
        assert_eq!(preset_for(WindowSize::new(1920, 1081)), "Custom");
    }

    #[test]
    fn test_load_save_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(BaseResolution::load(&store), BaseResolution::default());
        BaseResolution { width: 2560, height: 1440 }.save(&store);
        assert_eq!(
            BaseResolution::load(&store),
            BaseResolution { width: 2560, height: 1440 }
        );
    }
}
