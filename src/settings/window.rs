use serde::Serialize;
use serde_json::Value;

use crate::constants::resolution::{MAX_HEIGHT, MAX_WIDTH};
use crate::constants::storage::WINDOW_SETTINGS;
use crate::math::floor_clamp_u32;
use crate::storage::{Store, load_json, save_json};
use crate::untrusted::nonzero_number_or;

/// Fullscreen size handed to the compositor; 0 leaves it to the compositor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WindowSettings {
    pub fullscreen_width: u32,
    pub fullscreen_height: u32,
}

impl WindowSettings {
    pub fn normalize(raw: &Value) -> Self {
        Self {
            fullscreen_width: floor_clamp_u32(
                nonzero_number_or(raw, "fullscreen_width", 0.0),
                0,
                MAX_WIDTH,
            ),
            fullscreen_height: floor_clamp_u32(
                nonzero_number_or(raw, "fullscreen_height", 0.0),
                0,
                MAX_HEIGHT,
            ),
        }
    }

    pub fn load(store: &dyn Store) -> Self {
        load_json(store, WINDOW_SETTINGS)
            .map(|raw| Self::normalize(&raw))
            .unwrap_or_default()
    }

    pub fn save(&self, store: &dyn Store) {
        save_json(store, WINDOW_SETTINGS, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_values() {
        let w = WindowSettings::normalize(&json!({ "fullscreen_width": "2560.7", "fullscreen_height": -3 }));
        assert_eq!(w, WindowSettings { fullscreen_width: 2560, fullscreen_height: 0 });

        let w = WindowSettings::normalize(&json!({ "fullscreen_width": 1e9, "fullscreen_height": "x" }));
        assert_eq!(w, WindowSettings { fullscreen_width: MAX_WIDTH, fullscreen_height: 0 });
    }

    #[test]
    fn test_normalize_idempotent() {
        for raw in [
            json!(null),
            json!({}),
            json!({ "fullscreen_width": [], "fullscreen_height": 99999 }),
            json!({ "fullscreen_width": 1920, "fullscreen_height": 1080 }),
        ] {
            let once = WindowSettings::normalize(&raw);
            let twice = WindowSettings::normalize(&serde_json::to_value(once).unwrap());
            assert_eq!(once, twice, "{raw}");
        }
    }
}
