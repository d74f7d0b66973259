//! Shared value types for the window, display variants and mirrors

use serde::{Deserialize, Serialize};

use crate::constants::resolution::{TALL_HEIGHT, TALL_WIDTH, THIN_WIDTH, WIDE_HEIGHT};

/// Virtual window (or any pixel surface) size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl WindowSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }
}

/// Which window-size preset is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayVariant {
    #[default]
    Preset,
    Wide,
    Thin,
    Tall,
}

impl DisplayVariant {
    pub const ALL: [DisplayVariant; 4] = [Self::Preset, Self::Thin, Self::Wide, Self::Tall];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Preset => "preset",
            Self::Wide => "wide",
            Self::Thin => "thin",
            Self::Tall => "tall",
        }
    }

    /// Window dimensions of this variant for a given base resolution
    pub fn window_for(self, base: WindowSize) -> WindowSize {
        match self {
            Self::Preset => base,
            Self::Wide => WindowSize::new(base.width, WIDE_HEIGHT),
            Self::Thin => WindowSize::new(THIN_WIDTH, base.height),
            Self::Tall => WindowSize::new(TALL_WIDTH, TALL_HEIGHT),
        }
    }

    /// Crop mode the variant is shown with; only the tall strip is cropped
    pub fn crop_mode(self) -> CropMode {
        match self {
            Self::Tall => CropMode::Crop,
            _ => CropMode::Contain,
        }
    }

    /// Visibility a mirror created while this variant is active receives
    pub fn visibility_for_new_mirror(self) -> Visibility {
        match self {
            Self::Preset => Visibility::All,
            Self::Wide => Visibility::Wide,
            Self::Thin => Visibility::Thin,
            Self::Tall => Visibility::Tall,
        }
    }
}

/// How the virtual window is fitted into the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CropMode {
    /// Letterbox, aspect preserved
    #[default]
    Contain,
    /// Fill, overflow is clipped and can be panned
    Crop,
}

/// Display variants a mirror is shown in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    All,
    Wide,
    Thin,
    Tall,
}

impl Visibility {
    pub const ALL: [Visibility; 4] = [Self::All, Self::Wide, Self::Thin, Self::Tall];

    /// Anything other than `wide`/`thin`/`tall` collapses to `All`
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("wide") => Self::Wide,
            Some("thin") => Self::Thin,
            Some("tall") => Self::Tall,
            _ => Self::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Wide => "wide",
            Self::Thin => "thin",
            Self::Tall => "tall",
        }
    }

    pub fn shows_in(self, variant: DisplayVariant) -> bool {
        match self {
            Self::All => true,
            Self::Wide => variant == DisplayVariant::Wide,
            Self::Thin => variant == DisplayVariant::Thin,
            Self::Tall => variant == DisplayVariant::Tall,
        }
    }
}

/// Axis-aligned box in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenBox {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_parse_collapses_unknown() {
        assert_eq!(Visibility::parse(Some("wide")), Visibility::Wide);
        assert_eq!(Visibility::parse(Some("tall")), Visibility::Tall);
        assert_eq!(Visibility::parse(Some("all")), Visibility::All);
        assert_eq!(Visibility::parse(Some("preset")), Visibility::All);
        assert_eq!(Visibility::parse(Some("WIDE")), Visibility::All);
        assert_eq!(Visibility::parse(None), Visibility::All);
    }

    #[test]
    fn test_visibility_shows_in() {
        assert!(Visibility::All.shows_in(DisplayVariant::Preset));
        assert!(Visibility::Tall.shows_in(DisplayVariant::Tall));
        assert!(!Visibility::Tall.shows_in(DisplayVariant::Wide));
        assert!(!Visibility::Wide.shows_in(DisplayVariant::Preset));
    }

    #[test]
    fn test_variant_windows() {
        let base = WindowSize::new(2560, 1440);
        assert_eq!(DisplayVariant::Preset.window_for(base), base);
        assert_eq!(DisplayVariant::Wide.window_for(base), WindowSize::new(2560, 300));
        assert_eq!(DisplayVariant::Thin.window_for(base), WindowSize::new(350, 1440));
        assert_eq!(DisplayVariant::Tall.window_for(base), WindowSize::new(384, 16384));
        assert_eq!(DisplayVariant::Preset.crop_mode(), CropMode::Contain);
        assert_eq!(DisplayVariant::Wide.crop_mode(), CropMode::Contain);
        assert_eq!(DisplayVariant::Tall.crop_mode(), CropMode::Crop);
    }

    #[test]
    fn test_new_mirror_visibility() {
        assert_eq!(DisplayVariant::Preset.visibility_for_new_mirror(), Visibility::All);
        assert_eq!(DisplayVariant::Thin.visibility_for_new_mirror(), Visibility::Thin);
    }

    #[test]
    fn test_screen_box_contains_edges() {
        let b = ScreenBox { left: 10.0, top: 20.0, width: 30.0, height: 40.0 };
        assert!(b.contains(10.0, 20.0));
        assert!(b.contains(40.0, 60.0));
        assert!(!b.contains(40.1, 30.0));
    }
}
