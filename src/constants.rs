//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// Virtual window resolution limits and presets
pub mod resolution {
    /// Resolution used when nothing has been stored yet
    pub const DEFAULT_WIDTH: u32 = 1920;
    pub const DEFAULT_HEIGHT: u32 = 1080;

    pub const MIN_WIDTH: u32 = 300;
    pub const MAX_WIDTH: u32 = 7680;
    pub const MIN_HEIGHT: u32 = 240;
    pub const MAX_HEIGHT: u32 = 16384;

    /// Height forced by the wide variant
    pub const WIDE_HEIGHT: u32 = 300;

    /// Width forced by the thin variant
    pub const THIN_WIDTH: u32 = 350;

    /// Fixed dimensions of the tall variant
    pub const TALL_WIDTH: u32 = 384;
    pub const TALL_HEIGHT: u32 = 16384;

    /// Selectable presets (label, width, height)
    pub const PRESETS: [(&str, u32, u32); 9] = [
        ("854 x 480", 854, 480),
        ("960 x 540", 960, 540),
        ("1280 x 720", 1280, 720),
        ("1366 x 768", 1366, 768),
        ("1600 x 900", 1600, 900),
        ("1920 x 1080", 1920, 1080),
        ("2560 x 1440", 2560, 1440),
        ("3440 x 1440", 3440, 1440),
        ("3840 x 2160", 3840, 2160),
    ];
}

/// GUI scale search constants
pub mod gui_scale {
    /// Smallest scaled width the auto search accepts
    pub const MIN_SCALED_WIDTH: f64 = 320.0;

    /// Smallest scaled height the auto search accepts
    pub const MIN_SCALED_HEIGHT: f64 = 240.0;
}

/// Screen zoom and pan constants
pub mod zoom {
    pub const MIN: f64 = 1.0;
    pub const MAX: f64 = 8.0;
    pub const STEP: f64 = 0.25;

    /// Tolerance used when comparing zoom levels
    pub const EPSILON: f64 = 0.001;

    /// Pan slack below this many CSS pixels counts as "no slack"
    pub const MIN_PAN_SLACK: f64 = 0.5;

    /// Wheel delta multipliers for line and page delta modes
    pub const WHEEL_LINE_SCALE: f64 = 24.0;
    pub const WHEEL_PAGE_SCALE: f64 = 120.0;
}

/// Mirror placement and colour key limits
pub mod mirror {
    /// Placement position is clamped to +/- this many percent
    pub const POSITION_LIMIT: f64 = 5000.0;

    /// Placement size upper bound in percent
    pub const SIZE_LIMIT: f64 = 5000.0;

    /// Placement size lower bound in percent
    pub const MIN_SIZE: f64 = 0.5;

    /// Diagonal stagger (percent) applied per creation index
    pub const STAGGER_STEP: f64 = 2.5;

    pub const MAX_COLOR_KEYS: usize = 10;

    /// Per-channel tolerance the external keying uses when matching a key colour
    pub const KEY_TOLERANCE: u8 = 4;

    /// Width of the resize grab band around a mirror box, in CSS pixels
    pub const HANDLE_GRAB_PX: f64 = 6.0;
}

/// Tall projector ("eye overlay") geometry
pub mod projector {
    /// Projector source size in window pixels, also the minimum on-screen width
    pub const SOURCE_WIDTH: u32 = 60;
    pub const SOURCE_HEIGHT: u32 = 580;

    /// Target projector height as a fraction of the displayed window height
    pub const HEIGHT_RATIO: f64 = 0.37;

    /// Projector width / height
    pub const ASPECT: f64 = 1.75;

    /// Horizontal gap between projector and main canvas, in CSS pixels
    pub const GAP_PX: f64 = 10.0;
}

/// Eye-measure overlay strip drawn over the tall projector
pub mod eye_overlay {
    /// Strip cells are this fraction of the overlay width (1/60)
    pub const CELL_COLUMNS: f64 = 60.0;

    /// Centre line width as a fraction of the overlay width
    pub const CENTER_LINE_RATIO: f64 = 0.003125;

    pub const CENTER_LINE_RGB: [u8; 3] = [0xe8, 0xe8, 0xe8];
}

/// Rendered canvas backdrop
pub mod canvas {
    /// Flat fill used when there is no background image
    pub const FILL_RGB: [u8; 3] = [0x2b, 0x31, 0x3c];

    /// Black overlay drawn over a background image to keep debug text readable
    pub const BACKGROUND_DARKEN: f64 = 0.14;
}

/// Persisted storage keys, one per settings group
pub mod storage {
    pub const MIRRORS: &str = "f3pie.mirrors.v1";
    pub const BASE_RESOLUTION: &str = "f3pie.baseResolution.v1";
    pub const ACTION_KEYBINDS: &str = "f3pie.actionKeybinds.v1";
    pub const TALL_OVERLAY: &str = "f3pie.tallOverlay.v1";
    pub const THEME_SETTINGS: &str = "f3pie.themeSettings.v1";
    pub const WINDOW_SETTINGS: &str = "f3pie.windowSettings.v1";
}

/// Filesystem locations
pub mod paths {
    /// Directory under the user config dir holding the storage blobs
    pub const APP_DIR: &str = "f3pie-preview";

    /// File name used for exported configs
    pub const EXPORT_FILENAME: &str = "waywall-config.json";

    /// Background images looked up in the state directory when no path is given
    pub const DEFAULT_BACKGROUND: &str = "background.png";
    pub const DEFAULT_TALL_BACKGROUND: &str = "tall.png";
}
