//! Numeric helpers shared by the geometry code

use crate::constants::gui_scale::{MIN_SCALED_HEIGHT, MIN_SCALED_WIDTH};

/// Bound `value` to `[min, max]`.
///
/// Unlike `f64::clamp` this never panics: when `min > max` the lower bound wins,
/// which the layout code relies on (e.g. a projector that cannot shrink below
/// its minimum width even when the margin is narrower).
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// Floor then clamp into an unsigned range; non-finite input takes `min`
pub fn floor_clamp_u32(value: f64, min: u32, max: u32) -> u32 {
    if !value.is_finite() {
        return min;
    }
    clamp(value.floor(), f64::from(min), f64::from(max)) as u32
}

/// Round half towards positive infinity (`2.5 -> 3`, `-2.5 -> -2`)
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Effective device pixel ratio; anything at or below 1 (or not finite) is 1
pub fn effective_dpr(device_pixel_ratio: f64) -> f64 {
    if device_pixel_ratio.is_finite() && device_pixel_ratio > 1.0 {
        device_pixel_ratio
    } else {
        1.0
    }
}

/// Round a CSS pixel value to the nearest physical pixel boundary
pub fn snap_css_pixel(value: f64, device_pixel_ratio: f64) -> f64 {
    let dpr = effective_dpr(device_pixel_ratio);
    round_half_up(value * dpr) / dpr
}

/// Pick the GUI scale for a window.
///
/// `requested == 0` means auto: the largest scale whose next step would still
/// leave at least 320x240 scaled pixels. A non-zero request caps the search.
pub fn compute_gui_scale(requested: u32, width: u32, height: u32) -> u32 {
    let target = if requested == 0 { u32::MAX } else { requested };
    let (width, height) = (f64::from(width), f64::from(height));
    let mut scale: u32 = 1;
    while scale < target {
        let next = f64::from(scale + 1);
        if width / next < MIN_SCALED_WIDTH || height / next < MIN_SCALED_HEIGHT {
            break;
        }
        scale += 1;
    }
    scale
}

/// Scaled GUI dimensions for an effective scale (`floor(dim / scale)`)
pub fn scaled_size(width: u32, height: u32, scale: u32) -> (u32, u32) {
    let scale = scale.max(1);
    (width / scale, height / scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_bounds() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(11.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn test_clamp_inverted_range_prefers_min() {
        // Must not panic like f64::clamp would
        assert_eq!(clamp(30.0, 60.0, 40.0), 60.0);
    }

    #[test]
    fn test_floor_clamp_u32() {
        assert_eq!(floor_clamp_u32(1919.9, 300, 7680), 1919);
        assert_eq!(floor_clamp_u32(-4.0, 0, 10), 0);
        assert_eq!(floor_clamp_u32(1e12, 1, 16384), 16384);
        assert_eq!(floor_clamp_u32(f64::NAN, 1, 50), 1);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(2.49), 2.0);
    }

    #[test]
    fn test_snap_css_pixel() {
        assert_eq!(snap_css_pixel(10.3, 1.0), 10.0);
        assert_eq!(snap_css_pixel(10.3, 2.0), 10.5);
        assert_eq!(snap_css_pixel(10.2, 2.0), 10.0);
        // Ratios at or below 1 behave like 1
        assert_eq!(snap_css_pixel(10.3, 0.5), 10.0);
        assert_eq!(snap_css_pixel(10.3, f64::NAN), 10.0);
    }

    #[test]
    fn test_gui_scale_auto_1080p() {
        // 1080/4 = 270 passes, 1080/5 = 216 fails
        assert_eq!(compute_gui_scale(0, 1920, 1080), 4);
    }

    #[test]
    fn test_gui_scale_auto_small_windows() {
        assert_eq!(compute_gui_scale(0, 300, 240), 1);
        assert_eq!(compute_gui_scale(0, 640, 480), 2);
        assert_eq!(compute_gui_scale(0, 639, 480), 1);
        // Width-limited: 3840/12 = 320 passes, 3840/13 fails
        assert_eq!(compute_gui_scale(0, 3840, 16384), 12);
    }

    #[test]
    fn test_gui_scale_requested_caps_search() {
        assert_eq!(compute_gui_scale(2, 1920, 1080), 2);
        assert_eq!(compute_gui_scale(1, 1920, 1080), 1);
        // A request above what the window allows is not honoured
        assert_eq!(compute_gui_scale(6, 1920, 1080), 4);
    }

    #[test]
    fn test_scaled_size_floors() {
        assert_eq!(scaled_size(1920, 1080, 4), (480, 270));
        assert_eq!(scaled_size(1366, 768, 3), (455, 256));
        assert_eq!(scaled_size(100, 100, 0), (100, 100));
    }
}
