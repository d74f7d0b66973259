//! Display metrics and viewport layout
//!
//! Everything here is a pure function of a [`Surface`] snapshot (window,
//! base resolution, crop mode, measured viewport, device pixel ratio) and the
//! current zoom. Results are in CSS pixels relative to the viewport's top
//! left corner.

use crate::constants::projector::{ASPECT, GAP_PX, HEIGHT_RATIO, SOURCE_HEIGHT, SOURCE_WIDTH};
use crate::constants::zoom::MIN_PAN_SLACK;
use crate::math::{clamp, effective_dpr, snap_css_pixel};
use crate::mirror::{Placement, SourceRect};
use crate::types::{CropMode, DisplayVariant, ScreenBox, WindowSize};

/// Inputs the layout depends on besides zoom and pan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub window: WindowSize,
    pub base: WindowSize,
    pub crop_mode: CropMode,
    pub variant: DisplayVariant,
    /// Measured viewport size; 0 means not measured yet
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub device_pixel_ratio: f64,
}

/// Size of the window's on-screen box before snapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMetrics {
    pub display_width_percent: f64,
    pub display_height_percent: f64,
    pub viewport_width_px: f64,
    pub viewport_height_px: f64,
    pub display_width_px: f64,
    pub display_height_px: f64,
}

/// Symmetric pan budget per axis
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanLimits {
    pub max_x: f64,
    pub max_y: f64,
}

impl PanLimits {
    /// Whether there is enough slack on either axis to pan at all
    pub fn has_slack(&self) -> bool {
        self.max_x > MIN_PAN_SLACK || self.max_y > MIN_PAN_SLACK
    }

    pub fn clamp(&self, pan_x: f64, pan_y: f64) -> (f64, f64) {
        (
            clamp(pan_x, -self.max_x, self.max_x),
            clamp(pan_y, -self.max_y, self.max_y),
        )
    }
}

/// Snapped on-screen boxes for one frame, pan not applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportLayout {
    pub canvas: ScreenBox,
    /// Tall projector box, only in the tall variant
    pub projector: Option<ScreenBox>,
    pub device_pixel_ratio: f64,
}

impl Surface {
    fn safe_window(&self) -> (f64, f64) {
        (
            f64::from(self.window.width.max(1)),
            f64::from(self.window.height.max(1)),
        )
    }

    pub fn metrics(&self, zoom: f64) -> DisplayMetrics {
        let (window_w, window_h) = self.safe_window();
        let base_w = f64::from(self.base.width);
        let base_h = f64::from(self.base.height);
        let contain_scale = 1f64.min(base_w / window_w).min(base_h / window_h);
        let scale = match self.crop_mode {
            CropMode::Crop => 1.0,
            CropMode::Contain => contain_scale,
        };
        let display_width_percent = window_w * scale * 100.0 / base_w.max(1.0) * zoom;
        let display_height_percent = window_h * scale * 100.0 / base_h.max(1.0) * zoom;
        let viewport_width_px = measured_or(self.viewport_width, base_w);
        let viewport_height_px = measured_or(self.viewport_height, base_h);
        DisplayMetrics {
            display_width_percent,
            display_height_percent,
            viewport_width_px,
            viewport_height_px,
            display_width_px: viewport_width_px * display_width_percent / 100.0,
            display_height_px: viewport_height_px * display_height_percent / 100.0,
        }
    }

    pub fn pan_limits(&self, zoom: f64) -> PanLimits {
        let m = self.metrics(zoom);
        PanLimits {
            max_x: ((m.display_width_px - m.viewport_width_px) * 0.5).max(0.0),
            max_y: ((m.display_height_px - m.viewport_height_px) * 0.5).max(0.0),
        }
    }

    /// Canvas box (aspect preserved, snapped) and, in the tall variant, the
    /// projector box placed in the left margin and centred vertically.
    pub fn layout(&self, zoom: f64) -> ViewportLayout {
        let dpr = effective_dpr(self.device_pixel_ratio);
        let snap = |v: f64| snap_css_pixel(v, dpr);
        let min_css = 1.0 / dpr;
        let m = self.metrics(zoom);
        let (window_w, window_h) = self.safe_window();

        let display_scale = (m.display_width_px / window_w).min(m.display_height_px / window_h);
        let display_w = snap(window_w * display_scale).max(min_css);
        let display_h = snap(window_h * display_scale).max(min_css);
        let centered_left = snap((m.viewport_width_px - display_w) * 0.5);
        let canvas_top = snap((m.viewport_height_px - display_h) * 0.5);

        if self.variant != DisplayVariant::Tall {
            return ViewportLayout {
                canvas: ScreenBox {
                    left: centered_left,
                    top: canvas_top,
                    width: display_w,
                    height: display_h,
                },
                projector: None,
                device_pixel_ratio: dpr,
            };
        }

        let target_h = snap(display_h * HEIGHT_RATIO).max(min_css);
        let target_w = snap(target_h * ASPECT).max(min_css);
        let available_left = snap(centered_left - GAP_PX).max(min_css);
        // Lower bound wins: the projector never shrinks below its source width
        let projector_w = clamp(target_w, f64::from(SOURCE_WIDTH), available_left);
        let projector_h = snap(projector_w / ASPECT).max(min_css);
        let canvas_left = centered_left.max(projector_w + GAP_PX);
        let projector_left = snap(canvas_left - GAP_PX - projector_w);
        let projector_top = snap(canvas_top + (display_h - projector_h) * 0.5);

        ViewportLayout {
            canvas: ScreenBox {
                left: canvas_left,
                top: canvas_top,
                width: display_w,
                height: display_h,
            },
            projector: Some(ScreenBox {
                left: projector_left,
                top: projector_top,
                width: projector_w,
                height: projector_h,
            }),
            device_pixel_ratio: dpr,
        }
    }
}

fn measured_or(measured: f64, fallback: f64) -> f64 {
    let value = if measured.is_finite() && measured > 0.0 {
        measured
    } else {
        fallback
    };
    value.max(1.0)
}

impl ViewportLayout {
    fn snap(&self, value: f64) -> f64 {
        snap_css_pixel(value, self.device_pixel_ratio)
    }

    /// Canvas box with the pan offset applied
    pub fn panned_canvas(&self, pan_x: f64, pan_y: f64) -> ScreenBox {
        ScreenBox {
            left: self.canvas.left + self.snap(pan_x),
            top: self.canvas.top + self.snap(pan_y),
            ..self.canvas
        }
    }

    /// On-screen box of a mirror placed on `canvas`
    pub fn mirror_box(&self, canvas: &ScreenBox, placement: &Placement) -> ScreenBox {
        let min_css = 1.0 / self.device_pixel_ratio;
        let canvas_w = canvas.width.max(1.0);
        let canvas_h = canvas.height.max(1.0);
        ScreenBox {
            left: self.snap(canvas.left + placement.screen_x / 100.0 * canvas_w),
            top: self.snap(canvas.top + placement.screen_y / 100.0 * canvas_h),
            width: self.snap(placement.screen_w / 100.0 * canvas_w).max(min_css),
            height: self.snap(placement.screen_h / 100.0 * canvas_h).max(min_css),
        }
    }
}

/// Map a viewport point to window pixels on `canvas`.
///
/// With `clamp_to_window` the result is bounded to `[0, window]` per axis.
pub fn point_to_window(
    canvas: &ScreenBox,
    window: WindowSize,
    x: f64,
    y: f64,
    clamp_to_window: bool,
) -> (f64, f64) {
    let wx = (x - canvas.left) / canvas.width.max(1.0) * window.width_f64();
    let wy = (y - canvas.top) / canvas.height.max(1.0) * window.height_f64();
    if clamp_to_window {
        (
            clamp(wx, 0.0, window.width_f64()),
            clamp(wy, 0.0, window.height_f64()),
        )
    } else {
        (wx, wy)
    }
}

/// Viewport-pixel box spanning two window-pixel points (rounded, at least 1px)
pub fn selection_box(
    canvas: &ScreenBox,
    window: WindowSize,
    start: (f64, f64),
    current: (f64, f64),
) -> ScreenBox {
    let sx = canvas.width / f64::from(window.width.max(1));
    let sy = canvas.height / f64::from(window.height.max(1));
    let left = start.0.min(current.0) * sx + canvas.left;
    let top = start.1.min(current.1) * sy + canvas.top;
    let right = start.0.max(current.0) * sx + canvas.left;
    let bottom = start.1.max(current.1) * sy + canvas.top;
    let round = crate::math::round_half_up;
    ScreenBox {
        left: round(left),
        top: round(top),
        width: round(right - left).max(1.0),
        height: round(bottom - top).max(1.0),
    }
}

/// Centre crop of the window shown by the tall projector
pub fn projector_source(window: WindowSize) -> SourceRect {
    let w = SOURCE_WIDTH.min(window.width);
    let h = SOURCE_HEIGHT.min(window.height);
    SourceRect {
        x: (window.width - w) / 2,
        y: (window.height - h) / 2,
        w,
        h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(window: WindowSize, crop_mode: CropMode, variant: DisplayVariant) -> Surface {
        Surface {
            window,
            base: WindowSize::new(1920, 1080),
            crop_mode,
            variant,
            viewport_width: 960.0,
            viewport_height: 540.0,
            device_pixel_ratio: 1.0,
        }
    }

    #[test]
    fn test_preset_fills_viewport_at_zoom_one() {
        let s = surface(WindowSize::new(1920, 1080), CropMode::Contain, DisplayVariant::Preset);
        let m = s.metrics(1.0);
        assert_eq!(m.display_width_percent, 100.0);
        assert_eq!(m.display_width_px, 960.0);
        assert_eq!(s.pan_limits(1.0), PanLimits::default());

        let layout = s.layout(1.0);
        assert_eq!(layout.canvas, ScreenBox { left: 0.0, top: 0.0, width: 960.0, height: 540.0 });
        assert!(layout.projector.is_none());
    }

    #[test]
    fn test_zoom_creates_pan_slack() {
        let s = surface(WindowSize::new(1920, 1080), CropMode::Contain, DisplayVariant::Preset);
        let limits = s.pan_limits(2.0);
        assert_eq!(limits.max_x, 480.0);
        assert_eq!(limits.max_y, 270.0);
        assert!(limits.has_slack());
        assert_eq!(limits.clamp(1000.0, -1000.0), (480.0, -270.0));
    }

    #[test]
    fn test_wide_variant_letterboxes() {
        let s = surface(WindowSize::new(1920, 300), CropMode::Contain, DisplayVariant::Wide);
        let m = s.metrics(1.0);
        assert_eq!(m.display_width_percent, 100.0);
        assert!((m.display_height_percent - 300.0 / 1080.0 * 100.0).abs() < 1e-9);
        let layout = s.layout(1.0);
        assert_eq!(layout.canvas.width, 960.0);
        assert_eq!(layout.canvas.height, 150.0);
        assert_eq!(layout.canvas.top, 195.0);
    }

    #[test]
    fn test_thin_contain_scale() {
        // 350 wide stays unscaled horizontally
        let s = surface(WindowSize::new(350, 1080), CropMode::Contain, DisplayVariant::Thin);
        let layout = s.layout(1.0);
        assert_eq!(layout.canvas.height, 540.0);
        assert_eq!(layout.canvas.width, 175.0);
    }

    #[test]
    fn test_contain_shrinks_oversized_window() {
        let s = surface(WindowSize::new(3840, 1080), CropMode::Contain, DisplayVariant::Preset);
        let m = s.metrics(1.0);
        // containScale = 0.5
        assert_eq!(m.display_width_percent, 100.0);
        assert_eq!(m.display_height_percent, 50.0);
    }

    #[test]
    fn test_tall_crop_layout_places_projector_left() {
        let s = surface(WindowSize::new(384, 16384), CropMode::Crop, DisplayVariant::Tall);
        let layout = s.layout(1.0);
        let projector = layout.projector.expect("projector in tall variant");
        assert!(projector.width >= f64::from(SOURCE_WIDTH));
        assert!(projector.right() + GAP_PX <= layout.canvas.left + 1e-9);
        assert!(projector.left >= 0.0);
        assert!(s.pan_limits(1.0).max_y > 0.5);
    }

    #[test]
    fn test_projector_never_below_minimum_width() {
        let mut s = surface(WindowSize::new(384, 16384), CropMode::Crop, DisplayVariant::Tall);
        s.viewport_width = 200.0;
        let layout = s.layout(4.0);
        let projector = layout.projector.unwrap();
        assert_eq!(projector.width, f64::from(SOURCE_WIDTH));
        assert!(layout.canvas.left >= projector.width + GAP_PX);
    }

    #[test]
    fn test_unmeasured_viewport_uses_base() {
        let mut s = surface(WindowSize::new(1920, 1080), CropMode::Contain, DisplayVariant::Preset);
        s.viewport_width = 0.0;
        s.viewport_height = f64::NAN;
        let m = s.metrics(1.0);
        assert_eq!(m.viewport_width_px, 1920.0);
        assert_eq!(m.viewport_height_px, 1080.0);
    }

    #[test]
    fn test_mirror_box_and_pan() {
        let s = surface(WindowSize::new(1920, 1080), CropMode::Contain, DisplayVariant::Preset);
        let layout = s.layout(1.0);
        let canvas = layout.panned_canvas(10.2, -4.0);
        assert_eq!(canvas.left, 10.0);
        let placement = Placement { screen_x: 50.0, screen_y: 10.0, screen_w: 0.01, screen_h: 25.0 };
        let b = layout.mirror_box(&canvas, &placement);
        assert_eq!(b.left, 490.0);
        assert_eq!(b.top, 50.0);
        assert_eq!(b.width, 1.0);
        assert_eq!(b.height, 135.0);
    }

    #[test]
    fn test_point_to_window() {
        let canvas = ScreenBox { left: 100.0, top: 0.0, width: 960.0, height: 540.0 };
        let window = WindowSize::new(1920, 1080);
        assert_eq!(point_to_window(&canvas, window, 580.0, 270.0, true), (960.0, 540.0));
        assert_eq!(point_to_window(&canvas, window, 0.0, -10.0, true), (0.0, 0.0));
        assert_eq!(point_to_window(&canvas, window, 0.0, 0.0, false), (-200.0, 0.0));
    }

    #[test]
    fn test_selection_box_orders_points() {
        let canvas = ScreenBox { left: 0.0, top: 0.0, width: 960.0, height: 540.0 };
        let window = WindowSize::new(1920, 1080);
        let b = selection_box(&canvas, window, (200.0, 100.0), (100.0, 100.0));
        assert_eq!(b, ScreenBox { left: 50.0, top: 50.0, width: 50.0, height: 1.0 });
    }

    #[test]
    fn test_projector_source_centred() {
        assert_eq!(
            projector_source(WindowSize::new(384, 16384)),
            SourceRect { x: 162, y: 7902, w: 60, h: 580 }
        );
        assert_eq!(
            projector_source(WindowSize::new(50, 300)),
            SourceRect { x: 0, y: 0, w: 50, h: 300 }
        );
    }
}
