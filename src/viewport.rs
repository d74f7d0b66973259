//! Screen zoom and pan controller

use tracing::debug;

use crate::constants::zoom::{
    EPSILON, MAX, MIN, MIN_PAN_SLACK, STEP, WHEEL_LINE_SCALE, WHEEL_PAGE_SCALE,
};
use crate::display::Surface;
use crate::math::{clamp, round_half_up};

/// Unit of a wheel delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WheelDeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

impl WheelDeltaMode {
    fn scale(self) -> f64 {
        match self {
            Self::Pixel => 1.0,
            Self::Line => WHEEL_LINE_SCALE,
            Self::Page => WHEEL_PAGE_SCALE,
        }
    }
}

/// One wheel event; positive `delta_y` scrolls down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelInput {
    pub delta_x: f64,
    pub delta_y: f64,
    pub mode: WheelDeltaMode,
    /// Precision-zoom modifier
    pub ctrl: bool,
    pub shift: bool,
    /// Pointer position in viewport CSS pixels
    pub pointer: (f64, f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelOutcome {
    Zoomed,
    Panned,
    Ignored,
}

/// Result of a zoom request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZoomOutcome {
    pub changed: bool,
    /// Pan was forced to the origin; any pan drag must end
    pub pan_reset: bool,
}

/// In-progress middle-button pan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanDrag {
    pub start_pointer: (f64, f64),
    pub start_pan: (f64, f64),
}

/// Snap to the nearest zoom step, then clamp to the zoom range
pub fn quantize_zoom(requested: f64) -> f64 {
    clamp(round_half_up(requested / STEP) * STEP, MIN, MAX)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomPan {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
}

impl Default for ZoomPan {
    fn default() -> Self {
        Self {
            zoom: MIN,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl ZoomPan {
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> (f64, f64) {
        (self.pan_x, self.pan_y)
    }

    pub fn at_min_zoom(&self) -> bool {
        self.zoom <= MIN + EPSILON
    }

    pub fn can_zoom_out(&self) -> bool {
        !self.at_min_zoom()
    }

    pub fn can_zoom_in(&self) -> bool {
        self.zoom < MAX - EPSILON
    }

    pub fn can_reset(&self) -> bool {
        !(self.at_min_zoom() && self.pan_x.abs() < MIN_PAN_SLACK && self.pan_y.abs() < MIN_PAN_SLACK)
    }

    /// Zoom to `requested` (quantized), optionally keeping `anchor` (viewport
    /// CSS pixels) stationary on screen.
    pub fn set_zoom(
        &mut self,
        surface: &Surface,
        requested: f64,
        reset_pan: bool,
        anchor: Option<(f64, f64)>,
    ) -> ZoomOutcome {
        if requested.is_nan() {
            return ZoomOutcome::default();
        }
        let next_zoom = quantize_zoom(requested);
        if (next_zoom - self.zoom).abs() < EPSILON && !reset_pan {
            return ZoomOutcome::default();
        }

        let prev = surface.metrics(self.zoom);
        let mut pan_reset = false;
        let anchor = anchor.filter(|(x, y)| x.is_finite() && y.is_finite());

        match anchor {
            Some((ax, ay)) if !reset_pan && next_zoom > MIN + EPSILON => {
                let ax = clamp(ax, 0.0, prev.viewport_width_px.max(1.0));
                let ay = clamp(ay, 0.0, prev.viewport_height_px.max(1.0));
                let offset_x = ax - (prev.viewport_width_px * 0.5 + self.pan_x);
                let offset_y = ay - (prev.viewport_height_px * 0.5 + self.pan_y);
                let next = surface.metrics(next_zoom);
                let ratio_x = next.display_width_px / prev.display_width_px.max(1.0);
                let ratio_y = next.display_height_px / prev.display_height_px.max(1.0);
                self.pan_x = ax - offset_x * ratio_x - next.viewport_width_px * 0.5;
                self.pan_y = ay - offset_y * ratio_y - next.viewport_height_px * 0.5;
            }
            _ if reset_pan || next_zoom <= MIN + EPSILON => {
                self.pan_x = 0.0;
                self.pan_y = 0.0;
                pan_reset = true;
            }
            _ => {}
        }

        debug!(from = self.zoom, to = next_zoom, reset_pan = reset_pan, "Screen zoom changed");
        self.zoom = next_zoom;
        self.relayout(surface);
        ZoomOutcome {
            changed: true,
            pan_reset,
        }
    }

    /// Re-clamp pan after a layout change
    pub fn relayout(&mut self, surface: &Surface) {
        let limits = surface.pan_limits(self.zoom);
        (self.pan_x, self.pan_y) = limits.clamp(self.pan_x, self.pan_y);
        if self.at_min_zoom() && limits.max_x < MIN_PAN_SLACK && limits.max_y < MIN_PAN_SLACK {
            self.pan_x = 0.0;
            self.pan_y = 0.0;
        }
    }

    /// Start a pan drag if there is slack to pan into
    pub fn begin_pan_drag(&self, surface: &Surface, pointer: (f64, f64)) -> Option<PanDrag> {
        surface.pan_limits(self.zoom).has_slack().then_some(PanDrag {
            start_pointer: pointer,
            start_pan: (self.pan_x, self.pan_y),
        })
    }

    pub fn update_pan_drag(&mut self, surface: &Surface, drag: &PanDrag, pointer: (f64, f64)) {
        self.pan_x = drag.start_pan.0 + (pointer.0 - drag.start_pointer.0);
        self.pan_y = drag.start_pan.1 + (pointer.1 - drag.start_pointer.1);
        self.relayout(surface);
    }

    /// Ctrl-wheel zooms one step toward the pointer. Plain wheel pans, but only
    /// when `pan_allowed` and there is slack.
    pub fn wheel(&mut self, surface: &Surface, input: WheelInput, pan_allowed: bool) -> WheelOutcome {
        if input.ctrl {
            let step = if input.delta_y < 0.0 { STEP } else { -STEP };
            self.set_zoom(surface, self.zoom + step, false, Some(input.pointer));
            return WheelOutcome::Zoomed;
        }
        if !pan_allowed {
            return WheelOutcome::Ignored;
        }
        let limits = surface.pan_limits(self.zoom);
        if limits.max_x < MIN_PAN_SLACK && limits.max_y < MIN_PAN_SLACK {
            return WheelOutcome::Ignored;
        }
        let scale = input.mode.scale();
        let delta_x = input.delta_x * scale;
        let delta_y = input.delta_y * scale;
        let target_x = self.pan_x - if input.shift { delta_y } else { delta_x };
        let target_y = self.pan_y - delta_y;
        (self.pan_x, self.pan_y) = limits.clamp(target_x, target_y);
        self.relayout(surface);
        WheelOutcome::Panned
    }
}
