//! Mirror model: source rect, on-screen placement, visibility and colour keys
//!
//! All constructors are total. Untrusted input (storage blobs, numeric edit
//! fields) goes through [`Mirror::normalize`] or one of the part normalizers
//! and always comes out valid for the window it was normalized against.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::color::{ColorKeys, KeyRejection};
use crate::constants::mirror::{MIN_SIZE, POSITION_LIMIT, SIZE_LIMIT, STAGGER_STEP};
use crate::constants::resolution::{MAX_HEIGHT, MAX_WIDTH};
use crate::math::{clamp, round_half_up};
use crate::types::{DisplayVariant, Visibility, WindowSize};
use crate::untrusted::{coerce_number, field, string};

static ID_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// New opaque mirror id: creation time plus a process-wide sequence number
pub fn make_mirror_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let seq = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{millis:x}-{seq:04x}")
}

/// Integer pixel rect inside the virtual window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl SourceRect {
    /// Clamp loose coordinates into `bounds`.
    ///
    /// Position is floored and clamped first, then the rounded size is clamped
    /// to what remains of the window from that position. Missing values fall
    /// back to 0/0/1/1.
    pub fn from_parts(
        x: Option<f64>,
        y: Option<f64>,
        w: Option<f64>,
        h: Option<f64>,
        bounds: WindowSize,
    ) -> Self {
        let max_w = f64::from(bounds.width.max(1));
        let max_h = f64::from(bounds.height.max(1));
        let x = clamp(x.unwrap_or(0.0).floor(), 0.0, max_w - 1.0);
        let y = clamp(y.unwrap_or(0.0).floor(), 0.0, max_h - 1.0);
        let w = clamp(round_half_up(w.unwrap_or(1.0)), 1.0, max_w - x);
        let h = clamp(round_half_up(h.unwrap_or(1.0)), 1.0, max_h - y);
        Self {
            x: x as u32,
            y: y as u32,
            w: w as u32,
            h: h as u32,
        }
    }

    /// Normalize the `x`/`y`/`w`/`h` fields of an untrusted record
    pub fn normalize(raw: &Value, bounds: WindowSize) -> Self {
        Self::from_parts(
            coerce_number(field(raw, "x")),
            coerce_number(field(raw, "y")),
            coerce_number(field(raw, "w")),
            coerce_number(field(raw, "h")),
            bounds,
        )
    }

    /// Normalize against the largest window any variant can have
    pub fn normalize_stored(raw: &Value) -> Self {
        Self::normalize(raw, WindowSize::new(MAX_WIDTH, MAX_HEIGHT))
    }

    /// Re-clamp an existing rect into (possibly smaller) bounds
    pub fn clamped_to(self, bounds: WindowSize) -> Self {
        Self::from_parts(
            Some(f64::from(self.x)),
            Some(f64::from(self.y)),
            Some(f64::from(self.w)),
            Some(f64::from(self.h)),
            bounds,
        )
    }

    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }
}

/// On-screen placement in percent of the window's on-screen box
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub screen_x: f64,
    pub screen_y: f64,
    pub screen_w: f64,
    pub screen_h: f64,
}

impl Placement {
    /// Placement proportional to where `rect` sits in the window, staggered
    /// diagonally by `index` and kept inside `[0, 100 - size]`.
    pub fn default_for(rect: SourceRect, window: WindowSize, index: usize) -> Self {
        let window_w = f64::from(window.width.max(1));
        let window_h = f64::from(window.height.max(1));
        let offset = index as f64 * STAGGER_STEP;
        let screen_w = f64::from(rect.w) / window_w * 100.0;
        let screen_h = f64::from(rect.h) / window_h * 100.0;
        let max_x = (100.0 - screen_w).max(0.0);
        let max_y = (100.0 - screen_h).max(0.0);
        Self {
            screen_x: clamp(f64::from(rect.x) / window_w * 100.0 + offset, 0.0, max_x),
            screen_y: clamp(f64::from(rect.y) / window_h * 100.0 + offset, 0.0, max_y),
            screen_w,
            screen_h,
        }
    }

    /// Clamp loose values, each missing one falls back to the default placement
    pub fn from_parts(
        screen_x: Option<f64>,
        screen_y: Option<f64>,
        screen_w: Option<f64>,
        screen_h: Option<f64>,
        fallback: Placement,
    ) -> Self {
        Self {
            screen_x: clamp_position(screen_x.unwrap_or(fallback.screen_x)),
            screen_y: clamp_position(screen_y.unwrap_or(fallback.screen_y)),
            screen_w: clamp_size(screen_w.unwrap_or(fallback.screen_w)),
            screen_h: clamp_size(screen_h.unwrap_or(fallback.screen_h)),
        }
    }

    pub fn normalize(raw: &Value, rect: SourceRect, window: WindowSize, index: usize) -> Self {
        Self::from_parts(
            coerce_number(field(raw, "screenX")),
            coerce_number(field(raw, "screenY")),
            coerce_number(field(raw, "screenW")),
            coerce_number(field(raw, "screenH")),
            Self::default_for(rect, window, index),
        )
    }

    pub fn right(&self) -> f64 {
        self.screen_x + self.screen_w
    }

    pub fn bottom(&self) -> f64 {
        self.screen_y + self.screen_h
    }
}

pub fn clamp_position(value: f64) -> f64 {
    clamp(value, -POSITION_LIMIT, POSITION_LIMIT)
}

pub fn clamp_size(value: f64) -> f64 {
    clamp(value, MIN_SIZE, SIZE_LIMIT)
}

/// A user-defined capture region with its own on-screen placement
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mirror {
    pub id: String,
    #[serde(flatten)]
    pub rect: SourceRect,
    #[serde(flatten)]
    pub placement: Placement,
    pub visible_in: Visibility,
    pub keys: ColorKeys,
}

/// Persisted mirror shape; ids and interaction state are not stored
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMirror<'a> {
    #[serde(flatten)]
    rect: SourceRect,
    #[serde(flatten)]
    placement: Placement,
    visible_in: Visibility,
    keys: &'a ColorKeys,
}

impl<'a> From<&'a Mirror> for StoredMirror<'a> {
    fn from(mirror: &'a Mirror) -> Self {
        Self {
            rect: mirror.rect,
            placement: mirror.placement,
            visible_in: mirror.visible_in,
            keys: &mirror.keys,
        }
    }
}

fn id_or_new(raw: &Value) -> String {
    match string(raw, "id") {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => make_mirror_id(),
    }
}

impl Mirror {
    /// Fully normalize an untrusted record against the current window
    pub fn normalize(raw: &Value, window: WindowSize, index: usize) -> Self {
        let rect = SourceRect::normalize(raw, window);
        Self::with_rect(raw, rect, window, index)
    }

    /// Normalize a record that is hidden in the current variant.
    ///
    /// Its rect is only bounded by the largest possible window so a smaller
    /// current window does not destroy geometry meant for another variant.
    pub fn normalize_deferred(raw: &Value, window: WindowSize, index: usize) -> Self {
        let rect = SourceRect::normalize_stored(raw);
        Self::with_rect(raw, rect, window, index)
    }

    fn with_rect(raw: &Value, rect: SourceRect, window: WindowSize, index: usize) -> Self {
        Self {
            id: id_or_new(raw),
            rect,
            placement: Placement::normalize(raw, rect, window, index),
            visible_in: Visibility::parse(string(raw, "visibleIn")),
            keys: ColorKeys::normalize(field(raw, "keys")),
        }
    }

    /// Load one stored record, deferring geometry for off-variant mirrors
    pub fn load(raw: &Value, variant: DisplayVariant, window: WindowSize, index: usize) -> Self {
        if Visibility::parse(string(raw, "visibleIn")).shows_in(variant) {
            Self::normalize(raw, window, index)
        } else {
            Self::normalize_deferred(raw, window, index)
        }
    }

    /// New mirror for a rect picked in the current window
    pub fn create(rect: SourceRect, visible_in: Visibility, window: WindowSize, index: usize) -> Self {
        let rect = rect.clamped_to(window);
        Self {
            id: make_mirror_id(),
            rect,
            placement: Placement::default_for(rect, window, index),
            visible_in,
            keys: ColorKeys::new(),
        }
    }

    pub fn visible_in_variant(&self, variant: DisplayVariant) -> bool {
        self.visible_in.shows_in(variant)
    }

    /// Re-clamp geometry after the window changed. Returns whether anything moved.
    pub fn reclamp(&mut self, window: WindowSize, index: usize) -> bool {
        let rect = self.rect.clamped_to(window);
        let placement = Placement::from_parts(
            Some(self.placement.screen_x),
            Some(self.placement.screen_y),
            Some(self.placement.screen_w),
            Some(self.placement.screen_h),
            Placement::default_for(rect, window, index),
        );
        let changed = rect != self.rect || placement != self.placement;
        self.rect = rect;
        self.placement = placement;
        changed
    }

    /// Append a colour key; invalid, duplicate and over-cap keys are rejected
    pub fn add_color_key(&mut self, raw: &str) -> Result<(), KeyRejection> {
        match self.keys.insert(raw) {
            Ok(key) => {
                debug!(mirror = %self.id, key = key, "Colour key added");
                Ok(())
            }
            Err(rejection) => {
                debug!(mirror = %self.id, input = raw, reason = ?rejection, "Colour key rejected");
                Err(rejection)
            }
        }
    }
}

/// Rebuild the mirror list from a stored blob; non-arrays and non-object
/// entries are dropped.
pub fn normalize_mirror_list(raw: &Value, variant: DisplayVariant, window: WindowSize) -> Vec<Mirror> {
    let Some(items) = raw.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter(|item| item.is_object())
        .enumerate()
        .map(|(index, item)| Mirror::load(item, variant, window, index))
        .collect()
}

pub fn stored_mirrors(mirrors: &[Mirror]) -> Vec<StoredMirror<'_>> {
    mirrors.iter().map(StoredMirror::from).collect()
}
