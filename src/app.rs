//! Editor application state
//!
//! [`AppState`] owns every piece of mutable editor state. Input handlers run
//! to completion on the calling frame, and persistence goes through the
//! [`Store`] as a best-effort side effect that never fails the caller.

use std::path::Path;

use anyhow::Result;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::background::{Background, encode_png};
use crate::constants::resolution::{MAX_HEIGHT, MAX_WIDTH, MIN_HEIGHT, MIN_WIDTH};
use crate::constants::storage::MIRRORS;
use crate::constants::zoom::{MIN as MIN_ZOOM, STEP as ZOOM_STEP};
use crate::display::{Surface, ViewportLayout, point_to_window, projector_source, selection_box};
use crate::export::{ExportSource, build_export, render_export};
use crate::eye_overlay::{OverlayStrip, overlay_filename, render_overlay};
use crate::interaction::{
    Hit, Interaction, Modifiers, MoveDrag, ResizeDrag, SelectionDrag, hit_test, relative_position,
};
use crate::math::{compute_gui_scale, floor_clamp_u32, scaled_size};
use crate::mirror::{Mirror, SourceRect, clamp_position, normalize_mirror_list, stored_mirrors};
use crate::pixels::{
    CanvasPixels, PixelImage, PixelReadError, overlay_image, sample_canvas, sample_mirror_source,
    sample_overlay,
};
use crate::settings::{
    Action, ActionKeybinds, BaseResolution, TallOverlaySettings, ThemeSettings, WindowSettings,
};
use crate::storage::{Store, load_json, save_json};
use crate::types::{CropMode, DisplayVariant, ScreenBox, Visibility, WindowSize};
use crate::viewport::{WheelInput, WheelOutcome, ZoomOutcome, ZoomPan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

const MODIFIER_CODES: [&str; 8] = [
    "ShiftLeft",
    "ShiftRight",
    "ControlLeft",
    "ControlRight",
    "AltLeft",
    "AltRight",
    "MetaLeft",
    "MetaRight",
];

/// Variant a toggle action switches to; the open action has none
fn action_variant(action: Action) -> Option<DisplayVariant> {
    match action {
        Action::OpenNinjabrain => None,
        Action::Thin => Some(DisplayVariant::Thin),
        Action::Wide => Some(DisplayVariant::Wide),
        Action::Tall => Some(DisplayVariant::Tall),
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// A mirror visible in the current variant and its on-screen box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MirrorBox {
    /// Index into [`AppState::mirrors`]
    pub index: usize,
    pub screen: ScreenBox,
}

pub struct AppState {
    store: Box<dyn Store>,
    base: BaseResolution,
    window: WindowSize,
    variant: DisplayVariant,
    crop_mode: CropMode,
    gui_scale_setting: u32,
    effective_gui_scale: u32,
    scaled: (u32, u32),
    mirrors: Vec<Mirror>,
    interaction: Interaction,
    zoom_pan: ZoomPan,
    viewport: (f64, f64),
    device_pixel_ratio: f64,
    /// Last pointer position over the viewport, used by the zoom buttons
    zoom_anchor: Option<(f64, f64)>,
    keybinds: ActionKeybinds,
    keybind_capture: Option<Action>,
    theme: ThemeSettings,
    window_settings: WindowSettings,
    tall_overlay: TallOverlaySettings,
    background: Background,
    tall_background: Background,
    keying_blocked: bool,
}

impl AppState {
    /// Restore every settings group from `store` and apply the base resolution
    pub fn new(store: Box<dyn Store>, gui_scale_setting: u32) -> Self {
        let base = BaseResolution::load(store.as_ref());
        let mut tall_overlay = TallOverlaySettings::load(store.as_ref());
        tall_overlay.sync_canvas_to(base.window_size());

        let mut app = Self {
            keybinds: ActionKeybinds::load(store.as_ref()),
            theme: ThemeSettings::load(store.as_ref()),
            window_settings: WindowSettings::load(store.as_ref()),
            tall_overlay,
            store,
            base,
            window: base.window_size(),
            variant: DisplayVariant::Preset,
            crop_mode: CropMode::Contain,
            gui_scale_setting,
            effective_gui_scale: 1,
            scaled: (base.width, base.height),
            mirrors: Vec::new(),
            interaction: Interaction::Idle,
            zoom_pan: ZoomPan::default(),
            viewport: (0.0, 0.0),
            device_pixel_ratio: 1.0,
            zoom_anchor: None,
            keybind_capture: None,
            background: Background::none(),
            tall_background: Background::none(),
            keying_blocked: false,
        };
        app.apply_resolution(f64::from(base.width), f64::from(base.height));
        app.mirrors = load_json(app.store.as_ref(), MIRRORS)
            .map(|raw| normalize_mirror_list(&raw, app.variant, app.window))
            .unwrap_or_default();
        info!(
            width = app.window.width,
            height = app.window.height,
            mirrors = app.mirrors.len(),
            "Editor state restored"
        );
        app
    }

    pub fn set_backgrounds(&mut self, background: Background, tall_background: Background) {
        self.background = background;
        self.tall_background = tall_background;
    }

    // ---- accessors ----

    pub fn window(&self) -> WindowSize {
        self.window
    }

    pub fn base(&self) -> BaseResolution {
        self.base
    }

    pub fn variant(&self) -> DisplayVariant {
        self.variant
    }

    pub fn crop_mode(&self) -> CropMode {
        self.crop_mode
    }

    pub fn gui_scale_setting(&self) -> u32 {
        self.gui_scale_setting
    }

    pub fn effective_gui_scale(&self) -> u32 {
        self.effective_gui_scale
    }

    pub fn scaled_gui_size(&self) -> (u32, u32) {
        self.scaled
    }

    pub fn mirrors(&self) -> &[Mirror] {
        &self.mirrors
    }

    pub fn mirror(&self, id: &str) -> Option<&Mirror> {
        self.mirrors.iter().find(|m| m.id == id)
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn zoom_pan(&self) -> &ZoomPan {
        &self.zoom_pan
    }

    pub fn keybinds(&self) -> &ActionKeybinds {
        &self.keybinds
    }

    pub fn keybind_capture(&self) -> Option<Action> {
        self.keybind_capture
    }

    pub fn theme(&self) -> &ThemeSettings {
        &self.theme
    }

    pub fn window_settings(&self) -> &WindowSettings {
        &self.window_settings
    }

    pub fn tall_overlay(&self) -> &TallOverlaySettings {
        &self.tall_overlay
    }

    pub fn keying_blocked(&self) -> bool {
        self.keying_blocked
    }

    /// Background for the current variant; the tall strip has its own image
    pub fn active_background(&self) -> &Background {
        match self.variant {
            DisplayVariant::Tall => &self.tall_background,
            _ => &self.background,
        }
    }

    // ---- layout ----

    pub fn surface(&self) -> Surface {
        Surface {
            window: self.window,
            base: self.base.window_size(),
            crop_mode: self.crop_mode,
            variant: self.variant,
            viewport_width: self.viewport.0,
            viewport_height: self.viewport.1,
            device_pixel_ratio: self.device_pixel_ratio,
        }
    }

    pub fn layout(&self) -> ViewportLayout {
        self.surface().layout(self.zoom_pan.zoom())
    }

    /// Canvas box with the current pan applied
    pub fn canvas(&self) -> ScreenBox {
        let (pan_x, pan_y) = self.zoom_pan.pan();
        self.layout().panned_canvas(pan_x, pan_y)
    }

    /// Record the measured viewport; pan is re-clamped when it changes
    pub fn set_viewport(&mut self, width: f64, height: f64, device_pixel_ratio: f64) {
        let next = (width, height);
        if next == self.viewport && device_pixel_ratio == self.device_pixel_ratio {
            return;
        }
        self.viewport = next;
        self.device_pixel_ratio = device_pixel_ratio;
        self.zoom_pan.relayout(&self.surface());
    }

    /// Boxes of the mirrors shown in the current variant, in draw order
    pub fn mirror_boxes(&self) -> Vec<MirrorBox> {
        let layout = self.layout();
        let canvas = self.canvas();
        self.mirrors
            .iter()
            .enumerate()
            .filter(|(_, m)| m.visible_in_variant(self.variant))
            .map(|(index, m)| MirrorBox {
                index,
                screen: layout.mirror_box(&canvas, &m.placement),
            })
            .collect()
    }

    /// Viewport box of the in-progress area pick
    pub fn selection_box(&self) -> Option<ScreenBox> {
        match &self.interaction {
            Interaction::Creating(Some(drag)) => Some(selection_box(
                &self.canvas(),
                self.window,
                drag.start,
                drag.current,
            )),
            _ => None,
        }
    }

    /// Source rect shown by the tall projector
    pub fn projector_source(&self) -> Option<SourceRect> {
        (self.variant == DisplayVariant::Tall).then(|| projector_source(self.window))
    }

    pub fn canvas_pixels(&self) -> CanvasPixels<'_> {
        CanvasPixels {
            window: self.window,
            backdrop: self.active_background().backdrop(),
        }
    }

    /// Pick up finished background loads. Returns true when one finished.
    pub fn poll_backgrounds(&mut self) -> bool {
        let main = self.background.poll();
        let tall = self.tall_background.poll();
        main || tall
    }

    // ---- resolution and variants ----

    /// Switch the virtual window size, keeping the variant and crop mode
    pub fn apply_resolution(&mut self, width: f64, height: f64) {
        let width = finite(width).unwrap_or(f64::from(self.window.width));
        let height = finite(height).unwrap_or(f64::from(self.window.height));
        self.window = WindowSize::new(
            floor_clamp_u32(width, MIN_WIDTH, MAX_WIDTH),
            floor_clamp_u32(height, MIN_HEIGHT, MAX_HEIGHT),
        );
        self.update_gui_scale();
        self.zoom_pan.relayout(&self.surface());
        self.clamp_mirrors_to_window();
        info!(
            width = self.window.width,
            height = self.window.height,
            gui_scale = self.effective_gui_scale,
            variant = self.variant.as_str(),
            "Applied resolution"
        );
    }

    fn update_gui_scale(&mut self) {
        self.effective_gui_scale =
            compute_gui_scale(self.gui_scale_setting, self.window.width, self.window.height);
        self.scaled = scaled_size(self.window.width, self.window.height, self.effective_gui_scale);
    }

    /// 0 selects the scale automatically
    pub fn set_gui_scale(&mut self, setting: u32) {
        self.gui_scale_setting = setting;
        self.update_gui_scale();
        debug!(setting, effective = self.effective_gui_scale, "GUI scale changed");
    }

    // Mirrors hidden in the current variant keep their geometry until shown
    fn clamp_mirrors_to_window(&mut self) {
        let (window, variant) = (self.window, self.variant);
        let mut changed = false;
        for (index, mirror) in self.mirrors.iter_mut().enumerate() {
            if mirror.visible_in_variant(variant) && mirror.reclamp(window, index) {
                debug!(mirror = %mirror.id, "Mirror clamped to new window");
                changed = true;
            }
        }
        if changed {
            self.save_mirrors();
        }
    }

    /// Store the base resolution and render the tall overlay at the same size
    pub fn set_base_resolution(&mut self, width: f64, height: f64, persist: bool) {
        let Some(base) = BaseResolution::from_dimensions(width, height) else {
            warn!(width, height, "Ignoring non-finite base resolution");
            return;
        };
        self.base = base;
        self.tall_overlay.sync_canvas_to(base.window_size());
        if persist {
            self.tall_overlay.save(self.store.as_ref());
            self.base.save(self.store.as_ref());
        }
        self.zoom_pan.relayout(&self.surface());
    }

    /// Resolution typed or picked by the user; always leaves the preset view
    pub fn apply_user_resolution(&mut self, width: f64, height: f64) {
        self.set_variant(DisplayVariant::Preset);
        self.apply_resolution(width, height);
        let window = self.window;
        self.set_base_resolution(f64::from(window.width), f64::from(window.height), true);
    }

    fn set_variant(&mut self, variant: DisplayVariant) {
        self.variant = variant;
        self.crop_mode = variant.crop_mode();
        self.zoom_pan.relayout(&self.surface());
    }

    /// Toggle a display variant; toggling the active one restores the base
    pub fn run_action(&mut self, action: Action) {
        let Some(target) = action_variant(action) else {
            debug!(action = action.label(), "Action has no effect in the editor");
            return;
        };
        let next = if self.variant == target {
            DisplayVariant::Preset
        } else {
            target
        };
        self.set_variant(next);
        let window = next.window_for(self.base.window_size());
        self.apply_resolution(f64::from(window.width), f64::from(window.height));
        info!(action = action.label(), variant = next.as_str(), "Display variant toggled");
    }

    // ---- mirrors ----

    pub fn mirrors_for_current_variant(&self) -> Vec<&Mirror> {
        self.mirrors
            .iter()
            .filter(|m| m.visible_in_variant(self.variant))
            .collect()
    }

    fn save_mirrors(&self) {
        save_json(self.store.as_ref(), MIRRORS, &stored_mirrors(&self.mirrors));
    }

    fn mirror_mut(&mut self, id: &str) -> Option<&mut Mirror> {
        self.mirrors.iter_mut().find(|m| m.id == id)
    }

    /// Add a mirror for `rect`, visible in the current variant. Returns its id.
    pub fn add_mirror(&mut self, rect: SourceRect) -> String {
        let mirror = Mirror::create(
            rect,
            self.variant.visibility_for_new_mirror(),
            self.window,
            self.mirrors.len(),
        );
        let id = mirror.id.clone();
        info!(
            mirror = %id,
            x = mirror.rect.x,
            y = mirror.rect.y,
            w = mirror.rect.w,
            h = mirror.rect.h,
            visible_in = mirror.visible_in.as_str(),
            "Mirror added"
        );
        self.mirrors.push(mirror);
        self.save_mirrors();
        id
    }

    /// Add a mirror from loose numeric fields, clamped into the window
    pub fn add_mirror_from_fields(&mut self, x: f64, y: f64, w: f64, h: f64) -> String {
        let rect = SourceRect::from_parts(finite(x), finite(y), finite(w), finite(h), self.window);
        self.add_mirror(rect)
    }

    fn targets_mirror(&self, id: &str) -> bool {
        match &self.interaction {
            Interaction::Moving(drag) => drag.mirror_id == id,
            Interaction::Resizing(drag) => drag.mirror_id == id,
            Interaction::ColorPicking { mirror_id } => mirror_id == id,
            _ => false,
        }
    }

    pub fn remove_mirror(&mut self, id: &str) -> bool {
        let before = self.mirrors.len();
        self.mirrors.retain(|m| m.id != id);
        if self.mirrors.len() == before {
            return false;
        }
        if self.targets_mirror(id) {
            self.interaction = Interaction::Idle;
        }
        info!(mirror = %id, "Mirror removed");
        self.save_mirrors();
        true
    }

    pub fn clear_mirrors(&mut self) {
        if matches!(
            self.interaction,
            Interaction::Moving(_) | Interaction::Resizing(_) | Interaction::ColorPicking { .. }
        ) {
            self.interaction = Interaction::Idle;
        }
        info!(count = self.mirrors.len(), "Mirrors cleared");
        self.mirrors.clear();
        self.save_mirrors();
    }

    pub fn set_mirror_visibility(&mut self, id: &str, visible_in: Visibility) -> bool {
        let (window, variant) = (self.window, self.variant);
        let Some(index) = self.mirrors.iter().position(|m| m.id == id) else {
            return false;
        };
        let mirror = &mut self.mirrors[index];
        mirror.visible_in = visible_in;
        if mirror.visible_in_variant(variant) {
            mirror.reclamp(window, index);
        }
        debug!(mirror = %id, visible_in = visible_in.as_str(), "Mirror visibility changed");
        self.save_mirrors();
        true
    }

    /// Replace the source rect from loose numeric fields, clamped into the window
    pub fn set_mirror_rect(&mut self, id: &str, x: f64, y: f64, w: f64, h: f64) -> bool {
        let rect = SourceRect::from_parts(finite(x), finite(y), finite(w), finite(h), self.window);
        let Some(mirror) = self.mirror_mut(id) else {
            return false;
        };
        if mirror.rect == rect {
            return false;
        }
        mirror.rect = rect;
        self.save_mirrors();
        true
    }

    /// Centre the on-screen placement, size unchanged
    pub fn center_mirror(&mut self, id: &str) -> bool {
        let Some(mirror) = self.mirror_mut(id) else {
            return false;
        };
        let p = &mut mirror.placement;
        p.screen_x = clamp_position((100.0 - p.screen_w) * 0.5);
        p.screen_y = clamp_position((100.0 - p.screen_h) * 0.5);
        self.save_mirrors();
        true
    }

    /// Add a typed colour key; rejected keys leave the mirror unchanged
    pub fn add_mirror_key(&mut self, id: &str, raw: &str) -> bool {
        let Some(mirror) = self.mirror_mut(id) else {
            return false;
        };
        if mirror.add_color_key(raw).is_err() {
            return false;
        }
        self.save_mirrors();
        true
    }

    pub fn remove_mirror_key(&mut self, id: &str, key: &str) -> bool {
        let Some(mirror) = self.mirror_mut(id) else {
            return false;
        };
        if !mirror.keys.remove(key) {
            return false;
        }
        self.save_mirrors();
        true
    }

    pub fn clear_mirror_keys(&mut self, id: &str) -> bool {
        let Some(mirror) = self.mirror_mut(id) else {
            return false;
        };
        if mirror.keys.is_empty() {
            return false;
        }
        mirror.keys.clear();
        self.save_mirrors();
        true
    }

    // ---- pixels ----

    fn record_read<T>(&mut self, result: &Result<T, PixelReadError>) {
        match result {
            Ok(_) => self.keying_blocked = false,
            Err(PixelReadError::Blocked) => {
                if !self.keying_blocked {
                    warn!("Pixel reads blocked, colour keying paused");
                }
                self.keying_blocked = true;
            }
            Err(PixelReadError::OutOfBounds { .. }) => {}
        }
    }

    /// Keyed RGBA buffer of a mirror (`rect.w * rect.h`), `None` when the
    /// backdrop cannot be read
    pub fn mirror_overlay(&mut self, index: usize) -> Option<Vec<u8>> {
        let mirror = self.mirrors.get(index)?;
        let result = overlay_image(&self.canvas_pixels(), mirror.rect, &mirror.keys);
        self.record_read(&result);
        result.ok()
    }

    /// Colour under a viewport point for the colour picker: the keyed overlay
    /// first, then the mirror's source pixel, then the canvas.
    fn pick_color(&mut self, pos: (f64, f64)) -> Option<String> {
        let canvas = self.canvas();
        let boxes = self.mirror_boxes();
        let screens: Vec<ScreenBox> = boxes.iter().map(|b| b.screen).collect();

        let mut source_read = None;
        let mut picked = None;
        if let Some(Hit { index, .. }) = hit_test(&screens, pos.0, pos.1) {
            let mirror_box = boxes[index];
            let mirror = &self.mirrors[mirror_box.index];
            let (ux, uy) = relative_position(&mirror_box.screen, pos.0, pos.1);
            let pixels = self.canvas_pixels();
            picked = sample_overlay(&pixels, mirror.rect, &mirror.keys, ux, uy);
            if picked.is_none() {
                let result = sample_mirror_source(&pixels, mirror.rect, ux, uy);
                picked = result.as_ref().ok().cloned();
                source_read = Some(result);
            }
        }
        if let Some(result) = source_read {
            self.record_read(&result);
        }
        if picked.is_some() {
            return picked;
        }

        let (wx, wy) = point_to_window(&canvas, self.window, pos.0, pos.1, false);
        let result = sample_canvas(&self.canvas_pixels(), wx, wy);
        self.record_read(&result);
        result.ok()
    }

    // ---- interaction modes ----

    /// Enter `next`; a move or resize being replaced is persisted once
    fn replace_interaction(&mut self, next: Interaction) {
        let previous = std::mem::replace(&mut self.interaction, next);
        if matches!(previous, Interaction::Moving(_) | Interaction::Resizing(_)) {
            self.save_mirrors();
        }
        debug!(mode = self.interaction.label(), "Interaction changed");
    }

    pub fn set_selection_mode(&mut self, enabled: bool) {
        if enabled {
            self.replace_interaction(Interaction::Creating(None));
        } else if self.interaction.is_creating() {
            self.replace_interaction(Interaction::Idle);
        }
    }

    pub fn toggle_selection_mode(&mut self) {
        let enabled = !self.interaction.is_creating();
        self.set_selection_mode(enabled);
    }

    pub fn start_color_pick(&mut self, id: &str) -> bool {
        if self.mirror(id).is_none() {
            return false;
        }
        self.replace_interaction(Interaction::ColorPicking {
            mirror_id: id.to_string(),
        });
        true
    }

    /// End whatever mode is active. Returns false when already idle.
    pub fn cancel_interaction(&mut self) -> bool {
        if self.interaction.is_idle() {
            return false;
        }
        self.replace_interaction(Interaction::Idle);
        true
    }

    fn point_on_window(&self, pos: (f64, f64)) -> (f64, f64) {
        point_to_window(&self.canvas(), self.window, pos.0, pos.1, true)
    }

    /// Returns true when the press was consumed
    pub fn pointer_down(&mut self, button: PointerButton, pos: (f64, f64)) -> bool {
        self.zoom_anchor = Some(pos);
        match button {
            PointerButton::Primary => self.primary_down(pos),
            PointerButton::Middle => {
                if !self.interaction.is_idle() {
                    return false;
                }
                match self.zoom_pan.begin_pan_drag(&self.surface(), pos) {
                    Some(drag) => {
                        self.interaction = Interaction::Panning(drag);
                        true
                    }
                    None => false,
                }
            }
            PointerButton::Secondary => false,
        }
    }

    fn primary_down(&mut self, pos: (f64, f64)) -> bool {
        match &self.interaction {
            Interaction::ColorPicking { mirror_id } => {
                let target = mirror_id.clone();
                if let Some(color) = self.pick_color(pos) {
                    if let Some(mirror) = self.mirror_mut(&target) {
                        if mirror.add_color_key(&color).is_ok() {
                            self.save_mirrors();
                        }
                    }
                    self.replace_interaction(Interaction::Idle);
                }
                true
            }
            Interaction::Creating(None) => {
                if !self.canvas().contains(pos.0, pos.1) {
                    return false;
                }
                let point = self.point_on_window(pos);
                self.interaction = Interaction::Creating(Some(SelectionDrag {
                    start: point,
                    current: point,
                }));
                true
            }
            Interaction::Idle => {
                let boxes = self.mirror_boxes();
                let screens: Vec<ScreenBox> = boxes.iter().map(|b| b.screen).collect();
                let Some(hit) = hit_test(&screens, pos.0, pos.1) else {
                    return false;
                };
                let mirror = &self.mirrors[boxes[hit.index].index];
                self.interaction = match hit.handle {
                    Some(handle) => Interaction::Resizing(ResizeDrag::new(
                        mirror.id.clone(),
                        handle,
                        pos,
                        mirror.placement,
                        mirror.rect,
                    )),
                    None => Interaction::Moving(MoveDrag {
                        mirror_id: mirror.id.clone(),
                        start_pointer: pos,
                        start: mirror.placement,
                    }),
                };
                true
            }
            _ => false,
        }
    }

    pub fn pointer_move(&mut self, pos: (f64, f64), modifiers: Modifiers) {
        self.zoom_anchor = Some(pos);
        match self.interaction.clone() {
            Interaction::Panning(drag) => {
                let surface = self.surface();
                self.zoom_pan.update_pan_drag(&surface, &drag, pos);
            }
            Interaction::Creating(Some(mut drag)) => {
                drag.current = self.point_on_window(pos);
                self.interaction = Interaction::Creating(Some(drag));
            }
            Interaction::Moving(drag) => {
                let placement = drag.placement_at(pos, &self.canvas());
                if let Some(mirror) = self.mirror_mut(&drag.mirror_id) {
                    mirror.placement = placement;
                }
            }
            Interaction::Resizing(drag) => {
                let step = drag.step(pos, &self.canvas(), modifiers, self.window);
                if let Some(mirror) = self.mirror_mut(&drag.mirror_id) {
                    mirror.placement = step.placement;
                    if let Some(rect) = step.rect {
                        mirror.rect = rect;
                    }
                }
            }
            _ => {}
        }
    }

    pub fn pointer_up(&mut self, button: PointerButton, pos: (f64, f64)) {
        match (button, self.interaction.clone()) {
            (PointerButton::Middle, Interaction::Panning(_)) => {
                self.interaction = Interaction::Idle;
            }
            (PointerButton::Primary, Interaction::Creating(Some(mut drag))) => {
                drag.current = self.point_on_window(pos);
                self.interaction = Interaction::Idle;
                self.add_mirror(drag.to_rect(self.window));
            }
            (PointerButton::Primary, Interaction::Moving(_) | Interaction::Resizing(_)) => {
                self.replace_interaction(Interaction::Idle);
            }
            _ => {}
        }
    }

    /// Pointer left the viewport; the zoom buttons fall back to the centre
    pub fn pointer_left(&mut self) {
        self.zoom_anchor = None;
    }

    pub fn wheel(&mut self, input: WheelInput) -> WheelOutcome {
        self.zoom_anchor = Some(input.pointer);
        let pan_allowed =
            self.variant == DisplayVariant::Tall && !self.interaction.blocks_wheel_pan();
        let surface = self.surface();
        let before = self.zoom_pan.zoom();
        let outcome = self.zoom_pan.wheel(&surface, input, pan_allowed);
        if outcome == WheelOutcome::Zoomed && self.zoom_pan.zoom() <= MIN_ZOOM && before > MIN_ZOOM {
            self.end_pan_drag();
        }
        outcome
    }

    fn end_pan_drag(&mut self) {
        if matches!(self.interaction, Interaction::Panning(_)) {
            self.interaction = Interaction::Idle;
        }
    }

    fn zoom_to(&mut self, zoom: f64, reset_pan: bool, anchor: Option<(f64, f64)>) -> ZoomOutcome {
        let surface = self.surface();
        let outcome = self.zoom_pan.set_zoom(&surface, zoom, reset_pan, anchor);
        if outcome.pan_reset {
            self.end_pan_drag();
        }
        outcome
    }

    pub fn zoom_in(&mut self) -> ZoomOutcome {
        self.zoom_to(self.zoom_pan.zoom() + ZOOM_STEP, false, self.zoom_anchor)
    }

    pub fn zoom_out(&mut self) -> ZoomOutcome {
        self.zoom_to(self.zoom_pan.zoom() - ZOOM_STEP, false, self.zoom_anchor)
    }

    pub fn zoom_reset(&mut self) -> ZoomOutcome {
        self.zoom_to(MIN_ZOOM, true, None)
    }

    // ---- keyboard ----

    /// Arm key capture for `action`; arming the same action again cancels
    pub fn begin_keybind_capture(&mut self, action: Action) {
        self.keybind_capture = if self.keybind_capture == Some(action) {
            None
        } else {
            Some(action)
        };
    }

    pub fn set_keybind(&mut self, action: Action, code: &str) {
        self.keybinds.set(action, code);
        info!(action = action.label(), code = self.keybinds.get(action), "Keybind updated");
        self.keybinds.save(self.store.as_ref());
    }

    /// Handle a physical key press. `text_focus` is true while a text field
    /// has keyboard focus. Returns true when the key was consumed.
    pub fn key_down(&mut self, code: &str, modifiers: Modifiers, text_focus: bool) -> bool {
        if code == "Escape" {
            // One press clears both a pending capture and the active mode
            let captured = self.keybind_capture.take().is_some();
            if self.cancel_interaction() || captured {
                return true;
            }
        }
        if let Some(action) = self.keybind_capture {
            if MODIFIER_CODES.contains(&code) {
                return true;
            }
            self.set_keybind(action, code);
            self.keybind_capture = None;
            return true;
        }
        if modifiers.command_held() || text_focus {
            return false;
        }
        match self.keybinds.find_action(code) {
            Some(action) => {
                self.run_action(action);
                true
            }
            None => false,
        }
    }

    // ---- settings groups ----

    pub fn update_theme(&mut self, raw: &Value) {
        self.theme = ThemeSettings::normalize(raw);
        self.theme.save(self.store.as_ref());
    }

    pub fn update_window_settings(&mut self, raw: &Value) {
        self.window_settings = WindowSettings::normalize(raw);
        self.window_settings.save(self.store.as_ref());
    }

    /// The overlay canvas always follows the base resolution
    pub fn update_tall_overlay(&mut self, raw: &Value) {
        self.tall_overlay = TallOverlaySettings::normalize(raw);
        self.tall_overlay.sync_canvas_to(self.base.window_size());
        self.tall_overlay.save(self.store.as_ref());
    }

    /// Eye-measure strip laid over the tall projector box
    pub fn projector_strip(&self) -> Option<OverlayStrip> {
        self.layout()
            .projector
            .map(|b| OverlayStrip::layout(&self.tall_overlay, b.width, b.height))
    }

    /// Eye-measure overlay rendered at its canvas size
    pub fn tall_overlay_image(&self) -> Result<PixelImage> {
        render_overlay(
            &self.tall_overlay,
            self.tall_overlay.canvas_width,
            self.tall_overlay.canvas_height,
        )
    }

    /// `eyemeasure-overlay-<W>x<H>.png` for the current canvas size
    pub fn tall_overlay_filename(&self) -> String {
        overlay_filename(self.tall_overlay.canvas_width, self.tall_overlay.canvas_height)
    }

    pub fn export_tall_overlay(&self, path: &Path) -> Result<()> {
        let image = self.tall_overlay_image()?;
        encode_png(&image, path)?;
        info!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "Exported eye-measure overlay"
        );
        Ok(())
    }

    // ---- export and status ----

    pub fn export_source(&self) -> ExportSource<'_> {
        ExportSource {
            mirrors: &self.mirrors,
            base: self.base.window_size(),
            keybinds: &self.keybinds,
            theme: &self.theme,
            window: &self.window_settings,
        }
    }

    pub fn export_json(&self) -> Result<String> {
        render_export(&build_export(&self.export_source()))
    }

    pub fn status_text(&self) -> String {
        let auto = if self.gui_scale_setting == 0 { " (Auto)" } else { "" };
        let keying = if self.keying_blocked { "blocked" } else { "active" };
        let zoom = (self.zoom_pan.zoom() * 100.0).round();
        format!(
            "Window {}x{} | GUI Scale {}{} | Scaled GUI {}x{} | BG: {} | Keying: {} | Zoom: {}% | View: {} | Mirrors: {}/{}",
            self.window.width,
            self.window.height,
            self.effective_gui_scale,
            auto,
            self.scaled.0,
            self.scaled.1,
            self.active_background().status_label(),
            keying,
            zoom,
            self.variant.as_str(),
            self.mirrors_for_current_variant().len(),
            self.mirrors.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::decode_png;
    use crate::pixels::PixelSource;
    use crate::storage::MemoryStore;
    use crate::viewport::WheelDeltaMode;
    use serde_json::json;
    use std::sync::Arc;

    fn app_with(store: &Arc<MemoryStore>) -> AppState {
        let mut app = AppState::new(Box::new(Arc::clone(store)), 0);
        app.set_viewport(960.0, 540.0, 1.0);
        app
    }

    fn backing(store: &MemoryStore) -> &dyn Store {
        store
    }

    fn fresh() -> (Arc<MemoryStore>, AppState) {
        let store = Arc::new(MemoryStore::new());
        let app = app_with(&store);
        (store, app)
    }

    fn wheel_input(delta_y: f64, ctrl: bool) -> WheelInput {
        WheelInput {
            delta_x: 0.0,
            delta_y,
            mode: WheelDeltaMode::Line,
            ctrl,
            shift: false,
            pointer: (480.0, 270.0),
        }
    }

    fn stored_mirrors_json(store: &Arc<MemoryStore>) -> Vec<Value> {
        load_json(backing(&store), MIRRORS)
            .and_then(|v| v.as_array().cloned())
            .unwrap_or_default()
    }

    #[test]
    fn test_defaults_on_empty_store() {
        let (_, app) = fresh();
        assert_eq!(app.window(), WindowSize::new(1920, 1080));
        assert_eq!(app.effective_gui_scale(), 4);
        assert_eq!(app.scaled_gui_size(), (480, 270));
        assert_eq!(app.variant(), DisplayVariant::Preset);
        assert!(app.mirrors().is_empty());
        assert!(app.interaction().is_idle());
    }

    #[test]
    fn test_user_resolution_persists_base_and_overlay() {
        let (store, mut app) = fresh();
        app.apply_user_resolution(1366.7, 100.0);
        assert_eq!(app.window(), WindowSize::new(1366, MIN_HEIGHT));
        assert_eq!(app.tall_overlay().canvas_width, 1366);

        let reopened = app_with(&store);
        assert_eq!(reopened.base(), BaseResolution { width: 1366, height: MIN_HEIGHT });
        assert_eq!(reopened.window(), WindowSize::new(1366, MIN_HEIGHT));
        assert_eq!(reopened.tall_overlay().canvas_height, MIN_HEIGHT);
    }

    #[test]
    fn test_variant_toggles_restore_base() {
        let (store, mut app) = fresh();
        app.run_action(Action::Wide);
        assert_eq!(app.variant(), DisplayVariant::Wide);
        assert_eq!(app.window(), WindowSize::new(1920, 300));
        assert_eq!(app.crop_mode(), CropMode::Contain);

        app.run_action(Action::Tall);
        assert_eq!(app.window(), WindowSize::new(384, 16384));
        assert_eq!(app.crop_mode(), CropMode::Crop);

        app.run_action(Action::Tall);
        assert_eq!(app.variant(), DisplayVariant::Preset);
        assert_eq!(app.window(), WindowSize::new(1920, 1080));

        // Toggles never persist the base resolution
        assert_eq!(load_json(backing(&store), crate::constants::storage::BASE_RESOLUTION), None);

        app.run_action(Action::OpenNinjabrain);
        assert_eq!(app.variant(), DisplayVariant::Preset);
    }

    #[test]
    fn test_new_mirror_visibility_follows_variant() {
        let (_, mut app) = fresh();
        app.run_action(Action::Thin);
        let id = app.add_mirror_from_fields(0.0, 0.0, 320.0, 180.0);
        assert_eq!(app.mirror(&id).map(|m| m.visible_in), Some(Visibility::Thin));
        app.run_action(Action::Thin);
        let id = app.add_mirror_from_fields(0.0, 0.0, f64::NAN, 180.0);
        assert_eq!(app.mirror(&id).map(|m| m.visible_in), Some(Visibility::All));
    }

    #[test]
    fn test_hidden_mirror_kept_but_excluded() {
        let store = Arc::new(MemoryStore::new());
        save_json(
            backing(&store),
            MIRRORS,
            &json!([
                { "x": 10, "y": 10, "w": 100, "h": 5000, "visibleIn": "tall" },
                { "x": 0, "y": 0, "w": 50, "h": 50, "visibleIn": "all" },
            ]),
        );
        let mut app = app_with(&store);
        app.run_action(Action::Wide);

        let visible = app.mirrors_for_current_variant();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].visible_in, Visibility::All);

        let export: Value = serde_json::from_str(&app.export_json().unwrap()).unwrap();
        assert_eq!(export["resolutions"]["wide"]["mirrors"].as_array().map(Vec::len), Some(1));
        assert_eq!(export["resolutions"]["tall"]["mirrors"].as_array().map(Vec::len), Some(2));

        // Hidden tall mirror keeps its geometry meant for the tall window
        let tall = &app.mirrors()[0];
        assert_eq!(tall.rect.h, 5000);
        app.add_mirror_from_fields(0.0, 0.0, 10.0, 10.0);
        let stored = stored_mirrors_json(&store);
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[0]["visibleIn"], json!("tall"));
        assert_eq!(stored[0]["h"], json!(5000));
    }

    #[test]
    fn test_area_pick_creates_mirror() {
        let (store, mut app) = fresh();
        app.toggle_selection_mode();
        assert!(app.interaction().is_creating());

        assert!(app.pointer_down(PointerButton::Primary, (100.0, 50.0)));
        app.pointer_move((260.0, 140.0), Modifiers::default());
        let selection = app.selection_box().unwrap();
        assert_eq!((selection.left, selection.top), (100.0, 50.0));
        assert_eq!((selection.width, selection.height), (160.0, 90.0));

        app.pointer_up(PointerButton::Primary, (260.0, 140.0));
        assert!(app.interaction().is_idle());
        let mirror = &app.mirrors()[0];
        assert_eq!(mirror.rect, SourceRect { x: 200, y: 100, w: 320, h: 180 });
        assert_eq!(stored_mirrors_json(&store).len(), 1);
    }

    #[test]
    fn test_move_then_resize_persist_on_release() {
        let (store, mut app) = fresh();
        let id = app.add_mirror(SourceRect { x: 0, y: 0, w: 320, h: 180 });

        // Box is 160x90 at the canvas origin
        assert!(app.pointer_down(PointerButton::Primary, (80.0, 45.0)));
        assert!(matches!(app.interaction(), Interaction::Moving(_)));
        app.pointer_move((176.0, 99.0), Modifiers::default());
        // Not persisted mid-drag
        assert_eq!(stored_mirrors_json(&store)[0]["screenX"], json!(0.0));
        app.pointer_up(PointerButton::Primary, (176.0, 99.0));
        let placement = app.mirror(&id).unwrap().placement;
        assert!((placement.screen_x - 10.0).abs() < 1e-9);
        assert!((placement.screen_y - 10.0).abs() < 1e-9);
        let stored_x = stored_mirrors_json(&store)[0]["screenX"].as_f64().unwrap();
        assert!((stored_x - 10.0).abs() < 1e-9);

        // East edge of the moved box sits at x = 96 + 160
        assert!(app.pointer_down(PointerButton::Primary, (256.0, 99.0)));
        assert!(matches!(app.interaction(), Interaction::Resizing(_)));
        app.pointer_move((352.0, 99.0), Modifiers::default());
        app.pointer_up(PointerButton::Primary, (352.0, 99.0));
        let placement = app.mirror(&id).unwrap().placement;
        assert!((placement.screen_w - (100.0 / 6.0 + 10.0)).abs() < 1e-9);
        assert!((placement.screen_x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_modes_are_exclusive() {
        let (_, mut app) = fresh();
        let id = app.add_mirror(SourceRect { x: 0, y: 0, w: 320, h: 180 });
        app.set_selection_mode(true);
        assert!(app.start_color_pick(&id));
        assert!(app.interaction().color_pick_target().is_some());
        assert!(!app.interaction().is_creating());

        app.set_selection_mode(true);
        assert!(app.interaction().color_pick_target().is_none());

        assert!(app.key_down("Escape", Modifiers::default(), false));
        assert!(app.interaction().is_idle());
        assert!(!app.start_color_pick("missing"));
    }

    #[test]
    fn test_color_pick_from_canvas_fill() {
        let (_, mut app) = fresh();
        let id = app.add_mirror(SourceRect { x: 0, y: 0, w: 320, h: 180 });
        app.start_color_pick(&id);
        // Outside the mirror box, inside the canvas
        assert!(app.pointer_down(PointerButton::Primary, (600.0, 400.0)));
        assert!(app.interaction().is_idle());
        let keys: Vec<&str> = app.mirror(&id).unwrap().keys.iter().collect();
        assert_eq!(keys, vec!["#2b313c"]);
        assert!(!app.keying_blocked());

        // Off-canvas pick samples nothing and stays armed
        app.set_viewport(1200.0, 540.0, 1.0);
        app.start_color_pick(&id);
        assert!(app.pointer_down(PointerButton::Primary, (5.0, 5.0)));
        assert!(app.interaction().color_pick_target().is_some());
    }

    #[test]
    fn test_keybind_capture_flow() {
        let (store, mut app) = fresh();
        app.begin_keybind_capture(Action::Wide);
        assert_eq!(app.keybind_capture(), Some(Action::Wide));
        // Modifiers alone are ignored while capturing
        assert!(app.key_down("ShiftLeft", Modifiers::default(), false));
        assert_eq!(app.keybind_capture(), Some(Action::Wide));
        assert!(app.key_down("KeyG", Modifiers::default(), false));
        assert_eq!(app.keybind_capture(), None);
        assert_eq!(app.keybinds().get(Action::Wide), "KeyG");
        assert_eq!(ActionKeybinds::load(backing(&store)).get(Action::Wide), "KeyG");

        // Bound key toggles, but not with Ctrl held or while typing
        let ctrl = Modifiers { ctrl: true, ..Modifiers::default() };
        assert!(!app.key_down("KeyG", ctrl, false));
        assert!(!app.key_down("KeyG", Modifiers::default(), true));
        assert_eq!(app.variant(), DisplayVariant::Preset);
        assert!(app.key_down("KeyG", Modifiers::default(), false));
        assert_eq!(app.variant(), DisplayVariant::Wide);

        // Escape cancels capture without binding; arming twice cancels too
        app.begin_keybind_capture(Action::Thin);
        assert!(app.key_down("Escape", Modifiers::default(), false));
        assert_eq!(app.keybinds().get(Action::Thin), "");
        app.begin_keybind_capture(Action::Thin);
        app.begin_keybind_capture(Action::Thin);
        assert_eq!(app.keybind_capture(), None);
    }

    #[test]
    fn test_zoom_buttons_and_status() {
        let (_, mut app) = fresh();
        assert!(!app.zoom_pan().can_reset());
        app.pointer_left();
        assert!(app.zoom_in().changed);
        assert_eq!(app.zoom_pan().zoom(), 1.25);
        assert!(app.status_text().contains("Zoom: 125%"));
        assert!(app.zoom_reset().pan_reset);
        assert_eq!(app.zoom_pan().zoom(), 1.0);
        assert_eq!(app.zoom_pan().pan(), (0.0, 0.0));

        let status = app.status_text();
        assert!(status.starts_with("Window 1920x1080 | GUI Scale 4 (Auto) | Scaled GUI 480x270"));
        assert!(status.contains("BG: missing"));
        assert!(status.contains("Keying: active"));
        assert!(status.ends_with("View: preset | Mirrors: 0/0"));
    }

    #[test]
    fn test_middle_pan_needs_slack() {
        let (_, mut app) = fresh();
        assert!(!app.pointer_down(PointerButton::Middle, (10.0, 10.0)));
        app.pointer_left();
        app.zoom_in();
        assert!(app.pointer_down(PointerButton::Middle, (10.0, 10.0)));
        app.pointer_move((30.0, 10.0), Modifiers::default());
        assert_eq!(app.zoom_pan().pan().0, 20.0);
        app.pointer_up(PointerButton::Middle, (30.0, 10.0));
        assert!(app.interaction().is_idle());
    }

    #[test]
    fn test_mirror_list_operations() {
        let (store, mut app) = fresh();
        let a = app.add_mirror_from_fields(0.0, 0.0, 320.0, 180.0);
        let b = app.add_mirror_from_fields(5000.0, 5000.0, 9999.0, 9999.0);
        let rect_b = app.mirror(&b).unwrap().rect;
        assert_eq!((rect_b.x, rect_b.y, rect_b.w, rect_b.h), (1919, 1079, 1, 1));

        assert!(app.add_mirror_key(&a, "00FF00"));
        assert!(!app.add_mirror_key(&a, "#00ff00"));
        assert!(!app.add_mirror_key(&a, "green"));
        assert!(app.remove_mirror_key(&a, "#00ff00"));
        assert!(!app.clear_mirror_keys(&a));

        assert!(app.set_mirror_rect(&a, 10.0, 20.0, 30.0, 40.0));
        assert_eq!(app.mirror(&a).unwrap().rect, SourceRect { x: 10, y: 20, w: 30, h: 40 });
        assert!(app.center_mirror(&a));

        assert!(app.set_mirror_visibility(&b, Visibility::Tall));
        assert_eq!(app.mirrors_for_current_variant().len(), 1);

        assert!(app.remove_mirror(&a));
        assert!(!app.remove_mirror(&a));
        assert_eq!(stored_mirrors_json(&store).len(), 1);
        app.clear_mirrors();
        assert!(stored_mirrors_json(&store).is_empty());
    }

    #[test]
    fn test_settings_updates_normalize_and_persist() {
        let (store, mut app) = fresh();
        app.update_theme(&json!({ "background": "#ABCDEF", "ninb_opacity": 9 }));
        assert_eq!(app.theme().background, "#abcdefff");
        app.update_window_settings(&json!({ "fullscreen_width": "2560" }));
        app.update_tall_overlay(&json!({ "canvasWidth": 5, "pixelCount": 12 }));
        assert_eq!(app.tall_overlay().canvas_width, 1920);

        let reopened = app_with(&store);
        assert_eq!(reopened.theme().ninb_opacity, 1.0);
        assert_eq!(reopened.window_settings().fullscreen_width, 2560);
        assert_eq!(reopened.tall_overlay().pixel_count, 12);
    }

    #[test]
    fn test_escape_clears_capture_and_mode_together() {
        let (_, mut app) = fresh();
        app.begin_keybind_capture(Action::Thin);
        app.set_selection_mode(true);
        assert!(app.key_down("Escape", Modifiers::default(), false));
        assert!(app.interaction().is_idle());
        assert_eq!(app.keybind_capture(), None);

        // The next key is not captured
        assert!(!app.key_down("KeyT", Modifiers::default(), false));
        assert_eq!(app.keybinds().get(Action::Thin), "");
    }

    #[test]
    fn test_wheel_pan_only_in_tall() {
        let (_, mut app) = fresh();
        app.pointer_left();
        app.zoom_in();
        // Slack exists at 125%, but the preset view never wheel-pans
        assert_eq!(app.wheel(wheel_input(2.0, false)), WheelOutcome::Ignored);
        assert_eq!(app.zoom_pan().pan(), (0.0, 0.0));
        app.zoom_reset();

        app.run_action(Action::Tall);
        assert_eq!(app.wheel(wheel_input(2.0, false)), WheelOutcome::Panned);
        assert_eq!(app.zoom_pan().pan(), (0.0, -48.0));
    }

    #[test]
    fn test_wheel_pan_gated_by_interaction() {
        let (_, mut app) = fresh();
        app.run_action(Action::Tall);
        let id = app.add_mirror(SourceRect { x: 0, y: 8000, w: 384, h: 200 });

        app.set_selection_mode(true);
        assert_eq!(app.wheel(wheel_input(2.0, false)), WheelOutcome::Ignored);
        assert!(app.start_color_pick(&id));
        assert_eq!(app.wheel(wheel_input(2.0, false)), WheelOutcome::Ignored);
        assert_eq!(app.zoom_pan().pan(), (0.0, 0.0));
        app.cancel_interaction();

        // Dragging a mirror does not block wheel panning
        let b = app.mirror_boxes()[0].screen;
        assert!(app.pointer_down(PointerButton::Primary, (b.left + b.width / 2.0, b.top + b.height / 2.0)));
        assert!(matches!(app.interaction(), Interaction::Moving(_)));
        assert_eq!(app.wheel(wheel_input(2.0, false)), WheelOutcome::Panned);
        assert_eq!(app.zoom_pan().pan().1, -48.0);
    }

    #[test]
    fn test_ctrl_wheel_to_min_ends_pan_drag() {
        let (_, mut app) = fresh();
        app.pointer_left();
        app.zoom_in();
        assert!(app.pointer_down(PointerButton::Middle, (10.0, 10.0)));
        assert!(matches!(app.interaction(), Interaction::Panning(_)));

        assert_eq!(app.wheel(wheel_input(3.0, true)), WheelOutcome::Zoomed);
        assert_eq!(app.zoom_pan().zoom(), 1.0);
        assert!(app.interaction().is_idle());
    }

    #[test]
    fn test_projector_strip_only_in_tall() {
        let (_, mut app) = fresh();
        assert!(app.projector_strip().is_none());
        app.run_action(Action::Tall);
        let projector = app.layout().projector.unwrap();
        let strip = app.projector_strip().unwrap();
        assert_eq!(strip.cells.len(), 18);
        assert_eq!(strip.cells[9].rect.x, projector.width / 2.0);
        assert_eq!(strip.center_line.h, projector.height);
    }

    #[test]
    fn test_export_tall_overlay_png() {
        let (_, mut app) = fresh();
        app.apply_user_resolution(1280.0, 720.0);
        app.update_tall_overlay(&json!({ "pixelCount": 2, "colorA": "#102030" }));
        assert_eq!(app.tall_overlay_filename(), "eyemeasure-overlay-1280x720.png");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(app.tall_overlay_filename());
        app.export_tall_overlay(&path).unwrap();
        let image = decode_png(&path).unwrap();
        assert_eq!((image.width(), image.height()), (1280, 720));
        // First cell right of centre takes colour A; the corner stays clear
        assert_eq!(image.pixel(650, 360).unwrap(), [0x10, 0x20, 0x30, 255]);
        assert_eq!(image.pixel(0, 0).unwrap(), [0, 0, 0, 0]);
    }
}
