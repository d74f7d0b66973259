//! Pointer interaction modes and the drag/resize math behind them
//!
//! Exactly one [`Interaction`] is active at a time. The application owns the
//! value; entering a new mode replaces the old one.

use crate::constants::mirror::{HANDLE_GRAB_PX, MIN_SIZE};
use crate::math::{clamp, round_half_up};
use crate::mirror::{Placement, SourceRect, clamp_position, clamp_size};
use crate::types::{ScreenBox, WindowSize};
use crate::viewport::PanDrag;

/// Keyboard modifiers held during a pointer or key event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl, Alt or Meta held; global action keys are ignored then
    pub fn command_held(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Edge set being dragged by a resize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeHandle {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl ResizeHandle {
    pub fn is_corner(&self) -> bool {
        (self.left || self.right) && (self.top || self.bottom)
    }
}

/// Drag-to-create state, in window pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionDrag {
    pub start: (f64, f64),
    pub current: (f64, f64),
}

impl SelectionDrag {
    /// Rect spanned by the drag: floor of the minimum, ceil of the maximum,
    /// at least one pixel and inside the window.
    pub fn to_rect(&self, window: WindowSize) -> SourceRect {
        let max_w = f64::from(window.width);
        let max_h = f64::from(window.height);
        let left = clamp(self.start.0.min(self.current.0).floor(), 0.0, (max_w - 1.0).max(0.0));
        let top = clamp(self.start.1.min(self.current.1).floor(), 0.0, (max_h - 1.0).max(0.0));
        let right = clamp(self.start.0.max(self.current.0).ceil(), left + 1.0, max_w);
        let bottom = clamp(self.start.1.max(self.current.1).ceil(), top + 1.0, max_h);
        SourceRect::from_parts(
            Some(left),
            Some(top),
            Some(right - left),
            Some(bottom - top),
            window,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveDrag {
    pub mirror_id: String,
    pub start_pointer: (f64, f64),
    pub start: Placement,
}

impl MoveDrag {
    /// Placement after moving the pointer to `pointer` over `canvas`
    pub fn placement_at(&self, pointer: (f64, f64), canvas: &ScreenBox) -> Placement {
        let dx = (pointer.0 - self.start_pointer.0) / canvas.width.max(1.0) * 100.0;
        let dy = (pointer.1 - self.start_pointer.1) / canvas.height.max(1.0) * 100.0;
        Placement {
            screen_x: clamp_position(self.start.screen_x + dx),
            screen_y: clamp_position(self.start.screen_y + dy),
            ..self.start
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeDrag {
    pub mirror_id: String,
    pub handle: ResizeHandle,
    pub start_pointer: (f64, f64),
    pub start: Placement,
    pub start_rect: SourceRect,
    /// Screen-space width / height at drag start
    pub aspect: f64,
    /// Source-space width / height at drag start
    pub source_aspect: f64,
}

/// Outcome of one resize step; `rect` is only set in source-rect mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeStep {
    pub placement: Placement,
    pub rect: Option<SourceRect>,
}

/// Moving edges of a box, with the aspect-locked corner rule
struct Edges {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl Edges {
    fn set_width(&mut self, handle: ResizeHandle, width: f64) {
        if handle.left {
            self.left = self.right - width;
        } else {
            self.right = self.left + width;
        }
    }

    fn set_height(&mut self, handle: ResizeHandle, height: f64) {
        if handle.top {
            self.top = self.bottom - height;
        } else {
            self.bottom = self.top + height;
        }
    }

    fn enforce_min(&mut self, handle: ResizeHandle, min: f64) {
        if self.right - self.left < min {
            if handle.left && !handle.right {
                self.left = self.right - min;
            } else {
                self.right = self.left + min;
            }
        }
        if self.bottom - self.top < min {
            if handle.top && !handle.bottom {
                self.top = self.bottom - min;
            } else {
                self.bottom = self.top + min;
            }
        }
    }
}

impl ResizeDrag {
    pub fn new(
        mirror_id: String,
        handle: ResizeHandle,
        start_pointer: (f64, f64),
        start: Placement,
        start_rect: SourceRect,
    ) -> Self {
        Self {
            mirror_id,
            handle,
            start_pointer,
            start,
            start_rect,
            aspect: start.screen_w / start.screen_h.max(0.001),
            source_aspect: f64::from(start_rect.w) / f64::from(start_rect.h).max(0.001),
        }
    }

    /// Resize toward `pointer`. Alt resizes the source rect, Shift disables
    /// the corner aspect lock.
    pub fn step(
        &self,
        pointer: (f64, f64),
        canvas: &ScreenBox,
        modifiers: Modifiers,
        window: WindowSize,
    ) -> ResizeStep {
        let canvas_w = canvas.width.max(1.0);
        let canvas_h = canvas.height.max(1.0);
        let dx_px = pointer.0 - self.start_pointer.0;
        let dy_px = pointer.1 - self.start_pointer.1;
        let lock_aspect = !modifiers.shift && self.handle.is_corner();
        if modifiers.alt {
            self.step_source(dx_px, dy_px, canvas_w, canvas_h, lock_aspect, window)
        } else {
            let dx = dx_px / canvas_w * 100.0;
            let dy = dy_px / canvas_h * 100.0;
            self.step_placement(dx, dy, lock_aspect)
        }
    }

    fn step_placement(&self, dx: f64, dy: f64, lock_aspect: bool) -> ResizeStep {
        let handle = self.handle;
        let start = self.start;
        let mut edges = Edges {
            left: start.screen_x,
            top: start.screen_y,
            right: start.right(),
            bottom: start.bottom(),
        };
        if handle.left {
            edges.left += dx;
        }
        if handle.right {
            edges.right += dx;
        }
        if handle.top {
            edges.top += dy;
        }
        if handle.bottom {
            edges.bottom += dy;
        }

        if lock_aspect {
            let ratio = self.aspect.max(0.001);
            let width_delta = if handle.left { -dx } else { dx };
            let height_delta = if handle.top { -dy } else { dy };
            let width_norm = width_delta / start.screen_w.max(1.0);
            let height_norm = height_delta / start.screen_h.max(1.0);
            let (next_w, next_h) = if width_norm.abs() >= height_norm.abs() {
                let w = clamp_size(start.screen_w + width_delta);
                (w, clamp_size(w / ratio))
            } else {
                let h = clamp_size(start.screen_h + height_delta);
                (clamp_size(h * ratio), h)
            };
            edges.set_width(handle, next_w);
            edges.set_height(handle, next_h);
        } else {
            edges.enforce_min(handle, MIN_SIZE);
        }

        ResizeStep {
            placement: Placement {
                screen_x: clamp_position(edges.left),
                screen_y: clamp_position(edges.top),
                screen_w: clamp_size(edges.right - edges.left),
                screen_h: clamp_size(edges.bottom - edges.top),
            },
            rect: None,
        }
    }

    fn step_source(
        &self,
        dx_px: f64,
        dy_px: f64,
        canvas_w: f64,
        canvas_h: f64,
        lock_aspect: bool,
        window: WindowSize,
    ) -> ResizeStep {
        let handle = self.handle;
        let start = self.start;
        let src = self.start_rect;
        let (src_w, src_h) = (f64::from(src.w), f64::from(src.h));
        let start_screen_w_px = (start.screen_w / 100.0 * canvas_w).max(1.0);
        let start_screen_h_px = (start.screen_h / 100.0 * canvas_h).max(1.0);
        let dx = dx_px * (src_w / start_screen_w_px);
        let dy = dy_px * (src_h / start_screen_h_px);

        let mut edges = Edges {
            left: f64::from(src.x),
            top: f64::from(src.y),
            right: f64::from(src.right()),
            bottom: f64::from(src.bottom()),
        };
        if handle.left {
            edges.left += dx;
        }
        if handle.right {
            edges.right += dx;
        }
        if handle.top {
            edges.top += dy;
        }
        if handle.bottom {
            edges.bottom += dy;
        }

        if lock_aspect {
            let ratio = self.source_aspect.max(0.001);
            let width_delta = if handle.left { -dx } else { dx };
            let height_delta = if handle.top { -dy } else { dy };
            let width_norm = width_delta / src_w.max(1.0);
            let height_norm = height_delta / src_h.max(1.0);
            let (next_w, next_h) = if width_norm.abs() >= height_norm.abs() {
                let w = round_half_up(src_w + width_delta).max(1.0);
                (w, round_half_up(w / ratio).max(1.0))
            } else {
                let h = round_half_up(src_h + height_delta).max(1.0);
                (round_half_up(h * ratio).max(1.0), h)
            };
            edges.set_width(handle, next_w);
            edges.set_height(handle, next_h);
        }
        edges.enforce_min(handle, 1.0);

        let rect = SourceRect::from_parts(
            Some(round_half_up(edges.left)),
            Some(round_half_up(edges.top)),
            Some(round_half_up(edges.right - edges.left)),
            Some(round_half_up(edges.bottom - edges.top)),
            window,
        );
        let scale_x = start.screen_w / src_w.max(1.0);
        let scale_y = start.screen_h / src_h.max(1.0);
        let screen_w = clamp_size(f64::from(rect.w) * scale_x);
        let screen_h = clamp_size(f64::from(rect.h) * scale_y);
        let screen_x = if handle.left && !handle.right {
            start.right() - screen_w
        } else {
            start.screen_x
        };
        let screen_y = if handle.top && !handle.bottom {
            start.bottom() - screen_h
        } else {
            start.screen_y
        };

        ResizeStep {
            placement: Placement {
                screen_x: clamp_position(screen_x),
                screen_y: clamp_position(screen_y),
                screen_w,
                screen_h,
            },
            rect: Some(rect),
        }
    }
}

/// The single active pointer interaction
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    /// Area pick armed; `Some` once the drag has started
    Creating(Option<SelectionDrag>),
    Moving(MoveDrag),
    Resizing(ResizeDrag),
    ColorPicking { mirror_id: String },
    Panning(PanDrag),
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_creating(&self) -> bool {
        matches!(self, Self::Creating(_))
    }

    pub fn color_pick_target(&self) -> Option<&str> {
        match self {
            Self::ColorPicking { mirror_id } => Some(mirror_id),
            _ => None,
        }
    }

    /// Selection and colour-pick modes swallow wheel panning
    pub fn blocks_wheel_pan(&self) -> bool {
        matches!(self, Self::Creating(_) | Self::ColorPicking { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Area pick: off",
            Self::Creating(_) => "Area pick: drag on canvas (Esc to cancel)",
            Self::ColorPicking { .. } => "Color pick: click anywhere on canvas (Esc to cancel)",
            Self::Moving(_) => "Moving mirror",
            Self::Resizing(_) => "Resizing mirror",
            Self::Panning(_) => "Panning",
        }
    }
}

/// What a pointer landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    /// Index into the box list passed to [`hit_test`]
    pub index: usize,
    /// Resize handle when the pointer is on the grab band
    pub handle: Option<ResizeHandle>,
}

/// Top-most (last) box under the point, with edge detection within the grab band
pub fn hit_test(boxes: &[ScreenBox], x: f64, y: f64) -> Option<Hit> {
    let band = HANDLE_GRAB_PX * 0.5;
    boxes.iter().enumerate().rev().find_map(|(index, b)| {
        let inflated = ScreenBox {
            left: b.left - band,
            top: b.top - band,
            width: b.width + band * 2.0,
            height: b.height + band * 2.0,
        };
        if !inflated.contains(x, y) {
            return None;
        }
        let (d_left, d_right) = ((x - b.left).abs(), (x - b.right()).abs());
        let (d_top, d_bottom) = ((y - b.top).abs(), (y - b.bottom()).abs());
        let left = d_left <= band && d_left <= d_right;
        let right = !left && d_right <= band;
        let top = d_top <= band && d_top <= d_bottom;
        let bottom = !top && d_bottom <= band;
        let handle = ResizeHandle {
            left,
            right,
            top,
            bottom,
        };
        let on_edge = left || right || top || bottom;
        Some(Hit {
            index,
            handle: on_edge.then_some(handle),
        })
    })
}

/// Relative position (`0..=1`) of a point inside a box
pub fn relative_position(b: &ScreenBox, x: f64, y: f64) -> (f64, f64) {
    (
        clamp((x - b.left) / b.width.max(1.0), 0.0, 1.0),
        clamp((y - b.top) / b.height.max(1.0), 0.0, 1.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const HD: WindowSize = WindowSize::new(1920, 1080);

    fn canvas() -> ScreenBox {
        ScreenBox {
            left: 0.0,
            top: 0.0,
            width: 1000.0,
            height: 500.0,
        }
    }

    fn placement(x: f64, y: f64, w: f64, h: f64) -> Placement {
        Placement {
            screen_x: x,
            screen_y: y,
            screen_w: w,
            screen_h: h,
        }
    }

    /// Compass handle name (`n`, `e`, `sw`, ...)
    fn compass(name: &str) -> ResizeHandle {
        ResizeHandle {
            left: name.contains('w'),
            right: name.contains('e'),
            top: name.contains('n'),
            bottom: name.contains('s'),
        }
    }

    fn resize(handle: &str, start: Placement, rect: SourceRect) -> ResizeDrag {
        ResizeDrag::new("m".into(), compass(handle), (500.0, 250.0), start, rect)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_handle_parse() {
        let se = compass("se");
        assert!(se.right && se.bottom && !se.left && !se.top);
        assert!(se.is_corner());
        assert!(!compass("n").is_corner());
        assert!(compass("nw").left);
    }

    #[test]
    fn test_selection_rect() {
        let drag = SelectionDrag {
            start: (100.7, 50.2),
            current: (10.2, 80.9),
        };
        assert_eq!(drag.to_rect(HD), SourceRect { x: 10, y: 50, w: 91, h: 31 });

        let click = SelectionDrag {
            start: (1920.0, 1080.0),
            current: (1920.0, 1080.0),
        };
        assert_eq!(click.to_rect(HD), SourceRect { x: 1919, y: 1079, w: 1, h: 1 });
    }

    #[test]
    fn test_move_uses_canvas_box() {
        let drag = MoveDrag {
            mirror_id: "m".into(),
            start_pointer: (100.0, 100.0),
            start: placement(10.0, 10.0, 20.0, 20.0),
        };
        let next = drag.placement_at((200.0, 50.0), &canvas());
        assert!(close(next.screen_x, 20.0));
        assert!(close(next.screen_y, 0.0));
        assert_eq!(next.screen_w, 20.0);

        let far = drag.placement_at((1e9, -1e9), &canvas());
        assert_eq!(far.screen_x, 5000.0);
        assert_eq!(far.screen_y, -5000.0);
    }

    #[test]
    fn test_resize_edge_moves_freely() {
        let drag = resize("e", placement(10.0, 10.0, 20.0, 20.0), SourceRect { x: 0, y: 0, w: 100, h: 100 });
        let step = drag.step((600.0, 400.0), &canvas(), Modifiers::default(), HD);
        assert!(close(step.placement.screen_w, 30.0));
        assert_eq!(step.placement.screen_h, 20.0);
        assert!(step.rect.is_none());
    }

    #[test]
    fn test_resize_min_size_from_left() {
        let drag = resize("w", placement(10.0, 10.0, 20.0, 20.0), SourceRect { x: 0, y: 0, w: 100, h: 100 });
        let step = drag.step((900.0, 250.0), &canvas(), Modifiers::default(), HD);
        // Left edge pushed past the right edge: pinned at right - min
        assert!(close(step.placement.screen_x, 30.0 - MIN_SIZE));
        assert!(close(step.placement.screen_w, MIN_SIZE));
    }

    #[test]
    fn test_resize_corner_locks_aspect() {
        let drag = resize("se", placement(0.0, 0.0, 20.0, 10.0), SourceRect { x: 0, y: 0, w: 100, h: 100 });
        // dx = 10%, dy = 2% -> width drives
        let step = drag.step((600.0, 260.0), &canvas(), Modifiers::default(), HD);
        assert!(close(step.placement.screen_w, 30.0));
        assert!(close(step.placement.screen_h, 15.0));

        let free = drag.step(
            (600.0, 260.0),
            &canvas(),
            Modifiers {
                shift: true,
                ..Modifiers::default()
            },
            HD,
        );
        assert!(close(free.placement.screen_w, 30.0));
        assert!(close(free.placement.screen_h, 12.0));
    }

    #[test]
    fn test_resize_corner_height_drives_from_top_left() {
        let drag = resize("nw", placement(50.0, 50.0, 10.0, 10.0), SourceRect { x: 0, y: 0, w: 100, h: 100 });
        // dx = -1%, dy = -10% -> height drives, grows up and left
        let step = drag.step((490.0, 200.0), &canvas(), Modifiers::default(), HD);
        assert!(close(step.placement.screen_h, 20.0));
        assert!(close(step.placement.screen_w, 20.0));
        assert!(close(step.placement.screen_x, 40.0));
        assert!(close(step.placement.screen_y, 40.0));
    }

    #[test]
    fn test_source_resize_rescales_placement() {
        // 10% of a 1000px canvas = 100 screen px for 200 source px
        let drag = resize("e", placement(5.0, 5.0, 10.0, 10.0), SourceRect { x: 100, y: 100, w: 200, h: 50 });
        let alt = Modifiers {
            alt: true,
            ..Modifiers::default()
        };
        let step = drag.step((550.0, 250.0), &canvas(), alt, HD);
        let rect = step.rect.unwrap();
        assert_eq!(rect, SourceRect { x: 100, y: 100, w: 300, h: 50 });
        assert!(close(step.placement.screen_w, 15.0));
        assert_eq!(step.placement.screen_h, 10.0);
        assert_eq!(step.placement.screen_x, 5.0);
    }

    #[test]
    fn test_source_resize_left_keeps_right_edge() {
        let drag = resize("w", placement(20.0, 5.0, 10.0, 10.0), SourceRect { x: 100, y: 100, w: 200, h: 50 });
        let alt = Modifiers {
            alt: true,
            ..Modifiers::default()
        };
        let step = drag.step((450.0, 250.0), &canvas(), alt, HD);
        let rect = step.rect.unwrap();
        assert_eq!(rect.x, 0);
        assert_eq!(rect.w, 300);
        assert!(close(step.placement.screen_x + step.placement.screen_w, 30.0));
    }

    #[test]
    fn test_source_resize_stays_in_window() {
        let drag = resize("se", placement(0.0, 0.0, 10.0, 10.0), SourceRect { x: 1800, y: 1000, w: 100, h: 50 });
        let alt = Modifiers {
            alt: true,
            ..Modifiers::default()
        };
        let step = drag.step((5000.0, 5000.0), &canvas(), alt, HD);
        let rect = step.rect.unwrap();
        assert!(rect.right() <= HD.width && rect.bottom() <= HD.height);
        assert!(rect.w >= 1 && rect.h >= 1);

        let shrink = drag.step((-5000.0, -5000.0), &canvas(), alt, HD);
        let rect = shrink.rect.unwrap();
        assert!(rect.w >= 1 && rect.h >= 1);
    }

    #[test]
    fn test_hit_test_prefers_top_most_and_detects_edges() {
        let boxes = [
            ScreenBox { left: 0.0, top: 0.0, width: 100.0, height: 100.0 },
            ScreenBox { left: 50.0, top: 50.0, width: 100.0, height: 100.0 },
        ];
        let body = hit_test(&boxes, 75.0, 75.0).unwrap();
        assert_eq!(body.index, 1);
        assert!(body.handle.is_none());

        let edge = hit_test(&boxes, 20.0, 99.0).unwrap();
        assert_eq!(edge.index, 0);
        let handle = edge.handle.unwrap();
        assert!(handle.bottom && !handle.top && !handle.left && !handle.right);

        let corner = hit_test(&boxes, 151.0, 151.0).unwrap().handle.unwrap();
        assert!(corner.right && corner.bottom && corner.is_corner());

        assert!(hit_test(&boxes, 300.0, 300.0).is_none());
    }

    #[test]
    fn test_interaction_flags() {
        assert!(Interaction::Idle.is_idle());
        assert!(Interaction::Creating(None).blocks_wheel_pan());
        let pick = Interaction::ColorPicking { mirror_id: "a".into() };
        assert_eq!(pick.color_pick_target(), Some("a"));
        assert!(pick.blocks_wheel_pan());
    }
}
