//! Eye-measure overlay strip
//!
//! A row of alternating colour cells across the vertical middle of the
//! overlay, each 1/60 of its width, plus a light centre line. The same layout
//! is painted over the tall projector and rasterized for the PNG export.
//! Cell number labels are not drawn.

use anyhow::Result;

use crate::color::key_to_rgb;
use crate::constants::eye_overlay::{CELL_COLUMNS, CENTER_LINE_RATIO, CENTER_LINE_RGB};
use crate::math::round_half_up;
use crate::pixels::PixelImage;
use crate::settings::TallOverlaySettings;

/// Solid rectangle in overlay pixels, straight alpha in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub rgb: [u8; 3],
    pub alpha: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripCell {
    pub rect: StripRect,
    /// Distance from the centre, counting outward from 1 on each side
    pub label: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStrip {
    pub cells: Vec<StripCell>,
    pub center_line: StripRect,
}

fn rgb(hex: &str) -> [u8; 3] {
    let (r, g, b) = key_to_rgb(hex).unwrap_or((0, 0, 0));
    [r, g, b]
}

impl OverlayStrip {
    /// Lay the strip out on a `width` x `height` overlay
    pub fn layout(settings: &TallOverlaySettings, width: f64, height: f64) -> Self {
        let width = width.max(1.0);
        let height = height.max(1.0);
        let cell_w = width / CELL_COLUMNS;
        let cell_h = round_half_up(height * f64::from(settings.pixel_height) / 100.0).max(1.0);
        let cell_y = round_half_up(height / 2.0 - cell_h / 2.0);
        let alpha = f64::from(settings.opacity_pixels) / 100.0;
        let (color_a, color_b) = (rgb(&settings.color_a), rgb(&settings.color_b));

        let count = i64::from(settings.pixel_count);
        let cells = (-count..count)
            .map(|i| StripCell {
                rect: StripRect {
                    x: width / 2.0 + i as f64 * cell_w,
                    y: cell_y,
                    w: cell_w,
                    h: cell_h,
                    rgb: if i.rem_euclid(2) == 1 { color_b } else { color_a },
                    alpha,
                },
                label: if i < 0 { i.unsigned_abs() as u32 } else { i as u32 + 1 },
            })
            .collect();

        let line_w = width * CENTER_LINE_RATIO;
        Self {
            cells,
            center_line: StripRect {
                x: width / 2.0 - line_w,
                y: 0.0,
                w: line_w,
                h: height,
                rgb: CENTER_LINE_RGB,
                alpha: 1.0,
            },
        }
    }

    /// Rectangles in paint order
    pub fn rects(&self) -> impl Iterator<Item = &StripRect> {
        self.cells
            .iter()
            .map(|cell| &cell.rect)
            .chain(std::iter::once(&self.center_line))
    }
}

/// Portion of pixel `p` (spanning `[p, p + 1)`) covered by `[lo, hi)`
fn coverage(p: u32, lo: f64, hi: f64) -> f64 {
    let p = f64::from(p);
    (hi.min(p + 1.0) - lo.max(p)).clamp(0.0, 1.0)
}

/// Source-over blend of `rect` onto a straight-alpha RGBA buffer, with
/// partially covered edge pixels weighted by their coverage
fn fill(rgba: &mut [u8], width: u32, height: u32, rect: &StripRect) {
    if rect.alpha <= 0.0 || rect.w <= 0.0 || rect.h <= 0.0 {
        return;
    }
    let (right, bottom) = (rect.x + rect.w, rect.y + rect.h);
    let x0 = rect.x.max(0.0).floor() as u32;
    let x1 = (right.min(f64::from(width))).ceil().max(0.0) as u32;
    let y0 = rect.y.max(0.0).floor() as u32;
    let y1 = (bottom.min(f64::from(height))).ceil().max(0.0) as u32;

    for py in y0..y1 {
        let cover_y = coverage(py, rect.y, bottom);
        for px in x0..x1 {
            let src_a = rect.alpha * cover_y * coverage(px, rect.x, right);
            // Rounding slivers at shared edges
            if src_a < 1e-9 {
                continue;
            }
            let i = (py as usize * width as usize + px as usize) * 4;
            let dst_a = f64::from(rgba[i + 3]) / 255.0;
            let out_a = src_a + dst_a * (1.0 - src_a);
            for c in 0..3 {
                let src = f64::from(rect.rgb[c]);
                let dst = f64::from(rgba[i + c]);
                rgba[i + c] = round_half_up((src * src_a + dst * dst_a * (1.0 - src_a)) / out_a) as u8;
            }
            rgba[i + 3] = round_half_up(out_a * 255.0) as u8;
        }
    }
}

/// Rasterize the strip on a transparent `width` x `height` image
pub fn render_overlay(settings: &TallOverlaySettings, width: u32, height: u32) -> Result<PixelImage> {
    let (width, height) = (width.max(1), height.max(1));
    let mut rgba = vec![0; width as usize * height as usize * 4];
    let strip = OverlayStrip::layout(settings, f64::from(width), f64::from(height));
    for rect in strip.rects() {
        fill(&mut rgba, width, height, rect);
    }
    PixelImage::new(width, height, rgba)
}

pub fn overlay_filename(width: u32, height: u32) -> String {
    format!("eyemeasure-overlay-{width}x{height}.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixels::PixelSource;

    #[test]
    fn test_default_layout_at_1080p() {
        let strip = OverlayStrip::layout(&TallOverlaySettings::default(), 1920.0, 1080.0);
        assert_eq!(strip.cells.len(), 18);

        let first = strip.cells[0];
        assert_eq!((first.rect.x, first.rect.y), (672.0, 497.0));
        assert_eq!((first.rect.w, first.rect.h), (32.0, 86.0));
        assert_eq!(first.rect.rgb, [0x99, 0xcd, 0xf0]);
        assert_eq!(first.label, 9);

        let last = strip.cells[17];
        assert_eq!(last.rect.x, 1216.0);
        assert_eq!(last.rect.rgb, [0xff, 0xb0, 0xc5]);
        assert_eq!(last.label, 9);

        // Cells either side of the centre are both labelled 1
        assert_eq!((strip.cells[8].label, strip.cells[9].label), (1, 1));
        assert_eq!(strip.cells[9].rect.x, 960.0);

        assert!((strip.center_line.x - 954.0).abs() < 1e-9);
        assert!((strip.center_line.w - 6.0).abs() < 1e-9);
        assert_eq!(strip.center_line.h, 1080.0);
    }

    #[test]
    fn test_layout_follows_settings() {
        let settings = TallOverlaySettings {
            pixel_count: 3,
            pixel_height: 50,
            opacity_pixels: 40,
            ..TallOverlaySettings::default()
        };
        let strip = OverlayStrip::layout(&settings, 600.0, 0.0);
        assert_eq!(strip.cells.len(), 6);
        // Zero height is treated as one pixel
        assert_eq!(strip.cells[0].rect.h, 1.0);
        assert!(strip.cells.iter().all(|c| (c.rect.alpha - 0.4).abs() < 1e-12));
        assert_eq!(strip.rects().count(), 7);
    }

    #[test]
    fn test_render_small_overlay() {
        let settings = TallOverlaySettings {
            pixel_count: 1,
            pixel_height: 50,
            ..TallOverlaySettings::default()
        };
        // 60 wide: cells are one pixel; rows 3..8 hold the strip
        let image = render_overlay(&settings, 60, 10).unwrap();
        assert_eq!((image.width(), image.height()), (60, 10));
        assert_eq!(image.pixel(30, 4).unwrap(), [0xff, 0xb0, 0xc5, 255]);
        assert_eq!(image.pixel(10, 4).unwrap(), [0, 0, 0, 0]);
        assert_eq!(image.pixel(30, 2).unwrap(), [0, 0, 0, 0]);

        // The 0.1875 px centre line partly covers column 29 above the strip
        assert_eq!(image.pixel(29, 0).unwrap(), [0xe8, 0xe8, 0xe8, 48]);
    }

    #[test]
    fn test_render_is_translucent_with_low_opacity() {
        let settings = TallOverlaySettings {
            opacity_pixels: 50,
            ..TallOverlaySettings::default()
        };
        let image = render_overlay(&settings, 1920, 1080).unwrap();
        let [_, _, _, alpha] = image.pixel(700, 540).unwrap();
        assert_eq!(alpha, 128);
        assert_eq!(image.pixel(0, 0).unwrap(), [0, 0, 0, 0]);
    }

    #[test]
    fn test_overlay_filename() {
        assert_eq!(overlay_filename(1920, 1080), "eyemeasure-overlay-1920x1080.png");
    }
}
