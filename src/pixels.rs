//! Pixel buffers consulted by colour picking and colour keying
//!
//! The canvas is never materialized: [`CanvasPixels`] composes the
//! background (cover-fitted and darkened, or a flat fill) on demand for the
//! pixel being read, the same way the editor paints it.

use anyhow::{Result, ensure};
use thiserror::Error;

use crate::color::{ColorKeys, key_to_rgb, rgb_to_hex};
use crate::constants::canvas::{BACKGROUND_DARKEN, FILL_RGB};
use crate::constants::mirror::KEY_TOLERANCE;
use crate::math::{clamp, round_half_up};
use crate::mirror::SourceRect;
use crate::types::WindowSize;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PixelReadError {
    /// The buffer exists but cannot be read back (e.g. still loading)
    #[error("pixel buffer is not readable")]
    Blocked,
    #[error("pixel ({x}, {y}) is outside the buffer")]
    OutOfBounds { x: i64, y: i64 },
}

/// Read access to an RGBA pixel surface
pub trait PixelSource {
    fn dimensions(&self) -> WindowSize;

    fn pixel(&self, x: u32, y: u32) -> Result<[u8; 4], PixelReadError>;
}

/// Decoded RGBA8 image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl PixelImage {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        ensure!(width > 0 && height > 0, "image has no pixels ({width}x{height})");
        let expected = width as usize * height as usize * 4;
        ensure!(
            rgba.len() == expected,
            "RGBA buffer is {} bytes, expected {expected} for {width}x{height}",
            rgba.len()
        );
        Ok(Self { width, height, rgba })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }
}

impl PixelSource for PixelImage {
    fn dimensions(&self) -> WindowSize {
        WindowSize::new(self.width, self.height)
    }

    fn pixel(&self, x: u32, y: u32) -> Result<[u8; 4], PixelReadError> {
        if x >= self.width || y >= self.height {
            return Err(PixelReadError::OutOfBounds {
                x: i64::from(x),
                y: i64::from(y),
            });
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Ok([self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]])
    }
}

/// Where an image lands when it covers the window, aspect preserved
/// (`left`, `top`, `width`, `height` in window pixels)
pub fn cover_rect(window: WindowSize, image: WindowSize) -> (f64, f64, f64, f64) {
    let (w, h) = (window.width_f64(), window.height_f64());
    let image_aspect = image.width_f64() / image.height_f64().max(1.0);
    let screen_aspect = w / h.max(1.0);
    if image_aspect > screen_aspect {
        let draw_w = h * image_aspect;
        ((w - draw_w) / 2.0, 0.0, draw_w, h)
    } else {
        let draw_h = w / image_aspect.max(f64::MIN_POSITIVE);
        (0.0, (h - draw_h) / 2.0, w, draw_h)
    }
}

/// What the canvas is painted with
#[derive(Debug, Clone, Copy)]
pub enum Backdrop<'a> {
    Fill,
    Image(&'a PixelImage),
    /// A background is configured but not decoded yet
    Pending,
}

/// Window-sized view over the backdrop
#[derive(Debug, Clone, Copy)]
pub struct CanvasPixels<'a> {
    pub window: WindowSize,
    pub backdrop: Backdrop<'a>,
}

fn darken(channel: u8) -> u8 {
    round_half_up(f64::from(channel) * (1.0 - BACKGROUND_DARKEN)) as u8
}

impl PixelSource for CanvasPixels<'_> {
    fn dimensions(&self) -> WindowSize {
        self.window
    }

    fn pixel(&self, x: u32, y: u32) -> Result<[u8; 4], PixelReadError> {
        if x >= self.window.width || y >= self.window.height {
            return Err(PixelReadError::OutOfBounds {
                x: i64::from(x),
                y: i64::from(y),
            });
        }
        match self.backdrop {
            Backdrop::Fill => Ok([FILL_RGB[0], FILL_RGB[1], FILL_RGB[2], 255]),
            Backdrop::Pending => Err(PixelReadError::Blocked),
            Backdrop::Image(image) => {
                let (left, top, draw_w, draw_h) = cover_rect(self.window, image.dimensions());
                let u = (f64::from(x) + 0.5 - left) / draw_w;
                let v = (f64::from(y) + 0.5 - top) / draw_h;
                let max_x = f64::from(image.width() - 1);
                let max_y = f64::from(image.height() - 1);
                let ix = clamp((u * f64::from(image.width())).floor(), 0.0, max_x) as u32;
                let iy = clamp((v * f64::from(image.height())).floor(), 0.0, max_y) as u32;
                let [r, g, b, _] = image.pixel(ix, iy)?;
                Ok([darken(r), darken(g), darken(b), 255])
            }
        }
    }
}

/// Sample the colour at window coordinates (floored)
pub fn sample_canvas(source: &dyn PixelSource, x: f64, y: f64) -> Result<String, PixelReadError> {
    let out_of_bounds = PixelReadError::OutOfBounds {
        x: x as i64,
        y: y as i64,
    };
    if !x.is_finite() || !y.is_finite() {
        return Err(out_of_bounds);
    }
    let (sx, sy) = (x.floor(), y.floor());
    let size = source.dimensions();
    if sx < 0.0 || sy < 0.0 || sx >= size.width_f64() || sy >= size.height_f64() {
        return Err(out_of_bounds);
    }
    let [r, g, b, _] = source.pixel(sx as u32, sy as u32)?;
    Ok(rgb_to_hex(r, g, b))
}

/// Sample the source pixel under a relative position (`0..=1`) in a mirror box
pub fn sample_mirror_source(
    source: &dyn PixelSource,
    rect: SourceRect,
    ux: f64,
    uy: f64,
) -> Result<String, PixelReadError> {
    let ux = clamp(ux, 0.0, 1.0);
    let uy = clamp(uy, 0.0, 1.0);
    let px = f64::from(rect.x) + ux * f64::from(rect.w.saturating_sub(1));
    let py = f64::from(rect.y) + uy * f64::from(rect.h.saturating_sub(1));
    sample_canvas(source, px, py)
}

/// Parsed key colours for matching
pub fn key_colors(keys: &ColorKeys) -> Vec<[u8; 3]> {
    keys.iter()
        .filter_map(key_to_rgb)
        .map(|(r, g, b)| [r, g, b])
        .collect()
}

/// Whether `rgb` is within tolerance of any key on every channel
pub fn matches_key(rgb: [u8; 3], keys: &[[u8; 3]]) -> bool {
    keys.iter().any(|key| {
        key.iter()
            .zip(rgb.iter())
            .all(|(k, c)| k.abs_diff(*c) <= KEY_TOLERANCE)
    })
}

/// Keyed overlay pixel of a mirror at overlay-buffer coordinates.
///
/// The overlay buffer is the source rect at 1:1. With keys, any pixel that
/// matches no key becomes fully transparent.
pub fn overlay_pixel(
    source: &dyn PixelSource,
    rect: SourceRect,
    keys: &[[u8; 3]],
    sx: u32,
    sy: u32,
) -> Result<[u8; 4], PixelReadError> {
    let [r, g, b, a] = source.pixel(rect.x + sx, rect.y + sy)?;
    if !keys.is_empty() && !matches_key([r, g, b], keys) {
        return Ok([r, g, b, 0]);
    }
    Ok([r, g, b, a])
}

/// Colour of the rendered overlay under a relative position in a mirror box;
/// `None` for transparent pixels or unreadable buffers.
pub fn sample_overlay(
    source: &dyn PixelSource,
    rect: SourceRect,
    keys: &ColorKeys,
    ux: f64,
    uy: f64,
) -> Option<String> {
    let buffer_w = rect.w.max(1);
    let buffer_h = rect.h.max(1);
    let pick = |u: f64, len: u32| {
        let u = clamp(u, 0.0, 1.0);
        let max = f64::from(len.saturating_sub(1));
        clamp((u * max.max(1.0)).floor(), 0.0, max) as u32
    };
    let sx = pick(ux, buffer_w);
    let sy = pick(uy, buffer_h);
    match overlay_pixel(source, rect, &key_colors(keys), sx, sy) {
        Ok([_, _, _, 0]) | Err(_) => None,
        Ok([r, g, b, _]) => Some(rgb_to_hex(r, g, b)),
    }
}

/// Full keyed overlay buffer (RGBA8, `rect.w * rect.h`)
pub fn overlay_image(
    source: &dyn PixelSource,
    rect: SourceRect,
    keys: &ColorKeys,
) -> Result<Vec<u8>, PixelReadError> {
    let keys = key_colors(keys);
    let mut out = Vec::with_capacity(rect.w as usize * rect.h as usize * 4);
    for sy in 0..rect.h {
        for sx in 0..rect.w {
            out.extend_from_slice(&overlay_pixel(source, rect, &keys, sx, sy)?);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> PixelImage {
        let mut rgba = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let on = (x + y) % 2 == 0;
                rgba.extend_from_slice(if on { &[200, 0, 0, 255] } else { &[0, 0, 200, 255] });
            }
        }
        PixelImage::new(width, height, rgba).unwrap()
    }

    #[test]
    fn test_pixel_image_validates_length() {
        assert!(PixelImage::new(2, 2, vec![0; 16]).is_ok());
        assert!(PixelImage::new(2, 2, vec![0; 15]).is_err());
        assert!(PixelImage::new(0, 2, Vec::new()).is_err());
    }

    #[test]
    fn test_cover_rect() {
        // Wider image than window: fit height, overflow horizontally
        let (left, top, w, h) = cover_rect(WindowSize::new(100, 100), WindowSize::new(200, 100));
        assert_eq!((left, top, w, h), (-50.0, 0.0, 200.0, 100.0));
        let (left, top, w, h) = cover_rect(WindowSize::new(100, 50), WindowSize::new(100, 100));
        assert_eq!((left, top, w, h), (0.0, -25.0, 100.0, 100.0));
    }

    #[test]
    fn test_sample_canvas_bounds() {
        let canvas = CanvasPixels {
            window: WindowSize::new(10, 10),
            backdrop: Backdrop::Fill,
        };
        assert_eq!(sample_canvas(&canvas, 9.9, 0.0), Ok(rgb_to_hex(FILL_RGB[0], FILL_RGB[1], FILL_RGB[2])));
        assert!(matches!(sample_canvas(&canvas, 10.0, 0.0), Err(PixelReadError::OutOfBounds { .. })));
        assert!(matches!(sample_canvas(&canvas, -0.1, 0.0), Err(PixelReadError::OutOfBounds { .. })));
        assert!(matches!(sample_canvas(&canvas, f64::NAN, 0.0), Err(PixelReadError::OutOfBounds { .. })));
    }

    #[test]
    fn test_pending_backdrop_blocks() {
        let canvas = CanvasPixels {
            window: WindowSize::new(10, 10),
            backdrop: Backdrop::Pending,
        };
        assert_eq!(sample_canvas(&canvas, 1.0, 1.0), Err(PixelReadError::Blocked));
    }

    #[test]
    fn test_image_backdrop_is_darkened() {
        let image = checker(2, 2);
        let canvas = CanvasPixels {
            window: WindowSize::new(4, 4),
            backdrop: Backdrop::Image(&image),
        };
        // 200 * 0.86 = 172
        assert_eq!(sample_canvas(&canvas, 0.0, 0.0), Ok("#ac0000".to_string()));
        assert_eq!(sample_canvas(&canvas, 2.0, 0.0), Ok("#0000ac".to_string()));
    }

    #[test]
    fn test_key_matching_tolerance() {
        let keys = [[100, 100, 100]];
        assert!(matches_key([104, 96, 100], &keys));
        assert!(!matches_key([105, 100, 100], &keys));
        assert!(!matches_key([0, 0, 0], &[]));
    }

    #[test]
    fn test_overlay_sampling_respects_keys() {
        let image = checker(4, 4);
        let rect = SourceRect { x: 0, y: 0, w: 4, h: 4 };
        let mut keys = ColorKeys::new();
        assert_eq!(sample_overlay(&image, rect, &keys, 0.0, 0.0), Some("#c80000".to_string()));

        keys.insert("#0000c8").unwrap();
        assert_eq!(sample_overlay(&image, rect, &keys, 0.0, 0.0), None);
        assert_eq!(sample_overlay(&image, rect, &keys, 0.34, 0.0), Some("#0000c8".to_string()));

        let buffer = overlay_image(&image, rect, &keys).unwrap();
        assert_eq!(buffer.len(), 64);
        assert_eq!(buffer[3], 0);
        assert_eq!(buffer[7], 255);
    }

    #[test]
    fn test_mirror_source_sampling() {
        let image = checker(4, 4);
        let rect = SourceRect { x: 1, y: 0, w: 3, h: 1 };
        assert_eq!(sample_mirror_source(&image, rect, 0.0, 0.0), Ok("#0000c8".to_string()));
        assert_eq!(sample_mirror_source(&image, rect, 1.0, 0.0), Ok("#0000c8".to_string()));
        assert_eq!(sample_mirror_source(&image, rect, 0.5, 0.0), Ok("#c80000".to_string()));
    }
}
