//! Colour string parsing and the ordered colour-key set used by mirrors

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::mirror::MAX_COLOR_KEYS;
use crate::math::{clamp, round_half_up};

fn is_hex_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Normalize a colour key to `#rrggbb` (lower case).
///
/// Accepts six hex digits with or without a leading `#`, surrounding
/// whitespace is ignored. Returns `None` for anything else.
pub fn normalize_color_key(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    is_hex_digits(hex, 6).then(|| format!("#{}", hex.to_ascii_lowercase()))
}

/// Normalize a required-`#` six digit colour, falling back when invalid
pub fn normalize_hex_color(raw: Option<&str>, fallback: &str) -> String {
    let value = raw.map(str::trim).unwrap_or_default();
    match value.strip_prefix('#') {
        Some(hex) if is_hex_digits(hex, 6) => value.to_ascii_lowercase(),
        _ => fallback.to_string(),
    }
}

/// Normalize a theme colour to `#rrggbbaa`; six digit input gains an opaque alpha
pub fn normalize_hex8(raw: Option<&str>, fallback: &str) -> String {
    let value = raw.map(str::trim).unwrap_or_default();
    match value.strip_prefix('#') {
        Some(hex) if is_hex_digits(hex, 6) => format!("{}ff", value.to_ascii_lowercase()),
        Some(hex) if is_hex_digits(hex, 8) => value.to_ascii_lowercase(),
        _ => fallback.to_string(),
    }
}

/// Replace the alpha byte of a `#rrggbbaa` colour with `alpha` (0..1)
pub fn with_alpha(hex8: &str, alpha: f64, fallback: &str) -> String {
    let normalized = normalize_hex8(Some(hex8), fallback);
    let base = &normalized[..7];
    let alpha = if alpha.is_finite() { clamp(alpha, 0.0, 1.0) } else { 0.0 };
    let byte = round_half_up(alpha * 255.0) as u8;
    format!("{base}{byte:02x}")
}

/// Alpha (0..1) encoded in a `#rrggbbaa` colour
pub fn alpha_of(hex8: &str, fallback: &str) -> f64 {
    let normalized = normalize_hex8(Some(hex8), fallback);
    u8::from_str_radix(&normalized[7..9], 16)
        .map(|byte| f64::from(byte) / 255.0)
        .unwrap_or(1.0)
}

pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Parse a normalized `#rrggbb` key back into channels
pub fn key_to_rgb(key: &str) -> Option<(u8, u8, u8)> {
    let hex = key.strip_prefix('#')?;
    if !is_hex_digits(hex, 6) {
        return None;
    }
    let rgb = u32::from_str_radix(hex, 16).ok()?;
    Some(((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8))
}

/// Insertion-ordered, duplicate-free list of at most ten colour keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorKeys(Vec<String>);

/// Why a key was not added
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRejection {
    Invalid,
    Duplicate,
    Full,
}

impl ColorKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from untrusted input: non-arrays are empty, invalid entries
    /// and duplicates are skipped, the list stops at the cap.
    pub fn normalize(raw: Option<&Value>) -> Self {
        let mut keys = Self::new();
        let Some(items) = raw.and_then(Value::as_array) else {
            return keys;
        };
        for item in items {
            if keys.is_full() {
                break;
            }
            if let Some(s) = item.as_str() {
                let _ = keys.insert(s);
            }
        }
        keys
    }

    /// Add a key after normalizing it
    pub fn insert(&mut self, raw: &str) -> Result<&str, KeyRejection> {
        let key = normalize_color_key(raw).ok_or(KeyRejection::Invalid)?;
        if self.0.contains(&key) {
            return Err(KeyRejection::Duplicate);
        }
        if self.is_full() {
            return Err(KeyRejection::Full);
        }
        self.0.push(key);
        Ok(self.0.last().map(String::as_str).unwrap_or_default())
    }

    pub fn remove(&mut self, key: &str) -> bool {
        let Some(key) = normalize_color_key(key) else {
            return false;
        };
        let before = self.0.len();
        self.0.retain(|k| *k != key);
        self.0.len() != before
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_full(&self) -> bool {
        self.0.len() >= MAX_COLOR_KEYS
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}
