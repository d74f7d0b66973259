//! Compositor config export
//!
//! The export is rebuilt from current state on demand and never persisted.
//! Building it is a pure function of its inputs, so serializing twice with
//! unchanged state yields identical bytes.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Serialize, Serializer};

use crate::color::ColorKeys;
use crate::keycodes::export_key_name;
use crate::math::round_half_up;
use crate::mirror::Mirror;
use crate::settings::{Action, ActionKeybinds, BackgroundType, ThemeSettings, WindowSettings};
use crate::types::{DisplayVariant, WindowSize};

/// Everything the export reads
pub struct ExportSource<'a> {
    pub mirrors: &'a [Mirror],
    pub base: WindowSize,
    pub keybinds: &'a ActionKeybinds,
    pub theme: &'a ThemeSettings,
    pub window: &'a WindowSettings,
}

#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    pub config: ExportConfig<'a>,
    pub resolutions: ExportResolutions<'a>,
}

#[derive(Debug, Serialize)]
pub struct ExportConfig<'a> {
    pub input: ExportInput,
    pub theme: ExportTheme<'a>,
    pub window: &'a WindowSettings,
}

/// Unbound or unmappable actions are left out
#[derive(Debug, Default, Serialize)]
pub struct ExportInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_ninjabrain_bot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wide: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tall: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExportTheme<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_png: Option<&'a str>,
    pub cursor_theme: &'a str,
    pub ninb_anchor: &'a str,
    pub ninb_opacity: f64,
}

#[derive(Debug, Serialize)]
pub struct ExportResolutions<'a> {
    pub preset: ExportResolution<'a>,
    pub thin: ExportResolution<'a>,
    pub wide: ExportResolution<'a>,
    pub tall: ExportResolution<'a>,
}

#[derive(Debug, Serialize)]
pub struct ExportResolution<'a> {
    pub w: u32,
    pub h: u32,
    pub mirrors: Vec<ExportMirror<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ExportMirror<'a> {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
    pub colorkeys: IdentityKeys<'a>,
}

/// Each source key maps to itself, in insertion order
#[derive(Debug)]
pub struct IdentityKeys<'a>(&'a ColorKeys);

impl Serialize for IdentityKeys<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|key| (key, key)))
    }
}

fn percent_of(percent: f64, dimension: u32) -> i64 {
    round_half_up(percent / 100.0 * f64::from(dimension)) as i64
}

fn export_mirror(mirror: &Mirror, window: WindowSize) -> ExportMirror<'_> {
    let p = &mirror.placement;
    ExportMirror {
        x: percent_of(p.screen_x, window.width),
        y: percent_of(p.screen_y, window.height),
        w: percent_of(p.screen_w, window.width).max(1),
        h: percent_of(p.screen_h, window.height).max(1),
        colorkeys: IdentityKeys(&mirror.keys),
    }
}

fn export_resolution(mirrors: &[Mirror], variant: DisplayVariant, base: WindowSize) -> ExportResolution<'_> {
    let window = variant.window_for(base);
    ExportResolution {
        w: window.width,
        h: window.height,
        mirrors: mirrors
            .iter()
            .filter(|m| m.visible_in_variant(variant))
            .map(|m| export_mirror(m, window))
            .collect(),
    }
}

fn export_input(keybinds: &ActionKeybinds) -> ExportInput {
    let key = |action| export_key_name(keybinds.get(action));
    ExportInput {
        open_ninjabrain_bot: key(Action::OpenNinjabrain),
        thin: key(Action::Thin),
        wide: key(Action::Wide),
        tall: key(Action::Tall),
    }
}

fn export_theme(theme: &ThemeSettings) -> ExportTheme<'_> {
    let (background, background_png) = match theme.background_type {
        BackgroundType::Image => (None, Some(theme.background_png.as_str()).filter(|p| !p.is_empty())),
        BackgroundType::Color => (Some(theme.background.as_str()), None),
    };
    ExportTheme {
        background,
        background_png,
        cursor_theme: &theme.cursor_theme,
        ninb_anchor: &theme.ninb_anchor_position,
        ninb_opacity: theme.ninb_opacity,
    }
}

pub fn build_export<'a>(source: &ExportSource<'a>) -> ExportDocument<'a> {
    let resolution = |variant| export_resolution(source.mirrors, variant, source.base);
    ExportDocument {
        config: ExportConfig {
            input: export_input(source.keybinds),
            theme: export_theme(source.theme),
            window: source.window,
        },
        resolutions: ExportResolutions {
            preset: resolution(DisplayVariant::Preset),
            thin: resolution(DisplayVariant::Thin),
            wide: resolution(DisplayVariant::Wide),
            tall: resolution(DisplayVariant::Tall),
        },
    }
}

/// Pretty JSON (two space indent) with a trailing newline
pub fn render_export(document: &ExportDocument<'_>) -> Result<String> {
    let mut json = serde_json::to_string_pretty(document).context("Failed to serialize export")?;
    json.push('\n');
    Ok(json)
}

pub fn write_export(json: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .context(format!("Failed to create export directory: {}", parent.display()))?;
    }
    fs::write(path, json).context(format!("Failed to write export to {}", path.display()))?;
    Ok(())
}
