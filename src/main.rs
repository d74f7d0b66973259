#![forbid(unsafe_code)]

mod app;
mod background;
mod color;
mod constants;
mod display;
mod editor;
mod export;
mod eye_overlay;
mod interaction;
mod keycodes;
mod math;
mod mirror;
mod pixels;
mod settings;
mod storage;
mod types;
mod untrusted;
mod viewport;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{Level as TraceLevel, info, warn};
use tracing_subscriber::FmtSubscriber;

use app::AppState;
use background::Background;
use constants::paths::{DEFAULT_BACKGROUND, DEFAULT_TALL_BACKGROUND, EXPORT_FILENAME};
use export::write_export;
use storage::{FileStore, MemoryStore, Store};

#[derive(Debug, Parser)]
#[command(name = "f3pie-preview", version, about = "Mirror layout editor for F3 pie overlays")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Directory holding the persisted settings
    #[arg(long, global = true, value_name = "DIR")]
    state_dir: Option<PathBuf>,

    /// Background image for the preset, wide and thin views
    #[arg(long, global = true, value_name = "PNG")]
    background: Option<PathBuf>,

    /// Background image for the tall view
    #[arg(long, global = true, value_name = "PNG")]
    tall_background: Option<PathBuf>,

    /// GUI scale used for the scaled size readout (0 = auto)
    #[arg(long, global = true, default_value_t = 0)]
    gui_scale: u32,

    /// trace, debug, info, warn or error; overrides LOG_LEVEL
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Keep settings in memory only
    #[arg(long, global = true)]
    ephemeral: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open the layout editor (default)
    Edit,
    /// Write the compositor config built from the saved settings
    Export {
        /// Output file; stdout when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Render the eye-measure overlay PNG at the base resolution
    Overlay {
        /// Output file; `<state-dir>/eyemeasure-overlay-<W>x<H>.png` when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn parse_level(name: &str) -> TraceLevel {
    match name.to_lowercase().as_str() {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    }
}

fn init_logging(flag: Option<&str>) -> Result<()> {
    let level = match flag {
        Some(name) => parse_level(name),
        None => parse_level(&std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string())),
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to install log subscriber")
}

/// Explicit path, else `<state-dir>/<default_name>` when that file exists
fn background_for(explicit: Option<PathBuf>, state_dir: &Path, default_name: &str) -> Background {
    let path = explicit.or_else(|| {
        let candidate = state_dir.join(default_name);
        candidate.is_file().then_some(candidate)
    });
    match path {
        Some(path) => {
            if !path.is_file() {
                warn!(path = %path.display(), "Background image not found");
            }
            Background::load(path)
        }
        None => Background::none(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;

    let state_dir = cli.state_dir.clone().unwrap_or_else(FileStore::default_root);
    let store: Box<dyn Store> = if cli.ephemeral {
        info!("Using in-memory settings store");
        Box::new(MemoryStore::new())
    } else {
        let store = FileStore::new(&state_dir);
        info!(state_dir = %store.root().display(), "Using settings directory");
        Box::new(store)
    };
    let mut app = AppState::new(store, cli.gui_scale);

    match cli.command.unwrap_or(Command::Edit) {
        Command::Edit => {
            app.set_backgrounds(
                background_for(cli.background, &state_dir, DEFAULT_BACKGROUND),
                background_for(cli.tall_background, &state_dir, DEFAULT_TALL_BACKGROUND),
            );
            editor::run_editor(app, state_dir.join(EXPORT_FILENAME))
        }
        Command::Export { output } => {
            let json = app.export_json()?;
            match output {
                Some(path) => {
                    write_export(&json, &path)?;
                    info!(path = %path.display(), "Exported compositor config");
                }
                None => {
                    std::io::stdout()
                        .write_all(json.as_bytes())
                        .context("Failed to write export to stdout")?;
                }
            }
            Ok(())
        }
        Command::Overlay { output } => {
            let path = output.unwrap_or_else(|| state_dir.join(app.tall_overlay_filename()));
            app.export_tall_overlay(&path)
        }
    }
}
