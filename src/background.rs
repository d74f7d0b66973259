//! Background PNG loading, plus the PNG writer used by image exports
//!
//! Decoding runs on a worker thread; the result comes back over a channel and
//! [`Background::poll`] picks it up from the frame loop without blocking.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, warn};

use crate::pixels::{Backdrop, PixelImage};

/// Completion message from the loader thread
#[derive(Debug)]
pub enum BackgroundLoad {
    Loaded(PixelImage),
    Failed(String),
}

#[derive(Debug)]
enum LoadState {
    /// No image configured
    Missing,
    Loading(Receiver<BackgroundLoad>),
    Loaded(PixelImage),
    Failed(String),
}

/// One configurable background image and its load progress
#[derive(Debug)]
pub struct Background {
    path: Option<PathBuf>,
    state: LoadState,
}

impl Background {
    pub fn none() -> Self {
        Self {
            path: None,
            state: LoadState::Missing,
        }
    }

    /// Start decoding `path` on a worker thread
    pub fn load(path: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel();
        let worker_path = path.clone();
        thread::spawn(move || {
            let message = match decode_png(&worker_path) {
                Ok(image) => BackgroundLoad::Loaded(image),
                Err(e) => BackgroundLoad::Failed(format!("{e:#}")),
            };
            // Receiver gone means the background was replaced; nothing to report
            let _ = tx.send(message);
        });
        debug!(path = %path.display(), "Loading background image");
        Self {
            path: Some(path),
            state: LoadState::Loading(rx),
        }
    }

    /// Pick up a finished load. Returns true when the state changed.
    pub fn poll(&mut self) -> bool {
        let LoadState::Loading(rx) = &self.state else {
            return false;
        };
        let message = match rx.try_recv() {
            Ok(message) => message,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                BackgroundLoad::Failed("loader thread exited without a result".to_string())
            }
        };
        let path = self.display_name();
        self.state = match message {
            BackgroundLoad::Loaded(image) => {
                info!(path = %path, width = image.width(), height = image.height(), "Background image loaded");
                LoadState::Loaded(image)
            }
            BackgroundLoad::Failed(reason) => {
                warn!(path = %path, reason = %reason, "Background image failed to load");
                LoadState::Failed(reason)
            }
        };
        true
    }

    pub fn image(&self) -> Option<&PixelImage> {
        match &self.state {
            LoadState::Loaded(image) => Some(image),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading(_))
    }

    pub fn failure(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// What the canvas shows; a load in flight cannot be sampled yet
    pub fn backdrop(&self) -> Backdrop<'_> {
        match &self.state {
            LoadState::Loaded(image) => Backdrop::Image(image),
            LoadState::Loading(_) => Backdrop::Pending,
            LoadState::Missing | LoadState::Failed(_) => Backdrop::Fill,
        }
    }

    fn display_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Status line fragment: file name, `loading`, or `missing (...)`
    pub fn status_label(&self) -> String {
        match &self.state {
            LoadState::Missing => "missing".to_string(),
            LoadState::Loading(_) => "loading".to_string(),
            LoadState::Loaded(_) => self.display_name(),
            LoadState::Failed(_) => format!("missing ({})", self.display_name()),
        }
    }
}

/// Decode a PNG file into RGBA8
pub fn decode_png(path: &Path) -> Result<PixelImage> {
    let file = File::open(path).context(format!("Failed to open {}", path.display()))?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .context(format!("Failed to read PNG header of {}", path.display()))?;
    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    let line_size = reader
        .output_line_size(width)
        .context(format!("PNG dimensions too large in {}", path.display()))?;
    let mut buf = vec![0; line_size * height as usize];
    let info = reader
        .next_frame(&mut buf)
        .context(format!("Failed to decode {}", path.display()))?;

    let channels = match info.color_type {
        png::ColorType::Rgba => 4,
        png::ColorType::Rgb => 3,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Grayscale => 1,
        other => bail!("Unsupported PNG color type {other:?} in {}", path.display()),
    };

    let mut rgba = Vec::with_capacity(info.width as usize * info.height as usize * 4);
    for row in buf.chunks(info.line_size).take(info.height as usize) {
        for px in row[..info.width as usize * channels].chunks_exact(channels) {
            let pixel = match channels {
                4 => [px[0], px[1], px[2], px[3]],
                3 => [px[0], px[1], px[2], 0xFF],
                2 => [px[0], px[0], px[0], px[1]],
                _ => [px[0], px[0], px[0], 0xFF],
            };
            rgba.extend_from_slice(&pixel);
        }
    }
    PixelImage::new(info.width, info.height, rgba)
}

/// Write an RGBA8 image as a PNG file, creating parent directories
pub fn encode_png(image: &PixelImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .context(format!("Failed to create image directory: {}", parent.display()))?;
    }
    let file = File::create(path).context(format!("Failed to create {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder
        .write_header()
        .context(format!("Failed to write PNG header to {}", path.display()))?;
    writer
        .write_image_data(image.rgba())
        .context(format!("Failed to encode {}", path.display()))?;
    writer
        .finish()
        .context(format!("Failed to finish {}", path.display()))?;
    Ok(())
}
