//! Persisted settings groups
//!
//! Every group has its own storage key and a total `normalize`: whatever is
//! read back from disk (or typed into the editor) is coerced into a valid
//! record, never rejected.

mod keybinds;
mod resolution;
mod tall_overlay;
mod theme;
mod window;

pub use keybinds::{Action, ActionKeybinds};
pub use resolution::{BaseResolution, preset_for};
pub use tall_overlay::TallOverlaySettings;
pub use theme::{ANCHOR_POSITIONS, BackgroundType, ThemeSettings};
pub use window::WindowSettings;
