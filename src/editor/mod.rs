//! egui front-end: control panel plus the painted viewport

mod canvas;
mod components;
mod constants;
mod keymap;
mod manager;
mod textures;

pub use manager::run_editor;
