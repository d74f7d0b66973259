pub mod keybind_settings;
pub mod mirror_list;
pub mod resolution_panel;
pub mod settings_editor;
