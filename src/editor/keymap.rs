//! egui input to the engine's physical key codes and modifiers

use eframe::egui;

use crate::interaction::Modifiers;
use crate::viewport::WheelDeltaMode;

/// Physical key code (`KeyA`, `Digit1`, `F8`, ...) for an egui key
pub fn key_code(key: egui::Key) -> Option<String> {
    use egui::Key;

    let named = match key {
        Key::Escape => "Escape",
        Key::Tab => "Tab",
        Key::Backspace => "Backspace",
        Key::Enter => "Enter",
        Key::Space => "Space",
        Key::Insert => "Insert",
        Key::Delete => "Delete",
        Key::Home => "Home",
        Key::End => "End",
        Key::PageUp => "PageUp",
        Key::PageDown => "PageDown",
        Key::ArrowUp => "ArrowUp",
        Key::ArrowDown => "ArrowDown",
        Key::ArrowLeft => "ArrowLeft",
        Key::ArrowRight => "ArrowRight",
        Key::Minus => "Minus",
        Key::Equals => "Equal",
        Key::OpenBracket => "BracketLeft",
        Key::CloseBracket => "BracketRight",
        Key::Backslash => "Backslash",
        Key::Semicolon => "Semicolon",
        Key::Quote => "Quote",
        Key::Backtick => "Backquote",
        Key::Comma => "Comma",
        Key::Period => "Period",
        Key::Slash => "Slash",
        _ => "",
    };
    if !named.is_empty() {
        return Some(named.to_string());
    }

    let name = key.name();
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return match c {
            'A'..='Z' => Some(format!("Key{c}")),
            '0'..='9' => Some(format!("Digit{c}")),
            _ => None,
        };
    }
    let is_function_key = name
        .strip_prefix('F')
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()));
    is_function_key.then(|| name.to_string())
}

pub fn modifiers(m: egui::Modifiers) -> Modifiers {
    Modifiers {
        shift: m.shift,
        ctrl: m.ctrl,
        alt: m.alt,
        meta: m.mac_cmd,
    }
}

pub fn wheel_mode(unit: egui::MouseWheelUnit) -> WheelDeltaMode {
    match unit {
        egui::MouseWheelUnit::Point => WheelDeltaMode::Pixel,
        egui::MouseWheelUnit::Line => WheelDeltaMode::Line,
        egui::MouseWheelUnit::Page => WheelDeltaMode::Page,
    }
}
