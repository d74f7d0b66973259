//! Physical key codes (`KeyA`, `Digit1`, `F8`, ...) and their names in the
//! exported compositor config

fn named_key(code: &str) -> Option<&'static str> {
    let name = match code {
        "Escape" => "ESC",
        "Backspace" => "BACKSPACE",
        "Tab" => "TAB",
        "Enter" => "ENTER",
        "Space" => "SPACE",
        "ArrowUp" => "UP",
        "ArrowDown" => "DOWN",
        "ArrowLeft" => "LEFT",
        "ArrowRight" => "RIGHT",
        "ShiftLeft" => "LEFTSHIFT",
        "ShiftRight" => "RIGHTSHIFT",
        "ControlLeft" => "LEFTCTRL",
        "ControlRight" => "RIGHTCTRL",
        "AltLeft" => "LEFTALT",
        "AltRight" => "RIGHTALT",
        "MetaLeft" => "LEFTMETA",
        "MetaRight" => "RIGHTMETA",
        "CapsLock" => "CAPSLOCK",
        "NumLock" => "NUMLOCK",
        "ScrollLock" => "SCROLLLOCK",
        "Insert" => "INSERT",
        "Delete" => "DELETE",
        "Home" => "HOME",
        "End" => "END",
        "PageUp" => "PAGEUP",
        "PageDown" => "PAGEDOWN",
        "PrintScreen" => "SYSRQ",
        "Pause" => "PAUSE",
        "Minus" => "MINUS",
        "Equal" => "EQUAL",
        "BracketLeft" => "LEFTBRACE",
        "BracketRight" => "RIGHTBRACE",
        "Backslash" => "BACKSLASH",
        "Semicolon" => "SEMICOLON",
        "Quote" => "APOSTROPHE",
        "Backquote" => "GRAVE",
        "Comma" => "COMMA",
        "Period" => "DOT",
        "Slash" => "SLASH",
        "IntlBackslash" => "102ND",
        "ContextMenu" => "COMPOSE",
        "NumpadAdd" => "KPPLUS",
        "NumpadSubtract" => "KPMINUS",
        "NumpadMultiply" => "KPASTERISK",
        "NumpadDivide" => "KPSLASH",
        "NumpadDecimal" => "KPDOT",
        "NumpadEnter" => "KPENTER",
        _ => return None,
    };
    Some(name)
}

fn single_digit(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_digit() => Some(c),
        _ => None,
    }
}

/// Compositor key name for a physical key code; `None` means "no binding"
pub fn export_key_name(code: &str) -> Option<String> {
    let code = code.trim();
    if code.is_empty() {
        return None;
    }
    if let Some(name) = named_key(code) {
        return Some(name.to_string());
    }
    if let Some(letter) = code.strip_prefix("Key") {
        let mut chars = letter.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_uppercase() {
                return Some(c.to_string());
            }
        }
        return None;
    }
    if let Some(digit) = code.strip_prefix("Digit").and_then(single_digit) {
        return Some(digit.to_string());
    }
    if let Some(digit) = code.strip_prefix("Numpad").and_then(single_digit) {
        return Some(format!("KP{digit}"));
    }
    if let Some(n) = code.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
        // Reject "F01" style spellings
        if (1..=12).contains(&n) && code[1..] == n.to_string() {
            return Some(code.to_string());
        }
    }
    None
}

/// Short human label for a bound key code
pub fn format_keybind_label(code: &str) -> String {
    if code.is_empty() {
        return "Unset".to_string();
    }
    if let Some(rest) = code.strip_prefix("Key") {
        return rest.to_uppercase();
    }
    if let Some(rest) = code.strip_prefix("Digit") {
        return rest.to_string();
    }
    if let Some(rest) = code.strip_prefix("Numpad") {
        return format!("Num {rest}");
    }
    let alias = match code {
        "Escape" => "Esc",
        "Backquote" => "`",
        "Minus" => "-",
        "Equal" => "=",
        "BracketLeft" => "[",
        "BracketRight" => "]",
        "Semicolon" => ";",
        "Quote" => "'",
        "Comma" => ",",
        "Period" => ".",
        "Slash" => "/",
        "Backslash" => "\\",
        other => other,
    };
    alias.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_key_name_table() {
        assert_eq!(export_key_name("KeyA").as_deref(), Some("A"));
        assert_eq!(export_key_name("KeyZ").as_deref(), Some("Z"));
        assert_eq!(export_key_name("Digit0").as_deref(), Some("0"));
        assert_eq!(export_key_name("Numpad7").as_deref(), Some("KP7"));
        assert_eq!(export_key_name("F1").as_deref(), Some("F1"));
        assert_eq!(export_key_name("F12").as_deref(), Some("F12"));
        assert_eq!(export_key_name("Quote").as_deref(), Some("APOSTROPHE"));
        assert_eq!(export_key_name("NumpadEnter").as_deref(), Some("KPENTER"));
        assert_eq!(export_key_name("PrintScreen").as_deref(), Some("SYSRQ"));
    }

    #[test]
    fn test_export_key_name_unmapped() {
        for code in ["", "   ", "F13", "F0", "F01", "KeyAB", "Keya", "Digit10", "Numpad", "MediaPlayPause"] {
            assert_eq!(export_key_name(code), None, "{code}");
        }
    }

    #[test]
    fn test_format_keybind_label() {
        assert_eq!(format_keybind_label(""), "Unset");
        assert_eq!(format_keybind_label("KeyG"), "G");
        assert_eq!(format_keybind_label("Digit4"), "4");
        assert_eq!(format_keybind_label("Numpad4"), "Num 4");
        assert_eq!(format_keybind_label("Escape"), "Esc");
        assert_eq!(format_keybind_label("Backslash"), "\\");
        assert_eq!(format_keybind_label("F8"), "F8");
    }
}
