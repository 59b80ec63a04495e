//! Generic input event types delivered to the mode machine.

use crate::board::Point;

/// Generic key representation.
///
/// Front ends map their native key codes to these values; scripts name them
/// with the same strings keybindings use (`"Escape"`, `"Return"`, `"a"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Regular character key (a-z, 0-9, symbols)
    Char(char),
    /// Escape key (cancel)
    Escape,
    /// Return/Enter key
    Return,
    /// Backspace key
    Backspace,
    /// Delete key
    Delete,
    /// Tab key
    Tab,
    /// Space bar
    Space,
    /// Shift modifier
    Shift,
    /// Ctrl modifier
    Ctrl,
    /// Alt modifier
    Alt,
    /// Function key F1-F12
    F(u8),
    /// Unmapped or unrecognized key
    Unknown,
}

impl Key {
    /// Parses a key name as used in keybindings and scripts.
    pub fn from_name(name: &str) -> Key {
        let trimmed = name.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return if c == ' ' { Key::Space } else { Key::Char(c) };
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "escape" | "esc" => Key::Escape,
            "return" | "enter" => Key::Return,
            "backspace" => Key::Backspace,
            "delete" | "del" => Key::Delete,
            "tab" => Key::Tab,
            "space" => Key::Space,
            "shift" => Key::Shift,
            "ctrl" | "control" => Key::Ctrl,
            "alt" => Key::Alt,
            other => other
                .strip_prefix('f')
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|n| (1..=12).contains(n))
                .map_or(Key::Unknown, Key::F),
        }
    }

    /// Name used to look the key up in the keybinding map.
    pub fn binding_name(&self) -> Option<String> {
        match self {
            Key::Char(c) => Some(c.to_string()),
            Key::Escape => Some("Escape".to_string()),
            Key::Return => Some("Return".to_string()),
            Key::Backspace => Some("Backspace".to_string()),
            Key::Delete => Some("Delete".to_string()),
            Key::Tab => Some("Tab".to_string()),
            Key::Space => Some("Space".to_string()),
            Key::F(n) => Some(format!("F{n}")),
            Key::Shift | Key::Ctrl | Key::Alt | Key::Unknown => None,
        }
    }

    pub fn is_modifier(&self) -> bool {
        matches!(self, Key::Shift | Key::Ctrl | Key::Alt)
    }
}

/// Mouse button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Left mouse button (primary editing button)
    Left,
    /// Right mouse button (cancel)
    Right,
    /// Middle mouse button (currently unused)
    Middle,
}

/// One event for the mode machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeEvent {
    Press { at: Point, button: MouseButton },
    Motion { at: Point },
    Release { at: Point, button: MouseButton },
    /// Discard the current construction
    Cancel,
    /// Finish a multi-point construction
    Close,
    Key(Key),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_names_round_trip() {
        for key in [Key::Escape, Key::Return, Key::Backspace, Key::F(10), Key::Char('z')] {
            let name = key.binding_name().unwrap();
            assert_eq!(Key::from_name(&name), key);
        }
        assert_eq!(Key::from_name("esc"), Key::Escape);
        assert_eq!(Key::from_name("F13"), Key::Unknown);
    }
}
