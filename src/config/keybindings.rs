//! Keybinding configuration types and parsing.
//!
//! Every binding resolves to an action invocation string such as
//! `Mode(Line)` or `PasteBuffer(ToLayout)`, which the editor runs through
//! the action registry when the key is pressed.

use crate::action::{Invocation, InvocationError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Problems found while building the keybinding map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyBindingError {
    #[error("Empty keybinding string")]
    Empty,

    #[error("No key specified in: {0}")]
    MissingKey(String),

    #[error("Duplicate keybinding '{binding}' assigned to both {first} and {second}")]
    Duplicate {
        binding: String,
        first: String,
        second: String,
    },

    #[error("Invalid command '{command}' bound to '{binding}': {source}")]
    InvalidCommand {
        binding: String,
        command: String,
        #[source]
        source: InvocationError,
    },
}

/// A single keybinding: a key name with optional modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyBinding {
    /// Parse a keybinding string like "Ctrl+Shift+Z" or "Escape".
    /// Modifiers can appear in any order and spaces around '+' are allowed.
    /// Single-character keys are stored lowercase so "Ctrl+z" and "Ctrl+Z"
    /// are the same binding.
    pub fn parse(s: &str) -> Result<Self, KeyBindingError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KeyBindingError::Empty);
        }

        let normalized = s.replace(" + ", "+").replace("+ ", "+").replace(" +", "+");

        let mut ctrl = false;
        let mut shift = false;
        let mut alt = false;
        let mut key_parts = Vec::new();

        for part in normalized.split('+') {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => ctrl = true,
                "shift" => shift = true,
                "alt" => alt = true,
                _ => key_parts.push(part),
            }
        }

        if key_parts.is_empty() {
            return Err(KeyBindingError::MissingKey(s.to_string()));
        }

        // "Ctrl++" splits into ["Ctrl", "", ""]: the key is '+'
        let key = match key_parts.join("+") {
            joined if joined.is_empty() => "+".to_string(),
            joined if joined.chars().count() == 1 => joined.to_lowercase(),
            joined => joined,
        };

        Ok(Self {
            key,
            ctrl,
            shift,
            alt,
        })
    }

    /// Check if this keybinding matches the current input state.
    pub fn matches(&self, key: &str, ctrl: bool, shift: bool, alt: bool) -> bool {
        self.key.eq_ignore_ascii_case(key)
            && self.ctrl == ctrl
            && self.shift == shift
            && self.alt == alt
    }
}

/// Configuration for all keybindings.
///
/// Each editor command can have multiple keybindings. Users specify them in
/// config.toml as:
/// ```toml
/// [keybindings]
/// undo = ["Ctrl+Z"]
/// mode_line = ["L"]
///
/// [keybindings.custom]
/// "ChangeSize(Selected, +1mil)" = ["Ctrl+S"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KeybindingsConfig {
    #[serde(default = "default_cancel")]
    pub cancel: Vec<String>,

    #[serde(default = "default_undo")]
    pub undo: Vec<String>,

    #[serde(default = "default_redo")]
    pub redo: Vec<String>,

    #[serde(default = "default_delete")]
    pub delete: Vec<String>,

    #[serde(default = "default_close_polygon")]
    pub close_polygon: Vec<String>,

    #[serde(default = "default_previous_point")]
    pub previous_point: Vec<String>,

    #[serde(default = "default_copy_to_buffer")]
    pub copy_to_buffer: Vec<String>,

    #[serde(default = "default_paste_buffer")]
    pub paste_buffer: Vec<String>,

    #[serde(default = "default_mark")]
    pub mark: Vec<String>,

    #[serde(default = "default_unselect_all")]
    pub unselect_all: Vec<String>,

    #[serde(default = "default_mode_arrow")]
    pub mode_arrow: Vec<String>,

    #[serde(default = "default_mode_via")]
    pub mode_via: Vec<String>,

    #[serde(default = "default_mode_line")]
    pub mode_line: Vec<String>,

    #[serde(default = "default_mode_arc")]
    pub mode_arc: Vec<String>,

    #[serde(default = "default_mode_rectangle")]
    pub mode_rectangle: Vec<String>,

    #[serde(default = "default_mode_text")]
    pub mode_text: Vec<String>,

    #[serde(default = "default_mode_polygon")]
    pub mode_polygon: Vec<String>,

    #[serde(default = "default_mode_polygon_hole")]
    pub mode_polygon_hole: Vec<String>,

    #[serde(default = "default_mode_lock")]
    pub mode_lock: Vec<String>,

    #[serde(default = "default_mode_thermal")]
    pub mode_thermal: Vec<String>,

    /// Free-form bindings: action invocation string → keys
    #[serde(default)]
    pub custom: BTreeMap<String, Vec<String>>,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            cancel: default_cancel(),
            undo: default_undo(),
            redo: default_redo(),
            delete: default_delete(),
            close_polygon: default_close_polygon(),
            previous_point: default_previous_point(),
            copy_to_buffer: default_copy_to_buffer(),
            paste_buffer: default_paste_buffer(),
            mark: default_mark(),
            unselect_all: default_unselect_all(),
            mode_arrow: default_mode_arrow(),
            mode_via: default_mode_via(),
            mode_line: default_mode_line(),
            mode_arc: default_mode_arc(),
            mode_rectangle: default_mode_rectangle(),
            mode_text: default_mode_text(),
            mode_polygon: default_mode_polygon(),
            mode_polygon_hole: default_mode_polygon_hole(),
            mode_lock: default_mode_lock(),
            mode_thermal: default_mode_thermal(),
            custom: BTreeMap::new(),
        }
    }
}

impl KeybindingsConfig {
    fn named(&self) -> [(&Vec<String>, &'static str); 20] {
        [
            (&self.cancel, "Mode(Cancel)"),
            (&self.undo, "Undo()"),
            (&self.redo, "Redo()"),
            (&self.delete, "Delete(Object)"),
            (&self.close_polygon, "Mode(Close)"),
            (&self.previous_point, "Polygon(PreviousPoint)"),
            (&self.copy_to_buffer, "PasteBuffer(AddSelected)"),
            (&self.paste_buffer, "PasteBuffer(ToLayout)"),
            (&self.mark, "MarkCrosshair()"),
            (&self.unselect_all, "Unselect(All)"),
            (&self.mode_arrow, "Mode(Arrow)"),
            (&self.mode_via, "Mode(Via)"),
            (&self.mode_line, "Mode(Line)"),
            (&self.mode_arc, "Mode(Arc)"),
            (&self.mode_rectangle, "Mode(Rectangle)"),
            (&self.mode_text, "Mode(Text)"),
            (&self.mode_polygon, "Mode(Polygon)"),
            (&self.mode_polygon_hole, "Mode(PolygonHole)"),
            (&self.mode_lock, "Mode(Lock)"),
            (&self.mode_thermal, "Mode(Thermal)"),
        ]
    }

    /// Build a lookup map from keybindings to command strings.
    ///
    /// Returns an error if any keybinding string is invalid, if a custom
    /// command does not parse, or if the same key combination is bound
    /// twice.
    pub fn build_action_map(&self) -> Result<HashMap<KeyBinding, String>, KeyBindingError> {
        let mut map: HashMap<KeyBinding, String> = HashMap::new();

        let mut insert_binding = |binding_str: &str, command: &str| -> Result<(), KeyBindingError> {
            let binding = KeyBinding::parse(binding_str)?;
            if let Some(existing) = map.insert(binding, command.to_string()) {
                return Err(KeyBindingError::Duplicate {
                    binding: binding_str.to_string(),
                    first: existing,
                    second: command.to_string(),
                });
            }
            Ok(())
        };

        for (bindings, command) in self.named() {
            for binding_str in bindings {
                insert_binding(binding_str, command)?;
            }
        }

        for (command, bindings) in &self.custom {
            if let Err(source) = Invocation::parse_line(command) {
                return Err(KeyBindingError::InvalidCommand {
                    binding: bindings.join(", "),
                    command: command.clone(),
                    source,
                });
            }
            for binding_str in bindings {
                insert_binding(binding_str, command)?;
            }
        }

        Ok(map)
    }
}

// =============================================================================
// Default keybinding functions
// =============================================================================

fn default_cancel() -> Vec<String> {
    vec!["Escape".to_string()]
}

fn default_undo() -> Vec<String> {
    vec!["Ctrl+Z".to_string()]
}

fn default_redo() -> Vec<String> {
    vec!["Ctrl+Y".to_string(), "Ctrl+Shift+Z".to_string()]
}

fn default_delete() -> Vec<String> {
    vec!["Delete".to_string()]
}

fn default_close_polygon() -> Vec<String> {
    vec!["Return".to_string()]
}

fn default_previous_point() -> Vec<String> {
    vec!["Backspace".to_string()]
}

fn default_copy_to_buffer() -> Vec<String> {
    vec!["Ctrl+C".to_string()]
}

fn default_paste_buffer() -> Vec<String> {
    vec!["Ctrl+V".to_string()]
}

fn default_mark() -> Vec<String> {
    vec!["Ctrl+M".to_string()]
}

fn default_unselect_all() -> Vec<String> {
    vec!["Ctrl+Shift+A".to_string()]
}

fn default_mode_arrow() -> Vec<String> {
    vec!["F11".to_string()]
}

fn default_mode_via() -> Vec<String> {
    vec!["F1".to_string()]
}

fn default_mode_line() -> Vec<String> {
    vec!["F2".to_string()]
}

fn default_mode_arc() -> Vec<String> {
    vec!["F3".to_string()]
}

fn default_mode_rectangle() -> Vec<String> {
    vec!["F4".to_string()]
}

fn default_mode_text() -> Vec<String> {
    vec!["F5".to_string()]
}

fn default_mode_polygon() -> Vec<String> {
    vec!["F6".to_string()]
}

fn default_mode_polygon_hole() -> Vec<String> {
    vec!["Shift+F6".to_string()]
}

fn default_mode_lock() -> Vec<String> {
    vec!["F7".to_string()]
}

fn default_mode_thermal() -> Vec<String> {
    vec!["F8".to_string()]
}
