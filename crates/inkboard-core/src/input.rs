//! Pointer and keyboard input types.

use crate::shortcuts::ShortcutError;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    /// Ctrl on Linux/Windows, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Whether a pointer-down should toggle into a multi-selection.
    pub fn is_additive(&self) -> bool {
        self.shift || self.command()
    }
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, modifiers: Modifiers },
    Move { position: Point },
    Up { position: Point },
    DoubleClick { position: Point },
    Wheel { position: Point, delta: Vec2 },
}

/// A key with modifiers, e.g. `Ctrl+Shift+Z`.
///
/// Letter keys are stored uppercase. Meta folds into `ctrl` so that Cmd and
/// Ctrl bindings are the same combo.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub key: String,
}

impl KeyCombo {
    pub fn new(key: &str) -> Self {
        Self {
            ctrl: false,
            shift: false,
            alt: false,
            key: normalize_key(key),
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// Build a combo from a host key event.
    ///
    /// Shifted brackets (`{`, `}`) are reported as Shift plus the unshifted key.
    pub fn from_event(key: &str, modifiers: Modifiers) -> Self {
        let (key, implied_shift) = match key {
            "{" => ("[", true),
            "}" => ("]", true),
            other => (other, false),
        };
        Self {
            ctrl: modifiers.command(),
            shift: modifiers.shift || implied_shift,
            alt: modifiers.alt,
            key: normalize_key(key),
        }
    }
}

fn normalize_key(key: &str) -> String {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_uppercase().collect(),
        _ => match key.to_ascii_lowercase().as_str() {
            "del" | "delete" => "Delete".to_string(),
            "backspace" => "Backspace".to_string(),
            "esc" | "escape" => "Escape".to_string(),
            "enter" | "return" => "Enter".to_string(),
            "space" => "Space".to_string(),
            "tab" => "Tab".to_string(),
            _ => key.to_string(),
        },
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        f.write_str(&self.key)
    }
}

impl FromStr for KeyCombo {
    type Err = ShortcutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (mods, key) = if let Some(prefix) = s.strip_suffix("++") {
            (prefix, "+")
        } else {
            match s.rsplit_once('+') {
                Some((mods, key)) => (mods, key),
                None => ("", s),
            }
        };
        if key.is_empty() {
            return Err(ShortcutError::Parse(s.to_string()));
        }
        let mut combo = KeyCombo::new(key);
        for part in mods.split('+').filter(|p| !p.is_empty()) {
            match part.trim().to_ascii_lowercase().as_str() {
                "ctrl" | "control" | "cmd" | "meta" | "command" => combo.ctrl = true,
                "shift" => combo.shift = true,
                "alt" | "option" => combo.alt = true,
                _ => return Err(ShortcutError::Parse(s.to_string())),
            }
        }
        Ok(combo)
    }
}

impl Serialize for KeyCombo {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for KeyCombo {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
