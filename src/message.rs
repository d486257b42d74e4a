//! Input event types for the configurator.
//!
//! Raw pointer and keyboard input arrives as `InputEvent`s; key bindings turn
//! key presses into `Command`s that the session understands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Point;

/// Pointer button transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerState {
    /// Button went down this step
    Pressed,
    /// Button is still down (drag)
    Held,
    /// Button went up this step
    Released,
}

/// A key, without modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Printable character (space included)
    Char(char),
    Enter,
    Backspace,
    Escape,
    Tab,
}

/// A key together with the Ctrl modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyPress {
    pub key: Key,
    pub ctrl: bool,
}

impl KeyPress {
    /// A key pressed without modifiers.
    pub fn plain(key: Key) -> Self {
        Self { key, ctrl: false }
    }

    /// A character pressed together with Ctrl.
    pub fn ctrl(c: char) -> Self {
        Self {
            key: Key::Char(c.to_ascii_lowercase()),
            ctrl: true,
        }
    }

    /// Decode a classic 8-bit key code as returned by terminal and highgui style input.
    ///
    /// Control codes 1-26 are Ctrl+letter except the ones with a dedicated key
    /// (8 backspace, 9 tab, 10/13 enter).
    pub fn from_ascii(code: u8) -> Option<Self> {
        let key = match code {
            8 | 127 => Key::Backspace,
            9 => Key::Tab,
            10 | 13 => Key::Enter,
            27 => Key::Escape,
            1..=26 => return Some(Self::ctrl(char::from(b'a' + code - 1))),
            32..=126 => Key::Char(char::from(code)),
            _ => return None,
        };
        Some(Self::plain(key))
    }

    /// The printable character of this press, if it is one without Ctrl.
    pub fn text(&self) -> Option<char> {
        match self.key {
            Key::Char(c) if !self.ctrl => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for KeyPress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            write!(f, "Ctrl+")?;
        }
        match self.key {
            Key::Char(' ') => write!(f, "Space"),
            Key::Char(c) if self.ctrl => write!(f, "{}", c.to_ascii_uppercase()),
            Key::Char(c) => write!(f, "{c}"),
            Key::Enter => write!(f, "Enter"),
            Key::Backspace => write!(f, "Backspace"),
            Key::Escape => write!(f, "Esc"),
            Key::Tab => write!(f, "Tab"),
        }
    }
}

/// Error returned when a key name cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown key {0:?}")]
pub struct KeyParseError(pub String);

impl FromStr for KeyPress {
    type Err = KeyParseError;

    /// Parse names like `enter`, `space`, `esc`, `a` or `ctrl+s` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();

        if let Some(rest) = lower.strip_prefix("ctrl+") {
            let mut chars = rest.chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphanumeric() => Ok(Self::ctrl(c)),
                _ => Err(KeyParseError(trimmed.to_string())),
            };
        }

        let key = match lower.as_str() {
            "enter" | "return" => Key::Enter,
            "space" => Key::Char(' '),
            "backspace" => Key::Backspace,
            "esc" | "escape" => Key::Escape,
            "tab" => Key::Tab,
            _ => {
                // Single characters keep their case
                let mut chars = trimmed.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_control() => Key::Char(c),
                    _ => return Err(KeyParseError(trimmed.to_string())),
                }
            }
        };
        Ok(Self::plain(key))
    }
}

impl TryFrom<String> for KeyPress {
    type Error = KeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeyPress> for String {
    fn from(key: KeyPress) -> Self {
        key.to_string()
    }
}

/// A discrete input event from the input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Pointer button transition at a display position
    Pointer {
        state: PointerState,
        position: Point,
    },
    /// Key press
    Key(KeyPress),
}

/// Session-level commands produced from key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Confirm the current step (region or background)
    Confirm,
    /// Commit the open marker and start the next one
    CommitMarker,
    /// Delete the last character of the open name
    Backspace,
    /// Type a character into the open name
    TypeChar(char),
    /// Write the configuration
    Save,
    /// End the session without saving
    Cancel,
}
