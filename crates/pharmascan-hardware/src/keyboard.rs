//! Keyboard event model.
//!
//! Keyboard-wedge barcode scanners present themselves as a keyboard: every
//! character of the barcode arrives as a key press, followed by `Enter`.
//! These types describe one key press together with where UI focus was at
//! the time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// A single key as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// A key that produces one character.
    Char(char),

    /// The Enter / Return key.
    Enter,

    /// Any other named key (`Shift`, `Tab`, `ArrowLeft`, ...).
    Named(String),
}

impl Key {
    /// Build a key from a host key name.
    ///
    /// A name of exactly one character is that character, `"Enter"` is
    /// [`Key::Enter`], anything else is [`Key::Named`].
    ///
    /// ```
    /// use pharmascan_hardware::Key;
    ///
    /// assert_eq!(Key::from_name("7"), Key::Char('7'));
    /// assert_eq!(Key::from_name("Enter"), Key::Enter);
    /// assert_eq!(Key::from_name("Shift"), Key::Named("Shift".to_string()));
    /// ```
    pub fn from_name(name: &str) -> Self {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::Char(c),
            _ if name == "Enter" => Self::Enter,
            _ => Self::Named(name.to_string()),
        }
    }

    /// The character this key appends to a scan buffer, if any.
    ///
    /// Control characters are not printable, so a single-character key
    /// such as `'\t'` yields `None`.
    pub fn printable(&self) -> Option<char> {
        match self {
            Self::Char(c) if !c.is_control() => Some(*c),
            _ => None,
        }
    }

    /// Returns `true` for the Enter key.
    pub fn is_enter(&self) -> bool {
        matches!(self, Self::Enter)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{c}"),
            Self::Enter => write!(f, "Enter"),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}

/// The UI element holding keyboard focus when a key was pressed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FocusTarget {
    /// Nothing in particular is focused.
    #[default]
    None,

    /// A single-line text input.
    TextInput,

    /// A multi-line text area.
    TextArea,

    /// An editable rich-text region.
    ContentEditable,

    /// Any other focusable element (button, link, list).
    Other(String),
}

impl FocusTarget {
    /// Returns `true` if the focused element accepts typed text.
    ///
    /// Keystrokes aimed at such elements belong to the user, not to a
    /// scanner, and must never reach the scan buffer.
    pub fn is_text_entry(&self) -> bool {
        matches!(self, Self::TextInput | Self::TextArea | Self::ContentEditable)
    }
}

/// One key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub key: Key,

    /// Focused element at the time of the press.
    pub focus: FocusTarget,

    /// Monotonic time of the press.
    pub at: Instant,
}

impl KeyEvent {
    /// Create a key event with nothing focused.
    pub fn new(key: Key, at: Instant) -> Self {
        Self {
            key,
            focus: FocusTarget::None,
            at,
        }
    }

    /// Set the focused element.
    pub fn with_focus(mut self, focus: FocusTarget) -> Self {
        self.focus = focus;
        self
    }
}
