//! Raw and normalized input event records.
//!
//! Raw events come straight from the OS hooks (or a replay file) and are never
//! persisted. Normalized events keep only a closed category plus the app the
//! user was in; clipboard text and typed characters do not survive
//! normalization.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One low-level signal from an input source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInputEvent {
    /// Monotonic milliseconds from the shared clock.
    pub timestamp_ms: u64,
    #[serde(flatten)]
    pub kind: RawEventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawEventKind {
    KeyDown {
        key: String,
    },
    KeyUp {
        key: String,
    },
    MouseDown {
        button: String,
        x: i32,
        y: i32,
    },
    MouseUp {
        button: String,
        x: i32,
        y: i32,
    },
    ClipboardChange {
        #[serde(default)]
        content: Option<String>,
    },
    FocusChange {
        app_name: String,
        #[serde(default)]
        window_title: String,
    },
}

impl RawInputEvent {
    pub fn new(timestamp_ms: u64, kind: RawEventKind) -> Self {
        Self { timestamp_ms, kind }
    }

    pub fn key_down(timestamp_ms: u64, key: &str) -> Self {
        Self::new(timestamp_ms, RawEventKind::KeyDown { key: key.into() })
    }

    pub fn key_up(timestamp_ms: u64, key: &str) -> Self {
        Self::new(timestamp_ms, RawEventKind::KeyUp { key: key.into() })
    }

    pub fn mouse_down(timestamp_ms: u64, button: &str, x: i32, y: i32) -> Self {
        Self::new(
            timestamp_ms,
            RawEventKind::MouseDown {
                button: button.into(),
                x,
                y,
            },
        )
    }

    pub fn clipboard(timestamp_ms: u64, content: &str) -> Self {
        Self::new(
            timestamp_ms,
            RawEventKind::ClipboardChange {
                content: Some(content.into()),
            },
        )
    }

    pub fn focus(timestamp_ms: u64, app_name: &str, window_title: &str) -> Self {
        Self::new(
            timestamp_ms,
            RawEventKind::FocusChange {
                app_name: app_name.into(),
                window_title: window_title.into(),
            },
        )
    }
}

/// Keys the classifier distinguishes. Anything else collapses to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Ctrl,
    Shift,
    Alt,
    Meta,
    C,
    V,
    X,
    Other,
}

impl Key {
    /// Maps hook key names (`"ctrl"`, `"Key.ctrl_l"`, `"Control_R"`, `"c"`, ...)
    /// onto the classifier's key set. Returns `None` for an empty name.
    pub fn from_name(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return None;
        }

        let lower = trimmed.to_ascii_lowercase();
        let lower = lower.strip_prefix("key.").unwrap_or(&lower);
        let base = lower
            .trim_end_matches("_l")
            .trim_end_matches("_r")
            .trim_end_matches("left")
            .trim_end_matches("right")
            .trim_end_matches(['_', ' ']);

        let key = match base {
            "ctrl" | "control" | "lctrl" | "rctrl" => Key::Ctrl,
            "shift" | "lshift" | "rshift" => Key::Shift,
            "alt" | "option" | "alt_gr" | "lalt" | "ralt" => Key::Alt,
            "cmd" | "command" | "meta" | "super" | "win" | "windows" => Key::Meta,
            "c" => Key::C,
            "v" => Key::V,
            "x" => Key::X,
            _ => Key::Other,
        };
        Some(key)
    }

    pub fn is_modifier(self) -> bool {
        matches!(self, Key::Ctrl | Key::Shift | Key::Alt | Key::Meta)
    }

    pub fn category(self) -> EventCategory {
        match self {
            Key::Ctrl => EventCategory::KeyCtrl,
            Key::Shift => EventCategory::KeyShift,
            Key::Alt => EventCategory::KeyAlt,
            Key::Meta => EventCategory::KeyMeta,
            Key::C => EventCategory::KeyC,
            Key::V => EventCategory::KeyV,
            Key::X => EventCategory::KeyX,
            Key::Other => EventCategory::KeyOther,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        match lower.strip_prefix("button.").unwrap_or(&lower) {
            "left" | "primary" => Some(MouseButton::Left),
            "right" | "secondary" => Some(MouseButton::Right),
            "middle" => Some(MouseButton::Middle),
            _ => None,
        }
    }

    pub fn category(self) -> EventCategory {
        match self {
            MouseButton::Left => EventCategory::LeftClick,
            MouseButton::Right => EventCategory::RightClick,
            MouseButton::Middle => EventCategory::MiddleClick,
        }
    }
}

/// Closed set of event categories; the only input detail that is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    KeyCtrl,
    KeyShift,
    KeyAlt,
    KeyMeta,
    KeyC,
    KeyV,
    KeyX,
    KeyOther,
    LeftClick,
    RightClick,
    MiddleClick,
    ClipboardChanged,
    FocusChanged,
}

impl EventCategory {
    pub const ALL: [EventCategory; 13] = [
        EventCategory::KeyCtrl,
        EventCategory::KeyShift,
        EventCategory::KeyAlt,
        EventCategory::KeyMeta,
        EventCategory::KeyC,
        EventCategory::KeyV,
        EventCategory::KeyX,
        EventCategory::KeyOther,
        EventCategory::LeftClick,
        EventCategory::RightClick,
        EventCategory::MiddleClick,
        EventCategory::ClipboardChanged,
        EventCategory::FocusChanged,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::KeyCtrl => "KEY_CTRL",
            EventCategory::KeyShift => "KEY_SHIFT",
            EventCategory::KeyAlt => "KEY_ALT",
            EventCategory::KeyMeta => "KEY_META",
            EventCategory::KeyC => "KEY_C",
            EventCategory::KeyV => "KEY_V",
            EventCategory::KeyX => "KEY_X",
            EventCategory::KeyOther => "KEY_OTHER",
            EventCategory::LeftClick => "LEFT_CLICK",
            EventCategory::RightClick => "RIGHT_CLICK",
            EventCategory::MiddleClick => "MIDDLE_CLICK",
            EventCategory::ClipboardChanged => "CLIPBOARD_CHANGED",
            EventCategory::FocusChanged => "FOCUS_CHANGED",
        }
    }

    pub fn is_click(&self) -> bool {
        matches!(
            self,
            EventCategory::LeftClick | EventCategory::RightClick | EventCategory::MiddleClick
        )
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        EventCategory::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| format!("unknown event category '{value}'"))
    }
}

/// Modifier keys held at the moment an event was observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        shift: false,
        alt: false,
        meta: false,
    };

    pub fn any(&self) -> bool {
        self.ctrl || self.shift || self.alt || self.meta
    }

    /// Ctrl on Windows/Linux, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    pub(crate) fn is_held(&self, key: Key) -> bool {
        match key {
            Key::Ctrl => self.ctrl,
            Key::Shift => self.shift,
            Key::Alt => self.alt,
            Key::Meta => self.meta,
            _ => false,
        }
    }

    pub(crate) fn set(&mut self, key: Key, held: bool) {
        match key {
            Key::Ctrl => self.ctrl = held,
            Key::Shift => self.shift = held,
            Key::Alt => self.alt = held,
            Key::Meta => self.meta = held,
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEvent {
    pub timestamp_ms: u64,
    pub category: EventCategory,
    pub app_context: String,
    pub window_title: String,
    pub modifiers: Modifiers,
    /// Screen coordinates for clicks. Used for locator lookups only.
    #[serde(skip)]
    pub position: Option<(i32, i32)>,
}

impl NormalizedEvent {
    pub fn is_fast_path_key(&self) -> bool {
        matches!(
            self.category,
            EventCategory::KeyC | EventCategory::KeyV | EventCategory::KeyX
        ) && self.modifiers.command()
    }
}
