//! Key names, Linux input event codes and the emote shortcuts

use std::fmt;

/// Linux input event code (see /usr/include/linux/input-event-codes.h)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCode(pub u16);

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl KeyCode {
    pub const ENTER: KeyCode = KeyCode(28);
    pub const LEFT_CTRL: KeyCode = KeyCode(29);
    pub const B: KeyCode = KeyCode(48);
    pub const C: KeyCode = KeyCode(46);
    pub const V: KeyCode = KeyCode(47);
    pub const Z: KeyCode = KeyCode(44);

    /// Resolve a human-readable key name.
    ///
    /// Unknown names that are plain numbers are passed through as raw codes.
    pub fn from_name(name: &str) -> Option<KeyCode> {
        let code = match name.trim().to_lowercase().as_str() {
            // Modifiers
            "ctrl" | "control" => 29,
            "shift" => 42,
            "alt" | "option" => 56,
            "super" | "meta" | "win" | "command" | "cmd" => 125,

            // Special keys
            "return" | "enter" => 28,
            "escape" | "esc" => 1,
            "tab" => 15,
            "backspace" => 14,
            "space" => 57,
            "delete" => 111,
            "insert" => 110,
            "home" => 102,
            "end" => 107,
            "pageup" => 104,
            "pagedown" => 109,

            // Arrow keys
            "up" => 103,
            "down" => 108,
            "left" => 105,
            "right" => 106,

            // Function keys
            "f1" => 59,
            "f2" => 60,
            "f3" => 61,
            "f4" => 62,
            "f5" => 63,
            "f6" => 64,
            "f7" => 65,
            "f8" => 66,
            "f9" => 67,
            "f10" => 68,
            "f11" => 87,
            "f12" => 88,

            // Letters
            "a" => 30,
            "b" => 48,
            "c" => 46,
            "d" => 32,
            "e" => 18,
            "f" => 33,
            "g" => 34,
            "h" => 35,
            "i" => 23,
            "j" => 36,
            "k" => 37,
            "l" => 38,
            "m" => 50,
            "n" => 49,
            "o" => 24,
            "p" => 25,
            "q" => 16,
            "r" => 19,
            "s" => 31,
            "t" => 20,
            "u" => 22,
            "v" => 47,
            "w" => 17,
            "x" => 45,
            "y" => 21,
            "z" => 44,

            // Digits row
            "1" => 2,
            "2" => 3,
            "3" => 4,
            "4" => 5,
            "5" => 6,
            "6" => 7,
            "7" => 8,
            "8" => 9,
            "9" => 10,
            "0" => 11,

            other => return other.strip_prefix("code:").unwrap_or(other).parse().ok().map(KeyCode),
        };
        Some(KeyCode(code))
    }
}

/// Emote shortcuts bound to the digit row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emote {
    Sit,
    Like,
    Pachi,
    Waiwai,
    Laugh,
    Heart,
    Bikkuri,
    Haten,
    Nori,
    Smile,
    /// Anything else is sent through as a key string
    Raw(String),
}

impl Emote {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "sit" => Emote::Sit,
            "like" => Emote::Like,
            "pachi" => Emote::Pachi,
            "waiwai" => Emote::Waiwai,
            "laugh" => Emote::Laugh,
            "heart" => Emote::Heart,
            "bikkuri" => Emote::Bikkuri,
            "haten" => Emote::Haten,
            "nori" => Emote::Nori,
            "smile" => Emote::Smile,
            _ => Emote::Raw(name.trim().to_string()),
        }
    }

    /// Key sequence to press for this emote
    pub fn keys(&self) -> &str {
        match self {
            Emote::Sit => "1",
            Emote::Like => "2",
            Emote::Pachi => "3",
            Emote::Waiwai => "4",
            Emote::Laugh => "5",
            Emote::Heart => "6",
            Emote::Bikkuri => "7",
            Emote::Haten => "8",
            Emote::Nori => "9",
            Emote::Smile => "0",
            Emote::Raw(keys) => keys,
        }
    }
}
