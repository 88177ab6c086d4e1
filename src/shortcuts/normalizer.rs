//! Raw key event normalization.
//!
//! Maps a physical key code (W3C `KeyboardEvent.code`, e.g. `KeyA`, `Digit1`,
//! `ControlLeft`) plus modifier flags to canonical accelerator tokens. The main
//! key always comes from the physical position, never from the produced
//! character, so Alt chords and keyboard layouts don't change the result.

use serde::Deserialize;

use super::types::{
    MainKey, ModifierSet, DIGIT_KEYS, FUNCTION_KEYS, LETTER_KEYS, NAMED_KEYS, SYMBOL_KEYS,
};

/// One raw key-down event as delivered by the UI layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawKeyEvent {
    /// Physical key code, e.g. `KeyA`, `Digit1`, `ShiftLeft`
    pub code: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub meta: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
}

impl RawKeyEvent {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Default::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// Logical modifiers held during this event.
    pub fn modifiers(&self) -> ModifierSet {
        let mut modifiers = ModifierSet::empty();
        if self.ctrl || self.meta {
            modifiers |= ModifierSet::COMMAND_OR_CONTROL;
        }
        if self.shift {
            modifiers |= ModifierSet::SHIFT;
        }
        if self.alt {
            modifiers |= ModifierSet::ALT;
        }
        modifiers
    }

    /// Compact modifier summary for logs (`ctrl+shift`).
    pub fn modifier_summary(&self) -> String {
        let flags = [
            (self.ctrl, "ctrl"),
            (self.meta, "meta"),
            (self.shift, "shift"),
            (self.alt, "alt"),
        ];
        flags
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join("+")
    }
}

/// What a physical key code means to the recorder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NormalizedKey {
    /// A canonical main key
    Main(MainKey),
    /// The key is itself a modifier (Shift, Control, Alt, Meta)
    Modifier,
    /// Not in the code table (CapsLock, media keys, IME codes, ...)
    Unmapped,
}

/// Check if a physical code belongs to a modifier key.
pub fn is_modifier_code(code: &str) -> bool {
    matches!(
        code,
        "ShiftLeft"
            | "ShiftRight"
            | "ControlLeft"
            | "ControlRight"
            | "AltLeft"
            | "AltRight"
            | "MetaLeft"
            | "MetaRight"
            | "OSLeft"
            | "OSRight"
    )
}

/// Classify a physical key code.
pub fn normalize_code(code: &str) -> NormalizedKey {
    if is_modifier_code(code) {
        return NormalizedKey::Modifier;
    }
    match main_key_token(code) {
        Some(token) => NormalizedKey::Main(MainKey::from_static(token)),
        None => NormalizedKey::Unmapped,
    }
}

/// Main key for a raw event, if the event carries one.
pub fn main_key(event: &RawKeyEvent) -> Option<MainKey> {
    match normalize_code(&event.code) {
        NormalizedKey::Main(key) => Some(key),
        NormalizedKey::Modifier => None,
        NormalizedKey::Unmapped => {
            tracing::debug!(code = %event.code, "Ignoring unmapped key code");
            None
        }
    }
}

fn main_key_token(code: &str) -> Option<&'static str> {
    if let Some(letter) = code.strip_prefix("Key") {
        return table_lookup(&LETTER_KEYS, letter);
    }
    if let Some(digit) = code
        .strip_prefix("Digit")
        .or_else(|| code.strip_prefix("Numpad"))
    {
        if let Some(token) = table_lookup(&DIGIT_KEYS, digit) {
            return Some(token);
        }
    }
    if let Some(token) = table_lookup(&FUNCTION_KEYS, code) {
        return Some(token);
    }

    let token = match code {
        "Space" => "Space",
        "Enter" | "NumpadEnter" => "Enter",
        "Backspace" => "Backspace",
        "Tab" => "Tab",
        "Escape" => "Escape",
        "Delete" => "Delete",
        "Insert" => "Insert",
        "Home" => "Home",
        "End" => "End",
        "PageUp" => "PageUp",
        "PageDown" => "PageDown",
        "ArrowUp" => "Up",
        "ArrowDown" => "Down",
        "ArrowLeft" => "Left",
        "ArrowRight" => "Right",
        "Minus" => "-",
        "Equal" => "=",
        "BracketLeft" => "[",
        "BracketRight" => "]",
        "Backslash" => "\\",
        "Semicolon" => ";",
        "Quote" => "'",
        "Comma" => ",",
        "Period" => ".",
        "Slash" => "/",
        "Backquote" => "`",
        _ => return None,
    };
    debug_assert!(NAMED_KEYS.contains(&token) || SYMBOL_KEYS.contains(&token));
    Some(token)
}

fn table_lookup(table: &[&'static str], token: &str) -> Option<&'static str> {
    table.iter().copied().find(|known| *known == token)
}
