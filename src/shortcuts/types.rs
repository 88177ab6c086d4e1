//! Core accelerator types with platform-aware display.
//!
//! This module provides:
//! - `ModifierSet` - logical modifier flags (CommandOrControl, Shift, Alt)
//! - `MainKey` - a canonical, layout-independent main-key token
//! - `CapturedAccelerator` - whatever the recorder has seen so far, valid or not
//! - `Accelerator` - a validated modifier+main-key combination
//! - Platform-aware display (⌘ + ⇧ + K on macOS, Ctrl + ⇧ + K elsewhere)

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when parsing a canonical accelerator string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AcceleratorParseError {
    #[error("accelerator string is empty")]
    Empty,
    #[error("accelerator has no main key, only modifiers")]
    MissingKey,
    #[error("accelerator '{0}' has no modifier")]
    MissingModifier(String),
    #[error("unknown token '{0}' in accelerator")]
    UnknownToken(String),
    #[error("accelerator has more than one main key ('{0}')")]
    MultipleKeys(String),
}

bitflags! {
    /// Logical modifiers of an accelerator.
    ///
    /// Control and Command both map to `COMMAND_OR_CONTROL`, so a captured
    /// accelerator behaves the same on Ctrl-based and Cmd-based platforms.
    /// Declaration order is the canonical serialization order.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ModifierSet: u8 {
        const COMMAND_OR_CONTROL = 1 << 0;
        const SHIFT = 1 << 1;
        const ALT = 1 << 2;
    }
}

/// Canonical order and non-localized token of each modifier.
const MODIFIER_TOKENS: [(ModifierSet, &str); 3] = [
    (ModifierSet::COMMAND_OR_CONTROL, "CommandOrControl"),
    (ModifierSet::SHIFT, "Shift"),
    (ModifierSet::ALT, "Alt"),
];

impl ModifierSet {
    /// Non-localized tokens in canonical order.
    pub fn tokens(&self) -> impl Iterator<Item = &'static str> + '_ {
        MODIFIER_TOKENS
            .iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, token)| *token)
    }

    /// Parse a single modifier token, accepting the usual aliases.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "commandorcontrol" | "cmdorctrl" | "commandorctrl" | "cmdorcontrol" | "ctrl"
            | "control" | "cmd" | "command" | "meta" | "super" => Some(Self::COMMAND_OR_CONTROL),
            "shift" => Some(Self::SHIFT),
            "alt" | "option" | "opt" => Some(Self::ALT),
            _ => None,
        }
    }
}

/// Platform enum for display formatting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[serde(alias = "mac")]
    MacOS,
    Windows,
    Linux,
}

impl Platform {
    pub fn current() -> Self {
        #[cfg(target_os = "macos")]
        {
            Platform::MacOS
        }
        #[cfg(target_os = "windows")]
        {
            Platform::Windows
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            Platform::Linux
        }
    }

    pub fn is_apple(&self) -> bool {
        matches!(self, Platform::MacOS)
    }

    fn modifier_label(&self, flag: ModifierSet) -> &'static str {
        if flag == ModifierSet::COMMAND_OR_CONTROL {
            if self.is_apple() {
                "⌘"
            } else {
                "Ctrl"
            }
        } else if flag == ModifierSet::ALT {
            if self.is_apple() {
                "⌥"
            } else {
                "Alt"
            }
        } else {
            "⇧"
        }
    }
}

pub(crate) const LETTER_KEYS: [&str; 26] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S",
    "T", "U", "V", "W", "X", "Y", "Z",
];

pub(crate) const DIGIT_KEYS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

pub(crate) const FUNCTION_KEYS: [&str; 24] = [
    "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12", "F13", "F14", "F15",
    "F16", "F17", "F18", "F19", "F20", "F21", "F22", "F23", "F24",
];

pub(crate) const NAMED_KEYS: [&str; 15] = [
    "Space",
    "Enter",
    "Backspace",
    "Tab",
    "Escape",
    "Delete",
    "Insert",
    "Home",
    "End",
    "PageUp",
    "PageDown",
    "Up",
    "Down",
    "Left",
    "Right",
];

pub(crate) const SYMBOL_KEYS: [&str; 11] = ["-", "=", "[", "]", "\\", ";", "'", ",", ".", "/", "`"];

/// A canonical main-key token (`A`, `7`, `F5`, `Space`, `Up`, `;`, ...).
///
/// Only constructible from the fixed token tables, so every `MainKey` is known.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MainKey(&'static str);

impl MainKey {
    pub(crate) const fn from_static(token: &'static str) -> Self {
        MainKey(token)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Look up a canonical token, accepting case differences and a few aliases.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = match token.to_ascii_lowercase().as_str() {
            "esc" => "Escape",
            "return" => "Enter",
            "arrowup" => "Up",
            "arrowdown" => "Down",
            "arrowleft" => "Left",
            "arrowright" => "Right",
            "del" => "Delete",
            "pgup" => "PageUp",
            "pgdn" | "pgdown" => "PageDown",
            _ => token,
        };

        LETTER_KEYS
            .iter()
            .chain(DIGIT_KEYS.iter())
            .chain(FUNCTION_KEYS.iter())
            .chain(NAMED_KEYS.iter())
            .chain(SYMBOL_KEYS.iter())
            .find(|known| known.eq_ignore_ascii_case(token))
            .map(|known| MainKey(*known))
    }
}

impl fmt::Display for MainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Completeness of a captured accelerator.
///
/// Incomplete captures are a normal part of recording, not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CaptureStatus {
    /// Nothing captured yet
    Empty,
    /// Modifiers held, waiting for a main key
    MissingMainKey,
    /// Main key pressed without any modifier
    MissingModifier,
    /// At least one modifier and exactly one main key
    Complete,
}

/// The modifier tokens and main key seen by the recorder so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CapturedAccelerator {
    pub modifiers: ModifierSet,
    pub main_key: Option<MainKey>,
}

impl CapturedAccelerator {
    pub fn new(modifiers: ModifierSet, main_key: Option<MainKey>) -> Self {
        Self {
            modifiers,
            main_key,
        }
    }

    pub fn status(&self) -> CaptureStatus {
        match (self.modifiers.is_empty(), self.main_key.is_some()) {
            (true, false) => CaptureStatus::Empty,
            (false, false) => CaptureStatus::MissingMainKey,
            (true, true) => CaptureStatus::MissingModifier,
            (false, true) => CaptureStatus::Complete,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status() == CaptureStatus::Empty
    }

    pub fn is_valid(&self) -> bool {
        self.status() == CaptureStatus::Complete
    }

    pub fn is_pending(&self) -> bool {
        !self.is_valid()
    }

    /// The validated accelerator, if this capture is complete.
    pub fn accelerator(&self) -> Option<Accelerator> {
        match (self.modifiers.is_empty(), self.main_key) {
            (false, Some(main_key)) => Some(Accelerator {
                modifiers: self.modifiers,
                main_key,
            }),
            _ => None,
        }
    }

    /// Canonical tokens in order: modifiers, then the main key.
    pub fn tokens(&self) -> Vec<&'static str> {
        self.modifiers
            .tokens()
            .chain(self.main_key.map(|k| k.as_str()))
            .collect()
    }

    /// Canonical `+`-joined form. Empty for an empty capture.
    pub fn to_canonical_string(&self) -> String {
        self.tokens().join("+")
    }

    pub fn display(&self) -> String {
        self.display_for_platform(Platform::current())
    }

    /// Display form with platform glyphs joined by ` + `. Empty for an empty capture.
    pub fn display_for_platform(&self, platform: Platform) -> String {
        let mut parts: Vec<&str> = MODIFIER_TOKENS
            .iter()
            .filter(|(flag, _)| self.modifiers.contains(*flag))
            .map(|(flag, _)| platform.modifier_label(*flag))
            .collect();
        if let Some(key) = self.main_key {
            parts.push(key.as_str());
        }
        parts.join(" + ")
    }
}

impl From<Accelerator> for CapturedAccelerator {
    fn from(accelerator: Accelerator) -> Self {
        Self {
            modifiers: accelerator.modifiers,
            main_key: Some(accelerator.main_key),
        }
    }
}

/// A valid accelerator: at least one modifier and exactly one main key.
///
/// Serializes as its canonical string (`CommandOrControl+Shift+P`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Accelerator {
    modifiers: ModifierSet,
    main_key: MainKey,
}

impl Accelerator {
    pub fn new(modifiers: ModifierSet, main_key: MainKey) -> Option<Self> {
        CapturedAccelerator::new(modifiers, Some(main_key)).accelerator()
    }

    pub fn modifiers(&self) -> ModifierSet {
        self.modifiers
    }

    pub fn main_key(&self) -> MainKey {
        self.main_key
    }

    /// Parse a persisted accelerator (`CommandOrControl+Shift+P`, `ctrl+alt+f5`, ...).
    ///
    /// Always normalizes to the canonical token order.
    pub fn parse(s: &str) -> Result<Self, AcceleratorParseError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AcceleratorParseError::Empty);
        }

        let mut modifiers = ModifierSet::empty();
        let mut main_key: Option<MainKey> = None;

        for part in s.split('+').map(str::trim) {
            if part.is_empty() {
                return Err(AcceleratorParseError::UnknownToken("+".to_string()));
            }
            if let Some(flag) = ModifierSet::from_token(part) {
                modifiers |= flag;
                continue;
            }
            let key = MainKey::from_token(part)
                .ok_or_else(|| AcceleratorParseError::UnknownToken(part.to_string()))?;
            if main_key.is_some() {
                return Err(AcceleratorParseError::MultipleKeys(part.to_string()));
            }
            main_key = Some(key);
        }

        let main_key = main_key.ok_or(AcceleratorParseError::MissingKey)?;
        if modifiers.is_empty() {
            return Err(AcceleratorParseError::MissingModifier(s.to_string()));
        }

        Ok(Self {
            modifiers,
            main_key,
        })
    }

    pub fn to_canonical_string(&self) -> String {
        CapturedAccelerator::from(*self).to_canonical_string()
    }

    pub fn display_for_platform(&self, platform: Platform) -> String {
        CapturedAccelerator::from(*self).display_for_platform(platform)
    }
}

impl fmt::Display for Accelerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl TryFrom<String> for Accelerator {
    type Error = AcceleratorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Accelerator::parse(&value)
    }
}

impl From<Accelerator> for String {
    fn from(accelerator: Accelerator) -> Self {
        accelerator.to_canonical_string()
    }
}
