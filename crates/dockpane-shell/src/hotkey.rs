//! Shortcut-combination grammar
//!
//! Combinations are written `Mod(+Mod)*+Key`, e.g. "Cmd+E" or
//! "Ctrl+Shift+2". `Cmd` (and Electron's `CmdOrCtrl`) name the platform
//! primary modifier: Command on macOS, Control elsewhere. Function keys may
//! stand alone; character keys require at least one modifier so a stray
//! letter cannot capture global input.

use dockpane_core::{DockpaneError, DockpaneResult};
use std::fmt;

/// The non-modifier part of a combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A–Z or 0–9, stored uppercase
    Char(char),
    /// F1–F24
    Function(u8),
}

/// A parsed shortcut combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Combo {
    /// Platform primary modifier (Command / Control)
    pub primary: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub key: Key,
}

impl Combo {
    /// Parse a combination string, case-insensitively
    pub fn parse(input: &str) -> DockpaneResult<Self> {
        let mut primary = false;
        let mut ctrl = false;
        let mut alt = false;
        let mut shift = false;
        let mut key = None;

        let tokens: Vec<&str> = input.split('+').map(str::trim).collect();
        if tokens.iter().any(|t| t.is_empty()) {
            return Err(DockpaneError::hotkey(format!(
                "Malformed combination '{}'",
                input
            )));
        }

        let (key_token, modifier_tokens) = match tokens.split_last() {
            Some(split) => split,
            None => {
                return Err(DockpaneError::hotkey("Empty combination"));
            }
        };

        for token in modifier_tokens {
            match token.to_ascii_lowercase().as_str() {
                "cmd" | "command" | "super" | "meta" | "cmdorctrl" | "commandorcontrol" => {
                    primary = true
                }
                "ctrl" | "control" => ctrl = true,
                "alt" | "option" => alt = true,
                "shift" => shift = true,
                other => {
                    return Err(DockpaneError::hotkey(format!(
                        "Unknown modifier '{}' in '{}'",
                        other, input
                    )));
                }
            }
        }

        let token = key_token.to_ascii_uppercase();
        if token.len() == 1 {
            let ch = token.chars().next().unwrap_or_default();
            if ch.is_ascii_alphanumeric() {
                key = Some(Key::Char(ch));
            }
        } else if let Some(number) = token.strip_prefix('F') {
            if let Ok(n) = number.parse::<u8>() {
                if (1..=24).contains(&n) {
                    key = Some(Key::Function(n));
                }
            }
        }

        let key = key.ok_or_else(|| {
            DockpaneError::hotkey(format!("Unknown key '{}' in '{}'", key_token, input))
        })?;

        if matches!(key, Key::Char(_)) && !(primary || ctrl || alt || shift) {
            return Err(DockpaneError::hotkey(format!(
                "Combination '{}' needs at least one modifier",
                input
            )));
        }

        Ok(Self {
            primary,
            ctrl,
            alt,
            shift,
            key,
        })
    }

    /// Shorthand for primary-modifier + character combinations
    pub fn primary_char(ch: char) -> Self {
        Self {
            primary: true,
            ctrl: false,
            alt: false,
            shift: false,
            key: Key::Char(ch.to_ascii_uppercase()),
        }
    }

    /// Shorthand for a bare function key
    pub fn function(n: u8) -> Self {
        Self {
            primary: false,
            ctrl: false,
            alt: false,
            shift: false,
            key: Key::Function(n),
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

impl fmt::Display for Combo {
    /// Canonical display form: Cmd+Ctrl+Alt+Shift order, then the key
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.primary {
            write!(f, "Cmd+")?;
        }
        if self.ctrl {
            write!(f, "Ctrl+")?;
        }
        if self.alt {
            write!(f, "Alt+")?;
        }
        if self.shift {
            write!(f, "Shift+")?;
        }
        match self.key {
            Key::Char(ch) => write!(f, "{}", ch),
            Key::Function(n) => write!(f, "F{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_combination() {
        let combo = Combo::parse("Cmd+E").unwrap();
        assert!(combo.primary);
        assert!(!combo.shift);
        assert_eq!(combo.key, Key::Char('E'));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Combo::parse("cmd+e").unwrap(), Combo::parse("CMD+E").unwrap());
        assert_eq!(
            Combo::parse("ctrl+shift+r").unwrap(),
            Combo::parse("Ctrl+Shift+R").unwrap()
        );
    }

    #[test]
    fn test_parse_modifier_aliases() {
        let a = Combo::parse("CmdOrCtrl+1").unwrap();
        let b = Combo::parse("Super+1").unwrap();
        assert_eq!(a, b);
        assert!(a.primary);
        assert_eq!(a.key, Key::Char('1'));
    }

    #[test]
    fn test_parse_bare_function_key() {
        let combo = Combo::parse("F5").unwrap();
        assert_eq!(combo.key, Key::Function(5));
        assert!(!combo.primary && !combo.ctrl && !combo.alt && !combo.shift);
    }

    #[test]
    fn test_parse_rejects_bare_char() {
        assert!(Combo::parse("E").is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Combo::parse("").is_err());
        assert!(Combo::parse("Cmd+").is_err());
        assert!(Combo::parse("Hyper+E").is_err());
        assert!(Combo::parse("Cmd+Escape2").is_err());
        assert!(Combo::parse("F25").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for input in ["Cmd+E", "Ctrl+Shift+R", "Cmd+Alt+F12", "F5"] {
            let combo = Combo::parse(input).unwrap();
            assert_eq!(combo.to_string(), input);
            assert_eq!(Combo::parse(&combo.to_string()).unwrap(), combo);
        }
    }
}
