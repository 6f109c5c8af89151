//! OS registration backend for shortcut combinations

use std::collections::HashMap;

use dockpane_core::{DockpaneError, DockpaneResult};
use dockpane_shell::hotkey::{Combo, Key};
use dockpane_shell::shortcuts::HotkeyBackend;
use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use global_hotkey::GlobalHotKeyManager;
use log::debug;

pub struct GlobalHotkeyBackend {
    manager: GlobalHotKeyManager,
    registered: HashMap<Combo, HotKey>,
}

impl GlobalHotkeyBackend {
    pub fn new() -> DockpaneResult<Self> {
        let manager = GlobalHotKeyManager::new()
            .map_err(|e| DockpaneError::hotkey(format!("Hotkey manager unavailable: {}", e)))?;
        Ok(Self {
            manager,
            registered: HashMap::new(),
        })
    }
}

impl HotkeyBackend for GlobalHotkeyBackend {
    fn register(&mut self, combo: &Combo) -> DockpaneResult<u32> {
        let hotkey = to_hotkey(combo)?;
        self.manager
            .register(hotkey)
            .map_err(|e| DockpaneError::hotkey(format!("Cannot register '{}': {}", combo, e)))?;
        debug!("Registered '{}' as id {}", combo, hotkey.id());
        self.registered.insert(*combo, hotkey);
        Ok(hotkey.id())
    }

    fn unregister(&mut self, combo: &Combo) {
        if let Some(hotkey) = self.registered.remove(combo) {
            if let Err(e) = self.manager.unregister(hotkey) {
                log::warn!("Failed to unregister '{}': {}", combo, e);
            }
        }
    }
}

/// Map a parsed combination to the OS-level registration
fn to_hotkey(combo: &Combo) -> DockpaneResult<HotKey> {
    let mut modifiers = Modifiers::empty();
    if combo.primary {
        modifiers |= if cfg!(target_os = "macos") {
            Modifiers::SUPER
        } else {
            Modifiers::CONTROL
        };
    }
    if combo.ctrl {
        modifiers |= Modifiers::CONTROL;
    }
    if combo.alt {
        modifiers |= Modifiers::ALT;
    }
    if combo.shift {
        modifiers |= Modifiers::SHIFT;
    }

    let code = match combo.key {
        Key::Char(ch) => char_code(ch)?,
        Key::Function(n) => function_code(n)?,
    };

    let modifiers = if modifiers.is_empty() {
        None
    } else {
        Some(modifiers)
    };
    Ok(HotKey::new(modifiers, code))
}

fn char_code(ch: char) -> DockpaneResult<Code> {
    let code = match ch {
        'A' => Code::KeyA,
        'B' => Code::KeyB,
        'C' => Code::KeyC,
        'D' => Code::KeyD,
        'E' => Code::KeyE,
        'F' => Code::KeyF,
        'G' => Code::KeyG,
        'H' => Code::KeyH,
        'I' => Code::KeyI,
        'J' => Code::KeyJ,
        'K' => Code::KeyK,
        'L' => Code::KeyL,
        'M' => Code::KeyM,
        'N' => Code::KeyN,
        'O' => Code::KeyO,
        'P' => Code::KeyP,
        'Q' => Code::KeyQ,
        'R' => Code::KeyR,
        'S' => Code::KeyS,
        'T' => Code::KeyT,
        'U' => Code::KeyU,
        'V' => Code::KeyV,
        'W' => Code::KeyW,
        'X' => Code::KeyX,
        'Y' => Code::KeyY,
        'Z' => Code::KeyZ,
        '0' => Code::Digit0,
        '1' => Code::Digit1,
        '2' => Code::Digit2,
        '3' => Code::Digit3,
        '4' => Code::Digit4,
        '5' => Code::Digit5,
        '6' => Code::Digit6,
        '7' => Code::Digit7,
        '8' => Code::Digit8,
        '9' => Code::Digit9,
        other => return Err(DockpaneError::hotkey(format!("Unmappable key '{}'", other))),
    };
    Ok(code)
}

fn function_code(n: u8) -> DockpaneResult<Code> {
    let code = match n {
        1 => Code::F1,
        2 => Code::F2,
        3 => Code::F3,
        4 => Code::F4,
        5 => Code::F5,
        6 => Code::F6,
        7 => Code::F7,
        8 => Code::F8,
        9 => Code::F9,
        10 => Code::F10,
        11 => Code::F11,
        12 => Code::F12,
        13 => Code::F13,
        14 => Code::F14,
        15 => Code::F15,
        16 => Code::F16,
        17 => Code::F17,
        18 => Code::F18,
        19 => Code::F19,
        20 => Code::F20,
        21 => Code::F21,
        22 => Code::F22,
        23 => Code::F23,
        24 => Code::F24,
        other => {
            return Err(DockpaneError::hotkey(format!(
                "Function key F{} out of range",
                other
            )))
        }
    };
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_maps_to_platform_modifier() {
        let hotkey = to_hotkey(&Combo::parse("Cmd+E").unwrap()).unwrap();
        let expected = if cfg!(target_os = "macos") {
            Modifiers::SUPER
        } else {
            Modifiers::CONTROL
        };
        assert_eq!(hotkey, HotKey::new(Some(expected), Code::KeyE));
    }

    #[test]
    fn test_bare_function_key_has_no_modifiers() {
        let hotkey = to_hotkey(&Combo::parse("F5").unwrap()).unwrap();
        assert_eq!(hotkey, HotKey::new(None, Code::F5));
    }

    #[test]
    fn test_stacked_modifiers() {
        let hotkey = to_hotkey(&Combo::parse("Ctrl+Shift+2").unwrap()).unwrap();
        assert_eq!(
            hotkey,
            HotKey::new(Some(Modifiers::CONTROL | Modifiers::SHIFT), Code::Digit2)
        );
    }
}
