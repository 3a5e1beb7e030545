//! Keyboard emulation of a gamepad.
//!
//! Keys are identified by virtual key code and written by name in the config
//! file. Each arrow binding drives both the D-pad and the left stick so the
//! keyboard works whichever direction source is enabled.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::device::{PadButton, PadButtons, PadState};
use crate::error::ParseError;

/// A keyboard key by virtual key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Key(pub u32);

impl Key {
    pub const UP: Key = Key(0x26);
    pub const DOWN: Key = Key(0x28);
    pub const LEFT: Key = Key(0x25);
    pub const RIGHT: Key = Key(0x27);

    pub const fn letter(c: char) -> Key {
        Key(c.to_ascii_uppercase() as u32)
    }
}

impl FromStr for Key {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        key_name_to_vk(s)
            .map(Key)
            .ok_or_else(|| ParseError::UnknownKey(s.to_string()))
    }
}

impl TryFrom<String> for Key {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        vk_to_key_name(key.0)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&vk_to_key_name(self.0))
    }
}

/// Converts a key name to its virtual key code.
pub fn key_name_to_vk(key_name: &str) -> Option<u32> {
    let key = key_name.trim().to_uppercase();

    // letter and digit keys
    if key.len() == 1
        && let Some(c) = key.chars().next()
        && (c.is_ascii_alphabetic() || c.is_ascii_digit())
    {
        return Some(c as u32);
    }

    // F1-F24
    if key.starts_with('F')
        && key.len() > 1
        && let Ok(num) = key[1..].parse::<u32>()
        && (1..=24).contains(&num)
    {
        return Some(0x70 + num - 1);
    }

    // Numpad keys
    if key.starts_with("NUMPAD")
        && key.len() > 6
        && let Ok(num) = key[6..].parse::<u32>()
        && num <= 9
    {
        return Some(0x60 + num);
    }

    match key.as_str() {
        "ESC" | "ESCAPE" => Some(0x1B),
        "ENTER" | "RETURN" => Some(0x0D),
        "TAB" => Some(0x09),
        "SPACE" => Some(0x20),
        "BACKSPACE" | "BACK" => Some(0x08),
        "DELETE" => Some(0x2E),
        "INSERT" => Some(0x2D),
        "HOME" => Some(0x24),
        "END" => Some(0x23),
        "PAGEUP" => Some(0x21),
        "PAGEDOWN" => Some(0x22),
        "UP" => Some(0x26),
        "DOWN" => Some(0x28),
        "LEFT" => Some(0x25),
        "RIGHT" => Some(0x27),
        "LSHIFT" => Some(0xA0),
        "RSHIFT" => Some(0xA1),
        "LCTRL" => Some(0xA2),
        "RCTRL" => Some(0xA3),
        "LALT" => Some(0xA4),
        "RALT" => Some(0xA5),
        "OEM_1" => Some(0xBA),
        "OEM_PLUS" => Some(0xBB),
        "OEM_COMMA" => Some(0xBC),
        "OEM_MINUS" => Some(0xBD),
        "OEM_PERIOD" => Some(0xBE),
        "OEM_2" => Some(0xBF),
        "OEM_3" => Some(0xC0),
        "OEM_4" => Some(0xDB),
        "OEM_5" => Some(0xDC),
        "OEM_6" => Some(0xDD),
        "OEM_7" => Some(0xDE),
        _ => None,
    }
}

/// Converts a virtual key code back to its canonical name.
pub fn vk_to_key_name(vk: u32) -> String {
    match vk {
        // A-Z, 0-9
        0x41..=0x5A | 0x30..=0x39 => char::from_u32(vk)
            .map(|c| c.to_string())
            .unwrap_or_default(),
        0x60..=0x69 => format!("NUMPAD{}", vk - 0x60),
        0x70..=0x87 => format!("F{}", vk - 0x70 + 1),
        0x1B => "ESCAPE".to_string(),
        0x0D => "RETURN".to_string(),
        0x09 => "TAB".to_string(),
        0x20 => "SPACE".to_string(),
        0x08 => "BACK".to_string(),
        0x2E => "DELETE".to_string(),
        0x2D => "INSERT".to_string(),
        0x24 => "HOME".to_string(),
        0x23 => "END".to_string(),
        0x21 => "PAGEUP".to_string(),
        0x22 => "PAGEDOWN".to_string(),
        0x26 => "UP".to_string(),
        0x28 => "DOWN".to_string(),
        0x25 => "LEFT".to_string(),
        0x27 => "RIGHT".to_string(),
        0xA0 => "LSHIFT".to_string(),
        0xA1 => "RSHIFT".to_string(),
        0xA2 => "LCTRL".to_string(),
        0xA3 => "RCTRL".to_string(),
        0xA4 => "LALT".to_string(),
        0xA5 => "RALT".to_string(),
        0xBA => "OEM_1".to_string(),
        0xBB => "OEM_PLUS".to_string(),
        0xBC => "OEM_COMMA".to_string(),
        0xBD => "OEM_MINUS".to_string(),
        0xBE => "OEM_PERIOD".to_string(),
        0xBF => "OEM_2".to_string(),
        0xC0 => "OEM_3".to_string(),
        0xDB => "OEM_4".to_string(),
        0xDC => "OEM_5".to_string(),
        0xDD => "OEM_6".to_string(),
        0xDE => "OEM_7".to_string(),
        _ => format!("VK_{:02X}", vk),
    }
}

/// Key bindings for the emulated pad controls.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct KeyboardToPadMap {
    pub up: Key,
    pub down: Key,
    pub left: Key,
    pub right: Key,
    pub x: Key,
    pub y: Key,
    pub right_shoulder: Key,
    pub left_shoulder: Key,
    pub a: Key,
    pub b: Key,
    pub right_trigger: Key,
    pub left_trigger: Key,
}

impl Default for KeyboardToPadMap {
    fn default() -> Self {
        Self {
            up: Key::UP,
            down: Key::DOWN,
            left: Key::LEFT,
            right: Key::RIGHT,
            x: Key::letter('A'),
            y: Key::letter('S'),
            right_shoulder: Key::letter('D'),
            left_shoulder: Key::letter('F'),
            a: Key::letter('Z'),
            b: Key::letter('X'),
            right_trigger: Key::letter('C'),
            left_trigger: Key::letter('V'),
        }
    }
}

impl KeyboardToPadMap {
    fn bindings(&self) -> [(Key, PadButtons); 12] {
        [
            (
                self.up,
                PadButtons::DPAD_UP.union(PadButtons::LEFT_THUMBSTICK_UP),
            ),
            (
                self.down,
                PadButtons::DPAD_DOWN.union(PadButtons::LEFT_THUMBSTICK_DOWN),
            ),
            (
                self.left,
                PadButtons::DPAD_LEFT.union(PadButtons::LEFT_THUMBSTICK_LEFT),
            ),
            (
                self.right,
                PadButtons::DPAD_RIGHT.union(PadButtons::LEFT_THUMBSTICK_RIGHT),
            ),
            (self.x, PadButtons::X),
            (self.y, PadButtons::Y),
            (self.right_shoulder, PadButtons::RIGHT_SHOULDER),
            (self.left_shoulder, PadButtons::LEFT_SHOULDER),
            (self.a, PadButtons::A),
            (self.b, PadButtons::B),
            (self.right_trigger, PadButtons::RIGHT_TRIGGER),
            (self.left_trigger, PadButtons::LEFT_TRIGGER),
        ]
    }

    /// Builds the pad snapshot for the keys currently held.
    pub fn pad_state(&self, pressed: &[Key]) -> PadState {
        let buttons = self
            .bindings()
            .into_iter()
            .filter(|(key, _)| pressed.contains(key))
            .fold(PadButtons::empty(), |acc, (_, flags)| acc | flags);
        PadState::new(buttons)
    }

    pub fn any_press(&self, pressed: &[Key]) -> bool {
        self.bindings()
            .iter()
            .any(|(key, _)| pressed.contains(key))
    }

    /// Rebinds the key behind `button` to the single key being held.
    /// Returns false unless exactly one key is down.
    pub fn remap(&mut self, button: PadButton, pressed: &[Key]) -> bool {
        let &[key] = pressed else {
            return false;
        };

        let slot = match button {
            PadButton::DPadUp | PadButton::LeftThumbstickUp => &mut self.up,
            PadButton::DPadDown | PadButton::LeftThumbstickDown => &mut self.down,
            PadButton::DPadLeft | PadButton::LeftThumbstickLeft => &mut self.left,
            PadButton::DPadRight | PadButton::LeftThumbstickRight => &mut self.right,
            PadButton::X => &mut self.x,
            PadButton::Y => &mut self.y,
            PadButton::RightShoulder => &mut self.right_shoulder,
            PadButton::LeftShoulder => &mut self.left_shoulder,
            PadButton::A => &mut self.a,
            PadButton::B => &mut self.b,
            PadButton::RightTrigger => &mut self.right_trigger,
            PadButton::LeftTrigger => &mut self.left_trigger,
            _ => {
                log::warn!("Pad control {button} has no keyboard binding");
                return false;
            }
        };
        *slot = key;
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceState;

    #[test]
    fn test_key_name_to_vk() {
        assert_eq!(key_name_to_vk("A"), Some(0x41));
        assert_eq!(key_name_to_vk("z"), Some(0x5A));
        assert_eq!(key_name_to_vk("5"), Some(0x35));
        assert_eq!(key_name_to_vk("F12"), Some(0x7B));
        assert_eq!(key_name_to_vk("numpad4"), Some(0x64));
        assert_eq!(key_name_to_vk("LEFT"), Some(0x25));
        assert_eq!(key_name_to_vk("F25"), None);
        assert_eq!(key_name_to_vk(""), None);
    }

    #[test]
    fn test_key_names_round_trip() {
        for name in ["A", "7", "F5", "NUMPAD0", "SPACE", "UP", "LSHIFT", "OEM_3"] {
            let key: Key = name.parse().unwrap();
            assert_eq!(key.to_string(), name);
        }
        assert!(matches!("NOPE".parse::<Key>(), Err(ParseError::UnknownKey(_))));
    }

    #[test]
    fn test_arrow_drives_dpad_and_left_stick() {
        let map = KeyboardToPadMap::default();
        let state = map.pad_state(&[Key::UP, Key::letter('a')]);
        assert!(state.is_down(PadButton::DPadUp));
        assert!(state.is_down(PadButton::LeftThumbstickUp));
        assert!(state.is_down(PadButton::X));
        assert!(!state.is_down(PadButton::RightThumbstickUp));
    }

    #[test]
    fn test_any_press_ignores_unbound_keys() {
        let map = KeyboardToPadMap::default();
        assert!(!map.any_press(&[Key::letter('Q')]));
        assert!(map.any_press(&[Key::letter('Q'), Key::letter('V')]));
    }

    #[test]
    fn test_remap_requires_single_key() {
        let mut map = KeyboardToPadMap::default();
        assert!(!map.remap(PadButton::X, &[]));
        assert!(!map.remap(PadButton::X, &[Key::letter('J'), Key::letter('K')]));
        assert!(map.remap(PadButton::X, &[Key::letter('J')]));
        assert_eq!(map.x, Key::letter('J'));
        assert!(!map.remap(PadButton::Start, &[Key::letter('J')]));

        map.reset();
        assert_eq!(map, KeyboardToPadMap::default());
    }
}
