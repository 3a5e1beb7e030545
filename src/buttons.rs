//! Logical fight-stick buttons and stick directions.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use crate::error::ParseError;

bitflags! {
    /// Logical buttons. Several flags together form a chord.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct ButtonName: u16 {
        const LP = 1 << 1;
        const MP = 1 << 2;
        const HP = 1 << 3;
        const PP = 1 << 4;
        const LK = 1 << 5;
        const MK = 1 << 6;
        const HK = 1 << 7;
        const KK = 1 << 8;
        /// Left stick click
        const LS = 1 << 9;
        /// Right stick click
        const RS = 1 << 10;
    }
}

impl ButtonName {
    pub const NONE: ButtonName = ButtonName::empty();

    /// Every single logical button in canonical order.
    pub const ALL: [ButtonName; 10] = [
        ButtonName::LP,
        ButtonName::MP,
        ButtonName::HP,
        ButtonName::PP,
        ButtonName::LK,
        ButtonName::MK,
        ButtonName::HK,
        ButtonName::KK,
        ButtonName::LS,
        ButtonName::RS,
    ];

    /// Name of a single flag. Chords and the empty set have no single name.
    pub const fn as_str(self) -> Option<&'static str> {
        match self.bits() {
            0x002 => Some("LP"),
            0x004 => Some("MP"),
            0x008 => Some("HP"),
            0x010 => Some("PP"),
            0x020 => Some("LK"),
            0x040 => Some("MK"),
            0x080 => Some("HK"),
            0x100 => Some("KK"),
            0x200 => Some("LS"),
            0x400 => Some("RS"),
            _ => None,
        }
    }

    /// Splits a chord into its single buttons in canonical order.
    pub fn singles(self) -> impl Iterator<Item = ButtonName> {
        ButtonName::ALL.into_iter().filter(move |b| self.contains(*b))
    }
}

impl Default for ButtonName {
    fn default() -> Self {
        ButtonName::NONE
    }
}

impl fmt::Display for ButtonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "None");
        }
        for (i, single) in self.singles().enumerate() {
            if i > 0 {
                write!(f, "+")?;
            }
            write!(f, "{}", single.as_str().unwrap_or("?"))?;
        }
        Ok(())
    }
}

/// Parses a single name (`"LP"`) or a chord joined with `+` (`"LP+LK"`).
impl FromStr for ButtonName {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut result = ButtonName::NONE;
        for part in s.split('+') {
            let part = part.trim();
            let flag = match part.to_ascii_uppercase().as_str() {
                "NONE" => ButtonName::NONE,
                "LP" => ButtonName::LP,
                "MP" => ButtonName::MP,
                "HP" => ButtonName::HP,
                "PP" => ButtonName::PP,
                "LK" => ButtonName::LK,
                "MK" => ButtonName::MK,
                "HK" => ButtonName::HK,
                "KK" => ButtonName::KK,
                "LS" => ButtonName::LS,
                "RS" => ButtonName::RS,
                _ => return Err(ParseError::UnknownButton(part.to_string())),
            };
            result |= flag;
        }
        Ok(result)
    }
}

bitflags! {
    /// Stick direction relative to the side the player faces.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Direction: u8 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const FORWARD = 1 << 2;
        const BACKWARD = 1 << 3;

        const UP_FORWARD = Self::UP.bits() | Self::FORWARD.bits();
        const UP_BACKWARD = Self::UP.bits() | Self::BACKWARD.bits();
        const DOWN_FORWARD = Self::DOWN.bits() | Self::FORWARD.bits();
        const DOWN_BACKWARD = Self::DOWN.bits() | Self::BACKWARD.bits();
    }
}

impl Direction {
    pub const NEUTRAL: Direction = Direction::empty();

    pub const HORIZONTAL: Direction = Direction::FORWARD.union(Direction::BACKWARD);
    pub const VERTICAL: Direction = Direction::UP.union(Direction::DOWN);

    #[inline(always)]
    pub const fn is_neutral(self) -> bool {
        self.is_empty()
    }

    /// Numpad notation: 5 is neutral, 8 up, 6 forward and so on.
    /// Opposing combinations have no numpad digit and read as neutral.
    pub const fn numpad(self) -> u8 {
        match self.bits() {
            0b0011 | 0b1100 | 0 => 5,
            0b0001 => 8,
            0b0010 => 2,
            0b0100 => 6,
            0b1000 => 4,
            0b0101 => 9,
            0b1001 => 7,
            0b0110 => 3,
            0b1010 => 1,
            _ => 5,
        }
    }

    pub fn from_numpad(digit: u8) -> Result<Direction, ParseError> {
        Ok(match digit {
            1 => Direction::DOWN_BACKWARD,
            2 => Direction::DOWN,
            3 => Direction::DOWN_FORWARD,
            4 => Direction::BACKWARD,
            5 => Direction::NEUTRAL,
            6 => Direction::FORWARD,
            7 => Direction::UP_BACKWARD,
            8 => Direction::UP,
            9 => Direction::UP_FORWARD,
            _ => return Err(ParseError::InvalidNumpad(digit)),
        })
    }
}

impl Default for Direction {
    fn default() -> Self {
        Direction::NEUTRAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_chord_parse_and_display() {
        let chord: ButtonName = "lp+LK".parse().unwrap();
        assert_eq!(chord, ButtonName::LP | ButtonName::LK);
        assert_eq!(chord.to_string(), "LP+LK");
        assert_eq!(ButtonName::NONE.to_string(), "None");
        assert!("XX".parse::<ButtonName>().is_err());
    }

    #[test]
    fn test_button_containment() {
        let chord = ButtonName::LP | ButtonName::MP | ButtonName::HP;
        assert!(chord.contains(ButtonName::MP));
        assert!(!chord.contains(ButtonName::LK));
        assert_eq!(chord.singles().count(), 3);
    }

    #[test]
    fn test_numpad_notation() {
        assert_eq!(Direction::NEUTRAL.numpad(), 5);
        assert_eq!(Direction::UP_FORWARD.numpad(), 9);
        assert_eq!(Direction::DOWN_BACKWARD.numpad(), 1);
        assert_eq!((Direction::UP | Direction::DOWN).numpad(), 5);

        for digit in 1..=9 {
            assert_eq!(Direction::from_numpad(digit).unwrap().numpad(), digit);
        }
        assert_eq!(Direction::from_numpad(0), Err(ParseError::InvalidNumpad(0)));
    }
}
