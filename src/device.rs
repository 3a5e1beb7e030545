//! Physical controller state.
//!
//! A device snapshot is a set of physical controls that are down this frame.
//! Gamepads report D-pad, face buttons, shoulders, triggers and analog sticks;
//! the keyboard is projected onto the same controls by [`crate::keyboard`].

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use crate::error::ParseError;

/// Analog stick deadzone threshold.
pub const STICK_DEADZONE: i16 = 7849; // ~24% of max range

/// Trigger deadzone threshold.
pub const TRIGGER_THRESHOLD: u8 = 30;

bitflags! {
    /// Physical controls currently down.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PadButtons: u32 {
        const DPAD_UP = 1 << 0;
        const DPAD_DOWN = 1 << 1;
        const DPAD_LEFT = 1 << 2;
        const DPAD_RIGHT = 1 << 3;
        const START = 1 << 4;
        const BACK = 1 << 5;
        const LEFT_STICK = 1 << 6;
        const RIGHT_STICK = 1 << 7;
        const LEFT_SHOULDER = 1 << 8;
        const RIGHT_SHOULDER = 1 << 9;
        const A = 1 << 10;
        const B = 1 << 11;
        const X = 1 << 12;
        const Y = 1 << 13;
        const LEFT_TRIGGER = 1 << 14;
        const RIGHT_TRIGGER = 1 << 15;
        const LEFT_THUMBSTICK_UP = 1 << 16;
        const LEFT_THUMBSTICK_DOWN = 1 << 17;
        const LEFT_THUMBSTICK_LEFT = 1 << 18;
        const LEFT_THUMBSTICK_RIGHT = 1 << 19;
        const RIGHT_THUMBSTICK_UP = 1 << 20;
        const RIGHT_THUMBSTICK_DOWN = 1 << 21;
        const RIGHT_THUMBSTICK_LEFT = 1 << 22;
        const RIGHT_THUMBSTICK_RIGHT = 1 << 23;
    }
}

/// A single physical control, as bound in a [`crate::mapping::ButtonMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadButton {
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    Start,
    Back,
    LeftStick,
    RightStick,
    LeftShoulder,
    RightShoulder,
    A,
    B,
    X,
    Y,
    LeftTrigger,
    RightTrigger,
    LeftThumbstickUp,
    LeftThumbstickDown,
    LeftThumbstickLeft,
    LeftThumbstickRight,
    RightThumbstickUp,
    RightThumbstickDown,
    RightThumbstickLeft,
    RightThumbstickRight,
}

impl PadButton {
    pub const ALL: [PadButton; 24] = [
        PadButton::DPadUp,
        PadButton::DPadDown,
        PadButton::DPadLeft,
        PadButton::DPadRight,
        PadButton::Start,
        PadButton::Back,
        PadButton::LeftStick,
        PadButton::RightStick,
        PadButton::LeftShoulder,
        PadButton::RightShoulder,
        PadButton::A,
        PadButton::B,
        PadButton::X,
        PadButton::Y,
        PadButton::LeftTrigger,
        PadButton::RightTrigger,
        PadButton::LeftThumbstickUp,
        PadButton::LeftThumbstickDown,
        PadButton::LeftThumbstickLeft,
        PadButton::LeftThumbstickRight,
        PadButton::RightThumbstickUp,
        PadButton::RightThumbstickDown,
        PadButton::RightThumbstickLeft,
        PadButton::RightThumbstickRight,
    ];

    #[inline(always)]
    pub const fn flag(self) -> PadButtons {
        PadButtons::from_bits_retain(1 << self as u32)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PadButton::DPadUp => "DPad_Up",
            PadButton::DPadDown => "DPad_Down",
            PadButton::DPadLeft => "DPad_Left",
            PadButton::DPadRight => "DPad_Right",
            PadButton::Start => "Start",
            PadButton::Back => "Back",
            PadButton::LeftStick => "LS_Click",
            PadButton::RightStick => "RS_Click",
            PadButton::LeftShoulder => "LB",
            PadButton::RightShoulder => "RB",
            PadButton::A => "A",
            PadButton::B => "B",
            PadButton::X => "X",
            PadButton::Y => "Y",
            PadButton::LeftTrigger => "LT",
            PadButton::RightTrigger => "RT",
            PadButton::LeftThumbstickUp => "LS_Up",
            PadButton::LeftThumbstickDown => "LS_Down",
            PadButton::LeftThumbstickLeft => "LS_Left",
            PadButton::LeftThumbstickRight => "LS_Right",
            PadButton::RightThumbstickUp => "RS_Up",
            PadButton::RightThumbstickDown => "RS_Down",
            PadButton::RightThumbstickLeft => "RS_Left",
            PadButton::RightThumbstickRight => "RS_Right",
        }
    }
}

impl fmt::Display for PadButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PadButton {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let upper = name.to_ascii_uppercase();
        let button = match upper.as_str() {
            "DPAD_UP" => PadButton::DPadUp,
            "DPAD_DOWN" => PadButton::DPadDown,
            "DPAD_LEFT" => PadButton::DPadLeft,
            "DPAD_RIGHT" => PadButton::DPadRight,
            "START" => PadButton::Start,
            "BACK" | "SELECT" => PadButton::Back,
            "LS_CLICK" | "L3" => PadButton::LeftStick,
            "RS_CLICK" | "R3" => PadButton::RightStick,
            "LB" | "L1" => PadButton::LeftShoulder,
            "RB" | "R1" => PadButton::RightShoulder,
            "A" => PadButton::A,
            "B" => PadButton::B,
            "X" => PadButton::X,
            "Y" => PadButton::Y,
            "LT" | "L2" => PadButton::LeftTrigger,
            "RT" | "R2" => PadButton::RightTrigger,
            "LS_UP" => PadButton::LeftThumbstickUp,
            "LS_DOWN" => PadButton::LeftThumbstickDown,
            "LS_LEFT" => PadButton::LeftThumbstickLeft,
            "LS_RIGHT" => PadButton::LeftThumbstickRight,
            "RS_UP" => PadButton::RightThumbstickUp,
            "RS_DOWN" => PadButton::RightThumbstickDown,
            "RS_LEFT" => PadButton::RightThumbstickLeft,
            "RS_RIGHT" => PadButton::RightThumbstickRight,
            _ => return Err(ParseError::UnknownPadButton(name.to_string())),
        };
        Ok(button)
    }
}

/// Anything that can answer "is this physical control down right now".
pub trait DeviceState {
    fn is_down(&self, button: PadButton) -> bool;
}

impl DeviceState for PadButtons {
    #[inline(always)]
    fn is_down(&self, button: PadButton) -> bool {
        self.contains(button.flag())
    }
}

/// Raw gamepad report: digital buttons in XInput `wButtons` layout, analog
/// triggers and signed stick axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GamepadReading {
    pub buttons: u16,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub thumb_lx: i16,
    pub thumb_ly: i16,
    pub thumb_rx: i16,
    pub thumb_ry: i16,
}

/// One frame of physical input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadState {
    pub buttons: PadButtons,
}

impl PadState {
    pub const fn new(buttons: PadButtons) -> Self {
        Self { buttons }
    }

    pub const fn released() -> Self {
        Self::new(PadButtons::empty())
    }

    /// Projects a raw gamepad report onto pad controls, applying the stick
    /// deadzone and trigger threshold.
    pub fn from_gamepad(reading: &GamepadReading) -> Self {
        let mut buttons = PadButtons::empty();
        check_buttons(reading.buttons, &mut buttons);
        check_analog_sticks(reading, &mut buttons);
        check_triggers(reading, &mut buttons);
        Self { buttons }
    }

    pub fn any_down(&self) -> bool {
        !self.buttons.is_empty()
    }

    /// First control down in declaration order, used when waiting for the
    /// player to pick a binding.
    pub fn first_down(&self) -> Option<PadButton> {
        PadButton::ALL.into_iter().find(|b| self.is_down(*b))
    }
}

impl Default for PadState {
    fn default() -> Self {
        Self::released()
    }
}

impl DeviceState for PadState {
    #[inline(always)]
    fn is_down(&self, button: PadButton) -> bool {
        self.buttons.is_down(button)
    }
}

#[inline(always)]
fn check_buttons(raw: u16, active: &mut PadButtons) {
    const BUTTON_MAP: [(u16, PadButtons); 14] = [
        (0x0001, PadButtons::DPAD_UP),
        (0x0002, PadButtons::DPAD_DOWN),
        (0x0004, PadButtons::DPAD_LEFT),
        (0x0008, PadButtons::DPAD_RIGHT),
        (0x0010, PadButtons::START),
        (0x0020, PadButtons::BACK),
        (0x0040, PadButtons::LEFT_STICK),
        (0x0080, PadButtons::RIGHT_STICK),
        (0x0100, PadButtons::LEFT_SHOULDER),
        (0x0200, PadButtons::RIGHT_SHOULDER),
        (0x1000, PadButtons::A),
        (0x2000, PadButtons::B),
        (0x4000, PadButtons::X),
        (0x8000, PadButtons::Y),
    ];

    for &(mask, flag) in &BUTTON_MAP {
        if raw & mask != 0 {
            active.insert(flag);
        }
    }
}

#[inline(always)]
fn check_analog_sticks(reading: &GamepadReading, active: &mut PadButtons) {
    let axes = [
        (
            reading.thumb_lx,
            PadButtons::LEFT_THUMBSTICK_RIGHT,
            PadButtons::LEFT_THUMBSTICK_LEFT,
        ),
        (
            reading.thumb_ly,
            PadButtons::LEFT_THUMBSTICK_UP,
            PadButtons::LEFT_THUMBSTICK_DOWN,
        ),
        (
            reading.thumb_rx,
            PadButtons::RIGHT_THUMBSTICK_RIGHT,
            PadButtons::RIGHT_THUMBSTICK_LEFT,
        ),
        (
            reading.thumb_ry,
            PadButtons::RIGHT_THUMBSTICK_UP,
            PadButtons::RIGHT_THUMBSTICK_DOWN,
        ),
    ];

    for (value, positive, negative) in axes {
        if value > STICK_DEADZONE {
            active.insert(positive);
        } else if value < -STICK_DEADZONE {
            active.insert(negative);
        }
    }
}

#[inline(always)]
fn check_triggers(reading: &GamepadReading, active: &mut PadButtons) {
    if reading.left_trigger > TRIGGER_THRESHOLD {
        active.insert(PadButtons::LEFT_TRIGGER);
    }
    if reading.right_trigger > TRIGGER_THRESHOLD {
        active.insert(PadButtons::RIGHT_TRIGGER);
    }
}

/// Controller family, used to pick a default button theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Xbox,
    PlayStation,
    Nintendo,
    Keyboard,
}

impl DeviceKind {
    /// Classifies a gamepad by its display name. Anything unrecognised is
    /// treated as an Xbox-layout pad.
    pub fn from_display_name(name: &str) -> Self {
        let name = name.to_lowercase();
        if !name.contains("xbox") {
            let playstation = ["playstation", "sony"].iter().any(|a| name.contains(a))
                || (1..=6).any(|n| name.contains(&format!("ps{n}")));
            if playstation {
                return DeviceKind::PlayStation;
            }
            if name.contains("switch") || name.contains("nintendo") {
                return DeviceKind::Nintendo;
            }
        }
        DeviceKind::Xbox
    }

    pub const fn default_theme(self) -> &'static str {
        match self {
            DeviceKind::PlayStation => "PlayStation",
            DeviceKind::Nintendo => "Switch",
            DeviceKind::Xbox | DeviceKind::Keyboard => "XBOX",
        }
    }
}
