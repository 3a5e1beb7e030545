//! Direction aggregation and SOCD (Simultaneous Opposing Cardinal
//! Directions) cleaning.
//!
//! Raw direction is the OR of every enabled source. Cleaning then resolves
//! each axis whose two opposing bits are both set, using the selected policy.
//! `LastPriority` needs the previous frame's raw and cleaned directions, which
//! travel together in the previous [`Stick`].

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::buttons::Direction;
use crate::device::{DeviceState, PadButton};
use crate::error::ParseError;
use crate::state::Stick;

/// Conflict resolution policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SocdMode {
    /// Opposing directions cancel out on both axes
    #[default]
    Neutral,
    /// Up beats Down; Backward and Forward cancel out
    UpPriority,
    /// The most recently engaged direction wins
    LastPriority,
    /// No resolution
    Bypass,
}

impl SocdMode {
    pub fn all_modes() -> &'static [SocdMode] {
        &[
            SocdMode::Neutral,
            SocdMode::UpPriority,
            SocdMode::LastPriority,
            SocdMode::Bypass,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "Neutral",
            Self::UpPriority => "UpPriority",
            Self::LastPriority => "LastPriority",
            Self::Bypass => "Bypass",
        }
    }
}

impl fmt::Display for SocdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SocdMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SocdMode::all_modes()
            .iter()
            .copied()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::UnknownSocdMode(s.to_string()))
    }
}

bitflags! {
    /// Physical sources that feed the stick direction.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DirectionSources: u8 {
        const DPAD = 1 << 0;
        const LEFT_ANALOG = 1 << 1;
        const RIGHT_ANALOG = 1 << 2;
    }
}

impl DirectionSources {
    pub const NONE: DirectionSources = DirectionSources::empty();

    /// Parses one source name.
    pub fn parse_name(name: &str) -> Result<DirectionSources, ParseError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dpad" => Ok(DirectionSources::DPAD),
            "leftanalog" | "left_analog" => Ok(DirectionSources::LEFT_ANALOG),
            "rightanalog" | "right_analog" => Ok(DirectionSources::RIGHT_ANALOG),
            "none" => Ok(DirectionSources::NONE),
            "all" => Ok(DirectionSources::all()),
            _ => Err(ParseError::UnknownDirectionSource(name.to_string())),
        }
    }

    pub fn names(self) -> Vec<String> {
        [
            (DirectionSources::DPAD, "DPad"),
            (DirectionSources::LEFT_ANALOG, "LeftAnalog"),
            (DirectionSources::RIGHT_ANALOG, "RightAnalog"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name.to_string())
        .collect()
    }
}

impl Default for DirectionSources {
    fn default() -> Self {
        DirectionSources::all()
    }
}

/// Comma separated source names, e.g. `"DPad,LeftAnalog"`.
impl FromStr for DirectionSources {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .filter(|part| !part.trim().is_empty())
            .try_fold(DirectionSources::NONE, |acc, part| {
                Ok(acc | DirectionSources::parse_name(part)?)
            })
    }
}

/// Controls read for each direction bit, per source.
const SOURCE_CONTROLS: [(DirectionSources, [(PadButton, Direction); 4]); 3] = [
    (
        DirectionSources::DPAD,
        [
            (PadButton::DPadUp, Direction::UP),
            (PadButton::DPadDown, Direction::DOWN),
            (PadButton::DPadLeft, Direction::BACKWARD),
            (PadButton::DPadRight, Direction::FORWARD),
        ],
    ),
    (
        DirectionSources::LEFT_ANALOG,
        [
            (PadButton::LeftThumbstickUp, Direction::UP),
            (PadButton::LeftThumbstickDown, Direction::DOWN),
            (PadButton::LeftThumbstickLeft, Direction::BACKWARD),
            (PadButton::LeftThumbstickRight, Direction::FORWARD),
        ],
    ),
    (
        DirectionSources::RIGHT_ANALOG,
        [
            (PadButton::RightThumbstickUp, Direction::UP),
            (PadButton::RightThumbstickDown, Direction::DOWN),
            (PadButton::RightThumbstickLeft, Direction::BACKWARD),
            (PadButton::RightThumbstickRight, Direction::FORWARD),
        ],
    ),
];

/// ORs together the directions reported by every enabled source.
pub fn aggregate<D: DeviceState + ?Sized>(device: &D, sources: DirectionSources) -> Direction {
    let mut direction = Direction::NEUTRAL;
    for (source, controls) in SOURCE_CONTROLS {
        if !sources.contains(source) {
            continue;
        }
        for (control, bit) in controls {
            if device.is_down(control) {
                direction |= bit;
            }
        }
    }
    direction
}

#[inline(always)]
pub fn has_horizontal_opposing(direction: Direction) -> bool {
    direction.contains(Direction::HORIZONTAL)
}

#[inline(always)]
pub fn has_vertical_opposing(direction: Direction) -> bool {
    direction.contains(Direction::VERTICAL)
}

#[inline(always)]
pub fn has_opposing(direction: Direction) -> bool {
    has_horizontal_opposing(direction) || has_vertical_opposing(direction)
}

/// False only when Bypass lets an opposing pair through.
pub fn is_single(mode: SocdMode, direction: Direction) -> bool {
    !(mode == SocdMode::Bypass && has_opposing(direction))
}

/// Resolves opposing directions in `direction` given the previous frame.
pub fn clean(mode: SocdMode, direction: Direction, last: &Stick) -> Direction {
    match mode {
        SocdMode::Bypass => direction,
        SocdMode::Neutral => {
            let mut direction = direction;
            if has_horizontal_opposing(direction) {
                direction.remove(Direction::HORIZONTAL);
            }
            if has_vertical_opposing(direction) {
                direction.remove(Direction::VERTICAL);
            }
            direction
        }
        SocdMode::UpPriority => {
            let mut direction = direction;
            if has_horizontal_opposing(direction) {
                direction.remove(Direction::HORIZONTAL);
            }
            if has_vertical_opposing(direction) {
                direction.remove(Direction::DOWN);
            }
            direction
        }
        SocdMode::LastPriority => {
            if !has_opposing(direction) {
                return direction;
            }
            if direction == last.raw && !has_opposing(last.direction) {
                return last.direction;
            }
            let mut direction = direction;
            if has_horizontal_opposing(direction) {
                direction = last_priority_axis(
                    direction,
                    (Direction::BACKWARD, Direction::FORWARD),
                    last,
                );
            }
            if has_vertical_opposing(direction) {
                direction = last_priority_axis(direction, (Direction::UP, Direction::DOWN), last);
            }
            direction
        }
    }
}

/// Resolves one conflicting axis under `LastPriority`.
fn last_priority_axis(
    direction: Direction,
    (first, second): (Direction, Direction),
    last: &Stick,
) -> Direction {
    let axis = first | second;
    let cleared = direction.difference(axis);

    if last.raw.contains(axis) {
        // conflict already resolved last frame; keep its winner
        let kept = if last.direction.contains(first) {
            first
        } else if last.direction.contains(second) {
            second
        } else {
            Direction::NEUTRAL
        };
        return cleared | kept;
    }

    let previous = last.raw & axis;
    if previous.is_empty() {
        // both engaged on the same frame, nothing to prefer
        cleared
    } else {
        // the bit that was not down last frame is the newer one
        direction.difference(previous)
    }
}

/// Builds this frame's stick from the device and the previous stick.
pub fn resolve<D: DeviceState + ?Sized>(
    device: &D,
    mode: SocdMode,
    sources: DirectionSources,
    last: &Stick,
) -> Stick {
    if sources.is_empty() {
        return Stick::default();
    }

    let raw = aggregate(device, sources);
    Stick {
        direction: clean(mode, raw, last),
        raw,
        holding: raw == last.raw && !raw.is_neutral(),
    }
}

/// Directions to draw for a stick: the raw direction (unless bypassed)
/// followed by each single-axis component.
pub fn components(mode: SocdMode, stick: &Stick) -> SmallVec<[Direction; 5]> {
    let direction = stick.raw;
    let mut parts = SmallVec::new();

    if mode != SocdMode::Bypass {
        parts.push(direction);
    }
    for single in [
        Direction::BACKWARD,
        Direction::UP,
        Direction::DOWN,
        Direction::FORWARD,
    ] {
        if direction.contains(single) {
            parts.push(single);
        }
    }
    parts
}
