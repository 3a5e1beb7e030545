//! Per-frame logical input values.

use crate::buttons::{ButtonName, Direction};

/// Press lifecycle of one logical button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ButtonStatus {
    #[default]
    Unpressed,
    Pressed,
    Holding,
    Released,
}

impl ButtonStatus {
    /// Next status given whether the control is physically down this frame.
    #[inline(always)]
    pub const fn next(self, down: bool) -> ButtonStatus {
        use ButtonStatus::*;
        match (self, down) {
            (Unpressed, true) => Pressed,
            (Unpressed, false) => Unpressed,
            (Pressed, true) => Holding,
            (Pressed, false) => Released,
            (Released, true) => Pressed,
            (Released, false) => Unpressed,
            (Holding, true) => Holding,
            (Holding, false) => Released,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Button {
    pub status: ButtonStatus,
}

impl Button {
    pub const fn new(status: ButtonStatus) -> Self {
        Self { status }
    }

    /// Advances the status. `None` means the logical button has no physical
    /// binding and is forced to `Unpressed`.
    #[inline(always)]
    pub fn update(&mut self, down: Option<bool>) {
        self.status = match down {
            Some(down) => self.status.next(down),
            None => ButtonStatus::Unpressed,
        };
    }

    /// Freshly pressed this frame.
    #[inline(always)]
    pub const fn pressed(self) -> bool {
        matches!(self.status, ButtonStatus::Pressed)
    }

    /// Down this frame, fresh or held.
    #[inline(always)]
    pub const fn active(self) -> bool {
        matches!(self.status, ButtonStatus::Pressed | ButtonStatus::Holding)
    }

    #[inline(always)]
    pub const fn holding(self) -> bool {
        matches!(self.status, ButtonStatus::Holding)
    }

    /// Pressed on either side wins; otherwise the left status is kept.
    #[inline(always)]
    pub const fn combine(self, other: Button) -> Button {
        if self.pressed() || other.pressed() {
            Button::new(ButtonStatus::Pressed)
        } else {
            self
        }
    }
}

impl From<ButtonStatus> for Button {
    fn from(status: ButtonStatus) -> Self {
        Button::new(status)
    }
}

/// Resolved stick for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Stick {
    /// Direction after SOCD cleaning.
    pub direction: Direction,
    /// Direction before SOCD cleaning.
    pub raw: Direction,
    /// Same non-neutral raw direction as the previous frame.
    pub holding: bool,
}

/// Logical snapshot of one frame. Compared by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct State {
    pub stick: Stick,
    pub lp: Button,
    pub mp: Button,
    pub hp: Button,
    pub pp: Button,
    pub lk: Button,
    pub mk: Button,
    pub hk: Button,
    pub kk: Button,
    pub ls: Button,
    pub rs: Button,
}

impl State {
    /// Every button paired with its name, in canonical order.
    #[inline]
    pub const fn buttons(&self) -> [(ButtonName, Button); 10] {
        [
            (ButtonName::LP, self.lp),
            (ButtonName::MP, self.mp),
            (ButtonName::HP, self.hp),
            (ButtonName::PP, self.pp),
            (ButtonName::LK, self.lk),
            (ButtonName::MK, self.mk),
            (ButtonName::HK, self.hk),
            (ButtonName::KK, self.kk),
            (ButtonName::LS, self.ls),
            (ButtonName::RS, self.rs),
        ]
    }

    /// Mutable access to every button, in canonical order.
    #[inline]
    pub fn buttons_mut(&mut self) -> [(ButtonName, &mut Button); 10] {
        [
            (ButtonName::LP, &mut self.lp),
            (ButtonName::MP, &mut self.mp),
            (ButtonName::HP, &mut self.hp),
            (ButtonName::PP, &mut self.pp),
            (ButtonName::LK, &mut self.lk),
            (ButtonName::MK, &mut self.mk),
            (ButtonName::HK, &mut self.hk),
            (ButtonName::KK, &mut self.kk),
            (ButtonName::LS, &mut self.ls),
            (ButtonName::RS, &mut self.rs),
        ]
    }

    /// Button for a single logical name. Chords yield `None`.
    pub fn button(&self, name: ButtonName) -> Option<Button> {
        self.buttons()
            .into_iter()
            .find_map(|(n, b)| (n == name).then_some(b))
    }

    /// Same cleaned direction and the same set of down buttons. Whether a
    /// button is fresh or held does not matter.
    pub fn equivalent_to(&self, other: &State) -> bool {
        self.stick.direction == other.stick.direction
            && self.active_buttons() == other.active_buttons()
    }

    pub fn is_neutral_only(&self) -> bool {
        self.stick.direction.is_neutral() && self.active_buttons().is_empty()
    }

    pub fn is_direction_only(&self) -> bool {
        !self.stick.direction.is_neutral() && self.active_buttons().is_empty()
    }

    /// Nothing new this frame: no freshly pressed button, and the stick is
    /// neutral or held over from the previous frame.
    pub fn has_no_pressed(&self) -> bool {
        (self.stick.direction.is_neutral() || self.stick.holding)
            && !self.buttons().iter().any(|(_, b)| b.pressed())
    }

    #[inline]
    pub fn has_pressed(&self) -> bool {
        !self.has_no_pressed()
    }

    /// All down buttons as one chord.
    pub fn active_buttons(&self) -> ButtonName {
        self.buttons()
            .into_iter()
            .filter(|(_, b)| b.active())
            .fold(ButtonName::NONE, |acc, (name, _)| acc | name)
    }

    /// Merges another snapshot into this one button by button; the stick is
    /// left untouched.
    pub fn combine(&mut self, other: &State) {
        for ((_, mine), (_, theirs)) in self.buttons_mut().into_iter().zip(other.buttons()) {
            *mine = mine.combine(theirs);
        }
    }
}
