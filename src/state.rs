//! Per-frame snapshot building.
//!
//! [`GameInput`] owns the previous frame's [`State`] and advances it in place
//! once per frame: directions first, then every logical button.

pub mod types;

pub use types::*;

use crate::device::DeviceState;
use crate::mapping::ButtonMap;
use crate::socd::{self, DirectionSources, SocdMode};

#[derive(Debug, Clone, Default)]
pub struct GameInput {
    current: State,
}

impl GameInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot produced by the latest [`GameInput::update`].
    #[inline(always)]
    pub fn current(&self) -> &State {
        &self.current
    }

    /// Advances the snapshot with this frame's device input.
    pub fn update<D: DeviceState + ?Sized>(
        &mut self,
        device: &D,
        map: &ButtonMap,
        socd_mode: SocdMode,
        sources: DirectionSources,
    ) -> State {
        self.current.stick = socd::resolve(device, socd_mode, sources, &self.current.stick);

        for (name, button) in self.current.buttons_mut() {
            button.update(map.get(name).map(|pad| device.is_down(pad)));
        }

        self.current
    }

    /// Forgets the previous frame; the next update starts from rest.
    pub fn reset(&mut self) {
        self.current = State::default();
    }
}
