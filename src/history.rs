//! Scrolling input history.
//!
//! Each frame's snapshot either extends the newest entry (when equivalent)
//! or is appended as a new entry. The buffer is bounded and evicts oldest
//! first. Filtering for display never removes anything from storage.

use std::collections::VecDeque;

use crate::device::DeviceState;
use crate::mapping::ButtonMap;
use crate::socd::{DirectionSources, SocdMode};
use crate::state::{GameInput, State};

/// Frame counter ceiling for one entry.
pub const MAX_HOLDING_FRAMES: u8 = 99;

/// Per-frame settings read by the history and snapshot builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistorySettings {
    pub socd: SocdMode,
    pub sources: DirectionSources,
    pub max_entries: usize,
    /// Merge a chord that arrived split over two consecutive frames.
    pub auto_correct_multiple: bool,
    pub hide_button_release: bool,
    pub shadow_holding: bool,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            socd: SocdMode::default(),
            sources: DirectionSources::all(),
            max_entries: 50,
            auto_correct_multiple: true,
            hide_button_release: false,
            shadow_holding: true,
        }
    }
}

/// A distinct snapshot and how long it lasted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEntry {
    state: State,
    holding_frames: u8,
}

impl InputEntry {
    pub const fn new(state: State) -> Self {
        Self {
            state,
            holding_frames: 1,
        }
    }

    #[inline(always)]
    pub const fn state(&self) -> &State {
        &self.state
    }

    /// Frames this entry has lasted, between 1 and [`MAX_HOLDING_FRAMES`].
    #[inline(always)]
    pub const fn holding_frames(&self) -> u8 {
        self.holding_frames
    }

    #[inline]
    pub fn increment_frame(&mut self) {
        self.holding_frames = (self.holding_frames + 1).min(MAX_HOLDING_FRAMES);
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    game_input: GameInput,
    entries: VecDeque<InputEntry>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one frame: builds the snapshot from the device, then records it.
    pub fn update<D: DeviceState + ?Sized>(
        &mut self,
        device: &D,
        map: &ButtonMap,
        settings: &HistorySettings,
    ) {
        let state = self
            .game_input
            .update(device, map, settings.socd, settings.sources);
        self.push(state, settings);
    }

    /// Records a snapshot for the current frame.
    pub fn push(&mut self, mut state: State, settings: &HistorySettings) {
        if let Some(last) = self.entries.back_mut() {
            if last.state.equivalent_to(&state) {
                last.increment_frame();
                return;
            }

            if settings.auto_correct_multiple
                && last.holding_frames == 1
                && last.state.has_pressed()
                && state.has_pressed()
            {
                log::debug!(
                    "Merging split press {} into {}",
                    last.state.active_buttons(),
                    state.active_buttons()
                );
                state.combine(&last.state);
            }
        }

        log::debug!(
            "New entry {} {}",
            state.stick.direction.numpad(),
            state.active_buttons()
        );
        self.entries.push_back(InputEntry::new(state));
        self.shrink(settings.max_entries);
    }

    fn shrink(&mut self, max_entries: usize) {
        while self.entries.len() > max_entries {
            if let Some(evicted) = self.entries.pop_front() {
                log::debug!("Evicted entry held {} frames", evicted.holding_frames);
            }
        }
    }

    pub fn clear(&mut self) {
        log::info!("Clearing {} history entries", self.entries.len());
        self.entries.clear();
    }

    /// Snapshot of the latest frame, whether or not it started a new entry.
    pub fn current(&self) -> &State {
        self.game_input.current()
    }

    pub fn last(&self) -> Option<&InputEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &InputEntry> + '_ {
        self.entries.iter().rev()
    }

    /// Entries in arrival order, oldest first.
    pub fn entries(&self) -> &VecDeque<InputEntry> {
        &self.entries
    }

    /// Entries to draw, newest first. With `hide_button_release` on, entries
    /// without a fresh input are skipped, as are direction-only entries when
    /// no direction source is enabled.
    pub fn visible<'a>(
        &'a self,
        settings: &'a HistorySettings,
    ) -> impl Iterator<Item = &'a InputEntry> + 'a {
        self.iter().filter(move |entry| is_visible(entry, settings))
    }
}

fn is_visible(entry: &InputEntry, settings: &HistorySettings) -> bool {
    if !settings.hide_button_release {
        return true;
    }
    let state = entry.state();
    !(state.is_neutral_only()
        || state.has_no_pressed()
        || (settings.sources.is_empty() && state.is_direction_only()))
}
