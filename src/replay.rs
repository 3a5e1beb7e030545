//! Headless frame replay.
//!
//! A script lists one frame per line as pad control names separated by
//! spaces or `+`. `*N` repeats the line for N frames, a blank line is an idle
//! frame and `#` starts a comment. On the keyboard device, tokens that are not
//! pad controls are read as key names and go through the keyboard bindings.

use anyhow::{Context, bail};

use crate::config::AppConfig;
use crate::device::{PadButton, PadButtons, PadState};
use crate::history::{HistorySettings, InputBuffer, InputEntry};
use crate::keyboard::{Key, KeyboardToPadMap};
use crate::macros::{self, MacroTable, ThemeTemplate};
use crate::mapping::{ButtonMap, KEYBOARD_IDENTIFIER};
use crate::socd::{self, SocdMode};

/// One script line: the controls held and for how many frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub pad: PadState,
    pub repeat: usize,
}

/// Parses a frame script.
pub fn parse_script(
    text: &str,
    keyboard: Option<&KeyboardToPadMap>,
) -> anyhow::Result<Vec<Frame>> {
    let mut frames = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim_start().starts_with('#') {
            continue;
        }
        let content = line.split('#').next().unwrap_or_default();
        let frame =
            parse_line(content, keyboard).with_context(|| format!("line {}", index + 1))?;
        frames.push(frame);
    }

    Ok(frames)
}

fn parse_line(line: &str, keyboard: Option<&KeyboardToPadMap>) -> anyhow::Result<Frame> {
    let mut buttons = PadButtons::empty();
    let mut keys: Vec<Key> = Vec::new();
    let mut repeat = 1;

    for token in line
        .split(|c: char| c.is_whitespace() || c == '+')
        .filter(|t| !t.is_empty())
    {
        if let Some(count) = token.strip_prefix('*') {
            repeat = count
                .parse()
                .with_context(|| format!("invalid repeat count {count:?}"))?;
            continue;
        }

        match (token.parse::<PadButton>(), keyboard) {
            (Ok(button), _) => buttons |= button.flag(),
            (Err(_), Some(_)) => keys.push(token.parse()?),
            (Err(e), None) => return Err(e.into()),
        }
    }

    if let Some(keyboard) = keyboard {
        buttons |= keyboard.pad_state(&keys).buttons;
    }
    if repeat == 0 {
        bail!("repeat count must be at least 1");
    }

    Ok(Frame {
        pad: PadState::new(buttons),
        repeat,
    })
}

/// Feeds frames into a history buffer with the settings of one config.
pub struct Replay {
    buffer: InputBuffer,
    settings: HistorySettings,
    map: ButtonMap,
    theme: Option<&'static ThemeTemplate>,
    custom: MacroTable,
    show_frames: bool,
    invert_history: bool,
}

impl Replay {
    pub fn new(config: &AppConfig, device: &str) -> Self {
        Self {
            buffer: InputBuffer::new(),
            settings: config.history_settings(),
            map: config.input_map.get_mapping_or_default(device).clone(),
            theme: config.theme(),
            custom: config.custom_macros(),
            show_frames: config.show_frames,
            invert_history: config.invert_history,
        }
    }

    pub fn set_socd(&mut self, mode: SocdMode) {
        self.settings.socd = mode;
    }

    pub fn buffer(&self) -> &InputBuffer {
        &self.buffer
    }

    pub fn run(&mut self, frames: &[Frame]) {
        for frame in frames {
            for _ in 0..frame.repeat {
                self.buffer.update(&frame.pad, &self.map, &self.settings);
            }
        }
        log::info!(
            "Replayed {} frames into {} entries",
            frames.iter().map(|f| f.repeat).sum::<usize>(),
            self.buffer.len()
        );
    }

    /// Visible history as text, newest first unless `invert_history` is set.
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .buffer
            .visible(&self.settings)
            .map(|entry| self.format_entry(entry))
            .collect();
        if self.invert_history {
            lines.reverse();
        }
        lines
    }

    fn format_entry(&self, entry: &InputEntry) -> String {
        let state = entry.state();
        let stick = if socd::is_single(self.settings.socd, state.stick.direction) {
            state.stick.direction.numpad().to_string()
        } else {
            socd::components(self.settings.socd, &state.stick)
                .iter()
                .map(|d| d.numpad().to_string())
                .collect::<Vec<_>>()
                .join("+")
        };

        let icons = macros::expand_chord(
            state,
            self.theme,
            Some(&self.custom),
            self.settings.shadow_holding,
        )
        .iter()
        .filter_map(|icon| {
            let name = icon.button.as_str()?;
            Some(if icon.holding {
                format!("({name})")
            } else {
                name.to_string()
            })
        })
        .collect::<Vec<_>>()
        .join(" ");

        if self.show_frames {
            format!("{:>2} | {stick} | {icons}", entry.holding_frames())
        } else {
            format!("{stick} | {icons}")
        }
    }
}

/// Keyboard bindings to use when replaying for `device`.
pub fn keyboard_for<'a>(config: &'a AppConfig, device: &str) -> Option<&'a KeyboardToPadMap> {
    (device == KEYBOARD_IDENTIFIER).then_some(&config.keyboard)
}
