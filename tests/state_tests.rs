//! Frame-by-frame scenarios through the public API.

use fightpad::device::{PadButtons, PadState};
use fightpad::{
    ButtonMap, ButtonName, ButtonStatus, Direction, DirectionSources, GameInput, HistorySettings,
    InputBuffer, SocdMode,
};

fn settings(socd: SocdMode, max_entries: usize) -> HistorySettings {
    HistorySettings {
        socd,
        max_entries,
        ..Default::default()
    }
}

fn run(buffer: &mut InputBuffer, settings: &HistorySettings, frames: &[PadButtons]) {
    let map = ButtonMap::default();
    for &buttons in frames {
        buffer.update(&PadState::new(buttons), &map, settings);
    }
}

fn directions(input: &mut GameInput, socd: SocdMode, frames: &[PadButtons]) -> Vec<Direction> {
    let map = ButtonMap::default();
    frames
        .iter()
        .map(|&buttons| {
            input
                .update(&buttons, &map, socd, DirectionSources::all())
                .stick
                .direction
        })
        .collect()
}

#[test]
fn test_neutral_cancels_opposing_pair() {
    let mut input = GameInput::new();
    let result = directions(
        &mut input,
        SocdMode::Neutral,
        &[
            PadButtons::DPAD_UP | PadButtons::DPAD_RIGHT,
            PadButtons::DPAD_UP | PadButtons::DPAD_DOWN | PadButtons::DPAD_RIGHT,
        ],
    );
    assert_eq!(result, vec![Direction::UP_FORWARD, Direction::FORWARD]);
}

#[test]
fn test_up_priority() {
    let mut input = GameInput::new();
    let result = directions(
        &mut input,
        SocdMode::UpPriority,
        &[
            PadButtons::DPAD_UP | PadButtons::DPAD_DOWN,
            PadButtons::DPAD_LEFT | PadButtons::DPAD_RIGHT,
        ],
    );
    assert_eq!(result, vec![Direction::UP, Direction::NEUTRAL]);
}

#[test]
fn test_last_priority_newest_direction_wins() {
    let mut input = GameInput::new();
    let result = directions(
        &mut input,
        SocdMode::LastPriority,
        &[
            PadButtons::DPAD_LEFT,
            PadButtons::DPAD_LEFT | PadButtons::DPAD_RIGHT,
            PadButtons::DPAD_LEFT | PadButtons::DPAD_RIGHT,
            PadButtons::DPAD_LEFT,
        ],
    );
    assert_eq!(
        result,
        vec![
            Direction::BACKWARD,
            Direction::FORWARD,
            Direction::FORWARD,
            Direction::BACKWARD,
        ]
    );
}

#[test]
fn test_sources_are_combined() {
    let mut input = GameInput::new();
    let result = directions(
        &mut input,
        SocdMode::Neutral,
        &[PadButtons::DPAD_DOWN | PadButtons::LEFT_THUMBSTICK_LEFT],
    );
    assert_eq!(result, vec![Direction::DOWN_BACKWARD]);
}

#[test]
fn test_press_hold_release_history() {
    let mut buffer = InputBuffer::new();
    let settings = settings(SocdMode::Neutral, 10);
    run(
        &mut buffer,
        &settings,
        &[
            PadButtons::X,
            PadButtons::X,
            PadButtons::X,
            PadButtons::empty(),
            PadButtons::empty(),
        ],
    );

    let entries: Vec<_> = buffer.entries().iter().collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].holding_frames(), 3);
    assert_eq!(entries[0].state().lp.status, ButtonStatus::Pressed);
    assert_eq!(entries[1].holding_frames(), 2);
    assert_eq!(entries[1].state().active_buttons(), ButtonName::NONE);
    assert_eq!(buffer.current().lp.status, ButtonStatus::Unpressed);
}

#[test]
fn test_buffer_keeps_newest_three() {
    let mut buffer = InputBuffer::new();
    let settings = settings(SocdMode::Neutral, 3);
    run(
        &mut buffer,
        &settings,
        &[
            PadButtons::DPAD_UP,
            PadButtons::DPAD_DOWN,
            PadButtons::DPAD_LEFT,
            PadButtons::DPAD_RIGHT,
        ],
    );

    let kept: Vec<_> = buffer
        .entries()
        .iter()
        .map(|e| e.state().stick.direction)
        .collect();
    assert_eq!(
        kept,
        vec![Direction::DOWN, Direction::BACKWARD, Direction::FORWARD]
    );
}

#[test]
fn test_no_sources_keeps_stick_neutral() {
    let mut buffer = InputBuffer::new();
    let settings = HistorySettings {
        sources: DirectionSources::NONE,
        ..settings(SocdMode::Neutral, 10)
    };
    run(
        &mut buffer,
        &settings,
        &[PadButtons::DPAD_UP, PadButtons::LEFT_THUMBSTICK_DOWN],
    );

    assert_eq!(buffer.len(), 1);
    assert!(buffer.current().stick.direction.is_neutral());
    assert!(buffer.current().stick.raw.is_neutral());
}

#[test]
fn test_hidden_releases_stay_in_storage() {
    let mut buffer = InputBuffer::new();
    let settings = HistorySettings {
        hide_button_release: true,
        ..settings(SocdMode::Neutral, 10)
    };
    run(
        &mut buffer,
        &settings,
        &[PadButtons::DPAD_DOWN, PadButtons::DPAD_DOWN | PadButtons::A, PadButtons::empty()],
    );

    assert_eq!(buffer.len(), 3);
    let shown: Vec<_> = buffer.visible(&settings).collect();
    assert_eq!(shown.len(), 2);
    assert_eq!(shown[0].state().active_buttons(), ButtonName::LK);
    assert_eq!(shown[1].state().stick.direction, Direction::DOWN);
}

#[test]
fn test_switching_from_bypass_mid_hold_cleans_conflict() {
    let mut buffer = InputBuffer::new();
    let held = [PadButtons::DPAD_LEFT | PadButtons::DPAD_RIGHT];

    run(&mut buffer, &settings(SocdMode::Bypass, 10), &held);
    assert_eq!(buffer.current().stick.direction, Direction::HORIZONTAL);

    run(&mut buffer, &settings(SocdMode::LastPriority, 10), &held);
    let direction = buffer.current().stick.direction;
    assert!(!direction.contains(Direction::HORIZONTAL));
    assert_eq!(direction, Direction::BACKWARD);
}
