#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure transition function over the game-mode enum.

use pathforge_core::{Mode, TransitionEvent};

/// Computes the mode that follows `current` when `event` occurs.
///
/// Events that are not valid from `current` leave the mode unchanged.
#[must_use]
pub const fn transition(current: Mode, event: TransitionEvent) -> Mode {
    match event {
        TransitionEvent::OpenMenu => Mode::Menu,
        TransitionEvent::OpenDifficulty => match current {
            Mode::Menu => Mode::DifficultySelect,
            other => other,
        },
        TransitionEvent::StartPlay => Mode::WaveComplete,
        TransitionEvent::Pause => match current {
            Mode::Playing => Mode::Paused,
            other => other,
        },
        TransitionEvent::Resume => match current {
            Mode::Paused => Mode::Playing,
            other => other,
        },
        TransitionEvent::GameOver => Mode::GameOver,
        TransitionEvent::Victory => Mode::Victory,
        TransitionEvent::EnterSandbox => Mode::Sandbox,
        TransitionEvent::ExitSandbox => Mode::Menu,
    }
}
