//! Fixed-step accumulator translating wall-clock frames into simulation ticks.

use std::time::Duration;

/// Longest frame fed into the accumulator; slower frames are truncated.
const MAX_FRAME: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub(crate) struct FixedStepClock {
    step: Duration,
    accumulator: Duration,
}

impl FixedStepClock {
    pub(crate) fn new(step: Duration) -> Self {
        Self {
            step,
            accumulator: Duration::ZERO,
        }
    }

    /// Accumulates `frame` and returns how many whole steps are now due.
    pub(crate) fn advance(&mut self, frame: Duration) -> u32 {
        self.accumulator += frame.min(MAX_FRAME);
        let mut steps = 0;
        while !self.step.is_zero() && self.accumulator >= self.step {
            self.accumulator -= self.step;
            steps += 1;
        }
        steps
    }
}
