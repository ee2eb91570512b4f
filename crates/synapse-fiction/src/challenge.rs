//! Timed challenges.
//!
//! A challenge holds an absolute deadline. The answer is the next input,
//! and it counts only if the clock read when that input arrives is not past
//! the deadline. Nothing blocks or polls in between.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// A monotonic clock measured from an arbitrary start.
pub trait Clock {
    /// Time elapsed since the clock's start.
    fn now(&self) -> Duration;
}

/// Wall-clock time via [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    /// Start a clock at the current instant.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    elapsed: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// A clock stopped at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.elapsed.get()
    }
}

/// How a challenge was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeOutcome {
    /// Right answer in time.
    Passed,
    /// Right answer, too late.
    TooSlow,
    /// Wrong answer.
    Failed,
}

/// A prompt that must be answered before a deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedChallenge {
    /// What the player is told.
    pub prompt: String,
    /// Expected answer, compared case-insensitively.
    pub answer: String,
    /// Clock reading after which the answer no longer counts.
    pub deadline: Duration,
}

impl TimedChallenge {
    /// Start a challenge with `window` to answer, measured on `clock`.
    pub fn start(
        prompt: impl Into<String>,
        answer: impl Into<String>,
        window: Duration,
        clock: &dyn Clock,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            answer: answer.into(),
            deadline: clock.now() + window,
        }
    }

    /// Judge `input`, received when `clock` reads `answered_at`.
    pub fn resolve(&self, input: &str, answered_at: Duration) -> ChallengeOutcome {
        if !input.trim().eq_ignore_ascii_case(&self.answer) {
            ChallengeOutcome::Failed
        } else if answered_at > self.deadline {
            ChallengeOutcome::TooSlow
        } else {
            ChallengeOutcome::Passed
        }
    }

    /// Time left at `now`.
    pub fn remaining(&self, now: Duration) -> Duration {
        self.deadline.saturating_sub(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn purge(clock: &ManualClock) -> TimedChallenge {
        TimedChallenge::start("Type ABORT", "abort", Duration::from_secs(10), clock)
    }

    #[test]
    fn answer_in_time_passes() {
        let clock = ManualClock::new();
        let c = purge(&clock);
        clock.advance(Duration::from_secs(9));
        assert_eq!(c.resolve(" ABORT ", clock.now()), ChallengeOutcome::Passed);
        assert_eq!(c.remaining(clock.now()), Duration::from_secs(1));
    }

    #[test]
    fn deadline_is_inclusive() {
        let clock = ManualClock::new();
        let c = purge(&clock);
        clock.advance(Duration::from_secs(10));
        assert_eq!(c.resolve("abort", clock.now()), ChallengeOutcome::Passed);
    }

    #[test]
    fn late_answer_is_too_slow() {
        let clock = ManualClock::new();
        let c = purge(&clock);
        clock.advance(Duration::from_millis(10_001));
        assert_eq!(c.resolve("abort", clock.now()), ChallengeOutcome::TooSlow);
        assert_eq!(c.remaining(clock.now()), Duration::ZERO);
    }

    #[test]
    fn wrong_answer_fails() {
        let clock = ManualClock::new();
        let c = purge(&clock);
        assert_eq!(c.resolve("run", clock.now()), ChallengeOutcome::Failed);
    }

    #[test]
    fn deadline_offsets_from_start_time() {
        let clock = ManualClock::new();
        clock.advance(Duration::from_secs(100));
        let c = purge(&clock);
        assert_eq!(c.deadline, Duration::from_secs(110));
    }

    #[test]
    fn clones_share_time() {
        let clock = ManualClock::new();
        let other = clock.clone();
        other.advance(Duration::from_secs(3));
        assert_eq!(clock.now(), Duration::from_secs(3));
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
