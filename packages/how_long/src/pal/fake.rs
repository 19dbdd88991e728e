//! Fake platform implementation for testing.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::pal::abstractions::Platform;

/// Internal state for the fake platform that can be shared between clones.
#[derive(Debug)]
struct FakePlatformState {
    readings: VecDeque<Duration>,
    reads: usize,
}

/// Fake implementation of the platform abstraction for testing.
///
/// Plays back a script of clock readings, given as offsets in seconds from a fixed origin
/// instant. Every call to `now()` consumes one reading. Multiple clones of the same
/// `FakePlatform` share the script and the read counter, so a test can keep a clone to inspect
/// how many times the code under test read the clock.
///
/// Reading past the end of the script panics, which surfaces unexpected clock reads as test
/// failures.
#[derive(Clone, Debug)]
pub(crate) struct FakePlatform {
    origin: Instant,
    state: Arc<Mutex<FakePlatformState>>,
}

impl FakePlatform {
    /// Creates a fake platform that returns the given readings (seconds since origin) in order.
    pub(crate) fn with_readings(readings: &[f64]) -> Self {
        Self {
            origin: Instant::now(),
            state: Arc::new(Mutex::new(FakePlatformState {
                readings: readings.iter().copied().map(offset_from_seconds).collect(),
                reads: 0,
            })),
        }
    }

    /// How many readings have been taken so far.
    pub(crate) fn reads(&self) -> usize {
        self.state
            .lock()
            .expect("FakePlatform state lock should not be poisoned")
            .reads
    }
}

// Rounds to whole nanoseconds so that scripted values like 0.12 map to exact durations.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "scripted readings are small non-negative values"
)]
fn offset_from_seconds(seconds: f64) -> Duration {
    Duration::from_nanos((seconds * 1e9).round() as u64)
}

impl Platform for FakePlatform {
    fn now(&self) -> Instant {
        let mut state = self
            .state
            .lock()
            .expect("FakePlatform state lock should not be poisoned");

        let offset = state
            .readings
            .pop_front()
            .expect("FakePlatform was read more times than it has scripted readings");

        state.reads = state.reads.saturating_add(1);

        self.origin
            .checked_add(offset)
            .expect("scripted readings are small enough to add to an instant")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn plays_back_readings_in_order() {
        let platform = FakePlatform::with_readings(&[0.0, 0.12, 0.5]);

        let first = platform.now();
        let second = platform.now();
        let third = platform.now();

        assert_eq!(second.duration_since(first), Duration::from_millis(120));
        assert_eq!(third.duration_since(second), Duration::from_millis(380));
        assert_eq!(platform.reads(), 3);
    }

    #[test]
    fn shared_state_between_clones() {
        let platform1 = FakePlatform::with_readings(&[1.0, 2.0]);
        let platform2 = platform1.clone();

        let first = platform1.now();
        let second = platform2.now();

        assert_eq!(second.duration_since(first), Duration::from_secs(1));
        assert_eq!(platform1.reads(), 2);
        assert_eq!(platform2.reads(), 2);
    }

    #[test]
    #[should_panic(expected = "more times than it has scripted readings")]
    fn panics_when_script_runs_out() {
        let platform = FakePlatform::with_readings(&[0.0]);

        _ = platform.now();
        _ = platform.now();
    }
}
