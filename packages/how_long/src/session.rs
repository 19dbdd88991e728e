use std::time::{Duration, Instant};

use crate::clock::Clock;
use crate::{Error, Result};

/// Lifecycle of a single measurement: not started, open (interval computed live from the clock
/// on every read) or closed (interval frozen).
///
/// Transitions only go forward: `start()` opens a session and `close()` freezes it. Starting a
/// closed session begins a new measurement.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum Session {
    #[default]
    NotStarted,
    Open {
        start: Instant,
    },
    Closed {
        interval: Duration,
    },
}

impl Session {
    /// Records the start instant.
    pub(crate) fn start(&mut self, clock: &Clock) {
        *self = Self::Open { start: clock.now() };
    }

    /// Freezes the interval, reading the clock one final time. Returns the frozen interval.
    ///
    /// # Panics
    ///
    /// Panics if the session was never started.
    pub(crate) fn close(&mut self, clock: &Clock) -> Duration {
        match *self {
            Self::NotStarted => panic!("cannot close a measurement session that was never started"),
            Self::Open { start } => {
                let interval = clock.elapsed_since(start);
                *self = Self::Closed { interval };
                interval
            }
            Self::Closed { interval } => interval,
        }
    }

    /// The interval of the session: live while open, frozen once closed.
    pub(crate) fn interval(&self, clock: &Clock) -> Result<Duration> {
        match *self {
            Self::NotStarted => Err(Error::NotStarted),
            Self::Open { start } => Ok(clock.elapsed_since(start)),
            Self::Closed { interval } => Ok(interval),
        }
    }
}
