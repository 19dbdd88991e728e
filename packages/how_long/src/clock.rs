use std::time::{Duration, Instant};

use crate::pal::{Platform, PlatformFacade};

/// The monotonic clock that measurements are taken against.
///
/// Wraps the platform abstraction so that tests can substitute scripted readings.
#[derive(Clone, Debug, Default)]
pub(crate) struct Clock {
    platform: PlatformFacade,
}

impl Clock {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::from_pal(PlatformFacade::real())
    }

    #[must_use]
    pub(crate) fn from_pal(platform: PlatformFacade) -> Self {
        Self { platform }
    }

    #[must_use]
    pub(crate) fn now(&self) -> Instant {
        self.platform.now()
    }

    /// The time elapsed between `earlier` and a fresh reading of the clock.
    #[must_use]
    pub(crate) fn elapsed_since(&self, earlier: Instant) -> Duration {
        self.now().saturating_duration_since(earlier)
    }
}
