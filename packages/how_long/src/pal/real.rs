use std::time::Instant;

use crate::pal::Platform;

/// The platform backed by the operating system's monotonic clock via [`Instant`].
#[derive(Debug)]
pub(crate) struct RealPlatform;

pub(crate) static REAL_PLATFORM: RealPlatform = RealPlatform;

impl Platform for RealPlatform {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
