//! Platform abstraction trait definitions.

use std::fmt::Debug;
use std::time::Instant;

/// Provides the monotonic clock that all measurements are taken against.
///
/// Only differences between readings are meaningful. Readings must never decrease within one
/// process run and must not follow wall clock adjustments.
pub(crate) trait Platform: Debug + Send + Sync + 'static {
    /// Reads the current instant of the monotonic clock.
    fn now(&self) -> Instant;
}
