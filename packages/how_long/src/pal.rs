//! Platform abstraction layer for reading the monotonic clock.
//!
//! Measurements read the clock through [`PlatformFacade`], which dispatches either to the real
//! platform or, in tests, to a fake platform that plays back scripted clock readings or to a
//! mockall-generated mock.

mod abstractions;
mod facade;
#[cfg(test)]
mod fake;
#[cfg(test)]
mod mock;
mod real;

pub(crate) use abstractions::Platform;
pub(crate) use facade::PlatformFacade;
#[cfg(test)]
pub(crate) use fake::FakePlatform;
#[cfg(test)]
pub(crate) use mock::MockPlatform;
pub(crate) use real::{REAL_PLATFORM, RealPlatform};
