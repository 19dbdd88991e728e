#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Wall-clock time measurement with output in a convenient unit.
//!
//! This package measures how long code takes to run and reports the result rescaled to a
//! human-friendly unit, from nanoseconds up to days. There are three ways to measure:
//!
//! - [`Timing`] - measures a scoped block of code
//! - [`TimedFn`] - wraps a function so that every call to it is measured
//! - [`TimedSequence`] - measures the time between the elements of a sequence and summarizes
//!   the distribution once the sequence is exhausted
//!
//! All of them write formatted lines to a [`Sink`] (stdout by default) and keep the measured
//! values available for programmatic use. Unit conversion is also available on its own via
//! [`Unit`], [`UnitSpec`] and [`rescale()`].
//!
//! # Measuring a block
//!
//! ```
//! use how_long::Timing;
//!
//! let mut timing = Timing::new().label("Preprocessing: ");
//!
//! let sum = timing.measure(|| (0..1000_u64).sum::<u64>());
//! // Prints e.g. "Preprocessing: 11.3 us"
//!
//! assert_eq!(sum, 499_500);
//! assert!(timing.interval().is_ok());
//! ```
//!
//! # Measuring function calls
//!
//! ```
//! use how_long::timed;
//!
//! /// Multiplies two numbers.
//! fn multiply(a: u64, b: u64) -> u64 {
//!     a * b
//! }
//!
//! let mut multiply = timed!(multiply, "Multiplies two numbers.");
//!
//! assert_eq!(multiply.call((6, 7)), 42);
//! // Prints e.g. "multiply: 85 ns"
//!
//! assert_eq!(multiply.function_name(), "multiply");
//! ```
//!
//! # Measuring iteration
//!
//! ```
//! use how_long::TimedIteratorExt;
//!
//! for path in ["a.csv", "b.csv"].timed() {
//!     std::hint::black_box(path);
//! }
//! // Prints e.g.:
//! // iteration    1: 1.2 us
//! // iteration    2: 0.9 us
//! //
//! // total 2 iterations in 2.5 us
//! // min/median/max: 0.9/1.05/1.2 us
//! // average (std): 1.05 (0.212) us
//! ```
//!
//! # Unit conversion
//!
//! ```
//! use how_long::{Unit, UnitSpec, rescale};
//!
//! let rescaled = rescale(0.006, "auto").unwrap();
//! assert_eq!(rescaled.unit(), Unit::Milliseconds);
//! assert_eq!(rescaled.to_string(), "6 ms");
//!
//! let minutes = UnitSpec::Fixed(Unit::Minutes).rescale(6000.0);
//! assert_eq!(minutes.to_string(), "100 min");
//! ```
//!
//! # Logging
//!
//! Measurement lifecycle events are emitted as `tracing` events at `TRACE` and `DEBUG` level.
//! Measurement output itself can also be routed through `tracing` via [`Sink::tracing()`].

mod clock;
mod error;
mod format;
mod pal;
mod session;
mod sink;
mod summary;
mod timed_fn;
mod timed_iter;
mod timing;
mod unit;

pub use error::{Error, Result};
pub use sink::Sink;
pub use summary::{Statistics, Summary};
pub use timed_fn::{Callable, TimedFn};
pub use timed_iter::{TimedIter, TimedIteratorExt, TimedSequence};
pub use timing::{Timing, TimingScope};
pub use unit::{Rescaled, Unit, UnitSpec, rescale};
