use thiserror::Error;

use crate::unit::vocabulary;

/// Errors raised by the measurement types themselves.
///
/// Failures of the measured code are never converted into this type. A panic or an `Err`
/// produced by a measured block, function or sequence is passed back to the caller unchanged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The caller supplied a time unit name that is not in the unit table.
    #[error("unknown unit: '{unit}'. Use one of the following: {names} or 'auto'", names = vocabulary())]
    InvalidUnit {
        /// The unit name as supplied by the caller.
        unit: String,
    },

    /// The interval of a measurement was requested before the measurement was ever started.
    #[error("the interval is only available once the measurement has been started")]
    NotStarted,
}

/// A specialized `Result` type for `how_long` operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;
