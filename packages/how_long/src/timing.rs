//! Measurement of a scoped block of code.

use std::thread;
use std::time::Duration;

use tracing::trace;

use crate::clock::Clock;
use crate::format::{DEFAULT_PRECISION, measurement_line};
#[cfg(test)]
use crate::pal::PlatformFacade;
use crate::session::Session;
use crate::sink::emit;
use crate::{Sink, UnitSpec};

/// Measures the wall-clock time spent in one block of code.
///
/// Configure the measurement with the builder methods, then either call
/// [`enter()`](Self::enter) and keep the returned [`TimingScope`] alive for the duration of the
/// block, or pass the block as a closure to [`measure()`](Self::measure).
///
/// When the scope ends, the elapsed time is written to the sink as `"{label}{value} {unit}"`.
/// If the scope ends because of a panic, `" (failed)"` is appended and the panic continues
/// unchanged.
///
/// # Examples
///
/// ```
/// use how_long::{Timing, Unit};
///
/// let mut timing = Timing::new().label("Preprocessing: ").unit(Unit::Milliseconds.into());
///
/// {
///     let _scope = timing.enter();
///     std::hint::black_box((0..1000).sum::<u64>());
/// } // Prints e.g. "Preprocessing: 0.0123 ms"
///
/// let elapsed = timing.interval().unwrap();
/// assert!(elapsed < std::time::Duration::from_secs(60));
/// ```
#[derive(Debug)]
pub struct Timing {
    label: String,
    unit: UnitSpec,
    sink: Option<Sink>,
    precision: usize,

    clock: Clock,
    session: Session,
}

impl Timing {
    /// Creates a measurement with an empty label, automatic unit selection, output to stdout
    /// and three significant digits.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Clock::new())
    }

    #[cfg(test)]
    pub(crate) fn with_platform(platform: PlatformFacade) -> Self {
        Self::with_clock(Clock::from_pal(platform))
    }

    fn with_clock(clock: Clock) -> Self {
        Self {
            label: String::new(),
            unit: UnitSpec::Auto,
            sink: Some(Sink::stdout()),
            precision: DEFAULT_PRECISION,
            clock,
            session: Session::NotStarted,
        }
    }

    /// Sets the text written in front of the measured value, e.g. `"Loading: "`.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the unit the measured value is displayed in.
    #[must_use]
    pub fn unit(mut self, unit: UnitSpec) -> Self {
        self.unit = unit;
        self
    }

    /// Sets the sink the result is written to.
    #[must_use]
    pub fn sink(mut self, sink: Sink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Disables output. The interval remains available via [`interval()`](Self::interval).
    #[must_use]
    pub fn silent(mut self) -> Self {
        self.sink = None;
        self
    }

    /// Sets the number of significant digits of the displayed value.
    ///
    /// # Panics
    ///
    /// Panics if `precision` is zero.
    #[must_use]
    pub fn precision(mut self, precision: usize) -> Self {
        assert!(precision != 0, "precision cannot be zero");

        self.precision = precision;
        self
    }

    /// Starts the measurement. It ends when the returned scope is dropped.
    ///
    /// Entering a measurement that has already completed starts a new one, replacing the
    /// previous result.
    pub fn enter(&mut self) -> TimingScope<'_> {
        self.session.start(&self.clock);
        trace!(label = %self.label, "timing scope entered");

        TimingScope {
            timing: self,
            failed: false,
        }
    }

    /// Measures the execution of `f` and returns its result.
    ///
    /// If `f` panics, the measurement is reported as failed and the panic continues.
    pub fn measure<R>(&mut self, f: impl FnOnce() -> R) -> R {
        let _scope = self.enter();
        f()
    }

    /// Measures the execution of a fallible `f` and returns its result unchanged.
    ///
    /// An `Err` result is reported as a failed measurement, the same as a panic.
    ///
    /// # Errors
    ///
    /// Returns whatever error `f` returns.
    pub fn measure_result<T, E>(&mut self, f: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        let mut scope = self.enter();
        let result = f();

        if result.is_err() {
            scope.mark_failed();
        }

        result
    }

    /// The time elapsed in the measured block.
    ///
    /// While the block is still executing this is the time elapsed so far. Once the block has
    /// been left it is the total time spent in the block and no longer changes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotStarted`](crate::Error::NotStarted) if the measurement was never
    /// entered.
    pub fn interval(&self) -> crate::Result<Duration> {
        self.session.interval(&self.clock)
    }

    fn exit(&mut self, failed: bool) {
        let interval = self.session.close(&self.clock);
        trace!(label = %self.label, ?interval, failed, "timing scope exited");

        emit(self.sink.as_ref(), || {
            let rescaled = self.unit.rescale(interval.as_secs_f64());
            measurement_line(&self.label, rescaled, self.precision, failed)
        });
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::new()
    }
}

/// An entered [`Timing`] measurement, ended and reported when dropped.
///
/// The measurement is reported as failed if the scope is dropped during a panic or if
/// [`mark_failed()`](Self::mark_failed) was called.
#[derive(Debug)]
#[must_use = "Measurements are taken between creation and drop"]
pub struct TimingScope<'a> {
    timing: &'a mut Timing,
    failed: bool,
}

impl TimingScope<'_> {
    /// The time elapsed since the scope was entered.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.timing
            .interval()
            .expect("the session of an entered scope is always started")
    }

    /// Reports this measurement as failed when the scope ends.
    ///
    /// Use this when the measured block fails without panicking, e.g. by producing an error.
    pub fn mark_failed(&mut self) {
        self.failed = true;
    }
}

impl Drop for TimingScope<'_> {
    fn drop(&mut self) {
        self.timing.exit(self.failed || thread::panicking());
    }
}
