//! Measurement of the time spent between the elements of a sequence.

use std::iter::FusedIterator;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::clock::Clock;
use crate::format::{DEFAULT_PRECISION, format_significant};
#[cfg(test)]
use crate::pal::PlatformFacade;
use crate::sink::emit;
use crate::{Sink, Summary, UnitSpec};

/// A sequence whose iteration is to be measured, not yet started.
///
/// Iterating it (via [`IntoIterator`]) starts the measurement and yields a [`TimedIter`],
/// which measures the time between the production of successive elements. That is the time the
/// caller spends processing each element plus the time the source takes to produce the next.
///
/// For each element after the first, a line `"iteration {index:>4}: {value} {unit}"` is
/// written to the iteration sink. When the source is exhausted, a summary is written to the
/// summary sink (see [`Summary::render()`]). When both sinks are the same destination the
/// summary is preceded by an empty line.
///
/// Create one with [`TimedIteratorExt::timed()`] or [`TimedSequence::new()`].
///
/// # Examples
///
/// ```
/// use how_long::TimedIteratorExt;
///
/// for file in ["a.txt", "b.txt", "c.txt"].timed() {
///     std::hint::black_box(file);
/// }
/// // Prints e.g.:
/// // iteration    1: 2.5 us
/// // iteration    2: 1.1 us
/// // iteration    3: 1.3 us
/// //
/// // total 3 iterations in 9.3 us
/// // min/median/max: 1.1/1.3/2.5 us
/// // average (std): 1.63 (0.757) us
/// ```
///
/// Keeping the iterator to inspect the measurements afterwards:
///
/// ```
/// use how_long::TimedIteratorExt;
///
/// let mut iter = (0..10).timed().silent_iterations().silent_summary().into_iter();
///
/// for value in &mut iter {
///     std::hint::black_box(value);
/// }
///
/// assert_eq!(iter.iterations(), 10);
/// assert!(iter.total().is_some());
/// ```
#[derive(Debug)]
pub struct TimedSequence<I> {
    source: I,
    config: SequenceConfig,
    clock: Clock,
}

#[derive(Clone, Debug)]
struct SequenceConfig {
    unit: UnitSpec,
    iteration_sink: Option<Sink>,
    summary_sink: Option<Sink>,
    precision: usize,
}

impl<I> TimedSequence<I>
where
    I: IntoIterator,
{
    /// Prepares `source` for measured iteration with the default configuration: automatic
    /// unit selection, both sinks writing to stdout and three significant digits.
    #[must_use]
    pub fn new(source: I) -> Self {
        Self::with_clock(source, Clock::new())
    }

    #[cfg(test)]
    pub(crate) fn with_platform(source: I, platform: PlatformFacade) -> Self {
        Self::with_clock(source, Clock::from_pal(platform))
    }

    fn with_clock(source: I, clock: Clock) -> Self {
        Self {
            source,
            config: SequenceConfig {
                unit: UnitSpec::Auto,
                iteration_sink: Some(Sink::stdout()),
                summary_sink: Some(Sink::stdout()),
                precision: DEFAULT_PRECISION,
            },
            clock,
        }
    }

    /// Sets the unit intervals are displayed in.
    #[must_use]
    pub fn unit(mut self, unit: UnitSpec) -> Self {
        self.config.unit = unit;
        self
    }

    /// Sets the sink each per-iteration line is written to.
    #[must_use]
    pub fn iteration_sink(mut self, sink: Sink) -> Self {
        self.config.iteration_sink = Some(sink);
        self
    }

    /// Sets the sink the end-of-sequence summary is written to.
    #[must_use]
    pub fn summary_sink(mut self, sink: Sink) -> Self {
        self.config.summary_sink = Some(sink);
        self
    }

    /// Disables the per-iteration lines.
    #[must_use]
    pub fn silent_iterations(mut self) -> Self {
        self.config.iteration_sink = None;
        self
    }

    /// Disables the end-of-sequence summary.
    #[must_use]
    pub fn silent_summary(mut self) -> Self {
        self.config.summary_sink = None;
        self
    }

    /// Sets the number of significant digits of displayed values.
    ///
    /// # Panics
    ///
    /// Panics if `precision` is zero.
    #[must_use]
    pub fn precision(mut self, precision: usize) -> Self {
        assert!(precision != 0, "precision cannot be zero");

        self.config.precision = precision;
        self
    }
}

impl<I> IntoIterator for TimedSequence<I>
where
    I: IntoIterator,
{
    type Item = I::Item;
    type IntoIter = TimedIter<I::IntoIter>;

    /// Starts the measurement.
    fn into_iter(self) -> Self::IntoIter {
        let start = self.clock.now();
        trace!("timed iteration started");

        TimedIter {
            source: self.source.into_iter(),
            config: self.config,
            clock: self.clock,
            start,
            last: None,
            intervals: Vec::new(),
            state: IterationState::Running,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum IterationState {
    Running,
    Exhausted,
}

/// An iterator that measures the time between the elements it yields.
///
/// Obtained by iterating a [`TimedSequence`]. See there for the output produced.
///
/// The recorded intervals remain available after iteration. Iterate by mutable reference
/// (`for x in &mut iter`) to keep access to them.
///
/// Once the source has signaled exhaustion, the summary has been written and this iterator
/// keeps returning `None` without consulting the source again.
#[derive(Debug)]
pub struct TimedIter<I> {
    source: I,
    config: SequenceConfig,
    clock: Clock,

    start: Instant,
    last: Option<Instant>,
    intervals: Vec<Duration>,
    state: IterationState,
}

impl<I> TimedIter<I> {
    /// The intervals recorded so far, in iteration order.
    #[must_use]
    pub fn intervals(&self) -> &[Duration] {
        &self.intervals
    }

    /// The number of intervals recorded so far.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.intervals.len()
    }

    /// The time from the start of iteration until the most recent request for an element.
    ///
    /// `None` before the first element has been requested.
    #[must_use]
    pub fn total(&self) -> Option<Duration> {
        self.last
            .map(|last| last.saturating_duration_since(self.start))
    }

    /// Summarizes the intervals recorded so far.
    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary::from_intervals(&self.intervals, self.total().unwrap_or_default())
    }

    /// Whether the source has signaled exhaustion.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.state == IterationState::Exhausted
    }

    fn record_interval(&mut self, interval: Duration) {
        self.intervals.push(interval);
        let index = self.intervals.len();
        trace!(index, ?interval, "timed iteration step");

        let config = &self.config;
        emit(config.iteration_sink.as_ref(), || {
            let rescaled = config.unit.rescale(interval.as_secs_f64());
            format!(
                "iteration {index:>4}: {} {}",
                format_significant(rescaled.value(), config.precision),
                rescaled.unit()
            )
        });
    }

    fn finish(&mut self) {
        self.state = IterationState::Exhausted;
        debug!(
            iterations = self.intervals.len(),
            total = ?self.total(),
            "timed iteration exhausted"
        );

        let config = &self.config;
        emit(config.summary_sink.as_ref(), || {
            let summary = self.summary();
            let rendered = summary.render(config.unit, config.precision);

            let shares_sink = matches!(
                (&config.iteration_sink, &config.summary_sink),
                (Some(steps), Some(totals)) if steps.same_destination(totals)
            );

            if shares_sink && summary != Summary::Empty {
                format!("\n{rendered}")
            } else {
                rendered
            }
        });
    }
}

impl<I> Iterator for TimedIter<I>
where
    I: Iterator,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == IterationState::Exhausted {
            return None;
        }

        let now = self.clock.now();

        if let Some(last) = self.last {
            self.record_interval(now.saturating_duration_since(last));
        }

        self.last = Some(now);

        let item = self.source.next();

        if item.is_none() {
            self.finish();
        }

        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.state == IterationState::Exhausted {
            (0, Some(0))
        } else {
            self.source.size_hint()
        }
    }
}

impl<I> FusedIterator for TimedIter<I> where I: Iterator {}

/// Adds [`timed()`](Self::timed) to every iterable type.
pub trait TimedIteratorExt: IntoIterator + Sized {
    /// Prepares this sequence for measured iteration.
    ///
    /// Returns a [`TimedSequence`] that can be configured further before iterating it.
    #[must_use]
    fn timed(self) -> TimedSequence<Self> {
        TimedSequence::new(self)
    }
}

impl<I> TimedIteratorExt for I where I: IntoIterator {}
