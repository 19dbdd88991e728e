//! Statistics over the intervals between the elements of a timed sequence.

use std::time::Duration;

use crate::UnitSpec;
use crate::format::format_significant;

/// The end-of-sequence summary of a [`TimedIter`](crate::TimedIter).
///
/// How much can be said about a sequence depends on how many intervals were recorded, so the
/// summary has one variant per case.
#[derive(Clone, Debug, PartialEq)]
#[allow(
    clippy::exhaustive_enums,
    reason = "the three cases cover every possible interval count"
)]
pub enum Summary {
    /// No intervals were recorded: the sequence produced no elements.
    Empty,

    /// A single interval was recorded.
    Single(Duration),

    /// Two or more intervals were recorded.
    Many(Statistics),
}

/// Statistics over two or more recorded intervals.
///
/// All values except [`total()`](Self::total) and [`iterations()`](Self::iterations) are
/// in seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct Statistics {
    iterations: usize,
    total: Duration,
    min: f64,
    median: f64,
    max: f64,
    mean: f64,
    std_dev: f64,
}

impl Summary {
    /// Summarizes the given intervals. `total` is the duration of the whole iteration,
    /// which also covers the time before the first element was produced.
    #[must_use]
    pub fn from_intervals(intervals: &[Duration], total: Duration) -> Self {
        match intervals {
            [] => Self::Empty,
            [single] => Self::Single(*single),
            _ => Self::Many(Statistics::new(intervals, total)),
        }
    }

    /// Renders the summary as text.
    ///
    /// The total is displayed in `unit` as resolved for the total alone. The distribution figures
    /// all share the unit that `unit` resolves to for the median, so that they stay comparable.
    #[must_use]
    pub fn render(&self, unit: UnitSpec, precision: usize) -> String {
        match self {
            Self::Empty => "no iterations".to_string(),
            Self::Single(interval) => {
                let rescaled = unit.rescale(interval.as_secs_f64());
                format!("one iteration: {rescaled:.precision$}")
            }
            Self::Many(statistics) => statistics.render(unit, precision),
        }
    }
}

impl Statistics {
    #[expect(
        clippy::cast_precision_loss,
        reason = "interval counts are far below the range where f64 loses integer precision"
    )]
    fn new(intervals: &[Duration], total: Duration) -> Self {
        assert!(
            intervals.len() >= 2,
            "statistics require at least two intervals"
        );

        let mut seconds = intervals
            .iter()
            .map(Duration::as_secs_f64)
            .collect::<Vec<_>>();
        seconds.sort_by(f64::total_cmp);

        let count = seconds.len() as f64;
        let mean = seconds.iter().sum::<f64>() / count;
        let squared_deviations = seconds
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>();

        Self {
            iterations: seconds.len(),
            total,
            min: *seconds.first().expect("guarded by length assertion"),
            median: median_of_sorted(&seconds),
            max: *seconds.last().expect("guarded by length assertion"),
            mean,
            std_dev: (squared_deviations / (count - 1.0)).sqrt(),
        }
    }

    /// Number of recorded intervals.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Duration of the whole iteration.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Shortest interval, in seconds.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Median interval, in seconds.
    #[must_use]
    pub fn median(&self) -> f64 {
        self.median
    }

    /// Longest interval, in seconds.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Arithmetic mean of the intervals, in seconds.
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample standard deviation of the intervals, in seconds.
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    fn render(&self, unit: UnitSpec, precision: usize) -> String {
        let total = unit.rescale(self.total.as_secs_f64());

        let median = unit.rescale(self.median);
        let shared = median.unit();

        let value = |seconds: f64| format_significant(shared.rescale(seconds).value(), precision);

        format!(
            "total {} iterations in {total:.precision$}\n\
             min/median/max: {}/{}/{} {shared}\n\
             average (std): {} ({}) {shared}",
            self.iterations,
            value(self.min),
            format_significant(median.value(), precision),
            value(self.max),
            value(self.mean),
            value(self.std_dev),
        )
    }
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let middle = sorted.len() / 2;

    if sorted.len() % 2 == 1 {
        *sorted.get(middle).expect("middle index is within bounds")
    } else {
        let lower = sorted
            .get(middle.wrapping_sub(1))
            .expect("even non-empty slice has an element before the middle");
        let upper = sorted.get(middle).expect("middle index is within bounds");
        f64::midpoint(*lower, *upper)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::Unit;

    fn seconds(values: &[f64]) -> Vec<Duration> {
        values.iter().copied().map(Duration::from_secs_f64).collect()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn empty_summary() {
        let summary = Summary::from_intervals(&[], Duration::ZERO);

        assert_eq!(summary, Summary::Empty);
        assert_eq!(summary.render(UnitSpec::Auto, 3), "no iterations");
    }

    #[test]
    fn single_summary() {
        let summary = Summary::from_intervals(&[Duration::from_secs(1)], Duration::from_secs(2));

        assert_eq!(summary, Summary::Single(Duration::from_secs(1)));
        assert_eq!(summary.render(UnitSpec::Auto, 3), "one iteration: 1 s");
    }

    #[test]
    fn statistics_of_known_gaps() {
        let intervals = seconds(&[0.5, 1.0, 1.5]);
        let Summary::Many(statistics) = Summary::from_intervals(&intervals, Duration::from_secs(3))
        else {
            panic!("expected statistics for three intervals");
        };

        assert_eq!(statistics.iterations(), 3);
        assert_eq!(statistics.total(), Duration::from_secs(3));
        assert_close(statistics.min(), 0.5);
        assert_close(statistics.median(), 1.0);
        assert_close(statistics.max(), 1.5);
        assert_close(statistics.mean(), 1.0);
        assert_close(statistics.std_dev(), 0.5);
    }

    #[test]
    fn median_of_even_count_is_midpoint() {
        assert_close(median_of_sorted(&[1.0, 2.0, 4.0, 8.0]), 3.0);
        assert_close(median_of_sorted(&[1.0, 2.0]), 1.5);
        assert_close(median_of_sorted(&[1.0, 2.0, 4.0]), 2.0);
    }

    #[test]
    fn order_of_intervals_does_not_matter() {
        let forward = Summary::from_intervals(&seconds(&[0.1, 0.2, 0.3]), Duration::from_secs(1));
        let backward = Summary::from_intervals(&seconds(&[0.3, 0.2, 0.1]), Duration::from_secs(1));

        assert_eq!(forward, backward);
    }

    #[test]
    fn render_auto_units() {
        let intervals = seconds(&[0.5, 1.5, 1.0, 1.0, 1.0]);
        let summary = Summary::from_intervals(&intervals, Duration::from_millis(5010));

        assert_eq!(
            summary.render(UnitSpec::Auto, 3),
            "total 5 iterations in 5.01 s\n\
             min/median/max: 0.5/1/1.5 s\n\
             average (std): 1 (0.354) s"
        );
    }

    #[test]
    fn render_fixed_seconds() {
        let intervals = seconds(&[0.001, 0.001, 0.002]);
        let summary = Summary::from_intervals(&intervals, Duration::from_millis(4));

        assert_eq!(
            summary.render(UnitSpec::Fixed(Unit::Seconds), 3),
            "total 3 iterations in 0.004 s\n\
             min/median/max: 0.001/0.001/0.002 s\n\
             average (std): 0.00133 (0.000577) s"
        );
    }

    #[test]
    fn render_fixed_nanoseconds() {
        let intervals = seconds(&[0.0015, 0.0005, 0.002]);
        let summary = Summary::from_intervals(&intervals, Duration::from_millis(4));

        assert_eq!(
            summary.render(UnitSpec::Fixed(Unit::Nanoseconds), 3),
            "total 3 iterations in 4e+06 ns\n\
             min/median/max: 5e+05/1.5e+06/2e+06 ns\n\
             average (std): 1.33e+06 (7.64e+05) ns"
        );
    }

    #[test]
    fn total_and_distribution_units_may_differ() {
        // The median resolves to milliseconds while the total resolves to seconds.
        let intervals = seconds(&[0.2, 0.3, 0.4, 0.5]);
        let summary = Summary::from_intervals(&intervals, Duration::from_millis(1400));

        assert_eq!(
            summary.render(UnitSpec::Auto, 3),
            "total 4 iterations in 1.4 s\n\
             min/median/max: 200/350/500 ms\n\
             average (std): 350 (129) ms"
        );
    }

    #[test]
    fn render_respects_precision() {
        let intervals = seconds(&[1.0, 2.0]);
        let summary = Summary::from_intervals(&intervals, Duration::from_secs(3));

        assert_eq!(
            summary.render(UnitSpec::Auto, 2),
            "total 2 iterations in 3 s\n\
             min/median/max: 1/1.5/2 s\n\
             average (std): 1.5 (0.71) s"
        );
    }
}
