//! Time units and the rescaling of durations into them.

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

use crate::format::{DEFAULT_PRECISION, format_significant};
use crate::{Error, Result};

/// A unit in which a measured duration can be displayed.
///
/// The set of units is fixed: nanoseconds up to days. Each unit knows its scale (how many
/// seconds one unit represents) and the exclusive upper bound that automatic unit selection
/// applies to it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[allow(
    clippy::exhaustive_enums,
    reason = "the unit vocabulary is part of the output format and will not grow"
)]
pub enum Unit {
    /// `ns`
    Nanoseconds,
    /// `us`
    Microseconds,
    /// `ms`
    Milliseconds,
    /// `s`
    Seconds,
    /// `min`
    Minutes,
    /// `h`
    Hours,
    /// `d`
    Days,
}

#[derive(Debug)]
struct UnitRecord {
    unit: Unit,
    name: &'static str,
    seconds: f64,

    // Durations (in seconds) below this value are displayed in this unit when the unit is
    // chosen automatically. `None` accepts everything that reaches this row.
    auto_bound: Option<f64>,
}

// Ordered by strictly increasing `auto_bound`. Automatic selection scans from the top.
const TABLE: [UnitRecord; 7] = [
    UnitRecord {
        unit: Unit::Nanoseconds,
        name: "ns",
        seconds: 1e-9,
        auto_bound: Some(1e-6),
    },
    UnitRecord {
        unit: Unit::Microseconds,
        name: "us",
        seconds: 1e-6,
        auto_bound: Some(1e-3),
    },
    UnitRecord {
        unit: Unit::Milliseconds,
        name: "ms",
        seconds: 1e-3,
        auto_bound: Some(1.0),
    },
    UnitRecord {
        unit: Unit::Seconds,
        name: "s",
        seconds: 1.0,
        auto_bound: Some(1e3),
    },
    UnitRecord {
        unit: Unit::Minutes,
        name: "min",
        seconds: 60.0,
        auto_bound: Some(6e4),
    },
    UnitRecord {
        unit: Unit::Hours,
        name: "h",
        seconds: 3600.0,
        auto_bound: Some(3.6e6),
    },
    UnitRecord {
        unit: Unit::Days,
        name: "d",
        seconds: 86400.0,
        auto_bound: None,
    },
];

/// Comma-separated list of all unit names, smallest first.
pub(crate) fn vocabulary() -> String {
    TABLE.iter().map(|record| record.name).join(", ")
}

impl Unit {
    fn record(self) -> &'static UnitRecord {
        TABLE
            .iter()
            .find(|record| record.unit == self)
            .expect("every unit has a row in the unit table")
    }

    /// All units, from the smallest to the largest.
    pub fn all() -> impl Iterator<Item = Self> {
        TABLE.iter().map(|record| record.unit)
    }

    /// The canonical name of the unit, as used in formatted output (e.g. `"ms"`).
    #[must_use]
    pub fn name(self) -> &'static str {
        self.record().name
    }

    /// How many seconds one of this unit represents.
    #[must_use]
    pub fn seconds(self) -> f64 {
        self.record().seconds
    }

    /// The exclusive upper bound, in seconds, of durations that automatic selection assigns to
    /// this unit. `None` for the largest unit, which accepts any remaining duration.
    #[must_use]
    pub fn auto_bound(self) -> Option<f64> {
        self.record().auto_bound
    }

    /// Selects the unit that best fits a duration of `seconds`.
    ///
    /// This is the first unit whose bound is strictly greater than the duration, so a duration
    /// exactly on a bound is assigned to the next larger unit.
    ///
    /// # Examples
    ///
    /// ```
    /// use how_long::Unit;
    ///
    /// assert_eq!(Unit::auto(0.006), Unit::Milliseconds);
    /// assert_eq!(Unit::auto(1.0), Unit::Seconds);
    /// assert_eq!(Unit::auto(6000.0), Unit::Minutes);
    /// ```
    #[must_use]
    pub fn auto(seconds: f64) -> Self {
        TABLE
            .iter()
            .find(|record| record.auto_bound.is_none_or(|bound| seconds < bound))
            .map_or(Self::Days, |record| record.unit)
    }

    /// Expresses a duration of `seconds` in this unit.
    #[must_use]
    pub fn rescale(self, seconds: f64) -> Rescaled {
        Rescaled {
            value: seconds / self.seconds(),
            unit: self,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Unit {
    type Err = Error;

    /// Parses a unit name. Surrounding whitespace and letter case are ignored.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();

        TABLE
            .iter()
            .find(|record| record.name.eq_ignore_ascii_case(trimmed))
            .map(|record| record.unit)
            .ok_or_else(|| Error::InvalidUnit {
                unit: trimmed.to_string(),
            })
    }
}

/// The unit a measurement should be displayed in: a fixed one or one chosen per duration.
///
/// Parses from the same strings as [`Unit`] plus `a` and `auto` (in any letter case).
///
/// # Examples
///
/// ```
/// use how_long::{Unit, UnitSpec};
///
/// let spec: UnitSpec = " AUTO ".parse().unwrap();
/// assert_eq!(spec, UnitSpec::Auto);
///
/// let spec: UnitSpec = "ms".parse().unwrap();
/// assert_eq!(spec, UnitSpec::Fixed(Unit::Milliseconds));
///
/// assert!("fortnight".parse::<UnitSpec>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[allow(
    clippy::exhaustive_enums,
    reason = "a unit is either automatic or fixed, there is no third option"
)]
pub enum UnitSpec {
    /// Select the unit from the magnitude of each duration being displayed.
    #[default]
    Auto,

    /// Always display in the given unit.
    Fixed(Unit),
}

impl UnitSpec {
    /// Resolves the unit a duration of `seconds` is displayed in.
    #[must_use]
    pub fn resolve(self, seconds: f64) -> Unit {
        match self {
            Self::Auto => Unit::auto(seconds),
            Self::Fixed(unit) => unit,
        }
    }

    /// Expresses a duration of `seconds` in the unit this specifier resolves to.
    #[must_use]
    pub fn rescale(self, seconds: f64) -> Rescaled {
        self.resolve(seconds).rescale(seconds)
    }
}

impl From<Unit> for UnitSpec {
    fn from(unit: Unit) -> Self {
        Self::Fixed(unit)
    }
}

impl FromStr for UnitSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();

        if trimmed.eq_ignore_ascii_case("a") || trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }

        trimmed.parse().map(Self::Fixed)
    }
}

impl fmt::Display for UnitSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Fixed(unit) => unit.fmt(f),
        }
    }
}

/// A duration expressed as a value in a specific unit.
///
/// The [`Display`](fmt::Display) implementation renders `"{value} {unit}"` with the value
/// rounded to a number of significant digits. The formatter precision selects the digit
/// count (`{:.5}`), three digits are used when none is given.
///
/// # Examples
///
/// ```
/// use how_long::rescale;
///
/// let rescaled = rescale(0.12, "auto").unwrap();
///
/// assert_eq!(rescaled.to_string(), "120 ms");
/// assert_eq!(format!("{rescaled:.1}"), "1e+02 ms");
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rescaled {
    value: f64,
    unit: Unit,
}

impl Rescaled {
    /// The duration in units of [`unit()`](Self::unit).
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The unit the value is expressed in.
    #[must_use]
    pub fn unit(&self) -> Unit {
        self.unit
    }
}

impl fmt::Display for Rescaled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(DEFAULT_PRECISION);
        write!(
            f,
            "{} {}",
            format_significant(self.value, precision),
            self.unit
        )
    }
}

/// Converts a duration in seconds into the given unit.
///
/// `unit` is one of `ns`, `us`, `ms`, `s`, `min`, `h`, `d` or `a`/`auto` for automatic
/// selection, ignoring letter case and surrounding whitespace.
///
/// # Errors
///
/// Returns [`Error::InvalidUnit`] if `unit` is not a known unit name. The error message lists
/// every accepted name.
///
/// # Examples
///
/// ```
/// use how_long::{Unit, rescale};
///
/// let rescaled = rescale(6000.0, "auto").unwrap();
/// assert_eq!(rescaled.unit(), Unit::Minutes);
/// assert!((rescaled.value() - 100.0).abs() < 1e-9);
/// ```
pub fn rescale(seconds: f64, unit: &str) -> Result<Rescaled> {
    let spec: UnitSpec = unit.parse()?;
    Ok(spec.rescale(seconds))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(clippy::float_cmp, reason = "exact values are expected in these tests")]

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Unit: Send, Sync, Copy);
    assert_impl_all!(UnitSpec: Send, Sync, Copy);
    assert_impl_all!(Rescaled: Send, Sync, Copy);

    const ALL_NAMES: [&str; 7] = ["ns", "us", "ms", "s", "min", "h", "d"];

    #[test]
    fn no_rescaling_in_seconds() {
        let rescaled = rescale(6.0, "s").unwrap();

        assert_eq!(rescaled.value(), 6.0);
        assert_eq!(rescaled.unit(), Unit::Seconds);
    }

    #[test]
    fn explicit_unit_divides_by_scale() {
        let rescaled = rescale(6.0, "ms").unwrap();
        assert_eq!(rescaled.value(), 6000.0);
        assert_eq!(rescaled.unit(), Unit::Milliseconds);

        let rescaled = rescale(6.0, "min").unwrap();
        assert_eq!(rescaled.value(), 0.1);
        assert_eq!(rescaled.unit(), Unit::Minutes);
    }

    #[test]
    fn explicit_unit_is_kept() {
        for name in ALL_NAMES {
            for seconds in [0.002, 2.0, 2000.0] {
                let rescaled = rescale(seconds, name).unwrap();

                assert_eq!(rescaled.unit().name(), name);
                assert_eq!(rescaled.value(), seconds / rescaled.unit().seconds());
            }
        }
    }

    #[test]
    fn auto_format() {
        let rescaled = rescale(6.0, "a").unwrap();
        assert_eq!(rescaled.value(), 6.0);
        assert_eq!(rescaled.unit(), Unit::Seconds);

        let rescaled = rescale(0.006, "auto").unwrap();
        assert!((rescaled.value() - 6.0).abs() < 1e-9);
        assert_eq!(rescaled.unit(), Unit::Milliseconds);

        let rescaled = rescale(6000.0, "AUTO").unwrap();
        assert_eq!(rescaled.value(), 100.0);
        assert_eq!(rescaled.unit(), Unit::Minutes);
    }

    #[test]
    fn auto_bounds_are_exclusive() {
        assert_eq!(Unit::auto(1e-6), Unit::Microseconds);
        assert_eq!(Unit::auto(1e-3), Unit::Milliseconds);
        assert_eq!(Unit::auto(1.0), Unit::Seconds);
        assert_eq!(Unit::auto(1e3), Unit::Minutes);
        assert_eq!(Unit::auto(6e4), Unit::Hours);
        assert_eq!(Unit::auto(3.6e6), Unit::Days);
    }

    #[test]
    fn auto_just_below_bounds() {
        assert_eq!(Unit::auto(0.0), Unit::Nanoseconds);
        assert_eq!(Unit::auto(9.99e-7), Unit::Nanoseconds);
        assert_eq!(Unit::auto(0.999), Unit::Milliseconds);
        assert_eq!(Unit::auto(3599.0), Unit::Minutes);
        assert_eq!(Unit::auto(3_599_999.0), Unit::Hours);
    }

    #[test]
    fn auto_accepts_huge_durations() {
        assert_eq!(Unit::auto(1e12), Unit::Days);
        assert_eq!(Unit::auto(f64::INFINITY), Unit::Days);
    }

    #[test]
    fn table_bounds_strictly_increase() {
        let bounds = Unit::all().map(Unit::auto_bound).collect::<Vec<_>>();

        assert_eq!(bounds.len(), ALL_NAMES.len());
        assert_eq!(bounds.last(), Some(&None));

        let finite = bounds.iter().flatten().copied().collect::<Vec<_>>();
        assert_eq!(finite.len(), ALL_NAMES.len() - 1);

        for pair in finite.windows(2) {
            assert!(pair[0] < pair[1], "bounds {pair:?} are not increasing");
        }
    }

    #[test]
    fn table_order_matches_names() {
        let names = Unit::all().map(Unit::name).collect::<Vec<_>>();
        assert_eq!(names, ALL_NAMES);
    }

    #[test]
    fn parsing_ignores_case_and_whitespace() {
        assert_eq!(" MS ".parse::<Unit>().unwrap(), Unit::Milliseconds);
        assert_eq!("Min".parse::<Unit>().unwrap(), Unit::Minutes);
        assert_eq!("\tA\n".parse::<UnitSpec>().unwrap(), UnitSpec::Auto);
        assert_eq!(
            "H".parse::<UnitSpec>().unwrap(),
            UnitSpec::Fixed(Unit::Hours)
        );
    }

    #[test]
    fn auto_is_not_a_unit() {
        assert!("auto".parse::<Unit>().is_err());
    }

    #[test]
    fn wrong_unit() {
        let error = rescale(0.5, "lustrum").unwrap_err();

        assert!(matches!(&error, Error::InvalidUnit { unit } if unit == "lustrum"));

        let message = error.to_string();
        assert!(message.contains("ns, us, ms, s, min, h, d"), "{message}");
        assert!(message.contains("'auto'"), "{message}");
    }

    #[test]
    fn spec_display_round_trips_names() {
        assert_eq!(UnitSpec::Auto.to_string(), "auto");
        assert_eq!(UnitSpec::Fixed(Unit::Days).to_string(), "d");
        assert_eq!(UnitSpec::from(Unit::Microseconds).to_string(), "us");
    }

    #[test]
    fn rescaled_display_uses_precision() {
        let rescaled = rescale(0.12, "auto").unwrap();

        assert_eq!(rescaled.to_string(), "120 ms");
        assert_eq!(format!("{rescaled:.2}"), "1.2e+02 ms");

        let rescaled = rescale(21.0, "ms").unwrap();
        assert_eq!(rescaled.to_string(), "2.1e+04 ms");
    }
}
