//! Rendering of measured values for display.

use crate::Rescaled;

/// Number of significant digits shown when the caller does not choose a precision.
pub(crate) const DEFAULT_PRECISION: usize = 3;

/// Renders `value` with `precision` significant digits in general notation.
///
/// Values whose decimal exponent lies in `-4..precision` are written in fixed notation,
/// everything else in scientific notation with a signed exponent of at least two digits.
/// Trailing zeros after the decimal point are dropped in both forms, as is a dangling point.
///
/// A precision of zero is treated as one.
pub(crate) fn format_significant(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }

    if value.is_infinite() {
        let text = if value.is_sign_negative() { "-inf" } else { "inf" };
        return text.to_string();
    }

    let precision = precision.max(1);

    // Rounding to the requested digit count may carry into the next decade (9.996 -> 10.0),
    // so the exponent is read back from the rounded scientific rendering.
    let fraction_digits = precision.saturating_sub(1);
    let scientific = format!("{value:.fraction_digits$e}");
    let (mantissa, exponent) = scientific
        .split_once('e')
        .expect("scientific notation always contains an exponent marker");
    let exponent: i32 = exponent
        .parse()
        .expect("the exponent of scientific notation is always an integer");

    let precision = i32::try_from(precision).unwrap_or(i32::MAX);

    if exponent < -4 || exponent >= precision {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            trim_fraction(mantissa),
            exponent.unsigned_abs()
        )
    } else {
        // Cannot be negative: exponent < precision in this branch.
        let decimals = usize::try_from(precision.saturating_sub(1).saturating_sub(exponent))
            .unwrap_or_default();
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// The line emitted for a single measured interval: `"{label}{value} {unit}"`, with
/// `" (failed)"` appended when the measured code failed.
pub(crate) fn measurement_line(
    label: &str,
    rescaled: Rescaled,
    precision: usize,
    failed: bool,
) -> String {
    let mut line = format!("{label}{rescaled:.precision$}");

    if failed {
        line.push_str(" (failed)");
    }

    line
}
