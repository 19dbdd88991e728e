//! Measurement of individual function calls.

use std::any::type_name;
use std::borrow::Cow;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use tracing::trace;

use crate::clock::Clock;
use crate::format::{DEFAULT_PRECISION, measurement_line};
#[cfg(test)]
use crate::pal::PlatformFacade;
use crate::sink::emit;
use crate::{Error, Sink, UnitSpec};

/// A function that can be invoked with its arguments packed into a tuple.
///
/// Implemented for every `FnMut` with up to eight arguments, which lets [`TimedFn`] wrap
/// functions of any of these arities behind a single [`call()`](TimedFn::call) method.
pub trait Callable<Args> {
    /// The return type of the function.
    type Output;

    /// Invokes the function with the given arguments.
    fn invoke(&mut self, args: Args) -> Self::Output;
}

macro_rules! impl_callable {
    ($($arg:ident),*) => {
        impl<Func, Ret, $($arg),*> Callable<($($arg,)*)> for Func
        where
            Func: FnMut($($arg),*) -> Ret,
        {
            type Output = Ret;

            #[allow(non_snake_case, reason = "argument names come from the type parameters")]
            fn invoke(&mut self, ($($arg,)*): ($($arg,)*)) -> Ret {
                self($($arg),*)
            }
        }
    };
}

impl_callable!();
impl_callable!(A1);
impl_callable!(A1, A2);
impl_callable!(A1, A2, A3);
impl_callable!(A1, A2, A3, A4);
impl_callable!(A1, A2, A3, A4, A5);
impl_callable!(A1, A2, A3, A4, A5, A6);
impl_callable!(A1, A2, A3, A4, A5, A6, A7);
impl_callable!(A1, A2, A3, A4, A5, A6, A7, A8);

/// Wraps a function so that every call to it is measured.
///
/// Each call through [`call()`](Self::call) measures the time until the function returns (or
/// panics), stores it as the wrapper's [`interval()`](Self::interval), writes
/// `"{label}{value} {unit}"` to the sink and then hands back the function's return value
/// unchanged. A panicking call is reported with `" (failed)"` appended and the panic is resumed
/// with its original payload.
///
/// The wrapper carries the identity of the wrapped function: its
/// [`function_name()`](Self::function_name), derived from the function's path unless set via
/// [`name()`](Self::name), and optional [`documentation()`](Self::documentation) text. Unless
/// a label is configured, the label is the name followed by `": "`.
///
/// `interval()` reflects only the most recent call.
///
/// # Examples
///
/// ```
/// use how_long::timed;
///
/// fn add(a: u32, b: u32) -> u32 {
///     a + b
/// }
///
/// let mut add = timed!(add).silent();
///
/// assert_eq!(add.call((2, 3)), 5);
/// assert_eq!(add.function_name(), "add");
/// assert!(add.interval().is_ok());
/// ```
pub struct TimedFn<F> {
    f: F,

    name: String,
    doc: Option<String>,

    label: Option<String>,
    unit: UnitSpec,
    sink: Option<Sink>,
    precision: usize,

    clock: Clock,
    interval: Option<Duration>,
}

impl<F> TimedFn<F> {
    /// Wraps `f` with the default configuration: label derived from the function name,
    /// automatic unit selection, output to stdout and three significant digits.
    #[must_use]
    pub fn new(f: F) -> Self {
        Self::with_clock(f, Clock::new())
    }

    #[cfg(test)]
    pub(crate) fn with_platform(f: F, platform: PlatformFacade) -> Self {
        Self::with_clock(f, Clock::from_pal(platform))
    }

    fn with_clock(f: F, clock: Clock) -> Self {
        Self {
            f,
            name: function_name::<F>(),
            doc: None,
            label: None,
            unit: UnitSpec::Auto,
            sink: Some(Sink::stdout()),
            precision: DEFAULT_PRECISION,
            clock,
            interval: None,
        }
    }

    /// Overrides the name of the wrapped function.
    ///
    /// Closures have no useful name of their own, so naming them is recommended.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Attaches documentation text to the wrapped function.
    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Sets the text written in front of the measured value, replacing the default
    /// `"{name}: "`.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the unit the measured value is displayed in.
    #[must_use]
    pub fn unit(mut self, unit: UnitSpec) -> Self {
        self.unit = unit;
        self
    }

    /// Sets the sink each call's measurement is written to.
    #[must_use]
    pub fn sink(mut self, sink: Sink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Disables output. The last call's interval remains available via
    /// [`interval()`](Self::interval).
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

    /// The name of the wrapped function.
    #[must_use]
    pub fn function_name(&self) -> &str {
        &self.name
    }

    /// The documentation text attached to the wrapped function, if any.
    #[must_use]
    pub fn documentation(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// The duration of the most recent call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotStarted`] if the function has not been called yet.
    pub fn interval(&self) -> crate::Result<Duration> {
        self.interval.ok_or(Error::NotStarted)
    }

    /// Unwraps the measured function.
    #[must_use]
    pub fn into_inner(self) -> F {
        self.f
    }

    /// Calls the wrapped function with `args` packed into a tuple (`()` for no arguments,
    /// `(x,)` for one) and returns its return value.
    ///
    /// If the function panics, the measurement is reported as failed and the panic is resumed.
    pub fn call<Args>(&mut self, args: Args) -> <F as Callable<Args>>::Output
    where
        F: Callable<Args>,
    {
        let start = self.clock.now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.f.invoke(args)));
        self.record(start, outcome.is_err());

        match outcome {
            Ok(value) => value,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    /// Calls a wrapped fallible function and returns its result unchanged.
    ///
    /// An `Err` result is reported as a failed call, the same as a panic.
    ///
    /// # Errors
    ///
    /// Returns whatever error the wrapped function returns.
    pub fn try_call<Args, T, E>(&mut self, args: Args) -> Result<T, E>
    where
        F: Callable<Args, Output = Result<T, E>>,
    {
        let start = self.clock.now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.f.invoke(args)));

        let failed = !matches!(outcome, Ok(Ok(_)));
        self.record(start, failed);

        match outcome {
            Ok(result) => result,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    fn record(&mut self, start: Instant, failed: bool) {
        let interval = self.clock.elapsed_since(start);
        self.interval = Some(interval);
        trace!(function = %self.name, ?interval, failed, "timed call completed");

        emit(self.sink.as_ref(), || {
            let label = self
                .label
                .as_deref()
                .map_or_else(|| Cow::Owned(format!("{}: ", self.name)), Cow::Borrowed);
            let rescaled = self.unit.rescale(interval.as_secs_f64());
            measurement_line(&label, rescaled, self.precision, failed)
        });
    }
}

impl<F> fmt::Debug for TimedFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimedFn")
            .field("name", &self.name)
            .field("doc", &self.doc)
            .field("label", &self.label)
            .field("unit", &self.unit)
            .field("sink", &self.sink)
            .field("precision", &self.precision)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

/// The last path segment of a function's type name, ignoring everything inside angle brackets.
///
/// For `fn` items this is the function's identifier, also for associated functions whose path
/// contains generic arguments or a qualified `<T as Trait>` segment. Closures have
/// compiler-generated type names and are reported as `"closure"`.
fn function_name<F>() -> String {
    let mut depth = 0_usize;

    let outer_path = type_name::<F>()
        .chars()
        .filter(|c| match c {
            '<' => {
                depth = depth.saturating_add(1);
                false
            }
            '>' => {
                depth = depth.saturating_sub(1);
                false
            }
            _ => depth == 0,
        })
        .collect::<String>();

    let last = outer_path.rsplit("::").next().unwrap_or_default();

    if last.starts_with('{') {
        "closure".to_string()
    } else {
        last.to_string()
    }
}

/// Wraps a function in a [`TimedFn`] named after the given identifier.
///
/// An optional second argument supplies the documentation text.
///
/// # Examples
///
/// ```
/// use how_long::timed;
///
/// fn parse(input: &str) -> usize {
///     input.len()
/// }
///
/// let parse = timed!(parse, "Parses the input.").silent();
///
/// assert_eq!(parse.function_name(), "parse");
/// assert_eq!(parse.documentation(), Some("Parses the input."));
/// ```
#[macro_export]
macro_rules! timed {
    ($f:path) => {
        $crate::TimedFn::new($f).name(::core::stringify!($f))
    };
    ($f:path, $doc:expr) => {
        $crate::TimedFn::new($f)
            .name(::core::stringify!($f))
            .doc($doc)
    };
}
