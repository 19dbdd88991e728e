//! Destinations for formatted measurement output.

use std::fmt;
use std::sync::Arc;

type SinkFn = dyn Fn(&str) + Send + Sync;

/// A destination that formatted measurement lines are written to.
///
/// Each measurement type holds an optional sink. When a measurement has no sink
/// (configured via `silent()`), nothing is formatted or written, while the measured values
/// remain available programmatically.
///
/// Sinks are cheap to clone; clones write to the same destination.
///
/// # Examples
///
/// ```
/// use std::sync::{Arc, Mutex};
///
/// use how_long::{Sink, Timing};
///
/// let lines = Arc::new(Mutex::new(Vec::new()));
/// let sink = Sink::new({
///     let lines = Arc::clone(&lines);
///     move |line: &str| lines.lock().unwrap().push(line.to_string())
/// });
///
/// Timing::new().label("work: ").sink(sink).measure(|| {
///     std::hint::black_box(40 + 2);
/// });
///
/// assert!(lines.lock().unwrap()[0].starts_with("work: "));
/// ```
#[derive(Clone)]
pub struct Sink {
    kind: SinkKind,
}

#[derive(Clone)]
enum SinkKind {
    Stdout,
    Tracing,
    Custom(Arc<SinkFn>),
}

impl Sink {
    /// A sink that prints each line to standard output. This is the default sink.
    #[must_use]
    pub fn stdout() -> Self {
        Self {
            kind: SinkKind::Stdout,
        }
    }

    /// A sink that emits each line as an `INFO` level `tracing` event.
    #[must_use]
    pub fn tracing() -> Self {
        Self {
            kind: SinkKind::Tracing,
        }
    }

    /// A sink that passes each line to the given function.
    #[must_use]
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        Self {
            kind: SinkKind::Custom(Arc::new(f)),
        }
    }

    #[cfg_attr(test, mutants::skip)] // Too difficult to test stdout output reliably - manually tested.
    pub(crate) fn write(&self, text: &str) {
        match &self.kind {
            SinkKind::Stdout => println!("{text}"),
            SinkKind::Tracing => tracing::info!("{text}"),
            SinkKind::Custom(f) => f(text),
        }
    }

    /// Whether two sinks write to the same destination.
    ///
    /// Custom sinks are the same destination only if one is a clone of the other.
    #[must_use]
    pub fn same_destination(&self, other: &Self) -> bool {
        match (&self.kind, &other.kind) {
            (SinkKind::Stdout, SinkKind::Stdout) | (SinkKind::Tracing, SinkKind::Tracing) => true,
            (SinkKind::Custom(a), SinkKind::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Default for Sink {
    fn default() -> Self {
        Self::stdout()
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            SinkKind::Stdout => "stdout",
            SinkKind::Tracing => "tracing",
            SinkKind::Custom(_) => "custom",
        };

        f.debug_struct("Sink").field("kind", &kind).finish()
    }
}

/// Writes `text` to `sink` if there is one, building the text only in that case.
pub(crate) fn emit(sink: Option<&Sink>, text: impl FnOnce() -> String) {
    if let Some(sink) = sink {
        sink.write(&text());
    }
}
