//! Demonstrates the three ways `how_long` measures wall-clock time.
//!
//! - `Timing`: measures a block of code
//! - `TimedFn`: measures every call to a function
//! - `TimedSequence`: measures the steps of a loop and summarizes them
//!
//! Run with: `cargo run --example how_long_basic`.

use std::hint::black_box;
use std::thread;
use std::time::Duration;

use how_long::{Sink, TimedIteratorExt, Timing, Unit, UnitSpec, timed};

/// Pretends to load a file of the given size.
fn load(bytes: u64) -> u64 {
    thread::sleep(Duration::from_micros(bytes));
    bytes
}

fn main() {
    println!("=== Block ===");

    let mut timing = Timing::new().label("Preparing data: ");
    let data = timing.measure(|| (0..100_000_u64).map(|x| x.wrapping_mul(x)).collect::<Vec<_>>());
    black_box(&data);

    let mut fixed = Timing::new()
        .label("Same work in seconds: ")
        .unit(UnitSpec::Fixed(Unit::Seconds))
        .precision(5);
    fixed.measure(|| black_box(data.iter().sum::<u64>()));
    println!();

    println!("=== Function calls ===");

    let mut load = timed!(load, "Pretends to load a file of the given size.");
    for size in [100, 1_000, 10_000] {
        black_box(load.call((size,)));
    }
    println!(
        "{} is documented as: {}",
        load.function_name(),
        load.documentation().unwrap_or_default()
    );
    println!();

    println!("=== Loop ===");

    for size in [2_000, 500, 1_000, 1_500].timed() {
        thread::sleep(Duration::from_micros(size));
    }
    println!();

    println!("=== Loop with summary via tracing ===");

    // Without an installed subscriber the summary is discarded.
    for size in [200, 400].timed().summary_sink(Sink::tracing()) {
        thread::sleep(Duration::from_micros(size));
    }
}
