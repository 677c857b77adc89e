//! Sample Filters for Noisy Sensor Channels
//!
//! ## Overview
//!
//! Every sensor channel on the converter (array voltage/current, battery
//! voltage/current) is smoothed by exactly one filter before anyone else
//! sees the value. The redline monitor and the MPPT strategies both consume
//! the filtered stream, so the filter contract is deliberately tiny:
//!
//! - [`SampleFilter::add_sample`] folds one raw reading into the state
//! - [`SampleFilter::value`] reads the current estimate
//! - [`SampleFilter::clear`] restores the construction-time state
//!
//! `value()` is total: before any sample has been added it returns a defined
//! finite default (0.0, or the configured initial estimate for EMA/Kalman).
//! It never divides by zero and never reads past the window.
//!
//! ## Variant Selection
//!
//! The variant set is small and fixed, so the filters form a closed tagged
//! enum ([`Filter`]) rather than an open trait-object hierarchy. Any variant
//! can back any channel; the choice is made once at configuration time and
//! callers never branch on it again.
//!
//! | Variant | Behavior | Cost per sample |
//! |---|---|---|
//! | `Passthrough` | last sample wins | O(1) |
//! | `Sma` | windowed mean via running sum | O(1) |
//! | `Ema` | exponential weighting, no window | O(1) |
//! | `Median` | sort-and-pick over the window | O(1) add, O(n log n) read |
//! | `Kalman` | scalar predict/update | O(1) |
//!
//! The median's O(n log n) read is acceptable: windows are tens of samples
//! and reads happen at the slow control cadence, not the sample cadence.

mod ema;
mod kalman;
mod median;
mod sma;

pub use ema::Ema;
pub use kalman::Kalman;
pub use median::Median;
pub use sma::Sma;

/// Common contract for all sample filters
///
/// Implementations own a bounded amount of state fixed at construction and
/// mutate it only through `add_sample`. `value` must be defined (and
/// finite) even when zero samples have been added.
pub trait SampleFilter {
    /// Fold one raw sensor reading into the filter state
    fn add_sample(&mut self, sample: f32);

    /// Current filtered estimate
    fn value(&self) -> f32;

    /// Reset to the construction-time state without releasing storage
    fn clear(&mut self);
}

/// Trivial filter: reports the last sample unchanged
///
/// Useful on channels that are already clean, and as the baseline when
/// characterizing the others against real sensor traces.
#[derive(Debug, Clone, Default)]
pub struct Passthrough {
    last: f32,
}

impl Passthrough {
    /// New filter reading 0.0 until the first sample
    pub const fn new() -> Self {
        Self { last: 0.0 }
    }
}

impl SampleFilter for Passthrough {
    fn add_sample(&mut self, sample: f32) {
        self.last = sample;
    }

    fn value(&self) -> f32 {
        self.last
    }

    fn clear(&mut self) {
        self.last = 0.0;
    }
}

/// Closed set of interchangeable filters
///
/// One `Filter` instance backs one sensor channel. The window capacity `N`
/// applies to the windowed variants; `Passthrough`, `Ema` and `Kalman`
/// ignore it.
#[derive(Debug, Clone)]
pub enum Filter<const N: usize> {
    /// Last sample wins
    Passthrough(Passthrough),
    /// Simple moving average
    Sma(Sma<N>),
    /// Exponential moving average
    Ema(Ema),
    /// Windowed median
    Median(Median<N>),
    /// Scalar Kalman estimator
    Kalman(Kalman),
}

impl<const N: usize> Filter<N> {
    /// Passthrough variant
    pub const fn passthrough() -> Self {
        Self::Passthrough(Passthrough::new())
    }

    /// Simple moving average over an `N` sample window
    pub const fn sma() -> Self {
        Self::Sma(Sma::new())
    }

    /// Exponential moving average with the given weight, starting from 0.0
    pub fn ema(alpha: f32) -> Self {
        Self::Ema(Ema::new(alpha))
    }

    /// Median over an `N` sample window
    pub const fn median() -> Self {
        Self::Median(Median::new())
    }

    /// Scalar Kalman filter with the stock tuning
    pub const fn kalman() -> Self {
        Self::Kalman(Kalman::default_tuning())
    }
}

impl<const N: usize> SampleFilter for Filter<N> {
    fn add_sample(&mut self, sample: f32) {
        match self {
            Self::Passthrough(f) => f.add_sample(sample),
            Self::Sma(f) => f.add_sample(sample),
            Self::Ema(f) => f.add_sample(sample),
            Self::Median(f) => f.add_sample(sample),
            Self::Kalman(f) => f.add_sample(sample),
        }
    }

    fn value(&self) -> f32 {
        match self {
            Self::Passthrough(f) => f.value(),
            Self::Sma(f) => f.value(),
            Self::Ema(f) => f.value(),
            Self::Median(f) => f.value(),
            Self::Kalman(f) => f.value(),
        }
    }

    fn clear(&mut self) {
        match self {
            Self::Passthrough(f) => f.clear(),
            Self::Sma(f) => f.clear(),
            Self::Ema(f) => f.clear(),
            Self::Median(f) => f.clear(),
            Self::Kalman(f) => f.clear(),
        }
    }
}
