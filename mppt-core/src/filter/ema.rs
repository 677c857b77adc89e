//! Exponential moving average filter
//!
//! Recursive form `avg' = (1 - alpha) * avg + alpha * sample`, so no window
//! is needed at all. Alpha near 1 tracks fast and filters little; alpha near
//! 0 is sluggish and smooth.

use super::SampleFilter;

/// Exponentially weighted average with fixed alpha
#[derive(Debug, Clone)]
pub struct Ema {
    avg: f32,
    alpha: f32,
    initial: f32,
}

impl Ema {
    /// New filter starting from 0.0
    ///
    /// `alpha` is clamped into `[0, 1]`.
    pub fn new(alpha: f32) -> Self {
        Self::with_initial(alpha, 0.0)
    }

    /// New filter starting from `initial`
    ///
    /// A starting guess near the expected operating point (say the array's
    /// nominal open-circuit voltage) shortens the settle-in transient.
    pub fn with_initial(alpha: f32, initial: f32) -> Self {
        Self {
            avg: initial,
            alpha: alpha.clamp(0.0, 1.0),
            initial,
        }
    }
}

impl SampleFilter for Ema {
    fn add_sample(&mut self, sample: f32) {
        self.avg = (1.0 - self.alpha) * self.avg + self.alpha * sample;
    }

    fn value(&self) -> f32 {
        self.avg
    }

    fn clear(&mut self) {
        self.avg = self.initial;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_initial_value() {
        assert_eq!(Ema::new(0.5).value(), 0.0);
        assert_eq!(Ema::with_initial(0.5, 85.0).value(), 85.0);
    }

    #[test]
    fn converges_monotonically_to_constant_input() {
        for alpha in [0.05, 0.2, 0.9] {
            let mut filter = Ema::new(alpha);
            let target = 60.0;

            let mut prev_gap = target;
            for _ in 0..200 {
                filter.add_sample(target);
                let gap = target - filter.value();
                assert!(gap >= 0.0);
                assert!(gap <= prev_gap, "gap grew at alpha {alpha}");
                prev_gap = gap;
            }
            // 200 steps at alpha 0.05 leaves 60 * 0.95^200, about 2e-3.
            assert!(prev_gap < 1e-2, "did not converge at alpha {alpha}");
        }
    }

    #[test]
    fn alpha_extremes() {
        // alpha = 1: pure passthrough
        let mut fast = Ema::new(1.0);
        fast.add_sample(10.0);
        fast.add_sample(-4.0);
        assert_eq!(fast.value(), -4.0);

        // alpha = 0: frozen at the initial value
        let mut frozen = Ema::with_initial(0.0, 3.0);
        frozen.add_sample(100.0);
        assert_eq!(frozen.value(), 3.0);
    }

    #[test]
    fn clear_restores_initial() {
        let mut filter = Ema::with_initial(0.3, 12.0);
        filter.add_sample(50.0);
        filter.clear();
        assert_eq!(filter.value(), 12.0);
    }
}
