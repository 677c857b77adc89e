//! Scalar Kalman filter
//!
//! One-dimensional, constant-state form (no velocity model): each sample
//! runs a single gain/update/predict cycle.
//!
//! ```text
//! gain:     K  = Eu / (Eu + Mu)
//! update:   x += K * (sample - x)
//!           Eu = (1 - K) * Eu
//! predict:  Eu += Q
//! ```
//!
//! The estimate uncertainty `Eu` shrinks with every measurement and is
//! re-inflated by the process noise `Q` for the next prediction, so the
//! gain settles at a fixed point instead of decaying to zero; the filter
//! keeps tracking a slowly moving operating point forever.

use super::SampleFilter;

/// One-dimensional Kalman estimator
#[derive(Debug, Clone)]
pub struct Kalman {
    /// Current state estimate
    estimate: f32,
    /// Estimate uncertainty variance, evolves every sample
    estimate_uncertainty: f32,
    /// Measurement uncertainty variance, fixed (sensor datasheet figure)
    measurement_uncertainty: f32,
    /// Process noise variance, fixed (model confidence, ~0.001..0.15)
    process_noise: f32,

    /// Construction-time values for `clear`
    initial_estimate: f32,
    initial_uncertainty: f32,
}

impl Kalman {
    /// Stock tuning: generous initial uncertainty, moderate sensor noise
    ///
    /// Matches a bench-calibrated starting point of 10.0 with variance 225,
    /// measurement variance 25 and process noise 0.15. Channels with a
    /// known operating point should use [`Kalman::new`] with a better
    /// initial guess.
    pub const fn default_tuning() -> Self {
        Self::new(10.0, 225.0, 25.0, 0.15)
    }

    /// New filter from explicit tuning
    ///
    /// - `initial_estimate`: best guess of the true value before any sample
    /// - `estimate_uncertainty`: variance of that guess
    /// - `measurement_uncertainty`: variance of a single sensor reading
    /// - `process_noise`: how much the true value may wander between samples
    pub const fn new(
        initial_estimate: f32,
        estimate_uncertainty: f32,
        measurement_uncertainty: f32,
        process_noise: f32,
    ) -> Self {
        Self {
            estimate: initial_estimate,
            estimate_uncertainty,
            measurement_uncertainty,
            process_noise,
            initial_estimate,
            initial_uncertainty: estimate_uncertainty,
        }
    }
}

impl SampleFilter for Kalman {
    fn add_sample(&mut self, sample: f32) {
        let eu = self.estimate_uncertainty;
        let gain = eu / (eu + self.measurement_uncertainty);

        self.estimate += gain * (sample - self.estimate);
        self.estimate_uncertainty = (1.0 - gain) * eu + self.process_noise;
    }

    fn value(&self) -> f32 {
        self.estimate
    }

    fn clear(&mut self) {
        self.estimate = self.initial_estimate;
        self.estimate_uncertainty = self.initial_uncertainty;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_initial_estimate_before_samples() {
        let filter = Kalman::new(85.0, 100.0, 25.0, 0.1);
        assert_eq!(filter.value(), 85.0);
    }

    #[test]
    fn converges_to_constant_input() {
        let mut filter = Kalman::default_tuning();
        for _ in 0..100 {
            filter.add_sample(50.0);
        }
        assert!((filter.value() - 50.0).abs() < 0.5);
    }

    #[test]
    fn uncertainty_settles_not_collapses() {
        let mut filter = Kalman::default_tuning();
        for _ in 0..500 {
            filter.add_sample(20.0);
        }
        // Process noise keeps the gain alive: a step input still moves it.
        let settled = filter.value();
        filter.add_sample(30.0);
        assert!(filter.value() > settled);
    }

    #[test]
    fn smooths_impulse_noise() {
        let mut filter = Kalman::new(13.0, 25.0, 25.0, 0.05);
        for i in 0..50 {
            let sample = if i % 10 == 0 { 100.0 } else { 13.0 };
            filter.add_sample(sample);
        }
        // The spikes pull the estimate up a little but nowhere near 100.
        assert!(filter.value() < 30.0);
    }

    #[test]
    fn clear_restores_tuning() {
        let mut filter = Kalman::new(85.0, 100.0, 25.0, 0.1);
        for _ in 0..20 {
            filter.add_sample(10.0);
        }
        filter.clear();
        assert_eq!(filter.value(), 85.0);
    }
}
