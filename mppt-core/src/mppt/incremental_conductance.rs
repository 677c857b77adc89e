//! Incremental Conductance strategy
//!
//! Compares the array's incremental conductance dI/dV against its
//! instantaneous conductance -I/V. At the MPP dP/dV = 0, which rearranges
//! to dI/dV = -I/V, so the sign of the discriminant
//!
//! ```text
//! d = ΔI·V + I·ΔV
//! ```
//!
//! tells which side of the MPP the operating point sits on:
//!
//! ```text
//! |d| < error  →  at the MPP, hold
//!  d  > error  →  left of the MPP, reference += stride
//!  d  < -error →  right of the MPP, reference -= stride
//! ```
//!
//! Unlike P&O, IC can recognize the MPP and stop perturbing, so it does not
//! oscillate in steady state; the tolerance band sets how close "at the
//! MPP" has to be.
//!
//! Based on Bhaskar & Lokanadham, "Incremental Conductance Based Maximum
//! Power Point Tracking (MPPT) for Photovoltaic System", section 5.

use libm::fabsf;

use crate::measurement::Measurements;

use super::{MpptAlgorithm, DEFAULT_STRIDE};

/// Default tolerance band around the MPP condition
pub const DEFAULT_ERROR: f32 = 0.01;

/// Incremental Conductance with fixed stride and tolerance
#[derive(Debug, Clone)]
pub struct IncrementalConductance {
    reference_voltage: f32,
    stride: f32,
    error: f32,

    ctx: Measurements,
    prev_array_voltage: f32,
    prev_array_current: f32,
}

impl IncrementalConductance {
    /// New strategy with the given stride (volts) and tolerance band
    pub fn new(stride: f32, error: f32) -> Self {
        Self {
            reference_voltage: 0.0,
            stride,
            error,
            ctx: Measurements::default(),
            prev_array_voltage: 0.0,
            prev_array_current: 0.0,
        }
    }
}

impl Default for IncrementalConductance {
    fn default() -> Self {
        Self::new(DEFAULT_STRIDE, DEFAULT_ERROR)
    }
}

impl MpptAlgorithm for IncrementalConductance {
    fn input_context(&mut self, ctx: Measurements) {
        self.ctx = ctx;
    }

    fn step_algorithm(&mut self) {
        let voltage = self.ctx.array_voltage;
        let current = self.ctx.array_current;

        let delta_current = current - self.prev_array_current;
        let delta_voltage = voltage - self.prev_array_voltage;

        let discriminant = delta_current * voltage + current * delta_voltage;

        if fabsf(discriminant) < self.error {
            // At the MPP: hold.
        } else if discriminant > self.error {
            // Left of the MPP.
            self.reference_voltage += self.stride;
        } else {
            // Right of the MPP.
            self.reference_voltage -= self.stride;
        }

        // Stash for the next step.
        self.prev_array_voltage = voltage;
        self.prev_array_current = current;
    }

    fn reference(&self) -> f32 {
        self.reference_voltage
    }

    fn reset_state(&mut self) {
        self.reference_voltage = 0.0;
        self.ctx = Measurements::default();
        self.prev_array_voltage = 0.0;
        self.prev_array_current = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(v: f32, i: f32) -> Measurements {
        Measurements::new(v, i, 96.0, 3.0)
    }

    /// Step once so prev_* hold a known operating point.
    fn primed(v: f32, i: f32) -> IncrementalConductance {
        let mut s = IncrementalConductance::default();
        s.input_context(ctx(v, i));
        s.step_algorithm();
        s
    }

    #[test]
    fn within_tolerance_holds() {
        let mut s = primed(30.0, 5.0);
        let before = s.reference();

        // ΔI = 0, ΔV = 0 → discriminant 0, inside the band.
        s.input_context(ctx(30.0, 5.0));
        s.step_algorithm();
        assert_eq!(s.reference(), before);
    }

    #[test]
    fn left_of_mpp_steps_up() {
        let mut s = primed(30.0, 5.0);
        let before = s.reference();

        // ΔV = +1, ΔI small negative: d = -0.01·31 + 4.99·1 = +4.68
        s.input_context(ctx(31.0, 4.99));
        s.step_algorithm();
        assert_eq!(s.reference(), before + DEFAULT_STRIDE);
    }

    #[test]
    fn right_of_mpp_steps_down() {
        let mut s = primed(30.0, 5.0);
        let before = s.reference();

        // ΔV = +1, ΔI strongly negative: d = -1·31 + 4·1 = -27
        s.input_context(ctx(31.0, 4.0));
        s.step_algorithm();
        assert_eq!(s.reference(), before - DEFAULT_STRIDE);
    }

    #[test]
    fn tolerance_band_is_symmetric() {
        // Discriminant just inside either edge of the band holds.
        for di in [0.0001f32, -0.0001f32] {
            let mut s = primed(1.0, 0.0);
            let before = s.reference();

            // V = 1, I' = di → d = di·1 + di·0 = di
            s.input_context(ctx(1.0, di));
            s.step_algorithm();
            assert_eq!(s.reference(), before, "di = {di}");
        }
    }

    #[test]
    fn reset_zeroes_everything() {
        let mut s = primed(30.0, 5.0);

        // Second step in the same direction: d = 0*31 + 5*1 = +5, so the
        // reference sits two strides up and cannot cancel back to zero.
        s.input_context(ctx(31.0, 5.0));
        s.step_algorithm();
        assert_ne!(s.reference(), 0.0);

        s.reset_state();
        assert_eq!(s.reference(), 0.0);

        let mut fresh = IncrementalConductance::default();
        s.input_context(ctx(30.0, 5.0));
        fresh.input_context(ctx(30.0, 5.0));
        s.step_algorithm();
        fresh.step_algorithm();
        assert_eq!(s.reference(), fresh.reference());
    }
}
