//! Perturb & Observe strategy
//!
//! The classic hill climber. Each step compares the change in array power
//! against the change in array voltage since the previous step and keeps
//! moving in whichever direction last increased power:
//!
//! ```text
//! ΔP > 0, ΔV > 0  →  reference += stride   (climbing the left slope)
//! ΔP > 0, ΔV < 0  →  reference -= stride   (climbing the right slope)
//! ΔP ≤ 0, ΔV > 0  →  reference -= stride   (overshot to the right)
//! ΔP ≤ 0, ΔV < 0  →  reference += stride   (overshot to the left)
//! ΔV = 0          →  hold
//! ```
//!
//! At the MPP the reference oscillates within one stride of the optimum,
//! which is the known cost of fixed-stride P&O.

use crate::measurement::Measurements;

use super::MpptAlgorithm;

/// Fixed-stride Perturb & Observe
#[derive(Debug, Clone)]
pub struct PerturbObserve {
    reference_voltage: f32,
    stride: f32,

    ctx: Measurements,
    prev_array_voltage: f32,
    prev_array_power: f32,
}

impl PerturbObserve {
    /// New strategy with the given perturbation stride, volts
    pub fn new(stride: f32) -> Self {
        Self {
            reference_voltage: 0.0,
            stride,
            ctx: Measurements::default(),
            prev_array_voltage: 0.0,
            prev_array_power: 0.0,
        }
    }
}

impl MpptAlgorithm for PerturbObserve {
    fn input_context(&mut self, ctx: Measurements) {
        self.ctx = ctx;
    }

    fn step_algorithm(&mut self) {
        let array_power = self.ctx.array_power();

        let delta_voltage = self.ctx.array_voltage - self.prev_array_voltage;
        let delta_power = array_power - self.prev_array_power;

        if delta_power > 0.0 {
            if delta_voltage > 0.0 {
                self.reference_voltage += self.stride;
            } else if delta_voltage < 0.0 {
                self.reference_voltage -= self.stride;
            }
        } else {
            if delta_voltage > 0.0 {
                self.reference_voltage -= self.stride;
            } else if delta_voltage < 0.0 {
                self.reference_voltage += self.stride;
            }
        }

        // Stash for the next step.
        self.prev_array_voltage = self.ctx.array_voltage;
        self.prev_array_power = array_power;
    }

    fn reference(&self) -> f32 {
        self.reference_voltage
    }

    fn reset_state(&mut self) {
        self.reference_voltage = 0.0;
        self.ctx = Measurements::default();
        self.prev_array_voltage = 0.0;
        self.prev_array_power = 0.0;
    }
}
