//! MPPT Strategies for Stepping the Array Reference Voltage
//!
//! ## Overview
//!
//! A photovoltaic array has one operating point that maximizes output power
//! for the current irradiance and temperature, the maximum power point
//! (MPP). The converter cannot measure the MPP directly; it can only move
//! the array's operating voltage and watch what the power does. An MPPT
//! strategy is the piece that turns that observation into motion: once per
//! step it nudges a single number, the reference voltage, which the PID
//! regulator then chases by adjusting duty cycle.
//!
//! ## The P-V curve
//!
//! ```text
//! P │        .-·-.
//!   │      ./     \        power rises with voltage left of the MPP,
//!   │    ./        │       falls right of it; the strategies differ in
//!   │  ./          │       how they sense which side they are on.
//!   │ /            │
//!   └───────────────────► V
//!            ↑ MPP
//! ```
//!
//! ## Contract
//!
//! Every strategy implements [`MpptAlgorithm`]:
//!
//! - `input_context` supplies the latest filtered measurement vector
//! - `step_algorithm` advances the reference by exactly one step, using the
//!   supplied context plus the strategy's own remembered previous values
//! - `reference` reads the current reference voltage
//! - `reset_state` returns the reference and all remembered state to zero
//!
//! The supervisory loop is agnostic to which variant is active; the closed
//! [`Strategy`] enum is selected once at configuration time.

mod fuzzy;
mod incremental_conductance;
mod pando;

pub use fuzzy::Fuzzy;
pub use incremental_conductance::IncrementalConductance;
pub use pando::PerturbObserve;

use crate::measurement::Measurements;

/// Default perturbation stride, volts
pub const DEFAULT_STRIDE: f32 = 0.1;

/// Common contract for the MPPT strategy family
pub trait MpptAlgorithm {
    /// Supply the latest filtered measurement vector
    ///
    /// Called once before each `step_algorithm`; the context is not
    /// retained across steps except through each strategy's own previous
    /// value fields.
    fn input_context(&mut self, ctx: Measurements);

    /// Advance the reference voltage by one step
    fn step_algorithm(&mut self);

    /// Array voltage operating point the system should drive toward
    fn reference(&self) -> f32;

    /// Return reference and remembered state to the post-construction state
    fn reset_state(&mut self);
}

/// Closed set of MPPT strategies, selected at configuration time
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Fixed-stride hill climbing
    PerturbObserve(PerturbObserve),
    /// Conductance-comparison tracking with a hold band
    IncrementalConductance(IncrementalConductance),
    /// Rule-table adaptive stride
    Fuzzy(Fuzzy),
}

impl Strategy {
    /// Perturb & Observe with the default stride
    pub fn perturb_observe() -> Self {
        Self::PerturbObserve(PerturbObserve::new(DEFAULT_STRIDE))
    }

    /// Incremental Conductance with the default stride and tolerance
    pub fn incremental_conductance() -> Self {
        Self::IncrementalConductance(IncrementalConductance::default())
    }

    /// Fuzzy logic controller with the default plant ratings
    pub fn fuzzy() -> Self {
        Self::Fuzzy(Fuzzy::default())
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::PerturbObserve(_) => "pando",
            Self::IncrementalConductance(_) => "incremental_conductance",
            Self::Fuzzy(_) => "fuzzy",
        }
    }
}

impl MpptAlgorithm for Strategy {
    fn input_context(&mut self, ctx: Measurements) {
        match self {
            Self::PerturbObserve(s) => s.input_context(ctx),
            Self::IncrementalConductance(s) => s.input_context(ctx),
            Self::Fuzzy(s) => s.input_context(ctx),
        }
    }

    fn step_algorithm(&mut self) {
        match self {
            Self::PerturbObserve(s) => s.step_algorithm(),
            Self::IncrementalConductance(s) => s.step_algorithm(),
            Self::Fuzzy(s) => s.step_algorithm(),
        }
    }

    fn reference(&self) -> f32 {
        match self {
            Self::PerturbObserve(s) => s.reference(),
            Self::IncrementalConductance(s) => s.reference(),
            Self::Fuzzy(s) => s.reference(),
        }
    }

    fn reset_state(&mut self) {
        match self {
            Self::PerturbObserve(s) => s.reset_state(),
            Self::IncrementalConductance(s) => s.reset_state(),
            Self::Fuzzy(s) => s.reset_state(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(v: f32, i: f32) -> Measurements {
        Measurements::new(v, i, 96.0, 3.0)
    }

    #[test]
    fn all_strategies_start_at_zero_reference() {
        for strategy in [
            Strategy::perturb_observe(),
            Strategy::incremental_conductance(),
            Strategy::fuzzy(),
        ] {
            assert_eq!(strategy.reference(), 0.0, "{}", strategy.name());
        }
    }

    #[test]
    fn reset_then_step_is_deterministic() {
        // Identical inputs from identical reset state must produce the
        // identical reference delta, for every variant.
        for mut strategy in [
            Strategy::perturb_observe(),
            Strategy::incremental_conductance(),
            Strategy::fuzzy(),
        ] {
            let first = ctx(30.0, 5.0);

            strategy.input_context(first);
            strategy.step_algorithm();
            let delta_initial = strategy.reference();

            strategy.reset_state();
            assert_eq!(strategy.reference(), 0.0);

            strategy.input_context(first);
            strategy.step_algorithm();
            assert_eq!(
                strategy.reference(),
                delta_initial,
                "{} not deterministic after reset",
                strategy.name()
            );
        }
    }

    #[test]
    fn strategies_are_substitutable() {
        for mut strategy in [
            Strategy::perturb_observe(),
            Strategy::incremental_conductance(),
            Strategy::fuzzy(),
        ] {
            for step in 0..10 {
                strategy.input_context(ctx(30.0 + step as f32, 5.0));
                strategy.step_algorithm();
                assert!(strategy.reference().is_finite());
            }
        }
    }
}
