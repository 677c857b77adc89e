//! Fuzzy logic strategy
//!
//! A two-input rule-table controller after Takun et al. The inputs are the
//! percentage change in array power (relative to the plant's rated maximum
//! power) and the percentage change in array current (relative to the rated
//! maximum current). Each input is classified into a membership bucket, the
//! bucket pair indexes a fixed rule table, and the selected output term is
//! the voltage delta applied to the reference.
//!
//! Power membership (5 terms):
//!
//! ```text
//! NB ≤ -10%   NS (-10, -3]   ZE (-3, 3)   PS [3, 10)   PB ≥ 10%
//! ```
//!
//! Current membership (3 terms): `N ≤ -1%`, `Z (-1, 1)`, `P ≥ 1%`.
//!
//! Rule table (rows = ΔI bucket, columns = ΔP bucket), entries indexing the
//! output set `[-4%, -2%, +1%, +2%, +4%]` of reference voltage:
//!
//! ```text
//!           NB  NS  ZE  PS  PB
//!      N  [ -2, -2, -2, +2, +4 ]
//!      Z  [ +2, +2, +1, +2, +4 ]
//!      P  [ +4, +2, +2, -2, -2 ]
//! ```
//!
//! This amounts to an adaptive hill climber: the bucket pair encodes both
//! the direction of the last move and how much it paid off, and the output
//! term scales the stride accordingly. The very first step has no previous
//! power or current to difference against, so it forces the reference to
//! zero without consulting the table.

use crate::measurement::Measurements;

use super::MpptAlgorithm;

/// Power membership terms
const POWER_BUCKETS: usize = 5;
/// Current membership terms
const CURRENT_BUCKETS: usize = 3;

/// Output term indices, row-column major on (current bucket, power bucket)
const RULES: [[usize; POWER_BUCKETS]; CURRENT_BUCKETS] = [
    [1, 1, 1, 3, 4],
    [3, 3, 2, 3, 4],
    [4, 3, 3, 1, 1],
];

/// Output terms: reference voltage delta, volts
const OUTPUT: [f32; 5] = [-0.04, -0.02, 0.01, 0.02, 0.04];

/// Default rated array power the percentage power input is normalized
/// against, W
pub const DEFAULT_MAX_POWER: f32 = 400.0;

/// Default rated array current the percentage current input is normalized
/// against, A
pub const DEFAULT_MAX_CURRENT: f32 = 8.0;

/// Rule-table fuzzy MPPT controller
#[derive(Debug, Clone)]
pub struct Fuzzy {
    reference_voltage: f32,
    max_power: f32,
    max_current: f32,

    ctx: Measurements,
    started: bool,
    prev_array_power: f32,
    prev_array_current: f32,
}

impl Fuzzy {
    /// New controller normalized against the given plant ratings
    pub fn new(max_power: f32, max_current: f32) -> Self {
        Self {
            reference_voltage: 0.0,
            max_power,
            max_current,
            ctx: Measurements::default(),
            started: false,
            prev_array_power: 0.0,
            prev_array_current: 0.0,
        }
    }

    /// Classify the percentage power change into its membership bucket
    fn power_bucket(delta_percent: f32) -> usize {
        if delta_percent <= -10.0 {
            0 // NB
        } else if delta_percent <= -3.0 {
            1 // NS
        } else if delta_percent < 3.0 {
            2 // ZE
        } else if delta_percent < 10.0 {
            3 // PS
        } else {
            4 // PB
        }
    }

    /// Classify the percentage current change into its membership bucket
    fn current_bucket(delta_percent: f32) -> usize {
        if delta_percent <= -1.0 {
            0 // N
        } else if delta_percent < 1.0 {
            1 // Z
        } else {
            2 // P
        }
    }
}

impl Default for Fuzzy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_POWER, DEFAULT_MAX_CURRENT)
    }
}

impl MpptAlgorithm for Fuzzy {
    fn input_context(&mut self, ctx: Measurements) {
        self.ctx = ctx;
    }

    fn step_algorithm(&mut self) {
        let array_power = self.ctx.array_power();
        let array_current = self.ctx.array_current;

        if !self.started {
            // No valid previous point exists; the rule table would be fed
            // garbage deltas, so the first step just plants the reference.
            self.reference_voltage = 0.0;
            self.started = true;
        } else {
            let delta_power = array_power - self.prev_array_power;
            let delta_current = array_current - self.prev_array_current;

            let power_percent = delta_power * 100.0 / self.max_power;
            let current_percent = delta_current * 100.0 / self.max_current;

            let pi = Self::power_bucket(power_percent);
            let ci = Self::current_bucket(current_percent);

            self.reference_voltage += OUTPUT[RULES[ci][pi]];
        }

        self.prev_array_power = array_power;
        self.prev_array_current = array_current;
    }

    fn reference(&self) -> f32 {
        self.reference_voltage
    }

    fn reset_state(&mut self) {
        self.reference_voltage = 0.0;
        self.ctx = Measurements::default();
        self.started = false;
        self.prev_array_power = 0.0;
        self.prev_array_current = 0.0;
    }
}
