//! PID Regulator
//!
//! One reusable proportional-integral-derivative controller. In this system
//! it closes the loop between the MPPT strategy's reference voltage and the
//! converter's duty cycle, but nothing here knows about volts or duty: it
//! maps `(target, actual)` to a bounded output, and that is all.
//!
//! The integral accumulates without a windup limit, so the output clamp is
//! what actually bounds the actuation. Callers that stop actuating for long stretches should call
//! [`Pid::reset`] before resuming, which the supervisory machine does on
//! every STOP/ERROR entry.

/// Controller coefficients and output bounds, immutable after construction
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PidConfig {
    /// Lower clamp on the output
    pub min_output: f32,
    /// Upper clamp on the output
    pub max_output: f32,
    /// Proportional coefficient
    pub kp: f32,
    /// Integral coefficient
    pub ki: f32,
    /// Derivative coefficient
    pub kd: f32,
}

impl Default for PidConfig {
    /// Duty-cycle regulation defaults: output clamped to the converter's
    /// safe duty band, proportional-only.
    fn default() -> Self {
        Self {
            min_output: 0.1,
            max_output: 0.8,
            kp: 0.01,
            ki: 0.0,
            kd: 0.0,
        }
    }
}

/// PID controller instance
#[derive(Debug, Clone)]
pub struct Pid {
    config: PidConfig,

    prev_error: f32,
    sum_error: f32,
    delta_error: f32,
}

impl Pid {
    /// New controller with zeroed error state
    pub fn new(config: PidConfig) -> Self {
        Self {
            config,
            prev_error: 0.0,
            sum_error: 0.0,
            delta_error: 0.0,
        }
    }

    /// Coefficients and bounds this controller was built with
    pub fn config(&self) -> &PidConfig {
        &self.config
    }

    /// Step the loop forward one iteration
    ///
    /// Pure function of `(target, actual)` and the internal error state;
    /// the only side effect is updating that state for the next call.
    pub fn step(&mut self, target: f32, actual: f32) -> f32 {
        let error = target - actual;
        self.sum_error += error;
        self.delta_error = error - self.prev_error;
        self.prev_error = error;

        let output = self.config.kp * error
            + self.config.ki * self.sum_error
            + self.config.kd * self.delta_error;

        output.clamp(self.config.min_output, self.config.max_output)
    }

    /// Zero the error state; coefficients are untouched
    pub fn reset(&mut self) {
        self.prev_error = 0.0;
        self.sum_error = 0.0;
        self.delta_error = 0.0;
    }
}
