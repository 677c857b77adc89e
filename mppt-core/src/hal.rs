//! Hardware Seams
//!
//! Every point where the control core touches the outside world goes
//! through a trait defined here: sensor sampling, converter actuation,
//! status indication and telemetry emission. The integration layer
//! implements them against real peripherals; the test suite implements
//! them as scripted recorders.

use crate::errors::FaultCode;
use crate::measurement::Measurements;

/// Calibrated sensor array, sampled as one atomic snapshot
pub trait Sensors {
    /// Read all four channels, in physical units
    fn read(&mut self) -> Measurements;
}

/// DC-DC converter actuation
///
/// The gate driver in this converter is active-low, so the PWM write is
/// inverted: a commanded duty `d` is written to the pin as `1.0 - d`.
/// Implementations receive the already-inverted pin value; the controller
/// owns the inversion so every implementation stays a dumb pass-through.
pub trait Actuator {
    /// Write the PWM pin duty, already inverted for the gate driver
    fn set_duty(&mut self, pin_duty: f32);

    /// Gate the converter on or off; off must be safe to assert repeatedly
    fn set_enabled(&mut self, enabled: bool);
}

/// Operator-facing status indicators
pub trait Indicators {
    /// Tracking LED: lit while the MPPT loop is actively perturbing
    fn set_tracking(&mut self, on: bool);

    /// Error LED: lit while the system is latched in its fault state
    fn set_error(&mut self, on: bool);

    /// Heartbeat LED: toggled once per heartbeat to show liveness
    fn toggle_heartbeat(&mut self);
}

/// Outbound telemetry
pub trait Telemetry {
    /// Periodic liveness report with the current filtered measurements
    fn heartbeat(&mut self, count: u32, measurements: &Measurements);

    /// A redline was crossed
    fn fault(&mut self, code: FaultCode);
}

/// Inbound operator commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Request tracking on (true) or off (false)
    SetMode(bool),
    /// Acknowledge a latched fault and return to standby
    AckFault,
}

/// Everything the controller drives, bundled for one generic parameter set
pub struct Hardware<S, A, I, T>
where
    S: Sensors,
    A: Actuator,
    I: Indicators,
    T: Telemetry,
{
    /// Calibrated measurement source
    pub sensors: S,
    /// Converter gate and PWM
    pub actuator: A,
    /// Status LEDs
    pub indicators: I,
    /// Outbound reporting channel
    pub telemetry: T,
}
