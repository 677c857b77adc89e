//! Redline Safety Bounds and Fault Detection
//!
//! ## Overview
//!
//! A redline is a hard operational bound whose violation requires immediate
//! safe shutdown. The monitor is stateless per call: every check tick it
//! takes the latest filtered measurement vector plus the commanded duty
//! cycle and validates them against the configured bound set. Any single
//! violated bound is sufficient to fault; the violations are independent of
//! each other and the resulting safety action (disable actuation) is
//! idempotent, so simultaneous violations cost nothing extra.
//!
//! The monitor only *detects*. The time-critical mitigation (cutting the
//! PWM enable) and the supervisory ERROR transition are performed by the
//! controller the instant a check comes back with a fault code, in that
//! order: fast local disable first, then the slower global state change.
//!
//! ## Checks per tick
//!
//! - array voltage within bounds (codes 100/101)
//! - array current within bounds (codes 102/103)
//! - battery voltage within bounds (codes 104/105)
//! - battery current within bounds (codes 106/107)
//! - battery voltage strictly above array voltage (code 108); a boost
//!   converter's output must exceed its input
//! - commanded duty cycle within bounds (codes 109/110)
//!
//! Comparisons are written so a NaN measurement fails its under-lockout
//! check: a dead sensor faults rather than sailing through.

use heapless::Vec;

use crate::errors::FaultCode;
use crate::measurement::Measurements;

/// Inclusive `[min, max]` operating bound
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bound {
    /// Lowest acceptable value
    pub min: f32,
    /// Highest acceptable value
    pub max: f32,
}

impl Bound {
    /// Bound over the inclusive range `[min, max]`
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

/// Full bound set for one deployment target
///
/// Read-only during operation; reconfiguration arrives over the command
/// channel between runs, which is why the type is serde-enabled.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RedlineConfig {
    /// Array (input) voltage bound, V
    pub array_voltage: Bound,
    /// Array (input) current bound, A
    pub array_current: Bound,
    /// Battery (output) voltage bound, V
    pub battery_voltage: Bound,
    /// Battery (output) current bound, A
    pub battery_current: Bound,
    /// Commanded duty cycle bound
    pub duty: Bound,
}

impl Default for RedlineConfig {
    /// Canonical bound set for the 70 V array / 130 V battery target
    fn default() -> Self {
        Self {
            array_voltage: Bound::new(1.0, 70.0),
            array_current: Bound::new(0.0, 8.0),
            battery_voltage: Bound::new(80.0, 130.0),
            battery_current: Bound::new(0.0, 5.0),
            duty: Bound::new(0.1, 0.8),
        }
    }
}

/// Maximum simultaneous violations: one side per channel bound, plus the
/// topology check and one side of the duty bound.
pub const MAX_VIOLATIONS: usize = 6;

/// Stateless-per-call redline validator
#[derive(Debug, Clone, Default)]
pub struct RedlineMonitor {
    config: RedlineConfig,
}

impl RedlineMonitor {
    /// Monitor over the given bound set
    pub const fn new(config: RedlineConfig) -> Self {
        Self { config }
    }

    /// Bound set this monitor validates against
    pub fn config(&self) -> &RedlineConfig {
        &self.config
    }

    /// Validate one tick's measurements and actuation
    ///
    /// Returns the first violated bound's code in the fixed evaluation
    /// order above, or `Ok(())` when everything is inside its redlines.
    pub fn check(&self, m: &Measurements, duty: f32) -> Result<(), FaultCode> {
        check_bound(
            m.array_voltage,
            self.config.array_voltage,
            FaultCode::InputUndervoltage,
            FaultCode::InputOvervoltage,
        )?;
        check_bound(
            m.array_current,
            self.config.array_current,
            FaultCode::InputUndercurrent,
            FaultCode::InputOvercurrent,
        )?;
        check_bound(
            m.battery_voltage,
            self.config.battery_voltage,
            FaultCode::OutputUndervoltage,
            FaultCode::OutputOvervoltage,
        )?;
        check_bound(
            m.battery_current,
            self.config.battery_current,
            FaultCode::OutputUndercurrent,
            FaultCode::OutputOvercurrent,
        )?;

        if !(m.battery_voltage > m.array_voltage) {
            return Err(FaultCode::VoltageInversion);
        }

        check_bound(
            duty,
            self.config.duty,
            FaultCode::DutyUnderLockout,
            FaultCode::DutyOverLockout,
        )?;

        Ok(())
    }

    /// Collect every simultaneous violation, in evaluation order
    ///
    /// Telemetry uses this to report compound faults; the safety action is
    /// keyed off [`RedlineMonitor::check`] either way.
    pub fn violations(&self, m: &Measurements, duty: f32) -> Vec<FaultCode, MAX_VIOLATIONS> {
        let mut out = Vec::new();

        let checks = [
            check_bound(
                m.array_voltage,
                self.config.array_voltage,
                FaultCode::InputUndervoltage,
                FaultCode::InputOvervoltage,
            ),
            check_bound(
                m.array_current,
                self.config.array_current,
                FaultCode::InputUndercurrent,
                FaultCode::InputOvercurrent,
            ),
            check_bound(
                m.battery_voltage,
                self.config.battery_voltage,
                FaultCode::OutputUndervoltage,
                FaultCode::OutputOvervoltage,
            ),
            check_bound(
                m.battery_current,
                self.config.battery_current,
                FaultCode::OutputUndercurrent,
                FaultCode::OutputOvercurrent,
            ),
            if m.battery_voltage > m.array_voltage {
                Ok(())
            } else {
                Err(FaultCode::VoltageInversion)
            },
            check_bound(
                duty,
                self.config.duty,
                FaultCode::DutyUnderLockout,
                FaultCode::DutyOverLockout,
            ),
        ];

        for check in checks {
            if let Err(code) = check {
                // Capacity covers the worst case; push cannot fail.
                let _ = out.push(code);
            }
        }

        out
    }
}

/// Classify a value against a bound
///
/// Written with negated comparisons so NaN falls out as `under`.
fn check_bound(value: f32, bound: Bound, under: FaultCode, over: FaultCode) -> Result<(), FaultCode> {
    if !(value >= bound.min) {
        Err(under)
    } else if !(value <= bound.max) {
        Err(over)
    } else {
        Ok(())
    }
}
