//! Controller configuration
//!
//! Everything tunable at integration time, gathered in one struct with
//! working defaults for the stock 70 V array / 130 V battery converter.

use crate::pid::PidConfig;
use crate::redline::RedlineConfig;
use crate::scheduler::Cadences;

/// Window capacity of the per-channel measurement filters, samples
///
/// One second of history at the stock 10 Hz measurement cadence.
pub const FILTER_WINDOW: usize = 10;

/// Full controller configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerConfig {
    /// Periods of the periodic tasks
    pub cadences: Cadences,
    /// Safety bounds
    pub redline: RedlineConfig,
    /// Duty-cycle loop coefficients
    pub pid: PidConfig,
    /// Duty cycle loaded whenever actuation is disabled
    pub safe_duty: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            cadences: Cadences::default(),
            redline: RedlineConfig::default(),
            pid: PidConfig::default(),
            safe_duty: 0.5,
        }
    }
}
