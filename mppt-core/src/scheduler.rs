//! Periodic Triggers for the Cooperative Loop
//!
//! A [`Ticker`] is a software stand-in for a hardware periodic timer: once
//! attached it fires at a fixed period, and each firing is meant to enqueue
//! one task. Tickers are polled, not interrupt-driven, so the integration
//! layer drives them from whatever real clock it has.
//!
//! A poll that arrives late still fires at most once, and the next due time
//! is advanced in whole periods past the poll instant. A stalled loop
//! therefore produces one catch-up firing rather than a burst, which is the
//! right behavior for periodic control work: running the same handler five
//! times back to back acts on the same data five times.

use crate::time::Timestamp;

/// One periodic trigger
#[derive(Debug, Clone)]
pub struct Ticker {
    period_ms: u64,
    next_due: Timestamp,
    enabled: bool,
}

impl Ticker {
    /// New detached ticker with the given period
    pub const fn new(period_ms: u64) -> Self {
        Self {
            period_ms,
            next_due: 0,
            enabled: false,
        }
    }

    /// Configured firing period
    pub const fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// True while the ticker is firing
    pub const fn is_attached(&self) -> bool {
        self.enabled
    }

    /// Start firing; the first firing is one full period from `now`
    pub fn attach(&mut self, now: Timestamp) {
        self.enabled = true;
        self.next_due = now + self.period_ms;
    }

    /// Stop firing until the next attach
    pub fn detach(&mut self) {
        self.enabled = false;
    }

    /// Fire if due
    ///
    /// Returns true at most once per poll; the next due time lands in the
    /// first period boundary after `now`.
    pub fn poll(&mut self, now: Timestamp) -> bool {
        if !self.enabled || now < self.next_due {
            return false;
        }

        let periods_behind = (now - self.next_due) / self.period_ms;
        self.next_due += (periods_behind + 1) * self.period_ms;
        true
    }
}

/// Periods of every periodic task, milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cadences {
    /// Liveness blink and telemetry emission
    pub heartbeat_period_ms: u64,
    /// Sensor sampling into the filter bank
    pub measure_period_ms: u64,
    /// Safety bound validation (bounded-time backstop)
    pub redline_period_ms: u64,
    /// MPPT strategy stepping
    pub mppt_period_ms: u64,
    /// Duty-cycle loop stepping
    pub pid_period_ms: u64,
}

impl Default for Cadences {
    /// Stock cadences: heartbeat 1 Hz, measurement 10 Hz, redline 2 Hz,
    /// MPPT 1 Hz, PID 10 Hz.
    fn default() -> Self {
        Self {
            heartbeat_period_ms: 1000,
            measure_period_ms: 100,
            redline_period_ms: 500,
            mppt_period_ms: 1000,
            pid_period_ms: 100,
        }
    }
}
