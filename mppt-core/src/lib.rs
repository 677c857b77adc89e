//! Control core for a photovoltaic maximum power point tracker
//!
//! Everything between the calibrated sensors and the DC-DC converter's
//! gate driver: measurement filtering, the MPPT strategy family, the
//! duty-cycle PID loop, redline safety monitoring and the supervisory
//! state machine, all driven by a cooperative ticker/task-queue loop.
//!
//! The crate is platform-agnostic: hardware is reached only through the
//! traits in [`hal`], and time only through timestamps passed into
//! [`Controller::poll`]. The same core runs on a bare-metal target and
//! under the host test suite.
//!
//! ```no_run
//! use mppt_core::time::SystemTime;
//! use mppt_core::{Command, Controller, ControllerConfig, Hardware, Strategy, TimeSource};
//! # use mppt_core::measurement::Measurements;
//! # struct S; impl mppt_core::hal::Sensors for S {
//! #     fn read(&mut self) -> Measurements { Measurements::default() } }
//! # struct A; impl mppt_core::hal::Actuator for A {
//! #     fn set_duty(&mut self, _: f32) {} fn set_enabled(&mut self, _: bool) {} }
//! # struct I; impl mppt_core::hal::Indicators for I {
//! #     fn set_tracking(&mut self, _: bool) {} fn set_error(&mut self, _: bool) {}
//! #     fn toggle_heartbeat(&mut self) {} }
//! # struct T; impl mppt_core::hal::Telemetry for T {
//! #     fn heartbeat(&mut self, _: u32, _: &Measurements) {}
//! #     fn fault(&mut self, _: mppt_core::FaultCode) {} }
//!
//! let hardware = Hardware { sensors: S, actuator: A, indicators: I, telemetry: T };
//! let mut controller = Controller::new(
//!     hardware,
//!     Strategy::perturb_observe(),
//!     ControllerConfig::default(),
//! );
//!
//! let clock = SystemTime::new();
//! controller.start(clock.now());
//! controller.command(Command::SetMode(true));
//! loop {
//!     controller.poll(clock.now());
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod buffer;
pub mod config;
pub mod controller;
pub mod errors;
pub mod filter;
pub mod hal;
pub mod measurement;
pub mod mppt;
pub mod pid;
pub mod queue;
pub mod redline;
pub mod scheduler;
pub mod time;

// Public API
pub use config::{ControllerConfig, FILTER_WINDOW};
pub use controller::{Controller, SystemState};
pub use errors::{FaultCode, OK_CODE};
pub use hal::{Command, Hardware};
pub use measurement::Measurements;
pub use mppt::{MpptAlgorithm, Strategy};
pub use redline::{RedlineConfig, RedlineMonitor};
pub use time::{TimeSource, Timestamp};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
