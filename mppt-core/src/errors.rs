//! Fault Codes for Redline Violations
//!
//! ## Design Philosophy
//!
//! Fault codes cross the wire to the pack controller, so the numbering is a
//! stable external contract and must never be reshuffled. The enum is kept
//! `Copy` and fieldless: a code is raised from the redline tick (a hot,
//! hard-deadline path) and may sit in the task queue, so it has to be cheap
//! to move and carry no heap data.
//!
//! ## Numbering
//!
//! The wire contract reserves `0` for "no fault" and groups lockouts by
//! port:
//!
//! ```text
//! 100..=103  input (array) voltage/current lockouts
//! 104..=107  output (battery) voltage/current lockouts
//! 108        input/output voltage inversion (boost topology violated)
//! 109..=110  duty-cycle lockouts
//! ```
//!
//! Every fault in this core is recoverable: the supervisory machine parks in
//! ERROR until the operator acknowledges, then returns to STOP. There is no
//! fatal class.

use thiserror_no_std::Error;

/// Wire value reported when no fault is latched
pub const OK_CODE: u16 = 0;

/// Redline violation codes
///
/// Discriminants are the wire values and are load-bearing; see the module
/// docs before touching them.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum FaultCode {
    /// Array voltage below its lower bound
    #[error("input undervoltage lockout")]
    InputUndervoltage = 100,

    /// Array voltage above its upper bound
    #[error("input overvoltage lockout")]
    InputOvervoltage = 101,

    /// Array current below its lower bound
    #[error("input undercurrent lockout")]
    InputUndercurrent = 102,

    /// Array current above its upper bound
    #[error("input overcurrent lockout")]
    InputOvercurrent = 103,

    /// Battery voltage below its lower bound
    #[error("output undervoltage lockout")]
    OutputUndervoltage = 104,

    /// Battery voltage above its upper bound
    #[error("output overvoltage lockout")]
    OutputOvervoltage = 105,

    /// Battery current below its lower bound
    #[error("output undercurrent lockout")]
    OutputUndercurrent = 106,

    /// Battery current above its upper bound
    #[error("output overcurrent lockout")]
    OutputOvercurrent = 107,

    /// Battery voltage did not exceed array voltage
    ///
    /// A boost converter's output must sit above its input; anything else
    /// means the topology assumption is broken.
    #[error("input/output voltage inversion")]
    VoltageInversion = 108,

    /// Commanded duty cycle below the safe operating band
    #[error("duty cycle under lockout")]
    DutyUnderLockout = 109,

    /// Commanded duty cycle above the safe operating band
    #[error("duty cycle over lockout")]
    DutyOverLockout = 110,
}

impl FaultCode {
    /// Wire value for telemetry
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Reverse mapping from a wire value
    pub const fn from_code(code: u16) -> Option<Self> {
        Some(match code {
            100 => Self::InputUndervoltage,
            101 => Self::InputOvervoltage,
            102 => Self::InputUndercurrent,
            103 => Self::InputOvercurrent,
            104 => Self::OutputUndervoltage,
            105 => Self::OutputOvervoltage,
            106 => Self::OutputUndercurrent,
            107 => Self::OutputOvercurrent,
            108 => Self::VoltageInversion,
            109 => Self::DutyUnderLockout,
            110 => Self::DutyOverLockout,
            _ => return None,
        })
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FaultCode {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "fault {}", self.code());
    }
}
