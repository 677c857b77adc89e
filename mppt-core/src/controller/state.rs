//! Supervisory State Machine
//!
//! Three states govern the whole controller:
//!
//! ```text
//!            SetMode(true)                 redline fault
//!   STOP ───────────────────→ RUN ───────────────────────→ ERROR
//!    ↑  ←─────────────────────┘                               │
//!    │        SetMode(false)                                  │
//!    └────────────────────────────────────────────────────────┘
//!                          AckFault
//! ```
//!
//! Inputs are latched flags, not edges: a fault detected between
//! evaluations is not lost, and a mode request arriving while a fault is
//! pending loses to the fault. The machine is Moore-style; what the
//! hardware should be doing is a pure function of the state alone, and the
//! controller re-applies those outputs on every evaluation so they hold
//! even if an earlier application was raced.

/// Supervisory state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SystemState {
    /// Standby: converter gated off, safe duty loaded, awaiting a mode
    /// request. The initial state.
    #[default]
    Stop,
    /// Actively tracking: measurement, MPPT and PID loops all live.
    Run,
    /// Fault latched: converter gated off until the fault is acknowledged.
    Error,
}

/// What the hardware should be doing in a given state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateOutputs {
    /// Converter gate enabled
    pub actuation_enabled: bool,
    /// Tracking LED and the MPPT/PID tickers
    pub tracking: bool,
    /// Error LED
    pub error: bool,
}

/// The supervisory machine with its latched input flags
#[derive(Debug, Clone, Default)]
pub struct StateMachine {
    state: SystemState,

    /// A redline fault is pending or latched
    is_error: bool,
    /// Operator wants tracking on
    set_mode: bool,
    /// Operator acknowledged the latched fault
    ack_fault: bool,
}

impl StateMachine {
    /// New machine in STOP with all flags clear
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state, as of the last evaluation
    pub const fn state(&self) -> SystemState {
        self.state
    }

    /// Latch a detected fault; consumed only by the ERROR exit
    pub fn latch_error(&mut self) {
        self.is_error = true;
    }

    /// Latch the operator's mode request
    pub fn request_mode(&mut self, tracking: bool) {
        self.set_mode = tracking;
    }

    /// Latch a fault acknowledgement
    pub fn acknowledge_fault(&mut self) {
        self.ack_fault = true;
    }

    /// Evaluate one transition from the latched flags
    ///
    /// Returns the new state. A pending fault outranks a mode request in
    /// every state that honors both.
    pub fn evaluate(&mut self) -> SystemState {
        self.state = match self.state {
            SystemState::Stop => {
                // A stray acknowledgement has nothing to acknowledge; it
                // must not linger and instantly release a later fault.
                self.ack_fault = false;
                if self.is_error {
                    SystemState::Error
                } else if self.set_mode {
                    SystemState::Run
                } else {
                    SystemState::Stop
                }
            }
            SystemState::Run => {
                self.ack_fault = false;
                if self.is_error {
                    SystemState::Error
                } else if !self.set_mode {
                    SystemState::Stop
                } else {
                    SystemState::Run
                }
            }
            SystemState::Error => {
                if self.ack_fault {
                    // Leaving ERROR resets the whole request surface; the
                    // operator starts over from standby.
                    self.is_error = false;
                    self.set_mode = false;
                    self.ack_fault = false;
                    SystemState::Stop
                } else {
                    SystemState::Error
                }
            }
        };
        self.state
    }

    /// Moore output table
    pub const fn outputs(state: SystemState) -> StateOutputs {
        match state {
            SystemState::Stop => StateOutputs {
                actuation_enabled: false,
                tracking: false,
                error: false,
            },
            SystemState::Run => StateOutputs {
                actuation_enabled: true,
                tracking: true,
                error: false,
            },
            SystemState::Error => StateOutputs {
                actuation_enabled: false,
                tracking: false,
                error: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine_in(state: SystemState) -> StateMachine {
        let mut m = StateMachine::new();
        match state {
            SystemState::Stop => {}
            SystemState::Run => {
                m.request_mode(true);
                assert_eq!(m.evaluate(), SystemState::Run);
            }
            SystemState::Error => {
                m.latch_error();
                assert_eq!(m.evaluate(), SystemState::Error);
            }
        }
        m
    }

    #[test]
    fn initial_state_is_stop() {
        assert_eq!(StateMachine::new().state(), SystemState::Stop);
    }

    #[test]
    fn stop_holds_without_inputs() {
        let mut m = machine_in(SystemState::Stop);
        assert_eq!(m.evaluate(), SystemState::Stop);
    }

    #[test]
    fn stop_to_run_on_mode_request() {
        let mut m = machine_in(SystemState::Stop);
        m.request_mode(true);
        assert_eq!(m.evaluate(), SystemState::Run);
    }

    #[test]
    fn fault_outranks_mode_request_in_stop() {
        let mut m = machine_in(SystemState::Stop);
        m.request_mode(true);
        m.latch_error();
        assert_eq!(m.evaluate(), SystemState::Error);
    }

    #[test]
    fn run_to_stop_on_mode_clear() {
        let mut m = machine_in(SystemState::Run);
        m.request_mode(false);
        assert_eq!(m.evaluate(), SystemState::Stop);
    }

    #[test]
    fn run_to_error_on_fault() {
        let mut m = machine_in(SystemState::Run);
        m.latch_error();
        assert_eq!(m.evaluate(), SystemState::Error);
    }

    #[test]
    fn fault_outranks_mode_clear_in_run() {
        let mut m = machine_in(SystemState::Run);
        m.request_mode(false);
        m.latch_error();
        assert_eq!(m.evaluate(), SystemState::Error);
    }

    #[test]
    fn error_holds_until_acknowledged() {
        let mut m = machine_in(SystemState::Error);
        m.request_mode(true); // ignored while latched
        assert_eq!(m.evaluate(), SystemState::Error);

        m.acknowledge_fault();
        assert_eq!(m.evaluate(), SystemState::Stop);
    }

    #[test]
    fn ack_clears_all_latched_flags() {
        let mut m = machine_in(SystemState::Error);
        m.request_mode(true);
        m.acknowledge_fault();
        assert_eq!(m.evaluate(), SystemState::Stop);

        // The pre-ack mode request must not survive into standby.
        assert_eq!(m.evaluate(), SystemState::Stop);

        // And a fresh request works normally afterwards.
        m.request_mode(true);
        assert_eq!(m.evaluate(), SystemState::Run);
    }

    #[test]
    fn fault_reasserts_error_after_ack_cycle() {
        let mut m = machine_in(SystemState::Error);
        m.acknowledge_fault();
        assert_eq!(m.evaluate(), SystemState::Stop);

        m.latch_error();
        assert_eq!(m.evaluate(), SystemState::Error);
    }

    #[test]
    fn exhaustive_transition_table() {
        use SystemState::*;

        for state in [Stop, Run, Error] {
            for bits in 0..8u8 {
                let is_error = bits & 1 != 0;
                let set_mode = bits & 2 != 0;
                let ack_fault = bits & 4 != 0;

                let mut m = StateMachine::new();
                m.state = state;
                m.is_error = is_error;
                m.set_mode = set_mode;
                m.ack_fault = ack_fault;

                let expected = match state {
                    Stop | Run => {
                        if is_error {
                            Error
                        } else if set_mode {
                            Run
                        } else {
                            Stop
                        }
                    }
                    Error => {
                        if ack_fault {
                            Stop
                        } else {
                            Error
                        }
                    }
                };
                assert_eq!(
                    m.evaluate(),
                    expected,
                    "from {state:?} with flags {bits:03b}"
                );

                if state == Error && ack_fault {
                    // The ERROR exit clears the whole request surface.
                    assert!(!m.is_error && !m.set_mode && !m.ack_fault);
                } else if state != Error {
                    // Stray acks are consumed; the level flags persist.
                    assert!(!m.ack_fault, "from {state:?} with flags {bits:03b}");
                    assert_eq!(m.is_error, is_error);
                    assert_eq!(m.set_mode, set_mode);
                }
            }
        }
    }

    #[test]
    fn stale_ack_does_not_release_a_later_fault() {
        let mut m = machine_in(SystemState::Stop);
        m.acknowledge_fault();
        assert_eq!(m.evaluate(), SystemState::Stop);

        m.latch_error();
        assert_eq!(m.evaluate(), SystemState::Error);
        // The pre-fault ack was consumed in STOP; ERROR must hold.
        assert_eq!(m.evaluate(), SystemState::Error);
    }

    #[test]
    fn output_table() {
        let stop = StateMachine::outputs(SystemState::Stop);
        assert!(!stop.actuation_enabled && !stop.tracking && !stop.error);

        let run = StateMachine::outputs(SystemState::Run);
        assert!(run.actuation_enabled && run.tracking && !run.error);

        let error = StateMachine::outputs(SystemState::Error);
        assert!(!error.actuation_enabled && !error.tracking && error.error);
    }
}
