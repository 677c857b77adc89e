//! Supervisory Controller for the Cooperative Control Loop
//!
//! ## Overview
//!
//! The [`Controller`] owns every piece of the control core and runs the
//! cooperative loop: periodic tickers enqueue tasks, and a dispatch pass
//! drains the queue and runs one handler per task. A single [`poll`] call
//! does both, so the integration layer's main loop reduces to reading its
//! clock and calling `poll` as often as it can.
//!
//! ```text
//!  tickers ──► TaskQueue ──► dispatch ──► handlers
//!     ▲                                      │
//!     └────── state machine (attach/detach) ◄┘
//! ```
//!
//! ## Task handlers
//!
//! | Task               | Runs in      | Effect                                  |
//! |--------------------|--------------|-----------------------------------------|
//! | Heartbeat          | every state  | blink, count, emit telemetry            |
//! | Measure            | every state  | sample sensors into the filter bank     |
//! | CheckRedlines      | every state  | validate, fault on violation            |
//! | StepMppt           | RUN only     | advance the reference voltage           |
//! | StepPid            | RUN only     | chase the reference with duty cycle     |
//! | UpdateStateMachine | on demand    | evaluate transitions, apply outputs     |
//!
//! Measurement runs even while stopped or faulted so the filters are warm
//! the moment tracking starts, and so the redline monitor always judges
//! fresh data.
//!
//! ## Fault path
//!
//! A redline violation takes the fast path first: the converter gate is cut
//! inside the redline handler itself, before any state machine work. The
//! ERROR transition then follows through the queue. While latched in ERROR
//! the handler re-asserts the gate cut on every check, so the disable holds
//! even against a raced enable.
//!
//! [`poll`]: Controller::poll

// Optional logging, compiled out without the `log` feature
#[cfg(feature = "log")]
macro_rules! log_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

mod state;

pub use state::{StateMachine, StateOutputs, SystemState};

use crate::config::{ControllerConfig, FILTER_WINDOW};
use crate::errors::FaultCode;
use crate::hal::{Actuator, Command, Hardware, Indicators, Sensors, Telemetry};
use crate::measurement::FilterBank;
use crate::mppt::{MpptAlgorithm, Strategy};
use crate::pid::Pid;
use crate::queue::{Task, TaskQueue, QUEUE_CAPACITY};
use crate::redline::RedlineMonitor;
use crate::scheduler::Ticker;
use crate::time::Timestamp;

/// The full control core over one hardware bundle
pub struct Controller<S, A, I, T>
where
    S: Sensors,
    A: Actuator,
    I: Indicators,
    T: Telemetry,
{
    hw: Hardware<S, A, I, T>,

    filters: FilterBank<FILTER_WINDOW>,
    strategy: Strategy,
    pid: Pid,
    redline: RedlineMonitor,
    machine: StateMachine,

    heartbeat_ticker: Ticker,
    measure_ticker: Ticker,
    redline_ticker: Ticker,
    mppt_ticker: Ticker,
    pid_ticker: Ticker,

    queue: TaskQueue<QUEUE_CAPACITY>,

    heartbeat_count: u32,
    duty: f32,
    safe_duty: f32,
    last_fault: Option<FaultCode>,
}

impl<S, A, I, T> Controller<S, A, I, T>
where
    S: Sensors,
    A: Actuator,
    I: Indicators,
    T: Telemetry,
{
    /// Build the controller; call [`Controller::start`] before polling
    pub fn new(hardware: Hardware<S, A, I, T>, strategy: Strategy, config: ControllerConfig) -> Self {
        Self {
            hw: hardware,
            filters: FilterBank::medians(),
            strategy,
            pid: Pid::new(config.pid),
            redline: RedlineMonitor::new(config.redline),
            machine: StateMachine::new(),
            heartbeat_ticker: Ticker::new(config.cadences.heartbeat_period_ms),
            measure_ticker: Ticker::new(config.cadences.measure_period_ms),
            redline_ticker: Ticker::new(config.cadences.redline_period_ms),
            mppt_ticker: Ticker::new(config.cadences.mppt_period_ms),
            pid_ticker: Ticker::new(config.cadences.pid_period_ms),
            queue: TaskQueue::new(),
            heartbeat_count: 0,
            duty: config.safe_duty,
            safe_duty: config.safe_duty,
            last_fault: None,
        }
    }

    /// Put the hardware in the standby posture and arm the always-on tickers
    ///
    /// The MPPT and PID tickers stay detached until the machine enters RUN.
    pub fn start(&mut self, now: Timestamp) {
        self.apply_outputs(now);
        self.heartbeat_ticker.attach(now);
        self.measure_ticker.attach(now);
        self.redline_ticker.attach(now);
        log_info!("controller started, strategy {}", self.strategy.name());
    }

    /// Run one iteration of the cooperative loop
    ///
    /// First the trigger pass polls every ticker and enqueues the tasks
    /// that came due, then the dispatch pass drains the queue. Call as
    /// often as the platform allows; cadence is governed by the tickers,
    /// not by the poll rate.
    pub fn poll(&mut self, now: Timestamp) {
        if self.heartbeat_ticker.poll(now) {
            self.queue.push(Task::Heartbeat);
        }
        if self.measure_ticker.poll(now) {
            self.queue.push(Task::Measure);
        }
        if self.redline_ticker.poll(now) {
            self.queue.push(Task::CheckRedlines);
        }
        if self.mppt_ticker.poll(now) {
            self.queue.push(Task::StepMppt);
        }
        if self.pid_ticker.poll(now) {
            self.queue.push(Task::StepPid);
        }

        while let Some(task) = self.queue.pop() {
            match task {
                Task::Heartbeat => self.handle_heartbeat(),
                Task::Measure => self.handle_measure(),
                Task::CheckRedlines => self.handle_check_redlines(),
                Task::StepMppt => self.handle_step_mppt(),
                Task::StepPid => self.handle_step_pid(),
                Task::UpdateStateMachine => self.handle_update_state_machine(now),
            }
        }
    }

    /// Latch an operator command and schedule a state machine evaluation
    pub fn command(&mut self, command: Command) {
        match command {
            Command::SetMode(tracking) => self.machine.request_mode(tracking),
            Command::AckFault => self.machine.acknowledge_fault(),
        }
        self.queue.push(Task::UpdateStateMachine);
    }

    /// Current supervisory state
    pub fn state(&self) -> SystemState {
        self.machine.state()
    }

    /// Commanded (non-inverted) duty cycle
    pub fn duty(&self) -> f32 {
        self.duty
    }

    /// Most recent redline fault, sticky across the ERROR exit
    pub fn last_fault(&self) -> Option<FaultCode> {
        self.last_fault
    }

    /// Heartbeats emitted since start, wrapping
    pub fn heartbeat_count(&self) -> u32 {
        self.heartbeat_count
    }

    /// Tasks lost to queue overflow since start
    pub fn dropped_tasks(&self) -> u32 {
        self.queue.dropped()
    }

    fn handle_heartbeat(&mut self) {
        self.hw.indicators.toggle_heartbeat();
        self.heartbeat_count = self.heartbeat_count.wrapping_add(1);
        let snapshot = self.filters.snapshot();
        self.hw.telemetry.heartbeat(self.heartbeat_count, &snapshot);
    }

    fn handle_measure(&mut self) {
        let raw = self.hw.sensors.read();
        self.filters.ingest(&raw);
    }

    fn handle_check_redlines(&mut self) {
        let snapshot = self.filters.snapshot();

        if let Err(code) = self.redline.check(&snapshot, self.duty) {
            // Cut the gate before anything else; the state machine catches
            // up through the queue.
            self.hw.actuator.set_enabled(false);
            self.hw.telemetry.fault(code);
            self.last_fault = Some(code);
            self.machine.latch_error();
            self.queue.push(Task::UpdateStateMachine);
            log_warn!("redline fault {}: {}", code.code(), code);
        } else if self.machine.state() == SystemState::Error {
            // The disable must hold for as long as the fault is latched,
            // even after the readings themselves come back inside bounds.
            self.hw.actuator.set_enabled(false);
        }
    }

    fn handle_step_mppt(&mut self) {
        // A tick enqueued just before the tickers were detached can still
        // arrive here; the state check makes it a no-op.
        if self.machine.state() != SystemState::Run {
            return;
        }

        self.strategy.input_context(self.filters.snapshot());
        self.strategy.step_algorithm();
    }

    fn handle_step_pid(&mut self) {
        if self.machine.state() != SystemState::Run {
            return;
        }

        let snapshot = self.filters.snapshot();
        self.duty = self.pid.step(self.strategy.reference(), snapshot.array_voltage);
        self.hw.actuator.set_duty(1.0 - self.duty);
    }

    fn handle_update_state_machine(&mut self, now: Timestamp) {
        let previous = self.machine.state();
        let current = self.machine.evaluate();

        if current != previous {
            log_info!("state {:?} -> {:?}", previous, current);
        }

        self.apply_outputs(now);
    }

    /// Drive the hardware to the current state's Moore outputs
    ///
    /// Idempotent, and applied on every evaluation rather than only on
    /// transitions so the posture holds even if an earlier application was
    /// lost.
    fn apply_outputs(&mut self, now: Timestamp) {
        let outputs = StateMachine::outputs(self.machine.state());

        self.hw.actuator.set_enabled(outputs.actuation_enabled);
        self.hw.indicators.set_tracking(outputs.tracking);
        self.hw.indicators.set_error(outputs.error);

        if outputs.tracking {
            if !self.mppt_ticker.is_attached() {
                self.mppt_ticker.attach(now);
                self.pid_ticker.attach(now);
            }
        } else {
            self.mppt_ticker.detach();
            self.pid_ticker.detach();

            // Park the converter at the safe operating point and forget
            // the tracking history; the next RUN starts fresh.
            self.duty = self.safe_duty;
            self.hw.actuator.set_duty(1.0 - self.safe_duty);
            self.strategy.reset_state();
            self.pid.reset();
        }
    }
}
