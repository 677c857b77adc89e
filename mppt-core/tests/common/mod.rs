//! Shared test doubles for the control-loop integration tests
//!
//! The controller owns its hardware bundle, so every mock hands out an
//! `Rc<RefCell<...>>` handle that the test keeps for scripting inputs and
//! inspecting recorded outputs after the bundle has been moved in.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use mppt_core::hal::{Actuator, Hardware, Indicators, Sensors, Telemetry};
use mppt_core::time::FixedTime;
use mppt_core::{Controller, ControllerConfig, FaultCode, Measurements, Strategy, TimeSource};

/// Operating point comfortably inside every redline
pub fn nominal() -> Measurements {
    Measurements::new(61.0, 5.5, 96.0, 3.2)
}

/// Sensor double returning whatever the test last scripted
pub struct ScriptedSensors {
    reading: Rc<RefCell<Measurements>>,
}

impl Sensors for ScriptedSensors {
    fn read(&mut self) -> Measurements {
        *self.reading.borrow()
    }
}

#[derive(Default)]
pub struct ActuatorLog {
    /// Every PWM pin write, already inverted by the controller
    pub pin_duties: Vec<f32>,
    /// Every gate enable/disable write
    pub enables: Vec<bool>,
}

impl ActuatorLog {
    pub fn last_pin_duty(&self) -> Option<f32> {
        self.pin_duties.last().copied()
    }

    pub fn last_enable(&self) -> Option<bool> {
        self.enables.last().copied()
    }
}

pub struct RecordingActuator {
    log: Rc<RefCell<ActuatorLog>>,
}

impl Actuator for RecordingActuator {
    fn set_duty(&mut self, pin_duty: f32) {
        self.log.borrow_mut().pin_duties.push(pin_duty);
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.log.borrow_mut().enables.push(enabled);
    }
}

#[derive(Default)]
pub struct IndicatorLog {
    pub tracking: bool,
    pub error: bool,
    pub heartbeat_toggles: u32,
}

pub struct RecordingIndicators {
    log: Rc<RefCell<IndicatorLog>>,
}

impl Indicators for RecordingIndicators {
    fn set_tracking(&mut self, on: bool) {
        self.log.borrow_mut().tracking = on;
    }

    fn set_error(&mut self, on: bool) {
        self.log.borrow_mut().error = on;
    }

    fn toggle_heartbeat(&mut self) {
        self.log.borrow_mut().heartbeat_toggles += 1;
    }
}

#[derive(Default)]
pub struct TelemetryLog {
    pub heartbeats: Vec<(u32, Measurements)>,
    pub faults: Vec<FaultCode>,
}

pub struct RecordingTelemetry {
    log: Rc<RefCell<TelemetryLog>>,
}

impl Telemetry for RecordingTelemetry {
    fn heartbeat(&mut self, count: u32, measurements: &Measurements) {
        self.log.borrow_mut().heartbeats.push((count, *measurements));
    }

    fn fault(&mut self, code: FaultCode) {
        self.log.borrow_mut().faults.push(code);
    }
}

/// Handles the test keeps after the hardware bundle moves into the controller
pub struct Handles {
    pub reading: Rc<RefCell<Measurements>>,
    pub actuator: Rc<RefCell<ActuatorLog>>,
    pub indicators: Rc<RefCell<IndicatorLog>>,
    pub telemetry: Rc<RefCell<TelemetryLog>>,
}

impl Handles {
    pub fn set_reading(&self, m: Measurements) {
        *self.reading.borrow_mut() = m;
    }
}

pub type TestController =
    Controller<ScriptedSensors, RecordingActuator, RecordingIndicators, RecordingTelemetry>;

/// Controller over a fully mocked hardware bundle, sensors pre-scripted to
/// the nominal operating point
pub fn rig(strategy: Strategy) -> (TestController, Handles) {
    let reading = Rc::new(RefCell::new(nominal()));
    let actuator = Rc::new(RefCell::new(ActuatorLog::default()));
    let indicators = Rc::new(RefCell::new(IndicatorLog::default()));
    let telemetry = Rc::new(RefCell::new(TelemetryLog::default()));

    let hardware = Hardware {
        sensors: ScriptedSensors {
            reading: reading.clone(),
        },
        actuator: RecordingActuator {
            log: actuator.clone(),
        },
        indicators: RecordingIndicators {
            log: indicators.clone(),
        },
        telemetry: RecordingTelemetry {
            log: telemetry.clone(),
        },
    };

    let controller = Controller::new(hardware, strategy, ControllerConfig::default());
    let handles = Handles {
        reading,
        actuator,
        indicators,
        telemetry,
    };
    (controller, handles)
}

/// Drive the loop from `from` to `to` (exclusive) in 10 ms polls
///
/// Returns the timestamp the next call should continue from.
pub fn run_until(controller: &mut TestController, from: u64, to: u64) -> u64 {
    let mut clock = FixedTime::new(from);
    while clock.now() < to {
        controller.poll(clock.now());
        clock.advance(10);
    }
    clock.now()
}
