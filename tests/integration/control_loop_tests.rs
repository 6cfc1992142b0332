//! Integration tests for the sample → decide → display pipeline.
//!
//! Each test builds its own [`SourceSelector`] so the global ISR selector
//! is never touched and tests stay independent under the parallel runner.

use std::cell::Cell;
use std::rc::Rc;

use crate::mock_hw::{FakeClock, HwCall, LogSink, MockHardware, RecordingDelay, SimTime};

use thermomotor::app::events::AppEvent;
use thermomotor::app::service::{ControlLoop, IterationReport};
use thermomotor::config::{ControllerConfig, OverflowPolicy};
use thermomotor::control::decision::MotorState;
use thermomotor::display::encoder::DigitTriple;
use thermomotor::display::multiplexer::DigitPosition;
use thermomotor::drivers::button::{SourceSelection, SourceSelector};
use thermomotor::sensors::analog::AnalogChannel;

struct Rig {
    hw: MockHardware,
    delay: RecordingDelay,
    clock: FakeClock,
    sink: LogSink,
}

impl Rig {
    fn new() -> Self {
        let time: SimTime = Rc::new(Cell::new(0));
        Self {
            hw: MockHardware::new(time.clone()),
            delay: RecordingDelay::new(time.clone()),
            clock: FakeClock(time),
            sink: LogSink::new(),
        }
    }

    fn readings(&mut self, pot: u8, sensor: u8) {
        self.hw.set_raw(AnalogChannel::Potentiometer, pot);
        self.hw.set_raw(AnalogChannel::Sensor, sensor);
    }

    fn step(&mut self, lp: &mut ControlLoop<'_>) -> IterationReport {
        lp.iterate(&mut self.hw, &mut self.delay, &self.clock, &mut self.sink)
    }
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.01
}

// ── Setup ─────────────────────────────────────────────────────

#[test]
fn start_configures_pins_then_interrupt_then_converter() {
    let sel = SourceSelector::new();
    let mut lp = ControlLoop::new(ControllerConfig::default(), &sel).unwrap();
    let mut rig = Rig::new();

    lp.start(&mut rig.hw, &mut rig.sink).unwrap();

    assert_eq!(
        rig.hw.calls,
        vec![
            HwCall::ConfigurePins,
            HwCall::Motor(MotorState::Off),
            HwCall::ConfigureInterrupt,
            HwCall::ConfigureConverter,
        ]
    );
    assert!(matches!(
        rig.sink.events.as_slice(),
        [AppEvent::Started(SourceSelection::Sensor)]
    ));
}

// ── Decision ──────────────────────────────────────────────────

#[test]
fn cold_sensor_runs_motor() {
    let sel = SourceSelector::new();
    let mut lp = ControlLoop::new(ControllerConfig::default(), &sel).unwrap();
    let mut rig = Rig::new();
    rig.readings(200, 128);

    let r = rig.step(&mut lp);

    assert_eq!((r.raw_reference, r.raw_sensor), (200, 128));
    assert!(approx(r.reference_c, 392.16), "ref {}", r.reference_c);
    assert!(approx(r.sensor_c, 250.98), "sensor {}", r.sensor_c);
    assert_eq!(r.motor, MotorState::On);
    assert_eq!(rig.hw.motor_writes(), vec![MotorState::On]);
    assert_eq!(
        rig.sink.count(|e| matches!(
            e,
            AppEvent::MotorChanged { from: MotorState::Off, to: MotorState::On }
        )),
        1
    );
}

#[test]
fn hot_sensor_keeps_motor_off() {
    let sel = SourceSelector::new();
    let mut lp = ControlLoop::new(ControllerConfig::default(), &sel).unwrap();
    let mut rig = Rig::new();
    rig.readings(100, 200);

    let r = rig.step(&mut lp);

    assert!(approx(r.sensor_c, 392.16));
    assert!(approx(r.reference_c, 196.08));
    assert_eq!(r.motor, MotorState::Off);
    assert_eq!(rig.hw.motor_writes(), vec![MotorState::Off]);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::MotorChanged { .. })), 0);
}

#[test]
fn equal_readings_keep_motor_off() {
    let sel = SourceSelector::new();
    let mut lp = ControlLoop::new(ControllerConfig::default(), &sel).unwrap();
    let mut rig = Rig::new();
    rig.readings(150, 150);
    assert_eq!(rig.step(&mut lp).motor, MotorState::Off);
}

#[test]
fn potentiometer_sampled_before_sensor() {
    let sel = SourceSelector::new();
    let mut lp = ControlLoop::new(ControllerConfig::default(), &sel).unwrap();
    let mut rig = Rig::new();
    rig.readings(20, 10);
    rig.step(&mut lp);

    assert_eq!(
        &rig.hw.calls[..6],
        &[
            HwCall::SelectChannel(AnalogChannel::Potentiometer),
            HwCall::StartConversion,
            HwCall::ClearComplete,
            HwCall::SelectChannel(AnalogChannel::Sensor),
            HwCall::StartConversion,
            HwCall::ClearComplete,
        ]
    );
    // Motor is written after both samples and before any digit.
    assert_eq!(rig.hw.calls[6], HwCall::Motor(MotorState::On));
    assert!(matches!(rig.hw.calls[7], HwCall::Digit(..)));
}

#[test]
fn motor_rewritten_every_iteration_but_edge_reported_once() {
    let sel = SourceSelector::new();
    let mut lp = ControlLoop::new(ControllerConfig::default(), &sel).unwrap();
    let mut rig = Rig::new();
    rig.readings(200, 128);

    for _ in 0..5 {
        rig.step(&mut lp);
    }
    assert_eq!(rig.hw.motor_writes(), vec![MotorState::On; 5]);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::MotorChanged { .. })), 1);

    rig.readings(100, 200);
    rig.step(&mut lp);
    assert_eq!(rig.hw.motor_writes().last(), Some(&MotorState::Off));
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::MotorChanged { .. })), 2);
    assert_eq!(lp.iteration_count(), 6);
}

#[test]
fn slow_conversion_is_waited_out() {
    let sel = SourceSelector::new();
    let mut lp = ControlLoop::new(ControllerConfig::default(), &sel).unwrap();
    let mut rig = Rig::new();
    rig.hw.busy_polls = 500;
    rig.readings(77, 33);

    let r = rig.step(&mut lp);
    assert_eq!((r.raw_reference, r.raw_sensor), (77, 33));
    assert_eq!(lp.adc_timeouts(), 0);
}

// ── Display ───────────────────────────────────────────────────

#[test]
fn digits_strobed_tenths_units_tens_with_settle() {
    let sel = SourceSelector::new();
    let mut lp = ControlLoop::new(ControllerConfig::default(), &sel).unwrap();
    let mut rig = Rig::new();
    // 12 counts → 23.53 °C → 23.5
    rig.readings(100, 12);

    let r = rig.step(&mut lp);

    assert_eq!(r.digits, DigitTriple { tens: 2, units: 3, tenths: 5 });
    assert_eq!(
        rig.hw.digit_writes(),
        vec![
            (DigitPosition::Tenths, 5),
            (DigitPosition::Units, 3),
            (DigitPosition::Tens, 2),
        ]
    );
    assert_eq!(rig.delay.holds_ms, vec![5, 5, 5]);
}

#[test]
fn button_changes_display_only() {
    let sel = SourceSelector::new();
    let mut lp = ControlLoop::new(ControllerConfig::default(), &sel).unwrap();
    let mut rig = Rig::new();
    rig.readings(100, 12);

    let before = rig.step(&mut lp);
    sel.toggle();
    let after = rig.step(&mut lp);

    assert_eq!(before.source, SourceSelection::Sensor);
    assert_eq!(after.source, SourceSelection::Potentiometer);
    assert_eq!(before.motor, after.motor);
    assert_eq!(rig.hw.motor_writes(), vec![MotorState::On, MotorState::On]);
    // 100 counts → 196.08 → tens digit 19
    assert_eq!(after.digits, DigitTriple { tens: 19, units: 6, tenths: 0 });
    assert_eq!(
        rig.sink.count(|e| matches!(
            e,
            AppEvent::SourceChanged {
                from: SourceSelection::Sensor,
                to: SourceSelection::Potentiometer
            }
        )),
        1
    );
}

#[test]
fn double_press_between_iterations_is_invisible() {
    let sel = SourceSelector::new();
    let mut lp = ControlLoop::new(ControllerConfig::default(), &sel).unwrap();
    let mut rig = Rig::new();
    rig.readings(100, 12);

    rig.step(&mut lp);
    sel.toggle();
    sel.toggle();
    let r = rig.step(&mut lp);

    assert_eq!(r.source, SourceSelection::Sensor);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::SourceChanged { .. })), 0);
}

#[test]
fn overflow_reported_on_entry_only() {
    let sel = SourceSelector::new();
    let mut lp = ControlLoop::new(ControllerConfig::default(), &sel).unwrap();
    let mut rig = Rig::new();
    rig.readings(200, 128);

    for _ in 0..3 {
        let r = rig.step(&mut lp);
        assert!(r.digits.overflowed());
    }
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::DisplayOverflow(_))), 1);

    // Back in range, then out again.
    rig.readings(200, 12);
    rig.step(&mut lp);
    rig.readings(200, 128);
    rig.step(&mut lp);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::DisplayOverflow(_))), 2);
}

#[test]
fn clamp_policy_pins_display_at_999() {
    let sel = SourceSelector::new();
    let cfg = ControllerConfig {
        overflow_policy: OverflowPolicy::Clamp,
        ..ControllerConfig::default()
    };
    let mut lp = ControlLoop::new(cfg, &sel).unwrap();
    let mut rig = Rig::new();
    rig.readings(200, 128);

    let r = rig.step(&mut lp);
    assert_eq!(r.digits, DigitTriple { tens: 9, units: 9, tenths: 9 });
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::DisplayOverflow(_))), 0);
}

// ── Timing ────────────────────────────────────────────────────

#[test]
fn default_iteration_fits_refresh_budget() {
    let sel = SourceSelector::new();
    let mut lp = ControlLoop::new(ControllerConfig::default(), &sel).unwrap();
    let mut rig = Rig::new();
    rig.readings(50, 50);

    let r = rig.step(&mut lp);
    assert_eq!(r.elapsed_us, 15_000);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::RefreshOverrun { .. })), 0);
}

#[test]
fn slow_converter_reports_overrun_once() {
    let sel = SourceSelector::new();
    let mut lp = ControlLoop::new(ControllerConfig::default(), &sel).unwrap();
    let mut rig = Rig::new();
    rig.hw.conversion_us = 1_000;
    rig.readings(50, 50);

    for _ in 0..3 {
        rig.step(&mut lp);
    }
    let overruns: Vec<_> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::RefreshOverrun { elapsed_us, budget_us } => Some((*elapsed_us, *budget_us)),
            _ => None,
        })
        .collect();
    assert_eq!(overruns, vec![(17_000, 16_000)]);
}

// ── Converter timeout ─────────────────────────────────────────

#[test]
fn stuck_converter_falls_back_to_last_good_sample() {
    let sel = SourceSelector::new();
    let cfg = ControllerConfig {
        adc_max_polls: Some(10),
        ..ControllerConfig::default()
    };
    let mut lp = ControlLoop::new(cfg, &sel).unwrap();
    let mut rig = Rig::new();
    rig.readings(200, 128);
    rig.step(&mut lp);

    rig.hw.stuck = true;
    rig.readings(0, 255);
    let r = rig.step(&mut lp);

    assert_eq!((r.raw_reference, r.raw_sensor), (200, 128));
    assert_eq!(r.motor, MotorState::On);
    assert_eq!(lp.adc_timeouts(), 2);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::AdcTimeout(_))), 2);
}

// ── Telemetry ─────────────────────────────────────────────────

#[test]
fn telemetry_every_n_iterations() {
    let sel = SourceSelector::new();
    let cfg = ControllerConfig {
        telemetry_interval_iterations: 3,
        ..ControllerConfig::default()
    };
    let mut lp = ControlLoop::new(cfg, &sel).unwrap();
    let mut rig = Rig::new();
    rig.readings(200, 128);

    for _ in 0..7 {
        rig.step(&mut lp);
    }
    let at: Vec<u64> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Telemetry(t) => Some(t.iteration),
            _ => None,
        })
        .collect();
    assert_eq!(at, vec![3, 6]);
}

#[test]
fn telemetry_disabled_with_zero_interval() {
    let sel = SourceSelector::new();
    let cfg = ControllerConfig {
        telemetry_interval_iterations: 0,
        ..ControllerConfig::default()
    };
    let mut lp = ControlLoop::new(cfg, &sel).unwrap();
    let mut rig = Rig::new();
    for _ in 0..10 {
        rig.step(&mut lp);
    }
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::Telemetry(_))), 0);
}
