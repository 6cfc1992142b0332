//! Control loop — the hexagonal core.
//!
//! [`ControlLoop`] owns the sampler, the display multiplexer and the edge
//! state used for event reporting. All I/O flows through port traits
//! injected at call sites, making the entire loop testable with mock
//! adapters.
//!
//! ```text
//!  ConverterPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                    │        ControlLoop        │
//!     OutputPort ◀── │ sample · decide · display │ ◀── SourceSelector (ISR)
//!                    └──────────────────────────┘
//! ```
//!
//! ## Iteration order
//!
//! 1. sample potentiometer (channel 0), then sensor (channel 1)
//! 2. decide and drive the motor from that pair
//! 3. read the source selector, encode the chosen reading
//! 4. strobe the three digits
//!
//! The decision always uses both readings; the selector only affects what
//! is shown.

use embedded_hal::delay::DelayNs;
use log::{info, trace};

use crate::config::ControllerConfig;
use crate::control::decision::{MotorState, decide};
use crate::display::encoder::{DigitTriple, encode};
use crate::display::multiplexer::DisplayMultiplexer;
use crate::drivers::button::{SourceSelection, SourceSelector};
use crate::error::Error;
use crate::sensors::analog::{AnalogChannel, AnalogSampler, RawSample, Temperature, to_temperature};

use super::events::{AppEvent, TelemetryData};
use super::ports::{BoardPort, ConverterPort, EventSink, OutputPort, TimePort};

/// Everything one iteration observed and commanded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationReport {
    pub raw_reference: RawSample,
    pub raw_sensor: RawSample,
    pub reference_c: Temperature,
    pub sensor_c: Temperature,
    pub motor: MotorState,
    pub source: SourceSelection,
    pub digits: DigitTriple,
    pub elapsed_us: u32,
}

pub struct ControlLoop<'a> {
    config: ControllerConfig,
    sampler: AnalogSampler,
    display: DisplayMultiplexer,
    selector: &'a SourceSelector,
    iteration: u64,
    last_motor: MotorState,
    last_source: SourceSelection,
    overflowing: bool,
    overrunning: bool,
}

impl<'a> ControlLoop<'a> {
    /// Validate `config` and build the loop around `selector` (normally
    /// [`SOURCE_SELECTOR`](crate::drivers::button::SOURCE_SELECTOR)).
    pub fn new(config: ControllerConfig, selector: &'a SourceSelector) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            sampler: AnalogSampler::new(&config),
            display: DisplayMultiplexer::new(&config),
            selector,
            iteration: 0,
            last_motor: MotorState::Off,
            last_source: selector.current(),
            overflowing: false,
            overrunning: false,
            config,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// One-time setup: pins (motor off), button interrupt, converter.
    /// The display starts on the sensor reading.
    pub fn start(&mut self, hw: &mut impl BoardPort, sink: &mut impl EventSink) -> Result<(), Error> {
        self.selector.reset();
        hw.configure_pin_directions()?;
        hw.configure_interrupt()?;
        hw.configure_analog_converter()?;

        self.last_motor = MotorState::Off;
        self.last_source = self.selector.current();
        sink.emit(&AppEvent::Started(self.last_source));
        info!("ControlLoop started, showing {:?}", self.last_source);
        Ok(())
    }

    /// Iterate forever.
    pub fn run(
        &mut self,
        hw: &mut (impl ConverterPort + OutputPort),
        delay: &mut impl DelayNs,
        clock: &impl TimePort,
        sink: &mut impl EventSink,
    ) -> ! {
        loop {
            self.iterate(hw, delay, clock, sink);
        }
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// Run one sample → decide → display cycle.
    ///
    /// `hw` implements both [`ConverterPort`] and [`OutputPort`]; one
    /// mutable borrow covers sampling and output.
    pub fn iterate(
        &mut self,
        hw: &mut (impl ConverterPort + OutputPort),
        delay: &mut impl DelayNs,
        clock: &impl TimePort,
        sink: &mut impl EventSink,
    ) -> IterationReport {
        let started_us = clock.now_us();
        self.iteration += 1;

        // 1. Both samples, potentiometer first
        let raw_reference = self.sample(hw, AnalogChannel::Potentiometer, sink);
        let raw_sensor = self.sample(hw, AnalogChannel::Sensor, sink);
        let reference_c = to_temperature(raw_reference, &self.config);
        let sensor_c = to_temperature(raw_sensor, &self.config);

        // 2. Decision, written every iteration
        let motor = decide(sensor_c, reference_c);
        hw.write_actuator_state(motor);
        if motor != self.last_motor {
            sink.emit(&AppEvent::MotorChanged {
                from: self.last_motor,
                to: motor,
            });
            self.last_motor = motor;
        }

        // 3. Displayed source
        let source = self.selector.current();
        if source != self.last_source {
            sink.emit(&AppEvent::SourceChanged {
                from: self.last_source,
                to: source,
            });
            self.last_source = source;
        }
        let shown_c = match source {
            SourceSelection::Sensor => sensor_c,
            SourceSelection::Potentiometer => reference_c,
        };
        let digits = encode(shown_c, self.config.overflow_policy);
        if digits.overflowed() && !self.overflowing {
            sink.emit(&AppEvent::DisplayOverflow(digits));
        }
        self.overflowing = digits.overflowed();

        // 4. Multiplex
        self.display.render(hw, delay, &digits);

        let elapsed_us = clock.now_us().saturating_sub(started_us).min(u64::from(u32::MAX)) as u32;
        self.check_refresh(elapsed_us, sink);

        let report = IterationReport {
            raw_reference,
            raw_sensor,
            reference_c,
            sensor_c,
            motor,
            source,
            digits,
            elapsed_us,
        };
        trace!("iteration {}: {:?}", self.iteration, report);

        let every = u64::from(self.config.telemetry_interval_iterations);
        if every > 0 && self.iteration % every == 0 {
            sink.emit(&AppEvent::Telemetry(self.build_telemetry(&report)));
        }

        report
    }

    // ── Queries ───────────────────────────────────────────────

    /// Total iterations executed since startup.
    pub fn iteration_count(&self) -> u64 {
        self.iteration
    }

    /// Conversions abandoned under the bounded ADC wait.
    pub fn adc_timeouts(&self) -> u32 {
        self.sampler.timeout_count()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Build a telemetry snapshot from an iteration report.
    pub fn build_telemetry(&self, report: &IterationReport) -> TelemetryData {
        TelemetryData {
            iteration: self.iteration,
            raw_sensor: report.raw_sensor,
            raw_reference: report.raw_reference,
            sensor_c: report.sensor_c,
            reference_c: report.reference_c,
            motor: report.motor,
            source: report.source,
            digits: report.digits,
            adc_timeouts: self.sampler.timeout_count(),
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn sample(
        &mut self,
        hw: &mut impl ConverterPort,
        channel: AnalogChannel,
        sink: &mut impl EventSink,
    ) -> RawSample {
        let raw = self.sampler.sample(hw, channel);
        if let Some(err) = self.sampler.take_timeout() {
            sink.emit(&AppEvent::AdcTimeout(err));
        }
        raw
    }

    fn check_refresh(&mut self, elapsed_us: u32, sink: &mut impl EventSink) {
        let budget_us = self.config.refresh_budget_us;
        let over = elapsed_us > budget_us;
        if over && !self.overrunning {
            sink.emit(&AppEvent::RefreshOverrun { elapsed_us, budget_us });
        }
        self.overrunning = over;
    }
}
