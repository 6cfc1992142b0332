//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the motor and display drivers and the converter state, exposing
//! them through [`BoardPort`], [`ConverterPort`] and [`OutputPort`]. This
//! is the only module that touches actual hardware. On non-espidf targets
//! the `hw_init` helpers are simulation stubs, and the output lines can be
//! any `embedded_hal` pin.
//!
//! ## Converter emulation
//!
//! The ESP32-S3 one-shot ADC is a single blocking call, so the conversion
//! happens in `start_conversion` and the completion flag is raised
//! immediately. The 12-bit result is shifted up to a left-adjusted 16-bit
//! word so the sampler's "top byte" contract holds unchanged. A read the
//! driver rejects is logged and leaves the flag low, so the sampler never
//! sees it as a sample: it keeps waiting, or under `adc_max_polls` falls
//! back to the last good reading.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::{BoardPort, ConverterPort, OutputPort};
use crate::control::decision::MotorState;
use crate::display::multiplexer::DigitPosition;
use crate::drivers::bcd_display::BcdDisplay;
use crate::drivers::hw_init;
use crate::drivers::motor::MotorDriver;
use crate::error::{ActuatorError, Error};
use crate::sensors::analog::AnalogChannel;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P> {
    motor: MotorDriver<P>,
    display: BcdDisplay<P>,
    adc_channel: u32,
    adc_result: u16,
    adc_complete: bool,
    adc_read_failures: u32,
    gpio_faults: u32,
    gpio_faulting: bool,
}

impl<P: OutputPin> HardwareAdapter<P> {
    pub fn new(motor: MotorDriver<P>, display: BcdDisplay<P>) -> Self {
        Self {
            motor,
            display,
            adc_channel: hw_init::ADC1_CH_POT,
            adc_result: 0,
            adc_complete: false,
            adc_read_failures: 0,
            gpio_faults: 0,
            gpio_faulting: false,
        }
    }

    /// GPIO writes that failed since boot.
    pub fn gpio_fault_count(&self) -> u32 {
        self.gpio_faults
    }

    /// True while the most recent GPIO write failed.
    pub fn is_gpio_faulting(&self) -> bool {
        self.gpio_faulting
    }

    /// ADC reads the driver rejected since boot.
    pub fn adc_read_failure_count(&self) -> u32 {
        self.adc_read_failures
    }

    pub fn motor_state(&self) -> MotorState {
        self.motor.state()
    }

    /// Count every failed write; log only on entering a fault burst. The loop
    /// rewrites every pin each iteration, so a stuck line would flood the log.
    fn record(&mut self, what: &str, res: Result<(), ActuatorError>) {
        match res {
            Ok(()) => self.gpio_faulting = false,
            Err(e) => {
                if !self.gpio_faulting {
                    warn!("{}: {}", what, e);
                }
                self.gpio_faulting = true;
                self.gpio_faults = self.gpio_faults.saturating_add(1);
            }
        }
    }
}

// ── BoardPort implementation ──────────────────────────────────

impl<P: OutputPin> BoardPort for HardwareAdapter<P> {
    fn configure_pin_directions(&mut self) -> Result<(), Error> {
        hw_init::init_button_input()?;
        self.motor.init()?;
        self.display.init()?;
        Ok(())
    }

    fn configure_interrupt(&mut self) -> Result<(), Error> {
        hw_init::init_isr_service()?;
        Ok(())
    }

    fn configure_analog_converter(&mut self) -> Result<(), Error> {
        hw_init::init_adc()?;
        Ok(())
    }
}

// ── ConverterPort implementation ──────────────────────────────

impl<P: OutputPin> ConverterPort for HardwareAdapter<P> {
    fn select_channel(&mut self, channel: AnalogChannel) {
        self.adc_channel = match channel {
            AnalogChannel::Potentiometer => hw_init::ADC1_CH_POT,
            AnalogChannel::Sensor => hw_init::ADC1_CH_SENSOR,
        };
    }

    fn start_conversion(&mut self) {
        match hw_init::adc1_read(self.adc_channel) {
            Ok(raw) => {
                self.adc_result = raw << (16 - hw_init::ADC_NATIVE_BITS);
                self.adc_complete = true;
            }
            Err(rc) => {
                // Completion stays low; the sampler's wait policy decides what happens next.
                warn!("adc: read on ADC1 channel {} failed (rc={})", self.adc_channel, rc);
                self.adc_read_failures = self.adc_read_failures.saturating_add(1);
                self.adc_complete = false;
            }
        }
    }

    fn conversion_complete(&mut self) -> bool {
        self.adc_complete
    }

    fn clear_conversion_complete(&mut self) {
        self.adc_complete = false;
    }

    fn read_result(&mut self) -> u16 {
        self.adc_result
    }
}

// ── OutputPort implementation ─────────────────────────────────

impl<P: OutputPin> OutputPort for HardwareAdapter<P> {
    fn write_actuator_state(&mut self, state: MotorState) {
        let res = self.motor.set(state);
        self.record("motor", res);
    }

    fn write_digit_position(&mut self, position: DigitPosition, digit: u8) {
        let res = self.display.show(position, digit);
        self.record("display", res);
    }
}
