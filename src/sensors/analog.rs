//! Analog sampler for the LM35 sensor and the reference potentiometer.
//!
//! Drives the converter through [`ConverterPort`]: select channel, start a
//! conversion, busy-wait on the completion flag, clear it, and keep the top
//! byte of the left-adjusted result (8-bit resolution).
//!
//! ## Waiting
//!
//! By default the busy-wait is unbounded: a converter that never completes
//! hangs the main loop. Setting `adc_max_polls` bounds the wait; on timeout
//! the last good sample for that channel is returned instead and the
//! timeout is recorded for the caller to report.
//!
//! Only the main loop may call [`AnalogSampler::sample`] — channel selection
//! mutates shared converter configuration.

use log::warn;

use crate::app::ports::ConverterPort;
use crate::config::ControllerConfig;
use crate::error::SensorError;

/// 8-bit converter reading, 0..=255.
pub type RawSample = u8;

/// Degrees Celsius (or the potentiometer's equivalent on the same scale).
pub type Temperature = f32;

/// Converter input channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalogChannel {
    /// Reference potentiometer (channel 0).
    Potentiometer,
    /// LM35 temperature sensor (channel 1).
    Sensor,
}

impl AnalogChannel {
    pub const fn index(self) -> u8 {
        match self {
            Self::Potentiometer => 0,
            Self::Sensor => 1,
        }
    }
}

/// Linear transform shared by both channels:
/// `raw / full_scale * reference_volts * celsius_per_volt`.
pub fn to_temperature(raw: RawSample, cfg: &ControllerConfig) -> Temperature {
    raw as f32 / cfg.adc_full_scale * cfg.adc_reference_volts * cfg.sensor_celsius_per_volt
}

pub struct AnalogSampler {
    max_polls: Option<u32>,
    last_good: [RawSample; 2],
    last_timeout: Option<SensorError>,
    timeouts: u32,
}

impl AnalogSampler {
    pub fn new(cfg: &ControllerConfig) -> Self {
        Self {
            max_polls: cfg.adc_max_polls,
            last_good: [0; 2],
            last_timeout: None,
            timeouts: 0,
        }
    }

    /// Take one blocking sample from `channel`.
    pub fn sample(&mut self, port: &mut impl ConverterPort, channel: AnalogChannel) -> RawSample {
        port.select_channel(channel);
        port.start_conversion();

        let mut polls: u32 = 0;
        while !port.conversion_complete() {
            polls = polls.saturating_add(1);
            if self.max_polls.is_some_and(|max| polls >= max) {
                return self.fallback(channel, polls);
            }
            core::hint::spin_loop();
        }
        port.clear_conversion_complete();

        let raw = (port.read_result() >> 8) as RawSample;
        self.last_good[channel.index() as usize] = raw;
        raw
    }

    /// Timeout recorded by the most recent `sample` calls, if any.
    /// Cleared on read.
    pub fn take_timeout(&mut self) -> Option<SensorError> {
        self.last_timeout.take()
    }

    /// Total conversions abandoned since boot.
    pub fn timeout_count(&self) -> u32 {
        self.timeouts
    }

    fn fallback(&mut self, channel: AnalogChannel, polls: u32) -> RawSample {
        let err = SensorError::ConversionTimeout {
            channel: channel.index(),
            polls,
        };
        let raw = self.last_good[channel.index() as usize];
        warn!("{}; using last good sample {}", err, raw);
        self.timeouts = self.timeouts.saturating_add(1);
        self.last_timeout = Some(err);
        raw
    }
}
