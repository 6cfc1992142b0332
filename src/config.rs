//! Controller configuration parameters
//!
//! All tunable constants for the sampling, decision and display loop.
//! There is no persistence: the firmware boots with [`ControllerConfig::default()`]
//! and every value resets on power-up.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What the digit encoder does with readings of 100.0 and above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Let the tens digit exceed 9 (the BCD lines then carry its low nibble).
    Preserve,
    /// Clamp the tenths value to 999 so the display shows 99.9.
    Clamp,
}

/// Core controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    // --- Analog front end ---
    /// Converter reference voltage (volts)
    pub adc_reference_volts: f32,
    /// Counts at full scale for an 8-bit result
    pub adc_full_scale: f32,
    /// Sensor sensitivity expressed as degrees per volt (10 mV/°C = 100)
    pub sensor_celsius_per_volt: f32,
    /// Give up waiting for a conversion after this many polls.
    /// `None` waits forever.
    pub adc_max_polls: Option<u32>,

    // --- Display ---
    /// Hold time per digit position (milliseconds)
    pub digit_settle_ms: u32,
    /// Upper bound for one loop iteration before flicker becomes visible (microseconds)
    pub refresh_budget_us: u32,
    /// Behaviour for temperatures of 100.0 and above
    pub overflow_policy: OverflowPolicy,

    // --- Telemetry ---
    /// Emit a telemetry event every N loop iterations (0 disables)
    pub telemetry_interval_iterations: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            // Analog front end
            adc_reference_volts: 5.0,
            adc_full_scale: 255.0,
            sensor_celsius_per_volt: 100.0,
            adc_max_polls: None,

            // Display
            digit_settle_ms: 5,
            refresh_budget_us: 16_000,
            overflow_policy: OverflowPolicy::Preserve,

            // Telemetry
            telemetry_interval_iterations: 50, // ~0.75 s at 3 x 5 ms per frame
        }
    }
}

impl ControllerConfig {
    /// Reject values that would make the conversion math or the display
    /// refresh meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !positive(self.adc_reference_volts) {
            return Err(ConfigError::ValidationFailed("adc_reference_volts must be > 0"));
        }
        if !positive(self.adc_full_scale) {
            return Err(ConfigError::ValidationFailed("adc_full_scale must be > 0"));
        }
        if !positive(self.sensor_celsius_per_volt) {
            return Err(ConfigError::ValidationFailed("sensor_celsius_per_volt must be > 0"));
        }
        if self.adc_max_polls == Some(0) {
            return Err(ConfigError::ValidationFailed("adc_max_polls must be > 0 when set"));
        }
        if self.digit_settle_ms == 0 {
            return Err(ConfigError::ValidationFailed("digit_settle_ms must be > 0"));
        }
        if self.digit_settle_ms.saturating_mul(3).saturating_mul(1000) > self.refresh_budget_us {
            return Err(ConfigError::ValidationFailed(
                "three digit settle times exceed refresh_budget_us",
            ));
        }
        Ok(())
    }

    /// Degrees represented by one converter count.
    pub fn celsius_per_count(&self) -> f32 {
        self.adc_reference_volts / self.adc_full_scale * self.sensor_celsius_per_volt
    }
}

fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}
