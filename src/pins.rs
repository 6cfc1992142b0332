//! GPIO / peripheral pin assignments for the thermomotor board.
//!
//! Single source of truth for the wiring. `hw_init` derives the button and
//! ADC1 channels from it; `main.rs` takes the matching `io.gpioN` fields
//! for the output lines and asserts them against this map at compile time,
//! so a change here must be mirrored there or the firmware will not build.
//!
//! The numbering is the ESP32-S3 port of the AVR board wiring; the
//! AVR port/bit each line replaces is noted alongside.

// ---------------------------------------------------------------------------
// Motor driver (two lines driven together)
// ---------------------------------------------------------------------------

/// Digital output: motor driver input A (was PD2).
pub const MOTOR_A_GPIO: i32 = 4;
/// Digital output: motor driver input B (was PD3).
pub const MOTOR_B_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Multiplexed display — BCD data bus to the 7-segment decoder
// ---------------------------------------------------------------------------

/// BCD bit 0 (was PD4).
pub const BCD_BIT0_GPIO: i32 = 6;
/// BCD bit 1 (was PD5).
pub const BCD_BIT1_GPIO: i32 = 7;
/// BCD bit 2 (was PD6).
pub const BCD_BIT2_GPIO: i32 = 15;
/// BCD bit 3 (was PD7).
pub const BCD_BIT3_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// Multiplexed display — digit select lines (active HIGH)
// ---------------------------------------------------------------------------

/// Right-most position, shows tenths (was PB3).
pub const DIGIT_TENTHS_GPIO: i32 = 10;
/// Middle position, shows units (was PB4).
pub const DIGIT_UNITS_GPIO: i32 = 11;
/// Left-most position, shows tens (was PB5).
pub const DIGIT_TENS_GPIO: i32 = 12;

// ---------------------------------------------------------------------------
// Analog inputs (ADC1)
// ---------------------------------------------------------------------------

/// Reference potentiometer wiper (ADC1 channel 0).
pub const POT_ADC_GPIO: i32 = 1;
/// LM35 temperature sensor (ADC1 channel 1).
pub const SENSOR_ADC_GPIO: i32 = 2;

/// ADC1 channel for a GPIO. On the ESP32-S3, GPIO 1..=10 carry ADC1
/// channels 0..=9.
pub const fn adc1_channel(gpio: i32) -> u32 {
    (gpio - 1) as u32
}

// ---------------------------------------------------------------------------
// User button (active-low with internal pull-up)
// ---------------------------------------------------------------------------

/// Momentary push-button that toggles the displayed source (was INT0).
pub const BUTTON_GPIO: i32 = 14;
