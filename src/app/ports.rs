//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlLoop (domain)
//! ```
//!
//! Driven adapters (board setup, converter, output lines, event sinks,
//! clock) implement these traits. The [`ControlLoop`](super::service::ControlLoop)
//! consumes them via generics, so the domain core never touches registers
//! directly. Settle-time delays go through `embedded_hal::delay::DelayNs`
//! rather than a port of our own.

use crate::control::decision::MotorState;
use crate::display::multiplexer::DigitPosition;
use crate::error::Error;
use crate::sensors::analog::AnalogChannel;

// ───────────────────────────────────────────────────────────────
// Board port (one-time setup)
// ───────────────────────────────────────────────────────────────

/// One-shot peripheral configuration, called before the loop starts.
pub trait BoardPort {
    /// Set input/output direction of the motor, BCD and select lines and
    /// drive every output to its idle level (motor off, no digit selected).
    fn configure_pin_directions(&mut self) -> Result<(), Error>;

    /// Arm the falling-edge button interrupt and enable interrupt delivery.
    fn configure_interrupt(&mut self) -> Result<(), Error>;

    /// Reference voltage and left-adjusted result format.
    fn configure_analog_converter(&mut self) -> Result<(), Error>;
}

// ───────────────────────────────────────────────────────────────
// Converter port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// The converter's register contract. [`AnalogSampler`](crate::sensors::analog::AnalogSampler)
/// sequences these calls into a blocking single-sample read.
pub trait ConverterPort {
    /// Route `channel` to the converter input.
    fn select_channel(&mut self, channel: AnalogChannel);

    /// Begin a conversion on the selected channel.
    fn start_conversion(&mut self);

    /// Poll the completion flag.
    fn conversion_complete(&mut self) -> bool;

    /// Acknowledge the completion flag.
    fn clear_conversion_complete(&mut self);

    /// Left-adjusted conversion result; the top byte is the 8-bit sample.
    fn read_result(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the motor and the display bus.
pub trait OutputPort {
    /// Drive the motor lines.
    fn write_actuator_state(&mut self, state: MotorState);

    /// Select `position` and put `digit` on the data lines. The caller
    /// holds for the settle time.
    fn write_digit_position(&mut self, position: DigitPosition, digit: u8);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Monotonic clock used to measure loop iteration time.
pub trait TimePort {
    /// Microseconds since boot.
    fn now_us(&self) -> u64;
}
