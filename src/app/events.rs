//! Outbound application events.
//!
//! The [`ControlLoop`](super::service::ControlLoop) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::control::decision::MotorState;
use crate::display::encoder::DigitTriple;
use crate::drivers::button::SourceSelection;
use crate::error::SensorError;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Setup finished; the loop is about to run.
    Started(SourceSelection),

    /// The motor decision changed. Outputs are rewritten every iteration
    /// regardless; this only marks the edge.
    MotorChanged { from: MotorState, to: MotorState },

    /// The button flipped the displayed source.
    SourceChanged { from: SourceSelection, to: SourceSelection },

    /// The displayed value no longer fits three digits.
    DisplayOverflow(DigitTriple),

    /// A conversion was abandoned and the last good sample used instead.
    AdcTimeout(SensorError),

    /// An iteration took longer than the refresh budget.
    RefreshOverrun { elapsed_us: u32, budget_us: u32 },

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time telemetry snapshot suitable for logging.
#[derive(Debug, Clone)]
pub struct TelemetryData {
    pub iteration: u64,
    pub raw_sensor: u8,
    pub raw_reference: u8,
    pub sensor_c: f32,
    pub reference_c: f32,
    pub motor: MotorState,
    pub source: SourceSelection,
    pub digits: DigitTriple,
    pub adc_timeouts: u32,
}
