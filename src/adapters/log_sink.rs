//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART / USB-CDC in production, stderr on host).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | iter={} | sensor={}→{:.1}\u{00b0}C | ref={}→{:.1}\u{00b0}C | \
                     motor={:?} | showing={:?} \"{}\" | adc_timeouts={}",
                    t.iteration,
                    t.raw_sensor,
                    t.sensor_c,
                    t.raw_reference,
                    t.reference_c,
                    t.motor,
                    t.source,
                    t.digits.to_text(),
                    t.adc_timeouts,
                );
            }
            AppEvent::MotorChanged { from, to } => {
                info!("MOTOR | {:?} -> {:?}", from, to);
            }
            AppEvent::SourceChanged { from, to } => {
                info!("SOURCE | {:?} -> {:?}", from, to);
            }
            AppEvent::DisplayOverflow(digits) => {
                warn!("DISPLAY | value {} exceeds three digits", digits.to_text());
            }
            AppEvent::AdcTimeout(err) => {
                warn!("ADC | {}, reusing last sample", err);
            }
            AppEvent::RefreshOverrun { elapsed_us, budget_us } => {
                warn!("REFRESH | iteration took {}us (budget {}us)", elapsed_us, budget_us);
            }
            AppEvent::Started(source) => {
                info!("START | showing={:?}", source);
            }
        }
    }
}
