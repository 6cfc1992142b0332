//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements     | Connects to                    |
//! |------------|----------------|--------------------------------|
//! | `hardware` | BoardPort      | GPIO directions, button ISR    |
//! |            | ConverterPort  | ESP32 ADC1 oneshot             |
//! |            | OutputPort     | Motor lines, BCD display bus   |
//! | `log_sink` | EventSink      | Serial log output              |
//! | `time`     | TimePort       | ESP32 system timer             |

pub mod hardware;
pub mod log_sink;
pub mod time;
