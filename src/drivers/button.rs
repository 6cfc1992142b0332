//! Push-button source selector.
//!
//! ## Hardware
//!
//! Active-low momentary switch with the internal pull-up enabled. The GPIO
//! fires on the falling edge; the ISR flips a single atomic bit and returns.
//! There is no debounce beyond what the edge-triggered interrupt gives.
//!
//! ## Sharing
//!
//! | Context   | Access                         |
//! |-----------|--------------------------------|
//! | ISR       | sole writer, `toggle()`        |
//! | Main loop | sole reader, `current()`       |
//!
//! Every interleaving yields one of the two valid selections, so relaxed
//! ordering is sufficient and no lock is ever taken in interrupt context.

use core::sync::atomic::{AtomicBool, Ordering};

/// Which temperature the display shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSelection {
    /// The LM35 sensor reading (power-up default).
    Sensor,
    /// The reference potentiometer, scaled as a temperature.
    Potentiometer,
}

impl SourceSelection {
    fn from_bit(bit: bool) -> Self {
        if bit { Self::Potentiometer } else { Self::Sensor }
    }
}

/// Single-writer / single-reader selection flag.
pub struct SourceSelector {
    potentiometer: AtomicBool,
}

/// The selector written by [`button_isr_handler`].
pub static SOURCE_SELECTOR: SourceSelector = SourceSelector::new();

impl SourceSelector {
    pub const fn new() -> Self {
        Self {
            potentiometer: AtomicBool::new(false),
        }
    }

    /// Flip the selection. Interrupt-safe: one atomic XOR, nothing else.
    pub fn toggle(&self) {
        self.potentiometer.fetch_xor(true, Ordering::Relaxed);
    }

    /// Current selection, read once per loop iteration.
    pub fn current(&self) -> SourceSelection {
        SourceSelection::from_bit(self.potentiometer.load(Ordering::Relaxed))
    }

    /// Return to the power-up state (`Sensor`).
    pub fn reset(&self) {
        self.potentiometer.store(false, Ordering::Relaxed);
    }
}

impl Default for SourceSelector {
    fn default() -> Self {
        Self::new()
    }
}

/// ISR handler — register this on the button GPIO falling edge.
pub fn button_isr_handler() {
    SOURCE_SELECTOR.toggle();
}
