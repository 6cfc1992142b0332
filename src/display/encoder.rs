//! Temperature → three decimal digits.
//!
//! The reading is scaled to fixed-point tenths (23.4 → 234), truncating
//! toward zero, and split into tens / units / tenths. Readings of 100.0
//! and above do not fit: under [`OverflowPolicy::Preserve`] the tens digit
//! simply exceeds 9, under [`OverflowPolicy::Clamp`] the value is held at
//! 999.

use core::fmt::Write;

use heapless::String;

use crate::config::OverflowPolicy;
use crate::sensors::analog::Temperature;

/// Largest tenths value that fits three digits.
const MAX_DISPLAY_TENTHS: u16 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DigitTriple {
    pub tens: u8,
    pub units: u8,
    pub tenths: u8,
}

impl DigitTriple {
    /// True when the tens digit cannot be shown by a single position.
    pub fn overflowed(&self) -> bool {
        self.tens > 9
    }

    /// Decimal text for logs, e.g. `23.4`, or `250.9` when overflowed.
    pub fn to_text(&self) -> String<8> {
        let mut s = String::new();
        // Widest possible value, "6553.5", fits in 8 bytes.
        let _ = write!(s, "{}{}.{}", self.tens, self.units, self.tenths);
        s
    }
}

/// Scale `temperature` to tenths and split into digits.
pub fn encode(temperature: Temperature, policy: OverflowPolicy) -> DigitTriple {
    // Float-to-int `as` truncates toward zero and saturates (negatives → 0).
    let mut value = (temperature * 10.0) as u16;
    if policy == OverflowPolicy::Clamp {
        value = value.min(MAX_DISPLAY_TENTHS);
    }
    DigitTriple {
        tens: (value / 100) as u8,
        units: ((value / 10) % 10) as u8,
        tenths: (value % 10) as u8,
    }
}
