//! Display multiplexer.
//!
//! One call to [`DisplayMultiplexer::render`] lights each position once, in
//! the fixed order tenths → units → tens, holding each for the configured
//! settle time. Persistence of vision does the rest, as long as the whole
//! loop iteration stays inside the refresh budget (~16 ms).
//!
//! There is no double-buffering: a position's data lines are only valid
//! while its select line is asserted, so bus noise during a transition can
//! cause a one-frame glitch. That is cosmetic only.

use embedded_hal::delay::DelayNs;

use super::encoder::DigitTriple;
use crate::app::ports::OutputPort;
use crate::config::ControllerConfig;

/// Physical digit positions, right to left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitPosition {
    Tenths,
    Units,
    Tens,
}

impl DigitPosition {
    /// Activation order within one refresh.
    pub const RENDER_ORDER: [Self; 3] = [Self::Tenths, Self::Units, Self::Tens];

    pub const fn index(self) -> usize {
        match self {
            Self::Tenths => 0,
            Self::Units => 1,
            Self::Tens => 2,
        }
    }

    fn digit_of(self, digits: &DigitTriple) -> u8 {
        match self {
            Self::Tenths => digits.tenths,
            Self::Units => digits.units,
            Self::Tens => digits.tens,
        }
    }
}

pub struct DisplayMultiplexer {
    settle_ms: u32,
}

impl DisplayMultiplexer {
    pub fn new(cfg: &ControllerConfig) -> Self {
        Self {
            settle_ms: cfg.digit_settle_ms,
        }
    }

    /// Strobe all three positions once.
    pub fn render(&self, out: &mut impl OutputPort, delay: &mut impl DelayNs, digits: &DigitTriple) {
        for position in DigitPosition::RENDER_ORDER {
            out.write_digit_position(position, position.digit_of(digits));
            delay.delay_ms(self.settle_ms);
        }
    }

    /// Time spent holding digits per refresh, in microseconds.
    pub fn frame_hold_us(&self) -> u32 {
        self.settle_ms.saturating_mul(1000).saturating_mul(DigitPosition::RENDER_ORDER.len() as u32)
    }
}
