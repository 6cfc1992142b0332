//! BCD-driven 3-digit display bus.
//!
//! Four shared data lines carry a BCD nibble to an external
//! BCD-to-7-segment decoder; three select lines (active HIGH) choose which
//! digit is lit. Exactly one select line is high after every
//! [`BcdDisplay::show`].
//!
//! ## Write order
//!
//! Select lines first, then data, matching the AVR board. The newly
//! selected digit briefly shows the previous nibble; at a
//! 5 ms hold per digit that is not visible.

use embedded_hal::digital::OutputPin;
use log::info;

use crate::display::multiplexer::DigitPosition;
use crate::error::ActuatorError;

pub struct BcdDisplay<P> {
    /// Bit 0 first.
    data: [P; 4],
    /// Indexed by [`DigitPosition::index`].
    select: [P; 3],
    active: Option<DigitPosition>,
}

impl<P: OutputPin> BcdDisplay<P> {
    pub fn new(data: [P; 4], select: [P; 3]) -> Self {
        Self {
            data,
            select,
            active: None,
        }
    }

    /// Deselect every digit and zero the data bus.
    pub fn init(&mut self) -> Result<(), ActuatorError> {
        self.blank()?;
        for line in &mut self.data {
            line.set_low().map_err(|_| ActuatorError::GpioWriteFailed)?;
        }
        info!("bcd_display: bus configured, all digits off");
        Ok(())
    }

    /// Light `position` with `digit`. Only the low nibble reaches the bus.
    pub fn show(&mut self, position: DigitPosition, digit: u8) -> Result<(), ActuatorError> {
        for (i, line) in self.select.iter_mut().enumerate() {
            set(line, i == position.index())?;
        }
        self.active = Some(position);

        let nibble = digit & 0x0F;
        for (bit, line) in self.data.iter_mut().enumerate() {
            set(line, nibble & (1 << bit) != 0)?;
        }
        Ok(())
    }

    /// Deselect every digit.
    pub fn blank(&mut self) -> Result<(), ActuatorError> {
        for line in &mut self.select {
            line.set_low().map_err(|_| ActuatorError::GpioWriteFailed)?;
        }
        self.active = None;
        Ok(())
    }

    /// Position currently lit, if any.
    pub fn active(&self) -> Option<DigitPosition> {
        self.active
    }
}

fn set<P: OutputPin>(line: &mut P, high: bool) -> Result<(), ActuatorError> {
    let res = if high { line.set_high() } else { line.set_low() };
    res.map_err(|_| ActuatorError::GpioWriteFailed)
}
