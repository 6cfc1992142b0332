//! Motor driver — two digital lines switched together.
//!
//! The motor stage is fed from two parallel outputs so either half of the
//! driver sees the same command. There is no speed control: the motor is
//! either fully on or off.
//!
//! ## Contract
//!
//! This is a dumb actuator. The decision to run comes from the control
//! loop, which re-asserts the state on every iteration.

use embedded_hal::digital::OutputPin;
use log::info;

use crate::control::decision::MotorState;
use crate::error::ActuatorError;

pub struct MotorDriver<P> {
    lines: [P; 2],
    state: MotorState,
}

impl<P: OutputPin> MotorDriver<P> {
    pub fn new(line_a: P, line_b: P) -> Self {
        Self {
            lines: [line_a, line_b],
            state: MotorState::Off,
        }
    }

    /// Force both lines low. Called once during pin setup.
    pub fn init(&mut self) -> Result<(), ActuatorError> {
        self.set(MotorState::Off)?;
        info!("motor: lines configured, motor off");
        Ok(())
    }

    /// Drive both lines to `state`. Writes the pins even when the state
    /// has not changed.
    pub fn set(&mut self, state: MotorState) -> Result<(), ActuatorError> {
        for line in &mut self.lines {
            let res = if state.is_on() { line.set_high() } else { line.set_low() };
            res.map_err(|_| ActuatorError::GpioWriteFailed)?;
        }
        self.state = state;
        Ok(())
    }

    pub fn state(&self) -> MotorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_on()
    }
}
