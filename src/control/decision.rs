//! Motor actuation decision.
//!
//! Pure comparison of the measured temperature against the reference set on
//! the potentiometer. There is deliberately no hysteresis band: near the
//! crossover the output follows input noise and may chatter.

use crate::sensors::analog::Temperature;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorState {
    Off,
    On,
}

impl MotorState {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl From<bool> for MotorState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

/// Run the motor while the sensor is strictly colder than the reference.
pub fn decide(t_sensor: Temperature, t_reference: Temperature) -> MotorState {
    MotorState::from(t_sensor < t_reference)
}
