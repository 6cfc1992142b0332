//! Actuator and display drivers, hardware initialisation, and the button ISR.

pub mod bcd_display;
pub mod button;
pub mod hw_init;
pub mod motor;
