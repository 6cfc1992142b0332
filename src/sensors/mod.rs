//! Sensor subsystem.
//!
//! Both inputs — the LM35 and the reference potentiometer — are read through
//! the same converter and the same linear scale, see [`analog`].

pub mod analog;
