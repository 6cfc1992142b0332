//! Multiplexed 3-digit numeric display.
//!
//! [`encoder`] turns a temperature into a [`encoder::DigitTriple`];
//! [`multiplexer`] strobes the three positions through the
//! [`OutputPort`](crate::app::ports::OutputPort).

pub mod encoder;
pub mod multiplexer;
