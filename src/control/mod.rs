//! Control algorithms.

pub mod decision;
