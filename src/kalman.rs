//! The altitude Kalman filter with barometer elimination.
//!
//! The state is `[altitude, velocity, acceleration]` (or accelerometer offset, depending on the
//! process noise model). The control input is the measured vertical acceleration and every
//! barometer observes the altitude directly.

mod predict;
mod state;
mod update;

#[cfg(test)]
mod tests;

pub use crate::kalman::state::{FilterState, STATES};
