//! Turns raw SI sensor samples into the averaged acceleration and heights the filter consumes.
//!
//! Faulty sensors are left out of every average; when a sensor class is lost entirely the
//! [`SensorAggregator`] holds the last good value.

mod aggregate;
mod barometric;
mod median;

pub use crate::preprocessing::aggregate::{
    average_acceleration, average_pressure, AggregatedSample, SensorAggregator,
};
pub use crate::preprocessing::barometric::{
    altitude_above_ground, heights_above_ground, vertical_acceleration,
};
pub use crate::preprocessing::median::MedianFilter;
