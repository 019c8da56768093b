//! # Altitude Kalman filter
//!
//! A vertical state estimator for rocket flight computers. It fuses the averaged vertical
//! acceleration and up to three barometric heights into altitude, velocity and acceleration,
//! eliminating barometers that upstream fault detection flagged as faulty.
//!
//! ```
//! use altitude_kalman::{AltitudeEstimator, FilterConfig, FilterInput, FlightPhase};
//!
//! let mut estimator = AltitudeEstimator::<f32, 1>::new(0.01, &FilterConfig::default());
//! let input = FilterInput::<f32, 2, 0, 1, 0>::new(0.0, [0.0], FlightPhase::Ready);
//! let estimate = estimator.step(&input).unwrap();
//! assert_eq!(estimate.altitude, 0.0);
//! ```

// Enable no_std mode.
#![cfg_attr(not(feature = "std"), no_std)]
// Ensure allow(unsafe_code) / forbid(unsafe_code) markers.
#![cfg_attr(feature = "unsafe", allow(unsafe_code))]
#![cfg_attr(not(feature = "unsafe"), forbid(unsafe_code))]
// Only enables the `doc_cfg` feature when the `docsrs` configuration attribute is defined.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod error;
mod estimator;
pub mod kalman;
mod macros;
pub mod matrix;
mod noise_schedule;
mod num_traits;
pub mod preprocessing;
mod types;

pub use crate::config::{FilterConfig, HeightLossPolicy, ProcessNoise};
pub use crate::error::FilterError;
pub use crate::estimator::AltitudeEstimator;
pub use crate::kalman::FilterState;
pub use crate::matrix::SingularMatrixError;
pub use crate::noise_schedule::{reset_on_transition, NoiseSchedule, ResetKind};
pub use crate::types::*;

pub use crate::num_traits::*;
