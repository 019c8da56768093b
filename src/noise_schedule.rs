//! Flight-phase dependent measurement noise and phase-transition resets.

use crate::num_traits::FilterScalar;
use crate::types::FlightPhase;

/// Schedules the barometric measurement noise `R` from the flight phase and the estimated velocity.
///
/// While coasting, the nominal noise is scaled by a velocity factor: below `low_velocity` it is
/// pinned at `low_velocity_factor^exponent`, above `high_velocity` at `high_velocity_factor^exponent`,
/// and in between it follows the line through both breakpoints raised to `exponent`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseSchedule<T> {
    /// The measurement noise during powered flight and the base value while coasting.
    pub nominal: T,
    /// The measurement noise before liftoff.
    pub initial: T,
    /// The velocity below which the coasting factor is pinned, in m/s.
    pub low_velocity: T,
    /// The velocity above which the coasting factor is pinned, in m/s.
    pub high_velocity: T,
    /// The factor at and below `low_velocity`, before shaping.
    pub low_velocity_factor: T,
    /// The factor at and above `high_velocity`, before shaping.
    pub high_velocity_factor: T,
    /// The power-law shaping exponent.
    pub exponent: i32,
}

impl<T> NoiseSchedule<T>
where
    T: FilterScalar,
{
    /// Returns the measurement noise for the phase, or `None` if the phase keeps the current value.
    ///
    /// ## Arguments
    /// * `phase` - The current flight phase.
    /// * `velocity` - The corrected vertical velocity of the previous tick.
    pub fn measurement_noise(&self, phase: FlightPhase, velocity: T) -> Option<T> {
        match phase {
            FlightPhase::Moving | FlightPhase::Ready => Some(self.initial),
            FlightPhase::Thrusting => Some(self.nominal),
            FlightPhase::Coasting => Some(self.nominal * self.velocity_factor(velocity)),
            FlightPhase::Drogue | FlightPhase::Main | FlightPhase::Touchdown => None,
        }
    }

    /// Calculates the shaped coasting factor for the given velocity.
    pub fn velocity_factor(&self, velocity: T) -> T {
        let factor = if velocity < self.low_velocity {
            self.low_velocity_factor
        } else if velocity < self.high_velocity {
            let slope = (self.low_velocity_factor - self.high_velocity_factor)
                / (self.low_velocity - self.high_velocity);
            let offset = self.high_velocity_factor - slope * self.high_velocity;
            slope * velocity + offset
        } else {
            self.high_velocity_factor
        };

        factor.powi(self.exponent)
    }
}

/// The covariance reset a phase transition requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetKind {
    /// Zero the state and reseed the whole covariance.
    Full,
    /// Reseed the altitude and velocity covariance and clear the cross terms.
    Ignition,
}

/// Determines the reset triggered by entering `next` from `previous`.
///
/// Resets only fire on the tick a phase is entered.
pub fn reset_on_transition(previous: Option<FlightPhase>, next: FlightPhase) -> Option<ResetKind> {
    if previous == Some(next) {
        return None;
    }

    match next {
        FlightPhase::Ready => Some(ResetKind::Full),
        FlightPhase::Thrusting => Some(ResetKind::Ignition),
        _ => None,
    }
}
