/// The flight phase reported by the flight-phase state machine.
///
/// Only the pre-liftoff phases, powered flight and coasting modulate the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlightPhase {
    /// The vehicle is on the ground and being handled.
    #[default]
    Moving,
    /// The vehicle is armed and stationary on the pad.
    Ready,
    /// The motor is burning.
    Thrusting,
    /// The motor has burned out and the vehicle ascends ballistically.
    Coasting,
    /// Descent under the drogue parachute.
    Drogue,
    /// Descent under the main parachute.
    Main,
    /// The vehicle has landed.
    Touchdown,
}

impl FlightPhase {
    /// Returns `true` for phases before liftoff.
    pub const fn is_pre_liftoff(&self) -> bool {
        matches!(self, Self::Moving | Self::Ready)
    }

    /// Returns `true` for phases in which the vehicle is airborne.
    pub const fn is_airborne(&self) -> bool {
        matches!(
            self,
            Self::Thrusting | Self::Coasting | Self::Drogue | Self::Main
        )
    }
}
