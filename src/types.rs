mod filter_input;
mod flight_phase;
mod sensor_faults;
mod state_estimate;

pub use crate::types::filter_input::FilterInput;
pub use crate::types::flight_phase::FlightPhase;
pub use crate::types::sensor_faults::SensorFaultVector;
pub use crate::types::state_estimate::StateEstimate;
