use crate::matrix::SingularMatrixError;

/// A per-tick filter failure.
///
/// Every variant is recoverable: the corrected state and covariance are always left at a
/// well-defined value and the next tick runs normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// The innovation covariance of the active barometers was singular; the update was skipped.
    #[error("innovation covariance is singular, update skipped")]
    SingularInnovation(#[from] SingularMatrixError),
    /// More barometers are faulty than a reduced observation model exists for.
    #[error("{faulty} barometers are faulty but at most {tolerated} can be eliminated")]
    UnsupportedBarometerFaults { faulty: usize, tolerated: usize },
    /// Every barometer is faulty and the height-loss policy rejects prediction-only ticks.
    #[error("all barometers are faulty")]
    AllBarometersFaulty,
    /// An update was requested without any trusted observation.
    #[error("no active observation for the update")]
    NoActiveObservations,
}
