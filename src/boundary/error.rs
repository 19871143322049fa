//----------------------------------------
// boundary errors
//----------------------------------------
use crate::error::ObdsimErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoundaryErr {
    #[error(
        "toxicity target {phi} must lie strictly between its tolerance limits \
        (phi1 {phi1}, phi2 {phi2})"
    )]
    BadToxicityTargets { phi: f64, phi1: f64, phi2: f64 },
    #[error("minimum efficacy rate delta1 {delta1} must be strictly below target delta {delta}")]
    BadEfficacyTargets { delta: f64, delta1: f64 },
    #[error("target rates should be in (0, 1); got {0}")]
    TargetOutOfRange(f64),
}

impl Into<ObdsimErr> for BoundaryErr {
    fn into(self) -> ObdsimErr {
        ObdsimErr::Boundary(self)
    }
}
