//----------------------------------------
// Crate error type
//----------------------------------------
use crate::boundary::error::BoundaryErr;
use crate::design::error::ConfigErr;
use crate::outcome::error::OutcomeErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObdsimErr {
    #[error("while validating design settings: {0}")]
    Config(ConfigErr),
    #[error("while deriving decision boundaries: {0}")]
    Boundary(BoundaryErr),
    #[error("while building outcome model: {0}")]
    Outcome(OutcomeErr),
}
