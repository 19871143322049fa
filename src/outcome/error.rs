//----------------------------------------
// outcome errors
//----------------------------------------
use crate::error::ObdsimErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutcomeErr {
    #[error("failed to build categorical sampler for dose {dose}: {msg}")]
    BadCategorical { dose: usize, msg: String },
}

impl Into<ObdsimErr> for OutcomeErr {
    fn into(self) -> ObdsimErr {
        ObdsimErr::Outcome(self)
    }
}
