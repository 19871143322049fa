//----------------------------------------
// design errors
//----------------------------------------
use crate::error::ObdsimErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigErr {
    #[error("n_dose must be positive")]
    NoDoses,
    #[error("start_dose {start_dose} outside [1, {n_dose}]")]
    BadStartDose { start_dose: usize, n_dose: usize },
    #[error("size_cohort and n_cohort must be positive")]
    EmptyTrial,
    #[error("n_sim must be positive")]
    NoReplications,
    #[error(
        "probability matrix needs one row per outcome category; got {rows} rows \
        for {weights} weights"
    )]
    MatrixWeightShape { rows: usize, weights: usize },
    #[error("probability matrix row {row} has {got} doses; expected {expected}")]
    RaggedMatrix {
        row: usize,
        got: usize,
        expected: usize,
    },
    #[error("probability {value} at category {row}, dose {dose} outside [0, 1]")]
    ProbabilityOutOfRange { row: usize, dose: usize, value: f64 },
    #[error("category probabilities for dose {dose} sum to {sum}; expected 1")]
    ColumnSum { dose: usize, sum: f64 },
    #[error("weight vectors must be non-negative and non-decreasing with a positive maximum")]
    BadWeights,
    #[error("te_corr {0} outside [-1, 1]")]
    BadCorrelation(f64),
    #[error("assessment windows and accrual must be positive")]
    BadTimeScale,
    #[error("alpha_t1 and alpha_e1 must lie in (0, 1)")]
    BadEventTimeFraction,
    #[error("stopping probabilities must lie in (0, 1]")]
    BadStoppingProb,
    #[error("utility weights w1 and w2 must be non-negative")]
    BadUtilityWeights,
    #[error("utility thresholds must satisfy plow_ast < pupp_ast and qlow_ast < qupp_ast")]
    BadUtilityThresholds,
    #[error("utility table corners psi00 {psi00} and psi11 {psi11} must lie in [0, 100]")]
    BadUtilityTable { psi00: f64, psi11: f64 },
}

impl Into<ObdsimErr> for ConfigErr {
    fn into(self) -> ObdsimErr {
        ObdsimErr::Config(self)
    }
}
