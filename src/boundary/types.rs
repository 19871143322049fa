//----------------------------------------
// boundary mod types
//----------------------------------------

/// Decision thresholds on the normalized score scale: escalate at or below
/// `lambda1`, de-escalate at or above `lambda2`, efficacy sufficient above
/// `eta1`.
#[derive(Debug, Clone, Copy)]
pub struct DecisionBoundaries {
    pub lambda1: f64,
    pub lambda2: f64,
    pub eta1: f64,
}
