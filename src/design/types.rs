//----------------------------------------
// design mod types
//----------------------------------------

/// The four members of the design family. Binary designs are the
/// two-category reduction of the graded ones; the discriminant is carried
/// through to the result struct for downstream consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignVariant {
    Boinet,
    TiteBoinet,
    Gboinet,
    TiteGboinet,
}

impl DesignVariant {
    pub fn is_tite(&self) -> bool {
        matches!(self, DesignVariant::TiteBoinet | DesignVariant::TiteGboinet)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTimeDist {
    Weibull,
    Uniform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollTimeDist {
    Uniform,
    Exponential,
}

/// How per-dose efficacy probabilities are estimated at selection time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimationMethod {
    ObsProb,
    FpLogistic,
}

/// How the optimal biological dose is picked among admissible doses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObdMethod {
    MaxEffProb,
    UtilityWeighted,
    UtilityTruncatedLinear,
    UtilityScoring,
}
