//----------------------------------------
// trial mod types
//----------------------------------------

/// One per-cohort decision as recorded in the trial history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoseDecision {
    Escalate,
    Stay,
    Deescalate,
    EliminateCurrent,
    StopSafety,
    StopFutility,
    StopMaxEnrolled,
}

/// Why a trial ended without recommending a dose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Safety,
    AllEliminated,
    NoAdmissibleDose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialOutcome {
    /// Recommended dose, 1-based.
    Selected { dose: usize },
    Stopped { reason: StopReason },
}

/// One enrolled patient. Filled at outcome generation, immutable afterward;
/// the trial history is append-only.
#[derive(Debug, Clone, Copy)]
pub struct PatientRecord {
    /// 0-based dose index.
    pub dose: usize,
    pub enroll_time: f64,
    pub tox_category: usize,
    pub eff_category: usize,
    pub tox_time: Option<f64>,
    pub eff_time: Option<f64>,
    /// Normalized severity/response weight of the drawn category.
    pub tox_score: f64,
    pub eff_score: f64,
}

/// Terminal record of a single simulated trial.
#[derive(Debug, Clone)]
pub struct TrialRun {
    pub decisions: Vec<DoseDecision>,
    pub outcome: TrialOutcome,
    pub duration: f64,
    pub n_patients: Vec<usize>,
    pub eliminated: Vec<bool>,
}
