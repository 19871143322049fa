//----------------------------------------
// simulate mod types
//----------------------------------------
use crate::design::types::DesignVariant;

/// Aggregated operating characteristics over all replications, plus the
/// ground truth and resolved design parameters echoed back for downstream
/// reporting. Built once by the orchestrator; read-only afterward.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub variant: DesignVariant,
    pub tox_prob: Vec<Vec<f64>>,
    pub eff_prob: Vec<Vec<f64>>,
    /// True normalized equivalent toxicity score per dose.
    pub n_ets: Vec<f64>,
    /// True normalized equivalent efficacy score per dose.
    pub n_ees: Vec<f64>,
    pub phi: f64,
    pub phi1: f64,
    pub phi2: f64,
    pub delta: f64,
    pub delta1: f64,
    pub lambda1: f64,
    pub lambda2: f64,
    pub eta1: f64,
    pub tau_t: f64,
    pub tau_e: f64,
    pub accrual: f64,
    /// Mean number of patients treated per dose.
    pub n_patient: Vec<f64>,
    /// Percentage of replications selecting each dose as the OBD.
    pub prop_select: Vec<f64>,
    /// Percentage of replications stopping without a selection.
    pub prop_stop: f64,
    /// Mean trial duration.
    pub duration: f64,
    pub n_sim: usize,
}
