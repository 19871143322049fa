use crate::design::types::{
    DesignVariant, EnrollTimeDist, EstimationMethod, EventTimeDist, ObdMethod,
};

/// Full configuration of one simulation study. Optional fields default from
/// the targets when left as `None` (phi1 = 0.1*phi, phi2 = 1.4*phi,
/// delta1 = 0.6*delta, and the truncated-linear thresholds from those).
///
/// Probability matrices are row-per-category, column-per-dose; every column
/// must sum to one.
#[derive(Debug, Clone)]
pub struct DesignSettings {
    pub variant: DesignVariant,
    pub n_dose: usize,
    pub start_dose: usize,
    pub size_cohort: usize,
    pub n_cohort: usize,
    pub tox_prob: Vec<Vec<f64>>,
    pub eff_prob: Vec<Vec<f64>>,
    pub sev_weight: Vec<f64>,
    pub res_weight: Vec<f64>,
    pub phi: f64,
    pub phi1: Option<f64>,
    pub phi2: Option<f64>,
    pub delta: f64,
    pub delta1: Option<f64>,
    pub alpha_t1: f64,
    pub alpha_e1: f64,
    pub tau_t: f64,
    pub tau_e: f64,
    pub te_corr: f64,
    pub gen_event_time: EventTimeDist,
    pub accrual: f64,
    pub gen_enroll_time: EnrollTimeDist,
    pub stopping_npts: usize,
    pub stopping_prob_t: f64,
    pub stopping_prob_e: f64,
    pub estpt_method: EstimationMethod,
    pub obd_method: ObdMethod,
    pub w1: f64,
    pub w2: f64,
    pub plow_ast: Option<f64>,
    pub pupp_ast: Option<f64>,
    pub qlow_ast: Option<f64>,
    pub qupp_ast: Option<f64>,
    pub psi00: f64,
    pub psi11: f64,
    pub n_sim: usize,
    pub seed_sim: u64,
}

/// Two-category matrix for a binary endpoint: row 0 is "no event", row 1 is
/// "event".
fn binary_matrix(event_prob: &[f64]) -> Vec<Vec<f64>> {
    let no_event = event_prob.iter().map(|p| 1.0 - p).collect();
    vec![no_event, event_prob.to_vec()]
}

impl DesignSettings {
    /// Graded (ordinal-outcome) design without event times.
    pub fn gboinet(
        tox_prob: Vec<Vec<f64>>,
        eff_prob: Vec<Vec<f64>>,
        sev_weight: Vec<f64>,
        res_weight: Vec<f64>,
    ) -> DesignSettings {
        let n_dose = tox_prob.first().map(|row| row.len()).unwrap_or(0);
        DesignSettings {
            variant: DesignVariant::Gboinet,
            n_dose,
            start_dose: 1,
            size_cohort: 3,
            n_cohort: 12,
            tox_prob,
            eff_prob,
            sev_weight,
            res_weight,
            phi: 0.3,
            phi1: None,
            phi2: None,
            delta: 0.6,
            delta1: None,
            alpha_t1: 0.5,
            alpha_e1: 0.5,
            tau_t: 30.0,
            tau_e: 45.0,
            te_corr: 0.2,
            gen_event_time: EventTimeDist::Weibull,
            accrual: 10.0,
            gen_enroll_time: EnrollTimeDist::Uniform,
            stopping_npts: 36,
            stopping_prob_t: 0.95,
            stopping_prob_e: 0.90,
            estpt_method: EstimationMethod::ObsProb,
            obd_method: ObdMethod::MaxEffProb,
            w1: 0.33,
            w2: 1.09,
            plow_ast: None,
            pupp_ast: None,
            qlow_ast: None,
            qupp_ast: None,
            psi00: 40.0,
            psi11: 60.0,
            n_sim: 1000,
            seed_sim: 100,
        }
    }

    /// Graded design with event-time generation and pending-data decisions.
    pub fn tite_gboinet(
        tox_prob: Vec<Vec<f64>>,
        eff_prob: Vec<Vec<f64>>,
        sev_weight: Vec<f64>,
        res_weight: Vec<f64>,
    ) -> DesignSettings {
        DesignSettings {
            variant: DesignVariant::TiteGboinet,
            ..DesignSettings::gboinet(tox_prob, eff_prob, sev_weight, res_weight)
        }
    }

    /// Binary design: per-dose event probabilities become the degenerate
    /// two-category matrices with weights {0, 1}, so a binary trial is
    /// exactly the two-category reduction of the graded one.
    pub fn boinet(tox_prob: Vec<f64>, eff_prob: Vec<f64>) -> DesignSettings {
        DesignSettings {
            variant: DesignVariant::Boinet,
            ..DesignSettings::gboinet(
                binary_matrix(&tox_prob),
                binary_matrix(&eff_prob),
                vec![0.0, 1.0],
                vec![0.0, 1.0],
            )
        }
    }

    /// Binary design with event-time generation and pending-data decisions.
    pub fn tite_boinet(tox_prob: Vec<f64>, eff_prob: Vec<f64>) -> DesignSettings {
        DesignSettings {
            variant: DesignVariant::TiteBoinet,
            ..DesignSettings::boinet(tox_prob, eff_prob)
        }
    }
}

impl Default for DesignSettings {
    fn default() -> Self {
        DesignSettings::boinet(
            vec![0.02, 0.08, 0.15, 0.25, 0.40], // toxicity probability per dose
            vec![0.10, 0.20, 0.40, 0.55, 0.60], // efficacy probability per dose
        )
    }
}
