use crate::boundary::optimal_interval::derive_boundaries;
use crate::boundary::types::DecisionBoundaries;
use crate::design::error::ConfigErr;
use crate::design::settings::DesignSettings;
use crate::design::types::{
    DesignVariant, EnrollTimeDist, EstimationMethod, EventTimeDist, ObdMethod,
};
use crate::error::ObdsimErr;
use crate::outcome::scores::normalized_equivalent_score;

/// A validated design: defaults filled in, boundaries derived, true
/// normalized scores computed once. Immutable for the life of a simulation
/// run.
#[derive(Debug, Clone)]
pub struct ResolvedDesign {
    pub variant: DesignVariant,
    pub n_dose: usize,
    pub start_dose: usize,
    pub size_cohort: usize,
    pub n_cohort: usize,
    pub tox_prob: Vec<Vec<f64>>,
    pub eff_prob: Vec<Vec<f64>>,
    pub sev_weight: Vec<f64>,
    pub res_weight: Vec<f64>,
    pub true_nets: Vec<f64>,
    pub true_nees: Vec<f64>,
    pub phi: f64,
    pub phi1: f64,
    pub phi2: f64,
    pub delta: f64,
    pub delta1: f64,
    pub boundaries: DecisionBoundaries,
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
    pub plow_ast: f64,
    pub pupp_ast: f64,
    pub qlow_ast: f64,
    pub qupp_ast: f64,
    pub psi00: f64,
    pub psi11: f64,
    pub n_sim: usize,
    pub seed_sim: u64,
}

const COLUMN_SUM_TOL: f64 = 1e-6;

fn check_matrix(
    matrix: &Vec<Vec<f64>>,
    weight: &Vec<f64>,
    n_dose: usize,
) -> Result<(), ObdsimErr> {
    if matrix.len() != weight.len() {
        return Err(ConfigErr::MatrixWeightShape {
            rows: matrix.len(),
            weights: weight.len(),
        }
        .into());
    }
    for (row, probs) in matrix.iter().enumerate() {
        if probs.len() != n_dose {
            return Err(ConfigErr::RaggedMatrix {
                row,
                got: probs.len(),
                expected: n_dose,
            }
            .into());
        }
        for (dose, &value) in probs.iter().enumerate() {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigErr::ProbabilityOutOfRange { row, dose, value }.into());
            }
        }
    }
    for dose in 0..n_dose {
        let sum: f64 = matrix.iter().map(|row| row[dose]).sum();
        if (sum - 1.0).abs() > COLUMN_SUM_TOL {
            return Err(ConfigErr::ColumnSum { dose, sum }.into());
        }
    }
    Ok(())
}

fn check_weights(weight: &Vec<f64>) -> Result<(), ObdsimErr> {
    let non_negative = weight.iter().all(|&w| w >= 0.0);
    let non_decreasing = weight.windows(2).all(|w| w[0] <= w[1]);
    let positive_max = weight.iter().cloned().fold(f64::MIN, f64::max) > 0.0;
    if !(non_negative && non_decreasing && positive_max) {
        return Err(ConfigErr::BadWeights.into());
    }
    Ok(())
}

/// Resolves raw settings into a validated design. This is the single place
/// configuration errors can surface; the simulation core never fails once
/// resolution succeeds.
pub fn resolve(settings: &DesignSettings) -> Result<ResolvedDesign, ObdsimErr> {
    //----------------------------------------
    // Trial geometry
    if settings.n_dose == 0 {
        return Err(ConfigErr::NoDoses.into());
    }
    if settings.start_dose < 1 || settings.start_dose > settings.n_dose {
        return Err(ConfigErr::BadStartDose {
            start_dose: settings.start_dose,
            n_dose: settings.n_dose,
        }
        .into());
    }
    if settings.size_cohort == 0 || settings.n_cohort == 0 {
        return Err(ConfigErr::EmptyTrial.into());
    }
    if settings.n_sim == 0 {
        return Err(ConfigErr::NoReplications.into());
    }

    //----------------------------------------
    // Ground truth matrices and weights
    check_weights(&settings.sev_weight)?;
    check_weights(&settings.res_weight)?;
    check_matrix(&settings.tox_prob, &settings.sev_weight, settings.n_dose)?;
    check_matrix(&settings.eff_prob, &settings.res_weight, settings.n_dose)?;

    //----------------------------------------
    // Time scales and event-time generation
    if settings.tau_t <= 0.0 || settings.tau_e <= 0.0 || settings.accrual <= 0.0 {
        return Err(ConfigErr::BadTimeScale.into());
    }
    if settings.variant.is_tite() {
        if settings.te_corr < -1.0 || settings.te_corr > 1.0 {
            return Err(ConfigErr::BadCorrelation(settings.te_corr).into());
        }
        let alpha_ok = |a: f64| a > 0.0 && a < 1.0;
        if !alpha_ok(settings.alpha_t1) || !alpha_ok(settings.alpha_e1) {
            return Err(ConfigErr::BadEventTimeFraction.into());
        }
    }

    //----------------------------------------
    // Stopping and selection parameters
    let prob_ok = |p: f64| p > 0.0 && p <= 1.0;
    if !prob_ok(settings.stopping_prob_t) || !prob_ok(settings.stopping_prob_e) {
        return Err(ConfigErr::BadStoppingProb.into());
    }
    if settings.w1 < 0.0 || settings.w2 < 0.0 {
        return Err(ConfigErr::BadUtilityWeights.into());
    }
    if !(0.0..=100.0).contains(&settings.psi00) || !(0.0..=100.0).contains(&settings.psi11) {
        return Err(ConfigErr::BadUtilityTable {
            psi00: settings.psi00,
            psi11: settings.psi11,
        }
        .into());
    }

    //----------------------------------------
    // Derived defaults and boundaries
    let phi = settings.phi;
    let delta = settings.delta;
    let phi1 = settings.phi1.unwrap_or(0.1 * phi);
    let phi2 = settings.phi2.unwrap_or(1.4 * phi);
    let delta1 = settings.delta1.unwrap_or(0.6 * delta);
    let boundaries = derive_boundaries(phi, phi1, phi2, delta, delta1)?;

    let plow_ast = settings.plow_ast.unwrap_or(phi1);
    let pupp_ast = settings.pupp_ast.unwrap_or(phi2);
    let qlow_ast = settings.qlow_ast.unwrap_or(delta1 / 2.0);
    let qupp_ast = settings.qupp_ast.unwrap_or(delta);
    if plow_ast >= pupp_ast || qlow_ast >= qupp_ast {
        return Err(ConfigErr::BadUtilityThresholds.into());
    }

    //----------------------------------------
    // True normalized equivalent scores, computed once per dose
    let column = |matrix: &Vec<Vec<f64>>, dose: usize| -> Vec<f64> {
        matrix.iter().map(|row| row[dose]).collect()
    };
    let true_nets: Vec<f64> = (0..settings.n_dose)
        .map(|d| normalized_equivalent_score(&column(&settings.tox_prob, d), &settings.sev_weight))
        .collect();
    let true_nees: Vec<f64> = (0..settings.n_dose)
        .map(|d| normalized_equivalent_score(&column(&settings.eff_prob, d), &settings.res_weight))
        .collect();

    Ok(ResolvedDesign {
        variant: settings.variant,
        n_dose: settings.n_dose,
        start_dose: settings.start_dose,
        size_cohort: settings.size_cohort,
        n_cohort: settings.n_cohort,
        tox_prob: settings.tox_prob.clone(),
        eff_prob: settings.eff_prob.clone(),
        sev_weight: settings.sev_weight.clone(),
        res_weight: settings.res_weight.clone(),
        true_nets,
        true_nees,
        phi,
        phi1,
        phi2,
        delta,
        delta1,
        boundaries,
        alpha_t1: settings.alpha_t1,
        alpha_e1: settings.alpha_e1,
        tau_t: settings.tau_t,
        tau_e: settings.tau_e,
        te_corr: settings.te_corr,
        gen_event_time: settings.gen_event_time,
        accrual: settings.accrual,
        gen_enroll_time: settings.gen_enroll_time,
        stopping_npts: settings.stopping_npts,
        stopping_prob_t: settings.stopping_prob_t,
        stopping_prob_e: settings.stopping_prob_e,
        estpt_method: settings.estpt_method,
        obd_method: settings.obd_method,
        w1: settings.w1,
        w2: settings.w2,
        plow_ast,
        pupp_ast,
        qlow_ast,
        qupp_ast,
        psi00: settings.psi00,
        psi11: settings.psi11,
        n_sim: settings.n_sim,
        seed_sim: settings.seed_sim,
    })
}
