use itertools::izip;
use rayon::prelude::*;
use tracing::info;

use crate::design::settings::DesignSettings;
use crate::design::validate::resolve;
use crate::error::ObdsimErr;
use crate::outcome::generate::OutcomeModel;
use crate::simulate::types::SimulationResult;
use crate::trial::run_trial::run_trial;
use crate::trial::types::{TrialOutcome, TrialRun};

/// Runs the full study: validates the configuration once, simulates n_sim
/// independent trials, and aggregates their operating characteristics.
///
/// Replication i draws from its own stream seeded with seed_sim + i, so the
/// result is bit-identical no matter how the replications are scheduled
/// across worker threads.
pub fn run_simulation(settings: &DesignSettings) -> Result<SimulationResult, ObdsimErr> {
    let design = resolve(settings)?;
    let model = OutcomeModel::new(&design)?;

    info!(
        variant = ?design.variant,
        n_dose = design.n_dose,
        n_sim = design.n_sim,
        lambda1 = design.boundaries.lambda1,
        lambda2 = design.boundaries.lambda2,
        eta1 = design.boundaries.eta1,
        "starting simulation"
    );

    let runs: Vec<TrialRun> = (0..design.n_sim)
        .into_par_iter()
        .map(|i| run_trial(&design, &model, design.seed_sim + (i as u64)))
        .collect();

    //----------------------------------------
    // Aggregate over replications
    let n_sim_f = design.n_sim as f64;
    let mut n_patient = vec![0.0; design.n_dose];
    let mut select_count = vec![0usize; design.n_dose];
    let mut stop_count = 0usize;
    let mut duration_sum = 0.0;

    for run in &runs {
        for (total, &n) in izip!(n_patient.iter_mut(), run.n_patients.iter()) {
            *total += n as f64;
        }
        match run.outcome {
            TrialOutcome::Selected { dose } => select_count[dose - 1] += 1,
            TrialOutcome::Stopped { .. } => stop_count += 1,
        }
        duration_sum += run.duration;
    }
    for total in n_patient.iter_mut() {
        *total /= n_sim_f;
    }
    let prop_select: Vec<f64> = select_count
        .iter()
        .map(|&c| 100.0 * c as f64 / n_sim_f)
        .collect();
    let prop_stop = 100.0 * stop_count as f64 / n_sim_f;
    let duration = duration_sum / n_sim_f;

    info!(prop_stop, duration, "simulation complete");

    Ok(SimulationResult {
        variant: design.variant,
        tox_prob: design.tox_prob.clone(),
        eff_prob: design.eff_prob.clone(),
        n_ets: design.true_nets.clone(),
        n_ees: design.true_nees.clone(),
        phi: design.phi,
        phi1: design.phi1,
        phi2: design.phi2,
        delta: design.delta,
        delta1: design.delta1,
        lambda1: design.boundaries.lambda1,
        lambda2: design.boundaries.lambda2,
        eta1: design.boundaries.eta1,
        tau_t: design.tau_t,
        tau_e: design.tau_e,
        accrual: design.accrual,
        n_patient,
        prop_select,
        prop_stop,
        duration,
        n_sim: design.n_sim,
    })
}
