use statrs::distribution::{Beta, ContinuousCDF};

use crate::boundary::types::DecisionBoundaries;
use crate::trial::types::PatientRecord;

// Elimination posteriors are only consulted once a dose has a minimally
// informative sample
const MIN_PATIENTS_FOR_ELIMINATION: usize = 3;

/// Pending-weighted summary of one dose's data at an evaluation time.
/// Matured events contribute their full normalized weight to the score mass
/// and 1 to the effective sample size; completed no-event follow-up
/// contributes 1 to the effective sample size; patients still inside their
/// assessment window contribute the elapsed-window fraction. With complete
/// follow-up this reduces to the plain observed mean.
#[derive(Debug, Clone, Copy)]
pub struct DoseSummary {
    pub n_enrolled: usize,
    pub tox_mass: f64,
    pub tox_n: f64,
    pub eff_mass: f64,
    pub eff_n: f64,
}

impl DoseSummary {
    pub fn tox_hat(&self) -> f64 {
        if self.tox_n > 0.0 {
            self.tox_mass / self.tox_n
        } else {
            0.0
        }
    }

    pub fn eff_hat(&self) -> f64 {
        if self.eff_n > 0.0 {
            self.eff_mass / self.eff_n
        } else {
            0.0
        }
    }
}

fn endpoint_contribution(
    score: f64,
    event_time: Option<f64>,
    elapsed_raw: f64,
    tau: f64,
) -> (f64, f64) {
    let elapsed = elapsed_raw.min(tau);
    if elapsed >= tau {
        // Follow-up complete; the final grade is known
        return (score, 1.0);
    }
    match event_time {
        Some(t) if t <= elapsed => (score, 1.0),
        _ => (0.0, (elapsed / tau).max(0.0)),
    }
}

/// Summarizes the records of one dose at evaluation time `now`. Pass
/// `f64::INFINITY` for complete-follow-up (non-TITE or selection-time)
/// summaries.
pub fn summarize_dose(
    records: &[PatientRecord],
    dose: usize,
    now: f64,
    tau_t: f64,
    tau_e: f64,
) -> DoseSummary {
    let mut summary = DoseSummary {
        n_enrolled: 0,
        tox_mass: 0.0,
        tox_n: 0.0,
        eff_mass: 0.0,
        eff_n: 0.0,
    };
    for record in records.iter().filter(|r| r.dose == dose) {
        summary.n_enrolled += 1;
        let elapsed = now - record.enroll_time;
        let (t_mass, t_n) =
            endpoint_contribution(record.tox_score, record.tox_time, elapsed, tau_t);
        let (e_mass, e_n) =
            endpoint_contribution(record.eff_score, record.eff_time, elapsed, tau_e);
        summary.tox_mass += t_mass;
        summary.tox_n += t_n;
        summary.eff_mass += e_mass;
        summary.eff_n += e_n;
    }
    summary
}

/// P(p > threshold) under the Beta(1 + x, 1 + n - x) posterior. The score
/// mass `x` may be fractional for graded endpoints.
pub fn posterior_above(x: f64, n: f64, threshold: f64) -> f64 {
    if n <= 0.0 {
        return 0.0;
    }
    let beta = Beta::new(1.0 + x, 1.0 + (n - x).max(0.0)).unwrap();
    1.0 - beta.cdf(threshold)
}

/// P(p < threshold) under the Beta(1 + x, 1 + n - x) posterior.
pub fn posterior_below(x: f64, n: f64, threshold: f64) -> f64 {
    if n <= 0.0 {
        return 0.0;
    }
    let beta = Beta::new(1.0 + x, 1.0 + (n - x).max(0.0)).unwrap();
    beta.cdf(threshold)
}

/// The movement/elimination call for one cohort cycle; the state machine
/// applies dose geometry (which doses remain open) on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Escalate,
    Stay,
    Deescalate,
    EliminateForSafety,
    EliminateForFutility,
}

/// The per-cohort decision rule. Safety elimination is evaluated strictly
/// before any movement or futility check; a dose failing both safety and
/// futility in one cycle is recorded as safety-eliminated. Escalation
/// requires an open higher dose and current-dose efficacy not already past
/// eta1. Never fails: every input maps to exactly one transition.
pub fn decide(
    summary: &DoseSummary,
    boundaries: &DecisionBoundaries,
    phi: f64,
    delta1: f64,
    stopping_prob_t: f64,
    stopping_prob_e: f64,
    has_higher_open: bool,
) -> Transition {
    if summary.n_enrolled >= MIN_PATIENTS_FOR_ELIMINATION
        && posterior_above(summary.tox_mass, summary.tox_n, phi) > stopping_prob_t
    {
        return Transition::EliminateForSafety;
    }

    let tox_hat = summary.tox_hat();
    if tox_hat <= boundaries.lambda1 {
        if summary.eff_hat() <= boundaries.eta1 && has_higher_open {
            return Transition::Escalate;
        }
        return Transition::Stay;
    }
    if tox_hat >= boundaries.lambda2 {
        return Transition::Deescalate;
    }

    if summary.n_enrolled >= MIN_PATIENTS_FOR_ELIMINATION
        && posterior_below(summary.eff_mass, summary.eff_n, delta1) > stopping_prob_e
    {
        return Transition::EliminateForFutility;
    }

    Transition::Stay
}
