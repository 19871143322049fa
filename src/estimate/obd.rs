use crate::design::types::{EstimationMethod, ObdMethod};
use crate::design::validate::ResolvedDesign;
use crate::estimate::fp_logistic::fit_fp_logistic;
use crate::estimate::isotonic::pava_isotonic;
use crate::trial::decision::DoseSummary;

/// Per-dose toxicity estimates: observed mean scores monotonized across dose
/// by isotonic regression (toxicity is assumed non-decreasing in dose),
/// weighted by effective sample size. Untried doses get `None`.
pub fn estimate_toxicity(summaries: &[DoseSummary]) -> Vec<Option<f64>> {
    let tried: Vec<usize> = (0..summaries.len())
        .filter(|&d| summaries[d].n_enrolled > 0)
        .collect();
    let observed: Vec<f64> = tried.iter().map(|&d| summaries[d].tox_hat()).collect();
    let weights: Vec<f64> = tried.iter().map(|&d| summaries[d].tox_n).collect();
    let smoothed = pava_isotonic(&observed, &weights);

    let mut estimates = vec![None; summaries.len()];
    for (&d, &value) in tried.iter().zip(smoothed.iter()) {
        estimates[d] = Some(value);
    }
    estimates
}

/// Per-dose efficacy estimates under the configured method. The fractional-
/// polynomial fit needs at least three doses with data and falls back to the
/// observed rates otherwise.
pub fn estimate_efficacy(summaries: &[DoseSummary], method: EstimationMethod) -> Vec<Option<f64>> {
    let tried: Vec<usize> = (0..summaries.len())
        .filter(|&d| summaries[d].n_enrolled > 0)
        .collect();
    let observed: Vec<f64> = tried.iter().map(|&d| summaries[d].eff_hat()).collect();

    let values = match method {
        EstimationMethod::ObsProb => observed,
        EstimationMethod::FpLogistic => {
            let x: Vec<f64> = tried.iter().map(|&d| (d + 1) as f64).collect();
            let successes: Vec<f64> = tried.iter().map(|&d| summaries[d].eff_mass).collect();
            let trials: Vec<f64> = tried.iter().map(|&d| summaries[d].eff_n).collect();
            fit_fp_logistic(&x, &successes, &trials).unwrap_or(observed)
        }
    };

    let mut estimates = vec![None; summaries.len()];
    for (&d, &value) in tried.iter().zip(values.iter()) {
        estimates[d] = Some(value);
    }
    estimates
}

fn truncated_tox(p: f64, plow: f64, pupp: f64) -> f64 {
    if p <= plow {
        1.0
    } else if p >= pupp {
        0.0
    } else {
        (pupp - p) / (pupp - plow)
    }
}

fn truncated_eff(q: f64, qlow: f64, qupp: f64) -> f64 {
    if q <= qlow {
        0.0
    } else if q >= qupp {
        1.0
    } else {
        (q - qlow) / (qupp - qlow)
    }
}

/// Dose desirability given estimated toxicity `p` and efficacy `q`.
pub fn utility(p: f64, q: f64, design: &ResolvedDesign) -> f64 {
    match design.obd_method {
        ObdMethod::MaxEffProb => q,
        ObdMethod::UtilityWeighted => design.w1 * q - design.w2 * p,
        ObdMethod::UtilityTruncatedLinear => {
            truncated_eff(q, design.qlow_ast, design.qupp_ast)
                * truncated_tox(p, design.plow_ast, design.pupp_ast)
        }
        ObdMethod::UtilityScoring => {
            // 2x2 utility table; the derived corners are 100 for efficacy
            // without toxicity and 0 for toxicity without efficacy
            design.psi00 * (1.0 - p) * (1.0 - q)
                + 100.0 * (1.0 - p) * q
                + design.psi11 * p * q
        }
    }
}

/// The estimated maximum tolerated dose: the tried dose whose isotonic
/// toxicity estimate is closest to phi, ties to the lower dose.
fn estimated_mtd(tox: &[Option<f64>], phi: f64) -> Option<usize> {
    tox.iter()
        .enumerate()
        .filter_map(|(d, p)| p.map(|p| (d, (p - phi).abs())))
        .min_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .expect("attempted to compare NaN toxicity estimates")
        })
        .map(|(d, _)| d)
}

/// Selects the optimal biological dose among admissible doses (tried, not
/// eliminated, not above the estimated MTD). Returns the 0-based index, or
/// None when no dose is admissible, which is a normal trial outcome rather
/// than an error.
pub fn select_obd(
    summaries: &[DoseSummary],
    eliminated: &[bool],
    design: &ResolvedDesign,
) -> Option<usize> {
    let tox = estimate_toxicity(summaries);
    let eff = estimate_efficacy(summaries, design.estpt_method);
    let mtd = estimated_mtd(&tox, design.phi)?;

    let mut best: Option<(usize, f64)> = None;
    for d in 0..=mtd {
        if eliminated[d] {
            continue;
        }
        let (Some(p), Some(q)) = (tox[d], eff[d]) else {
            continue;
        };
        let value = utility(p, q, design);
        // Strict comparison keeps the lower dose on ties
        let improves = match best {
            Some((_, best_value)) => value > best_value,
            None => true,
        };
        if improves {
            best = Some((d, value));
        }
    }
    best.map(|(d, _)| d)
}
