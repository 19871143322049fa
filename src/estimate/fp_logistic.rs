use crate::util::linalg::solve_linear_system;

// Royston-Altman power set for fractional polynomials
const FP_POWERS: [f64; 8] = [-2.0, -1.0, -0.5, 0.0, 0.5, 1.0, 2.0, 3.0];

const MAX_IRLS_ITER: usize = 50;
const DEVIANCE_TOL: f64 = 1e-8;
const MU_FLOOR: f64 = 1e-10;

fn fp_term(x: f64, power: f64) -> f64 {
    if power == 0.0 { x.ln() } else { x.powf(power) }
}

fn sigmoid(eta: f64) -> f64 {
    1.0 / (1.0 + (-eta).exp())
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn deviance(design: &[Vec<f64>], beta: &[f64], successes: &[f64], trials: &[f64]) -> f64 {
    design
        .iter()
        .zip(successes.iter().zip(trials.iter()))
        .map(|(row, (&y, &n))| {
            let mu = sigmoid(dot(row, beta)).clamp(MU_FLOOR, 1.0 - MU_FLOOR);
            -2.0 * (y * mu.ln() + (n - y) * (1.0 - mu).ln())
        })
        .sum()
}

/// One binomial-family IRLS fit of a fixed design matrix. `successes` may be
/// fractional (normalized score sums), which keeps the same estimating
/// equations under the quasi-binomial working model.
fn irls_fit(design: &[Vec<f64>], successes: &[f64], trials: &[f64]) -> Option<(f64, Vec<f64>)> {
    let p = design[0].len();
    let mut beta = vec![0.0; p];
    let mut dev = deviance(design, &beta, successes, trials);

    for _ in 0..MAX_IRLS_ITER {
        let mut xtwx = vec![vec![0.0; p]; p];
        let mut xtwz = vec![0.0; p];

        for (row, (&y_sum, &n)) in design.iter().zip(successes.iter().zip(trials.iter())) {
            let eta = dot(row, &beta).clamp(-10.0, 10.0);
            let mu = sigmoid(eta).clamp(MU_FLOOR, 1.0 - MU_FLOOR);
            let variance = mu * (1.0 - mu);
            let weight = n * variance;
            if weight < 1e-12 {
                continue;
            }
            let z = eta + (y_sum / n - mu) / variance;
            for a in 0..p {
                for b in 0..p {
                    xtwx[a][b] += weight * row[a] * row[b];
                }
                xtwz[a] += weight * row[a] * z;
            }
        }

        beta = solve_linear_system(xtwx, xtwz)?;
        let new_dev = deviance(design, &beta, successes, trials);
        let converged = (dev - new_dev).abs() < DEVIANCE_TOL;
        dev = new_dev;
        if converged {
            break;
        }
    }

    if !dev.is_finite() {
        return None;
    }
    let fitted = design.iter().map(|row| sigmoid(dot(row, &beta))).collect();
    Some((dev, fitted))
}

/// Degree-2 fractional-polynomial logistic fit of per-dose efficacy on the
/// dose level: logit(q) = b0 + b1*t1(x) + b2*t2(x), over all power pairs
/// from the standard set (a repeated power contributes x^p and x^p ln x).
/// Returns the fitted per-dose values of the smallest-deviance model, or
/// None when the data cannot support a three-parameter fit.
pub fn fit_fp_logistic(x: &[f64], successes: &[f64], trials: &[f64]) -> Option<Vec<f64>> {
    if x.len() < 3 {
        return None;
    }

    let mut best: Option<(f64, Vec<f64>)> = None;
    for i in 0..FP_POWERS.len() {
        for j in i..FP_POWERS.len() {
            let p1 = FP_POWERS[i];
            let p2 = FP_POWERS[j];
            let design: Vec<Vec<f64>> = x
                .iter()
                .map(|&xi| {
                    let t1 = fp_term(xi, p1);
                    let t2 = if i == j {
                        fp_term(xi, p2) * xi.ln()
                    } else {
                        fp_term(xi, p2)
                    };
                    vec![1.0, t1, t2]
                })
                .collect();
            if design
                .iter()
                .any(|row| row.iter().any(|v| !v.is_finite()))
            {
                continue;
            }

            if let Some((dev, fitted)) = irls_fit(&design, successes, trials) {
                let better = match &best {
                    Some((best_dev, _)) => dev < *best_dev,
                    None => true,
                };
                if better {
                    best = Some((dev, fitted));
                }
            }
        }
    }

    best.map(|(_, fitted)| fitted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_three_doses() {
        assert!(fit_fp_logistic(&[1., 2.], &[1., 2.], &[6., 6.]).is_none());
    }

    #[test]
    fn fitted_values_are_probabilities() {
        let x = vec![1., 2., 3., 4.];
        let successes = vec![0.5, 2.0, 3.5, 4.0];
        let trials = vec![6., 6., 6., 6.];
        let fitted = fit_fp_logistic(&x, &successes, &trials).expect("failed to fit fp model");
        assert_eq!(fitted.len(), 4);
        for q in &fitted {
            assert!(*q > 0.0 && *q < 1.0);
        }
    }

    #[test]
    fn tracks_a_monotone_dose_response() {
        let x = vec![1., 2., 3., 4., 5.];
        let trials = vec![12., 12., 12., 12., 12.];
        let successes = vec![1.0, 3.0, 6.0, 9.0, 11.0];
        let fitted =
            fit_fp_logistic(&x, &successes, &trials).expect("failed to fit increasing data");
        for (f, (&s, &n)) in fitted.iter().zip(successes.iter().zip(trials.iter())) {
            let observed = s / n;
            assert!((f - observed).abs() < 0.1, "fitted {f} vs observed {observed}");
        }
        assert!(fitted[4] > fitted[0] + 0.5);
    }

    #[test]
    fn recovers_a_logistic_dose_response() {
        // Data generated from logit(q) = -2 + 0.8*x, expressed as expected
        // counts so the fit should land near the truth
        let x = vec![1., 2., 3., 4., 5., 6.];
        let n = 50.0;
        let truth: Vec<f64> = x.iter().map(|&xi| sigmoid(-2.0 + 0.8 * xi)).collect();
        let successes: Vec<f64> = truth.iter().map(|q| q * n).collect();
        let trials = vec![n; 6];
        let fitted = fit_fp_logistic(&x, &successes, &trials).expect("failed to fit logistic data");
        for (f, t) in fitted.iter().zip(truth.iter()) {
            assert!((f - t).abs() < 0.02, "fitted {f} vs truth {t}");
        }
    }
}
