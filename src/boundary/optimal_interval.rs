use crate::boundary::{error::BoundaryErr, types::DecisionBoundaries};
use crate::error::ObdsimErr;

/// Closed-form optimal-interval thresholds minimizing the probability of an
/// incorrect transition decision under beta-binomial sampling for each
/// endpoint. `phi1`/`phi2` are the highest clearly-subtherapeutic and lowest
/// clearly-excessive toxicity rates; `delta1` is the lowest efficacy rate of
/// interest.
pub fn derive_boundaries(
    phi: f64,
    phi1: f64,
    phi2: f64,
    delta: f64,
    delta1: f64,
) -> Result<DecisionBoundaries, ObdsimErr> {
    //----------------------------------------
    // Check arguments
    for rate in [phi, phi1, phi2, delta, delta1] {
        if rate <= 0.0 || rate >= 1.0 {
            return Err(BoundaryErr::TargetOutOfRange(rate).into());
        }
    }
    if phi1 >= phi || phi2 <= phi {
        return Err(BoundaryErr::BadToxicityTargets { phi, phi1, phi2 }.into());
    }
    if delta1 >= delta {
        return Err(BoundaryErr::BadEfficacyTargets { delta, delta1 }.into());
    }

    //----------------------------------------
    // Likelihood-ratio crossing points
    let lambda1 =
        ((1. - phi1) / (1. - phi)).ln() / ((phi * (1. - phi1)) / (phi1 * (1. - phi))).ln();
    let lambda2 =
        ((1. - phi) / (1. - phi2)).ln() / ((phi2 * (1. - phi)) / (phi * (1. - phi2))).ln();
    let eta1 = ((1. - delta1) / (1. - delta)).ln()
        / ((delta * (1. - delta1)) / (delta1 * (1. - delta))).ln();

    Ok(DecisionBoundaries {
        lambda1,
        lambda2,
        eta1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boin_reference_values() {
        // phi = 0.3 with the textbook limits 0.6*phi / 1.4*phi
        let bounds = derive_boundaries(
            0.3,  // phi
            0.18, // phi1
            0.42, // phi2
            0.6,  // delta
            0.36, // delta1
        )
        .expect("failed to derive boundaries");
        assert!((bounds.lambda1 - 0.236).abs() < 0.001);
        assert!((bounds.lambda2 - 0.358).abs() < 0.001);
        assert!((bounds.eta1 - 0.479).abs() < 0.001);
    }

    #[test]
    fn default_limit_values() {
        // phi1 = 0.1*phi, phi2 = 1.4*phi, delta1 = 0.6*delta
        let bounds = derive_boundaries(
            0.40, // phi
            0.04, // phi1
            0.56, // phi2
            0.80, // delta
            0.48, // delta1
        )
        .expect("failed to derive boundaries");
        assert!((bounds.lambda1 - 0.169517).abs() < 1e-5);
        assert!((bounds.lambda2 - 0.479650).abs() < 1e-5);
        assert!((bounds.eta1 - 0.651630).abs() < 1e-5);
    }

    #[test]
    fn ordering_holds_across_targets() {
        for i in 1..9 {
            let phi = 0.1 * (i as f64) / 2.0 + 0.05;
            let delta = 0.1 * (i as f64) / 2.0 + 0.1;
            let bounds = derive_boundaries(phi, 0.1 * phi, 1.4 * phi, delta, 0.6 * delta)
                .expect("failed to derive boundaries");
            assert!(0.1 * phi < bounds.lambda1);
            assert!(bounds.lambda1 < phi);
            assert!(phi < bounds.lambda2);
            assert!(bounds.lambda2 < 1.4 * phi);
            assert!(0.6 * delta < bounds.eta1);
            assert!(bounds.eta1 < delta);
        }
    }

    #[test]
    fn rejects_malformed_targets() {
        assert!(derive_boundaries(0.3, 0.3, 0.42, 0.6, 0.36).is_err());
        assert!(derive_boundaries(0.3, 0.18, 0.3, 0.6, 0.36).is_err());
        assert!(derive_boundaries(0.3, 0.18, 0.42, 0.6, 0.6).is_err());
        assert!(derive_boundaries(0.0, 0.18, 0.42, 0.6, 0.36).is_err());
    }
}
