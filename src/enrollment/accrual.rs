use rand::{distributions::Distribution, rngs};
use statrs::distribution::{Exp, Uniform};

use crate::design::types::EnrollTimeDist;

/// Simulates `n` inter-arrival gaps with mean `accrual`: exponential with
/// rate 1/accrual, or uniform on (0, 2*accrual). Cumulative sums of the gaps
/// give monotonically increasing enrollment timestamps.
pub fn sim_enrollment_gaps(
    n: usize,
    accrual: f64,
    dist: EnrollTimeDist,
    rng: &mut rngs::StdRng,
) -> Vec<f64> {
    match dist {
        EnrollTimeDist::Exponential => {
            let exp = Exp::new(1.0 / accrual).unwrap();
            (0..n).map(|_| exp.sample(rng)).collect()
        }
        EnrollTimeDist::Uniform => {
            let unif = Uniform::new(0.0, 2.0 * accrual).unwrap();
            (0..n).map(|_| unif.sample(rng)).collect()
        }
    }
}
