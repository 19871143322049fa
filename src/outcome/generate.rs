use rand::{
    distributions::{Distribution, WeightedIndex},
    rngs,
};

use crate::design::types::EventTimeDist;
use crate::design::validate::ResolvedDesign;
use crate::error::ObdsimErr;
use crate::outcome::error::OutcomeErr;
use crate::outcome::event_time::{WindowedEventDist, copula_uniform_pair};

/// One patient's generated outcomes. Category 0 is "no event"; for TITE
/// variants a non-zero category always carries an event time within the
/// assessment window.
#[derive(Debug, Clone, Copy)]
pub struct PatientOutcome {
    pub tox_category: usize,
    pub eff_category: usize,
    pub tox_time: Option<f64>,
    pub eff_time: Option<f64>,
}

/// Per-dose sampling tables, built once at model construction.
#[derive(Debug, Clone)]
struct DoseSampler {
    tox_index: WeightedIndex<f64>,
    eff_index: WeightedIndex<f64>,
    // Conditional category draw given an event, categories >= 1
    tox_event_index: Option<WeightedIndex<f64>>,
    eff_event_index: Option<WeightedIndex<f64>>,
    tox_event: WindowedEventDist,
    eff_event: WindowedEventDist,
}

/// The outcome-generation strategy shared by the four design variants: one
/// categorical draw per endpoint for binary/graded designs, one correlated
/// event-time pair through the Gaussian copula for the TITE designs.
#[derive(Debug, Clone)]
pub struct OutcomeModel {
    tite: bool,
    te_corr: f64,
    samplers: Vec<DoseSampler>,
}

fn categorical(probs: &[f64], dose: usize) -> Result<WeightedIndex<f64>, ObdsimErr> {
    WeightedIndex::new(probs.iter().cloned()).map_err(|e| {
        OutcomeErr::BadCategorical {
            dose,
            msg: format!("{e:?}"),
        }
        .into()
    })
}

fn conditional_categorical(
    probs: &[f64],
    dose: usize,
) -> Result<Option<WeightedIndex<f64>>, ObdsimErr> {
    let event_mass: f64 = probs[1..].iter().sum();
    if event_mass <= 0.0 {
        return Ok(None);
    }
    categorical(&probs[1..], dose).map(Some)
}

impl OutcomeModel {
    pub fn new(design: &ResolvedDesign) -> Result<OutcomeModel, ObdsimErr> {
        let column = |matrix: &Vec<Vec<f64>>, dose: usize| -> Vec<f64> {
            matrix.iter().map(|row| row[dose]).collect()
        };

        let mut samplers = Vec::with_capacity(design.n_dose);
        for dose in 0..design.n_dose {
            let tox_col = column(&design.tox_prob, dose);
            let eff_col = column(&design.eff_prob, dose);
            let p_tox_event = 1.0 - tox_col[0];
            let p_eff_event = 1.0 - eff_col[0];

            let (tox_event, eff_event) = match design.gen_event_time {
                EventTimeDist::Weibull => (
                    WindowedEventDist::weibull(p_tox_event, design.alpha_t1, design.tau_t),
                    WindowedEventDist::weibull(p_eff_event, design.alpha_e1, design.tau_e),
                ),
                EventTimeDist::Uniform => (
                    WindowedEventDist::uniform(p_tox_event, design.tau_t),
                    WindowedEventDist::uniform(p_eff_event, design.tau_e),
                ),
            };

            samplers.push(DoseSampler {
                tox_index: categorical(&tox_col, dose)?,
                eff_index: categorical(&eff_col, dose)?,
                tox_event_index: conditional_categorical(&tox_col, dose)?,
                eff_event_index: conditional_categorical(&eff_col, dose)?,
                tox_event,
                eff_event,
            });
        }

        Ok(OutcomeModel {
            tite: design.variant.is_tite(),
            te_corr: design.te_corr,
            samplers,
        })
    }

    /// Draws one patient's outcomes at the given dose (0-based).
    pub fn draw(&self, dose: usize, rng: &mut rngs::StdRng) -> PatientOutcome {
        let sampler = &self.samplers[dose];

        if !self.tite {
            return PatientOutcome {
                tox_category: sampler.tox_index.sample(rng),
                eff_category: sampler.eff_index.sample(rng),
                tox_time: None,
                eff_time: None,
            };
        }

        //----------------------------------------
        // Correlated event occurrence and timing, then the ordinal grade
        // conditional on an event
        let (u_tox, u_eff) = copula_uniform_pair(self.te_corr, rng);

        let (tox_category, tox_time) = match sampler.tox_event.event_time(u_tox) {
            Some(t) => {
                let index = sampler
                    .tox_event_index
                    .as_ref()
                    .expect("an event implies positive event mass");
                (index.sample(rng) + 1, Some(t))
            }
            None => (0, None),
        };
        let (eff_category, eff_time) = match sampler.eff_event.event_time(u_eff) {
            Some(t) => {
                let index = sampler
                    .eff_event_index
                    .as_ref()
                    .expect("an event implies positive event mass");
                (index.sample(rng) + 1, Some(t))
            }
            None => (0, None),
        };

        PatientOutcome {
            tox_category,
            eff_category,
            tox_time,
            eff_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::settings::DesignSettings;
    use crate::design::validate::resolve;
    use rand::SeedableRng;

    fn graded_settings() -> DesignSettings {
        DesignSettings::gboinet(
            vec![
                vec![0.94, 0.87, 0.79, 0.68],
                vec![0.05, 0.10, 0.15, 0.20],
                vec![0.01, 0.03, 0.05, 0.10],
                vec![0.00, 0.00, 0.01, 0.02],
            ],
            vec![
                vec![0.64, 0.52, 0.45, 0.35],
                vec![0.30, 0.40, 0.40, 0.40],
                vec![0.05, 0.07, 0.15, 0.20],
                vec![0.01, 0.01, 0.00, 0.05],
            ],
            vec![0.00, 0.50, 1.00, 1.50],
            vec![0.00, 0.25, 1.00, 3.00],
        )
    }

    #[test]
    fn non_tite_draws_have_no_event_times() {
        let design = resolve(&graded_settings()).expect("failed to resolve settings");
        let model = OutcomeModel::new(&design).expect("failed to build outcome model");
        let mut rng = rngs::StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let outcome = model.draw(2, &mut rng);
            assert!(outcome.tox_time.is_none());
            assert!(outcome.eff_time.is_none());
            assert!(outcome.tox_category < 4);
            assert!(outcome.eff_category < 4);
        }
    }

    #[test]
    fn tite_events_carry_times_within_windows() {
        let mut settings = graded_settings();
        settings.variant = crate::design::types::DesignVariant::TiteGboinet;
        settings.tau_t = 84.0;
        settings.tau_e = 168.0;
        let design = resolve(&settings).expect("failed to resolve settings");
        let model = OutcomeModel::new(&design).expect("failed to build outcome model");
        let mut rng = rngs::StdRng::seed_from_u64(12);
        let mut saw_event = false;
        for _ in 0..300 {
            let outcome = model.draw(3, &mut rng);
            match outcome.tox_time {
                Some(t) => {
                    saw_event = true;
                    assert!(outcome.tox_category >= 1);
                    assert!(t > 0.0 && t <= 84.0);
                }
                None => assert_eq!(outcome.tox_category, 0),
            }
            if let Some(t) = outcome.eff_time {
                assert!(outcome.eff_category >= 1);
                assert!(t > 0.0 && t <= 168.0);
            }
        }
        assert!(saw_event, "dose 4 should produce toxicity events");
    }

    #[test]
    fn tite_draw_frequencies_track_ground_truth() {
        let mut settings = graded_settings();
        settings.variant = crate::design::types::DesignVariant::TiteGboinet;
        let design = resolve(&settings).expect("failed to resolve settings");
        let model = OutcomeModel::new(&design).expect("failed to build outcome model");
        let mut rng = rngs::StdRng::seed_from_u64(13);
        let n = 20_000;
        let mut events = 0usize;
        for _ in 0..n {
            if model.draw(0, &mut rng).tox_time.is_some() {
                events += 1;
            }
        }
        // True event probability at dose 1 is 1 - 0.94 = 0.06
        let rate = events as f64 / n as f64;
        assert!((rate - 0.06).abs() < 0.01, "observed rate {rate}");
    }
}
