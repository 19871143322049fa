use std::time::Instant;

use obdsim::design::settings::DesignSettings;
use obdsim::simulate::run_simulation::run_simulation;

fn main() {
    tracing_subscriber::fmt::init();

    //----------------------------------------
    // CAR-T cell therapy scenario: four dose levels with graded CRS
    // toxicity and graded response categories
    let toxprob = vec![
        vec![0.94, 0.87, 0.79, 0.68],
        vec![0.05, 0.10, 0.15, 0.20],
        vec![0.01, 0.03, 0.05, 0.10],
        vec![0.00, 0.00, 0.01, 0.02],
    ];
    let effprob = vec![
        vec![0.64, 0.52, 0.45, 0.35],
        vec![0.30, 0.40, 0.40, 0.40],
        vec![0.05, 0.07, 0.15, 0.20],
        vec![0.01, 0.01, 0.00, 0.05],
    ];
    let sev_weight = vec![0.00, 0.50, 1.00, 1.50];
    let res_weight = vec![0.00, 0.25, 1.00, 3.00];

    let settings = DesignSettings {
        start_dose: 1,      // start at the lowest dose
        size_cohort: 6,     // patients per cohort
        n_cohort: 8,        // maximum cohorts
        stopping_npts: 48,  // per-dose convergence cap
        phi: 0.40,          // target toxicity score
        delta: 0.80,        // target efficacy score
        tau_t: 84.0,        // toxicity assessment window (days)
        tau_e: 168.0,       // efficacy assessment window (days)
        accrual: 14.0,      // mean inter-arrival time (days)
        te_corr: 0.4,       // toxicity/efficacy event-time correlation
        n_sim: 1000,        // replications
        seed_sim: 100,      // reproducibility seed
        ..DesignSettings::tite_gboinet(toxprob, effprob, sev_weight, res_weight)
    };

    let start = Instant::now();
    let result = run_simulation(&settings).expect("failed to run simulation");
    let elapsed = start.elapsed();

    println!("TITE-gBOIN-ET operating characteristics ({elapsed:?} for 1000 trials)");
    println!("{result:#?}");
}
