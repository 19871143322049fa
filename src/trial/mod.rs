//----------------------------------------
// trial mod
//----------------------------------------
pub mod decision;
pub mod run_trial;
pub mod types;
