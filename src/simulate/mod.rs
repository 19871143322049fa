//----------------------------------------
// simulate mod
//----------------------------------------
pub mod run_simulation;
pub mod types;
