//----------------------------------------
// estimate mod
//----------------------------------------
pub mod fp_logistic;
pub mod isotonic;
pub mod obd;
