//----------------------------------------
// enrollment mod
//----------------------------------------
pub mod accrual;
