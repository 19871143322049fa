//----------------------------------------
// util mod
//----------------------------------------
pub mod linalg;
