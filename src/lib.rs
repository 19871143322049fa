//----------------------------------------
// Root lib
//----------------------------------------
//! The purpose of this library is to simulate adaptive phase I/II
//! dose-finding trials under the BOIN-ET design family (binary BOIN-ET,
//! TITE-BOIN-ET, gBOIN-ET, and TITE-gBOIN-ET) and compute their operating
//! characteristics: per-dose selection probability, patient allocation,
//! early-stop rate, and expected trial duration.

/// Decision-threshold derivation (lambda1, lambda2, eta1)
pub mod boundary;
/// Configuration structs, design variants, validation and default resolution
pub mod design;
/// Accrual (enrollment-time) simulation
pub mod enrollment;
/// This module contains error types
pub mod error;
/// Isotonic regression, dose-response fitting, and OBD selection
pub mod estimate;
/// Outcome drawing, event-time generation, and score computation
pub mod outcome;
/// The outer replication loop and result aggregation
pub mod simulate;
/// The per-trial adaptive state machine
pub mod trial;
mod util;
