//! # Integration Flows
//!
//! Scenarios that cross module boundaries: builders against stores, proofs
//! against fresh verifier stores, shared stores between structures.

pub mod chain_flows;
pub mod store_integrity;
