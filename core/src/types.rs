//! Shared primitive types used across the entire simulation.

/// A patient's numeric identity, as assigned by the catalog.
pub type PatientId = u32;

/// The canonical run identifier.
pub type RunId = String;

/// Durations and offsets, always whole simulated minutes.
pub type Minutes = i64;

/// Mint a fresh run identifier.
pub fn new_run_id() -> RunId {
    format!("run-{}", uuid::Uuid::new_v4())
}
