//! Observability facts emitted by the simulation.
//!
//! The core produces these as structured data and appends them to the
//! store's event log; formatting and transport belong to whoever reads the
//! log (or the `log` mirror). Nursing early-release completions are
//! deliberately never emitted.

use crate::types::{Minutes, PatientId, RunId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Every fact a run can emit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    RunInitialized {
        run_id: RunId,
        seed:   u64,
        at:     NaiveDateTime,
    },
    PatientAdmitted {
        patient:     PatientId,
        at:          NaiveDateTime,
        los_minutes: Minutes,
    },
    ServiceStarted {
        stage:       String,
        worker:      String,
        patient:     PatientId,
        at:          NaiveDateTime,
        los_minutes: Minutes,
    },
    ServiceCompleted {
        stage:       String,
        worker:      String,
        patient:     PatientId,
        at:          NaiveDateTime,
        los_minutes: Minutes,
    },
    LunchBreak {
        stage:  String,
        worker: String,
        at:     NaiveDateTime,
    },
    /// A dispatch transaction was abandoned because the stage's duration
    /// policy could not price the patient's service.
    ServiceRejected {
        stage:   String,
        worker:  String,
        patient: PatientId,
        service: String,
        at:      NaiveDateTime,
    },
}

impl SimEvent {
    /// Stable name for the event_type column of the event log.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RunInitialized { .. } => "run_initialized",
            Self::PatientAdmitted { .. } => "patient_admitted",
            Self::ServiceStarted { .. } => "service_started",
            Self::ServiceCompleted { .. } => "service_completed",
            Self::LunchBreak { .. } => "lunch_break",
            Self::ServiceRejected { .. } => "service_rejected",
        }
    }

    /// Which part of the simulation emitted the fact.
    pub fn source(&self) -> &str {
        match self {
            Self::RunInitialized { .. } => "engine",
            Self::PatientAdmitted { .. } => "arrivals",
            Self::ServiceStarted { stage, .. }
            | Self::ServiceCompleted { stage, .. }
            | Self::LunchBreak { stage, .. }
            | Self::ServiceRejected { stage, .. } => stage,
        }
    }

    pub fn at(&self) -> NaiveDateTime {
        match self {
            Self::RunInitialized { at, .. }
            | Self::PatientAdmitted { at, .. }
            | Self::ServiceStarted { at, .. }
            | Self::ServiceCompleted { at, .. }
            | Self::LunchBreak { at, .. }
            | Self::ServiceRejected { at, .. } => *at,
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub run_id:     RunId,
    pub at:         String,
    pub source:     String,
    pub event_type: String,
    pub payload:    String, // JSON-serialized SimEvent
}
