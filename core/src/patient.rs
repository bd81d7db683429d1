//! Patient entity and the persisted visit record.

use crate::types::{Minutes, PatientId, RunId};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Triage acuity assigned at scheduling time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Acuity {
    Low,
    Medium,
    High,
}

impl Acuity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Low" => Some(Self::Low),
            "Medium" => Some(Self::Medium),
            "High" => Some(Self::High),
            _ => None,
        }
    }
}

/// A patient moving through the pipeline.
///
/// Arrival and LOS are absent until the patient is admitted to the first
/// queue. Once set, arrival never changes; LOS only ever grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id:          PatientId,
    pub service:     String,
    pub acuity:      Acuity,
    pub arrival:     Option<NaiveDateTime>,
    pub los_minutes: Option<Minutes>,
}

impl Patient {
    pub fn new(id: PatientId, service: impl Into<String>, acuity: Acuity) -> Self {
        Self {
            id,
            service: service.into(),
            acuity,
            arrival: None,
            los_minutes: None,
        }
    }

    /// Stamp the arrival time and seed the LOS accumulator. Called exactly
    /// once, when the patient is admitted to the first queue.
    pub fn admit(&mut self, at: NaiveDateTime, wait_seed: Minutes) {
        self.arrival = Some(at);
        self.los_minutes = Some(wait_seed);
    }

    /// Bump LOS up to the elapsed wait since arrival, never down.
    pub fn note_wait(&mut self, now: NaiveDateTime) {
        let Some(arrival) = self.arrival else { return };
        let elapsed = (now - arrival).num_minutes();
        if elapsed > self.los_minutes.unwrap_or(0) {
            self.los_minutes = Some(elapsed);
        }
    }

    /// Add a stage's service duration to LOS.
    pub fn add_service_minutes(&mut self, minutes: Minutes) {
        self.los_minutes = Some(self.los_minutes.unwrap_or(0) + minutes);
    }

    /// The time at which the patient's visit nominally ends.
    pub fn expected_completion(&self) -> Option<NaiveDateTime> {
        match (self.arrival, self.los_minutes) {
            (Some(arrival), Some(los)) => Some(arrival + Duration::minutes(los)),
            _ => None,
        }
    }
}

/// One row of the terminal checkout queue, as handed to the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub run_id:        RunId,
    pub record_number: u32,
    pub patient_id:    PatientId,
    pub service:       String,
    pub acuity:        Acuity,
    pub arrival:       NaiveDateTime,
    pub los_minutes:   Minutes,
    pub departure:     NaiveDateTime,
}

impl PatientRecord {
    /// Build the record for a checked-out patient. Returns None for a
    /// patient that was never admitted (cannot reach checkout in practice).
    pub fn from_patient(run_id: &str, record_number: u32, patient: &Patient) -> Option<Self> {
        let arrival = patient.arrival?;
        let los = patient.los_minutes?;
        Some(Self {
            run_id: run_id.to_string(),
            record_number,
            patient_id: patient.id,
            service: patient.service.clone(),
            acuity: patient.acuity,
            arrival,
            los_minutes: los,
            departure: arrival + Duration::minutes(los),
        })
    }
}
