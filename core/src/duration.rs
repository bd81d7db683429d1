//! Per-stage service duration policies.
//!
//! Each stage owns one `DurationPolicy`, selected at engine construction.
//! The contract: given the patient about to start service, produce the
//! minutes the patient will occupy the worker — or nothing, when the
//! policy cannot answer (unknown service category). A policy must never
//! fabricate minutes for a service it does not know.

use crate::{
    patient::{Acuity, Patient},
    rng::SimRng,
    types::Minutes,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parameters of the nursing charting/assessment formula.
///
/// Charting escalates from `chart_minutes` to `escalated_chart_minutes` for
/// High-acuity patients when a 1..=9 roll lands at or below
/// `escalation_threshold`. The threshold ships as 0 (never escalates) but
/// stays configuration, not code — and the roll is drawn unconditionally so
/// a threshold change never shifts later draws from the shared generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NursingDurations {
    pub chart_minutes:           Minutes,
    pub escalated_chart_minutes: Minutes,
    pub assessment_minutes:      Minutes,
    pub paperwork_minutes:       Minutes,
    pub escalation_threshold:    u32,
}

impl Default for NursingDurations {
    fn default() -> Self {
        Self {
            chart_minutes: 5,
            escalated_chart_minutes: 20,
            assessment_minutes: 27,
            paperwork_minutes: 11,
            escalation_threshold: 0,
        }
    }
}

/// How a stage computes the minutes a patient occupies a worker.
#[derive(Debug, Clone)]
pub enum DurationPolicy {
    /// Fixed minutes regardless of the patient (intake, vitals, lab).
    Constant(Minutes),
    /// The nursing charting + assessment + paperwork formula.
    NursingFormula(NursingDurations),
    /// Uniform draw from an inclusive per-service range (physician).
    /// A service missing from the table yields no duration.
    ServiceTable(HashMap<String, (Minutes, Minutes)>),
}

impl DurationPolicy {
    pub fn compute(&self, patient: &Patient, rng: &mut SimRng) -> Option<Minutes> {
        match self {
            Self::Constant(minutes) => Some(*minutes),

            Self::NursingFormula(d) => {
                let roll = rng.escalation_roll();
                let chart = if patient.acuity == Acuity::High && roll <= d.escalation_threshold {
                    d.escalated_chart_minutes
                } else {
                    d.chart_minutes
                };
                Some(chart + d.assessment_minutes + d.paperwork_minutes)
            }

            Self::ServiceTable(ranges) => {
                let (low, high) = ranges.get(&patient.service)?;
                Some(rng.minutes_between(*low, *high))
            }
        }
    }
}
