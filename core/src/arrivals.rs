//! Arrival generation — admits scheduled patients into the first queue.
//!
//! Two mutually exclusive modes, chosen at initialization. Interval mode
//! feeds the roster one patient per qualifying tick; scheduled-slot mode
//! replays a literal appointment book, possibly several patients in the
//! same minute. In both modes admission is what stamps the patient's
//! arrival time and seeds its LOS accumulator.

use crate::{event::SimEvent, patient::Patient, types::Minutes};
use chrono::{NaiveDateTime, NaiveTime};
use std::collections::{BTreeMap, VecDeque};

/// When the next roster patients are due.
#[derive(Debug, Clone)]
pub enum ArrivalPlan {
    /// One patient whenever the minute-of-day is an exact multiple of the
    /// span, until the roster runs out.
    Interval { span_minutes: Minutes },
    /// A table of timestamp → patients due at exactly that minute.
    Scheduled { slots: BTreeMap<NaiveDateTime, usize> },
}

impl ArrivalPlan {
    /// Collapse a literal appointment book into the slot table for a run
    /// day. Duplicate times accumulate.
    pub fn from_appointments(day: chrono::NaiveDate, times: &[NaiveTime]) -> Self {
        let mut slots: BTreeMap<NaiveDateTime, usize> = BTreeMap::new();
        for time in times {
            *slots.entry(day.and_time(*time)).or_insert(0) += 1;
        }
        Self::Scheduled { slots }
    }
}

pub struct ArrivalGenerator {
    plan:       ArrivalPlan,
    roster:     Vec<Patient>,
    next_index: usize,
    /// Running wait-time accumulator seeded into each admitted patient's
    /// LOS. Starts (and currently stays) at zero.
    wait_seed:  Minutes,
}

impl ArrivalGenerator {
    pub fn new(plan: ArrivalPlan, roster: Vec<Patient>) -> Self {
        Self {
            plan,
            roster,
            next_index: 0,
            wait_seed: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.roster.len().saturating_sub(self.next_index)
    }

    /// Admit every patient due this tick into the first queue.
    pub fn admit_due(
        &mut self,
        now: NaiveDateTime,
        minute_of_day: i64,
        queue: &mut VecDeque<Patient>,
    ) -> Vec<SimEvent> {
        let due = match &self.plan {
            ArrivalPlan::Interval { span_minutes } => {
                usize::from(minute_of_day % span_minutes == 0)
            }
            ArrivalPlan::Scheduled { slots } => slots.get(&now).copied().unwrap_or(0),
        };

        let mut events = Vec::new();
        for _ in 0..due {
            let Some(event) = self.admit_next(now, queue) else {
                break; // roster exhausted
            };
            events.push(event);
        }
        events
    }

    fn admit_next(&mut self, now: NaiveDateTime, queue: &mut VecDeque<Patient>) -> Option<SimEvent> {
        let patient = self.roster.get_mut(self.next_index)?;
        self.next_index += 1;

        patient.admit(now, self.wait_seed);
        let event = SimEvent::PatientAdmitted {
            patient: patient.id,
            at: now,
            los_minutes: self.wait_seed,
        };
        queue.push_back(patient.clone());
        Some(event)
    }
}
