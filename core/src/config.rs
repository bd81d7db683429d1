//! Run configuration.
//!
//! `default_run()` is the clinic's standard day — the same staffing,
//! windows, and durations the production schedule uses. `load()` reads the
//! full configuration from a JSON file and fails fast on anything missing
//! or malformed; a run never starts on a partial configuration.

use crate::{
    catalog,
    duration::NursingDurations,
    lunch::LunchPolicy,
    types::Minutes,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrivalMode {
    /// Fixed-cadence walk-in stream.
    Interval,
    /// Replay of the literal appointment book.
    Appointments,
}

/// Per-stage staffing and lunch parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagePolicy {
    pub max_on_lunch:          u32,
    pub lunch_queue_threshold: usize,
    /// One entry per position; false models a permanently unstaffed shift.
    pub roster:                Vec<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagePolicies {
    pub intake:    StagePolicy,
    pub vitals:    StagePolicy,
    pub nursing:   StagePolicy,
    pub physician: StagePolicy,
    pub lab:       StagePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub day:       NaiveDate,
    pub day_start: NaiveTime,
    pub day_end:   NaiveTime,

    pub arrival_mode:         ArrivalMode,
    pub arrival_span_minutes: Minutes,

    pub exam_rooms: u32,
    pub lunch:      LunchPolicy,

    /// Charting paperwork tail used by the nursing early-release rule.
    pub paperwork_minutes: Minutes,
    /// Enable the nursing early-release completion rule.
    pub early_release:     bool,

    pub intake_minutes:    Minutes,
    pub vitals_minutes:    Minutes,
    pub lab_minutes:       Minutes,
    pub nursing_durations: NursingDurations,
    /// Inclusive [low, high] physician minutes per service category.
    pub physician_ranges:  HashMap<String, (Minutes, Minutes)>,

    pub stages: StagePolicies,
}

impl RunConfig {
    /// The standard clinic day.
    pub fn default_run() -> Self {
        Self {
            day: NaiveDate::from_ymd_opt(2024, 9, 16).expect("valid default day"),
            day_start: NaiveTime::from_hms_opt(7, 0, 0).expect("valid day start"),
            day_end: NaiveTime::from_hms_opt(23, 50, 0).expect("valid day end"),
            arrival_mode: ArrivalMode::Interval,
            arrival_span_minutes: 10,
            exam_rooms: 12,
            lunch: LunchPolicy {
                window_start: NaiveTime::from_hms_opt(11, 0, 0).expect("valid lunch start"),
                window_end: NaiveTime::from_hms_opt(14, 0, 0).expect("valid lunch end"),
                duration_minutes: 30,
            },
            paperwork_minutes: 11,
            early_release: false,
            intake_minutes: 7,
            vitals_minutes: 10,
            lab_minutes: 7,
            nursing_durations: NursingDurations::default(),
            physician_ranges: catalog::physician_duration_ranges(),
            stages: StagePolicies {
                intake: StagePolicy {
                    max_on_lunch: 1,
                    lunch_queue_threshold: 2,
                    roster: vec![true, true, false],
                },
                vitals: StagePolicy {
                    max_on_lunch: 1,
                    lunch_queue_threshold: 2,
                    roster: vec![true, true, false],
                },
                nursing: StagePolicy {
                    max_on_lunch: 2,
                    lunch_queue_threshold: 2,
                    roster: vec![true, true, true, true, true, false],
                },
                physician: StagePolicy {
                    max_on_lunch: 3,
                    lunch_queue_threshold: 2,
                    roster: vec![true, true, true, true, true, true, true, true, false],
                },
                lab: StagePolicy {
                    max_on_lunch: 1,
                    lunch_queue_threshold: 2,
                    roster: vec![true, true, true, false],
                },
            },
        }
    }

    /// Load a complete configuration from a JSON file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Malformed configuration {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.arrival_span_minutes > 0, "arrival span must be positive");
        anyhow::ensure!(self.day_start <= self.day_end, "day ends before it starts");
        anyhow::ensure!(
            self.lunch.duration_minutes >= 0,
            "lunch duration must be non-negative"
        );
        for (name, policy) in [
            ("intake", &self.stages.intake),
            ("vitals", &self.stages.vitals),
            ("nursing", &self.stages.nursing),
            ("physician", &self.stages.physician),
            ("lab", &self.stages.lab),
        ] {
            anyhow::ensure!(!policy.roster.is_empty(), "{name} roster is empty");
        }
        Ok(())
    }

    pub fn start_datetime(&self) -> NaiveDateTime {
        self.day.and_time(self.day_start)
    }

    pub fn end_datetime(&self) -> NaiveDateTime {
        self.day.and_time(self.day_end)
    }
}
