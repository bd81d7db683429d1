//! Worker entity — one server within a stage, capacity one patient.

use crate::patient::Patient;
use chrono::NaiveDateTime;

/// A staffed (or unstaffed) position within a stage.
///
/// `slot` is the single-slot in-service holder: a worker either holds
/// exactly one patient or none. `end_time` marks when the held patient is
/// expected to complete; lunch pushes it further out. `on_lunch` is a small
/// counter (>0 means currently on break) and `had_lunch` latches permanently
/// after the first break of the run.
#[derive(Debug, Clone)]
pub struct Worker {
    pub name:      String,
    pub active:    bool,
    pub slot:      Option<Patient>,
    pub end_time:  NaiveDateTime,
    pub on_lunch:  u32,
    pub had_lunch: bool,
}

impl Worker {
    pub fn new(name: impl Into<String>, active: bool, start: NaiveDateTime) -> Self {
        Self {
            name: name.into(),
            active,
            slot: None,
            end_time: start,
            on_lunch: 0,
            had_lunch: false,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.slot.is_none()
    }
}
