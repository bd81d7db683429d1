//! Stage model — one processing step of the pipeline and its worker pool.
//!
//! Stages do not own their queues; the engine owns all six and hands each
//! stage its input/output pair during dispatch. A stage owns its workers
//! exclusively.

use crate::{duration::DurationPolicy, types::Minutes, worker::Worker};
use chrono::{Duration, NaiveDateTime};

/// Which completion/act predicate a stage's workers run under.
///
/// `PatientLos` is the default everywhere: a worker may act once the clock
/// reaches its end-time, and the held patient is done once the clock reaches
/// arrival + LOS. `EarlyRelease` (nursing only, opt-in) frees the worker a
/// fixed paperwork offset before its end-time, independent of the patient's
/// own LOS clock, and such completions are not reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionRule {
    PatientLos,
    EarlyRelease,
}

impl CompletionRule {
    /// The stage-level gate: may this worker act at all this tick?
    /// When false, the worker is skipped entirely — no completion, no lunch
    /// update, no dispatch.
    pub fn worker_may_act(
        &self,
        worker: &Worker,
        now: NaiveDateTime,
        paperwork_minutes: Minutes,
    ) -> bool {
        match self {
            Self::PatientLos => now >= worker.end_time,
            Self::EarlyRelease => now >= worker.end_time - Duration::minutes(paperwork_minutes),
        }
    }

    /// Early-release completions stay out of the event log.
    pub fn silent_completion(&self) -> bool {
        matches!(self, Self::EarlyRelease)
    }
}

/// Fixed per-stage parameters, set once at engine construction.
#[derive(Debug, Clone)]
pub struct StageConfig {
    pub name:                  &'static str,
    pub max_on_lunch:          u32,
    pub lunch_queue_threshold: usize,
    pub uses_exam_rooms:       bool,
    /// Gate dispatch on the worker's own previous end-time, in addition to
    /// the slot being free. Delays restaffing even after the prior patient
    /// conceptually left.
    pub require_end_time_before_start: bool,
    pub completion:            CompletionRule,
}

pub struct Stage {
    pub config:   StageConfig,
    pub duration: DurationPolicy,
    pub workers:  Vec<Worker>,
}

impl Stage {
    /// Build a stage with workers named `<stage>1..n`, one per roster entry.
    /// Entries set to false model permanently unstaffed shifts.
    pub fn staffed(
        config: StageConfig,
        duration: DurationPolicy,
        roster: &[bool],
        start: NaiveDateTime,
    ) -> Self {
        let name = config.name;
        let workers = roster
            .iter()
            .enumerate()
            .map(|(idx, &active)| Worker::new(format!("{name}{}", idx + 1), active, start))
            .collect();
        Self {
            config,
            duration,
            workers,
        }
    }

    /// Number of this stage's workers currently on break.
    pub fn on_lunch_total(&self) -> u32 {
        self.workers.iter().map(|w| w.on_lunch).sum()
    }
}
