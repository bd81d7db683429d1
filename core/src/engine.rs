//! The simulation engine — the driver loop and the whole per-run context.
//!
//! EXECUTION ORDER (fixed, documented, never reordered), once per tick:
//!   1. Arrival generator
//!   2. Intake
//!   3. Vitals
//!   4. Nursing
//!   5. Physician
//!   6. Lab
//!
//! The stage order is load-bearing, and so is the handoff rule: patients a
//! stage completes during a tick are staged in a per-stage outbox and only
//! delivered to the next queue after the full stage pass. The earliest a
//! completed patient can be picked up downstream is therefore the following
//! tick — every handoff costs at least one minute.
//!
//! RULES:
//!   - All run state lives on this struct; it is built fresh per run.
//!   - All randomness flows through the single SimRng.
//!   - Every emitted fact is appended to the store's event log.

use crate::{
    arrivals::{ArrivalGenerator, ArrivalPlan},
    catalog,
    clock::SimClock,
    config::{ArrivalMode, RunConfig, StagePolicy},
    dispatch::{self, DispatchCtx},
    duration::DurationPolicy,
    error::SimResult,
    event::{EventLogEntry, SimEvent},
    exam_rooms::ExamRoomPool,
    patient::{Patient, PatientRecord},
    rng::SimRng,
    stage::{CompletionRule, Stage, StageConfig},
    store::{SimStore, TIMESTAMP_FORMAT},
    types::RunId,
};
use std::collections::VecDeque;

/// Pipeline stages in processing order.
pub const STAGE_COUNT: usize = 5;
/// Queues: one ahead of each stage, plus the terminal checkout queue.
pub const QUEUE_COUNT: usize = STAGE_COUNT + 1;

pub struct SimEngine {
    pub run_id:     RunId,
    pub clock:      SimClock,
    pub config:     RunConfig,
    pub store:      SimStore,
    pub stages:     Vec<Stage>,
    /// queues[k] feeds stages[k]; queues[5] is checkout.
    pub queues:     Vec<VecDeque<Patient>>,
    pub exam_rooms: ExamRoomPool,
    /// Patients whose dispatch was rejected (unknown service category).
    pub rejected:   Vec<Patient>,
    rng:            SimRng,
    seed:           u64,
    arrivals:       ArrivalGenerator,
}

impl SimEngine {
    /// Build a fully wired engine over the catalog's scheduled roster.
    pub fn build(run_id: RunId, seed: u64, config: RunConfig, store: SimStore) -> SimResult<Self> {
        let order: &[_] = match config.arrival_mode {
            ArrivalMode::Interval => &catalog::SIMULATED_CASE_ORDER,
            ArrivalMode::Appointments => &catalog::APPOINTMENT_CASE_ORDER,
        };
        let roster = catalog::build_roster(order);
        Self::with_roster(run_id, seed, config, store, roster)
    }

    /// Build an engine over an explicit roster (tests and what-if tooling).
    pub fn with_roster(
        run_id: RunId,
        seed: u64,
        config: RunConfig,
        store: SimStore,
        roster: Vec<Patient>,
    ) -> SimResult<Self> {
        config.validate()?;

        let start = config.start_datetime();
        let clock = SimClock::new(start, config.end_datetime());

        let plan = match config.arrival_mode {
            ArrivalMode::Interval => ArrivalPlan::Interval {
                span_minutes: config.arrival_span_minutes,
            },
            ArrivalMode::Appointments => {
                ArrivalPlan::from_appointments(config.day, &catalog::appointment_slots())
            }
        };

        let nursing_completion = if config.early_release {
            CompletionRule::EarlyRelease
        } else {
            CompletionRule::PatientLos
        };

        let stages = vec![
            make_stage(
                "Intake",
                &config.stages.intake,
                false,
                false,
                CompletionRule::PatientLos,
                DurationPolicy::Constant(config.intake_minutes),
                &config,
            ),
            make_stage(
                "Vitals",
                &config.stages.vitals,
                false,
                false,
                CompletionRule::PatientLos,
                DurationPolicy::Constant(config.vitals_minutes),
                &config,
            ),
            make_stage(
                "Nursing",
                &config.stages.nursing,
                true,
                true,
                nursing_completion,
                DurationPolicy::NursingFormula(config.nursing_durations.clone()),
                &config,
            ),
            make_stage(
                "Physician",
                &config.stages.physician,
                true,
                false,
                CompletionRule::PatientLos,
                DurationPolicy::ServiceTable(config.physician_ranges.clone()),
                &config,
            ),
            make_stage(
                "Lab",
                &config.stages.lab,
                false,
                false,
                CompletionRule::PatientLos,
                DurationPolicy::Constant(config.lab_minutes),
                &config,
            ),
        ];

        Ok(Self {
            run_id,
            clock,
            exam_rooms: ExamRoomPool::new(config.exam_rooms),
            stages,
            queues: (0..QUEUE_COUNT).map(|_| VecDeque::new()).collect(),
            rejected: Vec::new(),
            rng: SimRng::seed_from(seed),
            seed,
            arrivals: ArrivalGenerator::new(plan, roster),
            config,
            store,
        })
    }

    /// Advance one simulated minute. This is the core simulation step.
    pub fn tick(&mut self) -> SimResult<Vec<SimEvent>> {
        let now = self.clock.current;
        let minute_of_day = self.clock.minute_of_day();

        let mut events = self
            .arrivals
            .admit_due(now, minute_of_day, &mut self.queues[0]);

        // Completions are staged per stage and delivered after the pass, so
        // a patient finished this tick is not dispatchable downstream until
        // the next one.
        let mut outboxes: Vec<VecDeque<Patient>> =
            (0..STAGE_COUNT).map(|_| VecDeque::new()).collect();

        for (idx, outbox) in outboxes.iter_mut().enumerate() {
            let mut ctx = DispatchCtx {
                now,
                lunch: &self.config.lunch,
                paperwork_minutes: self.config.paperwork_minutes,
                pool: &mut self.exam_rooms,
                rng: &mut self.rng,
                rejected: &mut self.rejected,
                events: &mut events,
            };
            dispatch::process_stage(&mut self.stages[idx], &mut self.queues[idx], outbox, &mut ctx);
        }

        for (idx, mut outbox) in outboxes.into_iter().enumerate() {
            self.queues[idx + 1].append(&mut outbox);
        }

        self.record_events(&events)?;
        self.clock.advance();
        Ok(events)
    }

    /// Run the full horizon, start to end inclusive.
    pub fn run(&mut self) -> SimResult<()> {
        // Emit RunInitialized on the first tick so seed differences are
        // observable in the log.
        if self.clock.current == self.clock.start {
            let init = SimEvent::RunInitialized {
                run_id: self.run_id.clone(),
                seed: self.seed,
                at: self.clock.start,
            };
            self.record_events(std::slice::from_ref(&init))?;
        }
        while !self.clock.finished() {
            self.tick()?;
        }
        Ok(())
    }

    /// The terminal checkout queue.
    pub fn checkout(&self) -> &VecDeque<Patient> {
        &self.queues[STAGE_COUNT]
    }

    /// Checked-out patients as persistable records, in checkout order.
    pub fn checkout_records(&self, record_number: u32) -> Vec<PatientRecord> {
        self.checkout()
            .iter()
            .filter_map(|p| PatientRecord::from_patient(&self.run_id, record_number, p))
            .collect()
    }

    pub fn stage(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.config.name == name)
    }

    fn record_events(&self, events: &[SimEvent]) -> SimResult<()> {
        for event in events {
            let entry = EventLogEntry {
                id: None,
                run_id: self.run_id.clone(),
                at: event.at().format(TIMESTAMP_FORMAT).to_string(),
                source: event.source().to_string(),
                event_type: event.kind().to_string(),
                payload: serde_json::to_string(event)?,
            };
            self.store.append_event(&entry)?;
            log::info!("{} {} {}", entry.at, entry.source, entry.payload);
        }
        Ok(())
    }
}

fn make_stage(
    name: &'static str,
    policy: &StagePolicy,
    uses_exam_rooms: bool,
    require_end_time_before_start: bool,
    completion: CompletionRule,
    duration: DurationPolicy,
    config: &RunConfig,
) -> Stage {
    Stage::staffed(
        StageConfig {
            name,
            max_on_lunch: policy.max_on_lunch,
            lunch_queue_threshold: policy.lunch_queue_threshold,
            uses_exam_rooms,
            require_end_time_before_start,
            completion,
        },
        duration,
        &policy.roster,
        config.start_datetime(),
    )
}
