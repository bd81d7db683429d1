//! Stage dispatch engine — the per-worker state machine.
//!
//! EVALUATION ORDER (fixed, per active worker, per tick):
//!   0. Stage gate: skip the worker when it has nothing to do (empty input
//!      queue and empty slot) or its act predicate says the time has not
//!      come. A skipped worker gets no completion, no lunch update, no
//!      dispatch this tick.
//!   1. Completion check: release the held patient downstream if due.
//!   2. Lunch update.
//!   3. Dispatch check: start the next patient if the slot, the queue, the
//!      exam-room pool, and (where required) the worker's own end-time all
//!      allow it.
//!   4. No-dispatch lunch finalize: a worker on break that started nobody
//!      is parked until the break ends.

use crate::{
    event::SimEvent,
    exam_rooms::ExamRoomPool,
    lunch::LunchPolicy,
    patient::Patient,
    rng::SimRng,
    stage::{CompletionRule, Stage},
    types::Minutes,
};
use chrono::{Duration, NaiveDateTime};
use std::collections::VecDeque;

/// Everything a stage needs from the surrounding run to process one tick.
pub struct DispatchCtx<'a> {
    pub now:               NaiveDateTime,
    pub lunch:             &'a LunchPolicy,
    pub paperwork_minutes: Minutes,
    pub pool:              &'a mut ExamRoomPool,
    pub rng:               &'a mut SimRng,
    /// Patients whose dispatch transaction was rejected (unknown service).
    pub rejected:          &'a mut Vec<Patient>,
    pub events:            &'a mut Vec<SimEvent>,
}

/// Run one tick of the state machine for every worker of one stage.
pub fn process_stage(
    stage: &mut Stage,
    input: &mut VecDeque<Patient>,
    output: &mut VecDeque<Patient>,
    ctx: &mut DispatchCtx<'_>,
) {
    for idx in 0..stage.workers.len() {
        {
            let worker = &stage.workers[idx];
            if !worker.active {
                continue;
            }
            if input.is_empty() && worker.is_idle() {
                continue;
            }
            if !stage
                .config
                .completion
                .worker_may_act(worker, ctx.now, ctx.paperwork_minutes)
            {
                continue;
            }
        }

        complete_if_ready(stage, idx, output, ctx);
        update_lunch(stage, idx, input.len(), ctx);
        try_dispatch(stage, idx, input, ctx);
    }
}

/// Step 1: move the held patient to the output queue once its completion
/// predicate holds, freeing the worker and any exam room.
fn complete_if_ready(
    stage: &mut Stage,
    idx: usize,
    output: &mut VecDeque<Patient>,
    ctx: &mut DispatchCtx<'_>,
) {
    let rule = stage.config.completion;
    let uses_rooms = stage.config.uses_exam_rooms;
    let stage_name = stage.config.name;
    let worker = &mut stage.workers[idx];

    let done = match (&worker.slot, rule) {
        (None, _) => return,
        (Some(_), CompletionRule::EarlyRelease) => {
            ctx.now >= worker.end_time - Duration::minutes(ctx.paperwork_minutes)
        }
        (Some(patient), CompletionRule::PatientLos) => patient
            .expected_completion()
            .is_some_and(|due| ctx.now >= due),
    };
    if !done {
        return;
    }

    let Some(patient) = worker.slot.take() else { return };
    if uses_rooms {
        ctx.pool.release();
    }
    if !rule.silent_completion() {
        ctx.events.push(SimEvent::ServiceCompleted {
            stage: stage_name.to_string(),
            worker: worker.name.clone(),
            patient: patient.id,
            at: ctx.now,
            los_minutes: patient.los_minutes.unwrap_or(0),
        });
    }
    output.push_back(patient);
}

/// Step 2: advance the worker's break state.
fn update_lunch(stage: &mut Stage, idx: usize, queue_len: usize, ctx: &mut DispatchCtx<'_>) {
    let on_lunch_total = stage.on_lunch_total();
    let threshold = stage.config.lunch_queue_threshold;
    let cap = stage.config.max_on_lunch;
    ctx.lunch.update_worker(
        ctx.now,
        queue_len,
        threshold,
        on_lunch_total,
        cap,
        &mut stage.workers[idx],
    );
}

/// Steps 3 and 4: start the next patient when possible; otherwise park a
/// worker that is on break.
///
/// Starting a patient is a transaction: take an exam room, dequeue, record
/// the start, bump LOS to the elapsed wait, price the service, and set the
/// end-time (pushed out by the lunch duration when the worker is on break).
/// When the duration policy cannot price the service, the whole transaction
/// is rejected: the room goes back, the patient moves to the rejected
/// holding area with a diagnostic, and the worker stays idle.
fn try_dispatch(
    stage: &mut Stage,
    idx: usize,
    input: &mut VecDeque<Patient>,
    ctx: &mut DispatchCtx<'_>,
) {
    let uses_rooms = stage.config.uses_exam_rooms;
    let require_end = stage.config.require_end_time_before_start;
    let stage_name = stage.config.name;
    let worker = &mut stage.workers[idx];

    let can_start = worker.is_idle()
        && !input.is_empty()
        && (!uses_rooms || ctx.pool.has_vacancy())
        && (!require_end || ctx.now >= worker.end_time);

    if can_start {
        if uses_rooms {
            let acquired = ctx.pool.try_acquire();
            debug_assert!(acquired, "vacancy was checked before acquiring");
        }
        let Some(mut patient) = input.pop_front() else { return };

        ctx.events.push(SimEvent::ServiceStarted {
            stage: stage_name.to_string(),
            worker: worker.name.clone(),
            patient: patient.id,
            at: ctx.now,
            los_minutes: patient.los_minutes.unwrap_or(0),
        });

        if patient.arrival.is_some() {
            patient.note_wait(ctx.now);
            match stage.duration.compute(&patient, ctx.rng) {
                Some(minutes) => patient.add_service_minutes(minutes),
                None => {
                    if uses_rooms {
                        ctx.pool.release();
                    }
                    log::warn!(
                        "{stage_name}: no duration for service {} (patient {}), rejecting dispatch",
                        patient.service,
                        patient.id
                    );
                    ctx.events.push(SimEvent::ServiceRejected {
                        stage: stage_name.to_string(),
                        worker: worker.name.clone(),
                        patient: patient.id,
                        service: patient.service.clone(),
                        at: ctx.now,
                    });
                    ctx.rejected.push(patient);
                    return;
                }
            }
        }

        if let Some(due) = patient.expected_completion() {
            if worker.on_lunch > 0 {
                worker.end_time = due + Duration::minutes(ctx.lunch.duration_minutes);
                ctx.events.push(SimEvent::LunchBreak {
                    stage: stage_name.to_string(),
                    worker: worker.name.clone(),
                    at: ctx.now,
                });
            } else {
                worker.end_time = due;
            }
        }
        worker.slot = Some(patient);
    } else if worker.on_lunch > 0 {
        worker.end_time = ctx.now + Duration::minutes(ctx.lunch.duration_minutes);
        ctx.events.push(SimEvent::LunchBreak {
            stage: stage_name.to_string(),
            worker: worker.name.clone(),
            at: ctx.now,
        });
    }
}
