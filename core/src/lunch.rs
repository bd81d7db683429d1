//! Lunch-break policy.
//!
//! Evaluated per worker per tick, inside that worker's dispatch step, so a
//! worker skipped by the stage gate gets no lunch update either. Starting a
//! break does not interrupt an in-progress patient; the break only shows up
//! in how the worker's next end-time is computed (the dispatch engine pushes
//! it out by the lunch duration while the counter is up).

use crate::{types::Minutes, worker::Worker};
use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LunchPolicy {
    pub window_start:     NaiveTime,
    pub window_end:       NaiveTime,
    pub duration_minutes: Minutes,
}

impl LunchPolicy {
    pub fn in_window(&self, now: NaiveDateTime) -> bool {
        let t = now.time();
        t >= self.window_start && t <= self.window_end
    }

    /// One tick of break state for one worker.
    ///
    /// A break starts when: inside the window, the stage's input queue is at
    /// or below its lunch threshold, the worker has not yet had a break this
    /// run, and the stage's concurrent-break count is below its cap. A break
    /// that is not renewed decays by one each evaluated tick.
    pub fn update_worker(
        &self,
        now: NaiveDateTime,
        queue_len: usize,
        queue_threshold: usize,
        stage_on_lunch: u32,
        max_on_lunch: u32,
        worker: &mut Worker,
    ) {
        if self.in_window(now)
            && queue_len <= queue_threshold
            && !worker.had_lunch
            && stage_on_lunch < max_on_lunch
        {
            worker.on_lunch += 1;
            worker.had_lunch = true;
        } else if worker.on_lunch > 0 {
            worker.on_lunch -= 1;
        }
    }
}
