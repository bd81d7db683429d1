//! Simulation clock — the simulated wall-clock, stepped one minute at a time.
//!
//! The clinic day is a clock-of-day problem: arrivals fire on minute-of-day
//! multiples and the lunch window is an absolute time band, so the clock
//! carries a full `NaiveDateTime` rather than a bare tick counter.

use chrono::{Duration, NaiveDateTime, Timelike};

/// One tick of the driver loop, in minutes.
pub const TICK_MINUTES: i64 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimClock {
    pub current: NaiveDateTime,
    pub start:   NaiveDateTime,
    pub end:     NaiveDateTime,
}

impl SimClock {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            current: start,
            start,
            end,
        }
    }

    /// Advance one tick. Returns the new current time.
    pub fn advance(&mut self) -> NaiveDateTime {
        self.current += Duration::minutes(TICK_MINUTES);
        self.current
    }

    /// The run is over once the clock has stepped past the end time.
    /// The end minute itself is still processed (inclusive horizon).
    pub fn finished(&self) -> bool {
        self.current > self.end
    }

    /// Minutes since midnight of the current simulated day.
    pub fn minute_of_day(&self) -> i64 {
        i64::from(self.current.hour()) * 60 + i64::from(self.current.minute())
    }
}
