//! clinicflow-core: a minute-granularity clinic patient-flow simulator.
//!
//! Patients move through a fixed pipeline — intake, vitals, nursing,
//! physician, lab — each stage staffed by a finite worker pool, sharing a
//! bounded exam-room pool and a lunch-break policy. The simulation is
//! single-threaded and deterministic: one driver loop, one seeded
//! generator, one minute per tick.

pub mod arrivals;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod duration;
pub mod engine;
pub mod error;
pub mod event;
pub mod exam_rooms;
pub mod lunch;
pub mod patient;
pub mod rng;
pub mod stage;
pub mod store;
pub mod types;
pub mod worker;
