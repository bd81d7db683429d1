//! Arrival generation: interval cadence, scheduled-slot batches, roster
//! order, and the catalog-miss skip.

use chrono::{Duration, NaiveDateTime};
use clinicflow_core::{
    catalog,
    config::{ArrivalMode, RunConfig},
    engine::SimEngine,
    event::SimEvent,
    patient::{Acuity, Patient},
    store::SimStore,
    types::PatientId,
};

fn engine_with_roster(seed: u64, config: RunConfig, roster: Vec<Patient>) -> SimEngine {
    let store = SimStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    SimEngine::with_roster("arrivals-test".to_string(), seed, config, store, roster)
        .expect("engine")
}

fn admissions(engine: &SimEngine) -> Vec<(PatientId, NaiveDateTime, i64)> {
    engine
        .store
        .events_for_run(&engine.run_id)
        .expect("read events")
        .iter()
        .map(|e| serde_json::from_str::<SimEvent>(&e.payload).expect("parse"))
        .filter_map(|e| match e {
            SimEvent::PatientAdmitted { patient, at, los_minutes } => {
                Some((patient, at, los_minutes))
            }
            _ => None,
        })
        .collect()
}

fn walk_ins(ids: &[PatientId]) -> Vec<Patient> {
    ids.iter()
        .map(|&id| Patient::new(id, "GYN", Acuity::Low))
        .collect()
}

#[test]
fn interval_mode_admits_one_patient_per_span_multiple() {
    let config = RunConfig::default_run(); // span 10
    let mut engine = engine_with_roster(1, config, walk_ins(&[101, 102, 103]));
    let start = engine.clock.start;

    for _ in 0..21 {
        engine.tick().expect("tick");
    }

    let admitted = admissions(&engine);
    assert_eq!(admitted.len(), 3);
    for (i, (id, at, los)) in admitted.iter().enumerate() {
        assert_eq!(*id, 101 + i as u32, "admission order must follow the roster");
        assert_eq!(*at, start + Duration::minutes(10 * i as i64));
        assert_eq!(*los, 0, "the wait accumulator seeds LOS at zero");
    }
}

#[test]
fn admissions_stop_when_the_roster_is_exhausted() {
    let config = RunConfig::default_run();
    let mut engine = engine_with_roster(2, config, walk_ins(&[201, 202]));

    for _ in 0..40 {
        engine.tick().expect("tick");
    }

    assert_eq!(admissions(&engine).len(), 2);
}

#[test]
fn appointment_mode_admits_whole_slots_at_once() {
    let mut config = RunConfig::default_run();
    config.arrival_mode = ArrivalMode::Appointments;
    let store = SimStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    let mut engine =
        SimEngine::build("arrivals-test".to_string(), 3, config, store).expect("engine");
    let start = engine.clock.start;

    engine.tick().expect("tick");
    let first_slot = admissions(&engine);
    assert_eq!(first_slot.len(), 3, "three appointments are booked at 07:00");
    assert_eq!(
        first_slot.iter().map(|(id, _, _)| *id).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );

    for _ in 0..15 {
        engine.tick().expect("tick");
    }
    let through_0715 = admissions(&engine);
    assert_eq!(through_0715.len(), 6, "three more are booked at 07:15");
    assert!(through_0715[3..]
        .iter()
        .all(|(_, at, _)| *at == start + Duration::minutes(15)));
}

#[test]
fn unknown_catalog_ids_are_skipped_with_no_patient_created() {
    let _ = env_logger::builder().is_test(true).try_init();
    let roster = catalog::build_roster(&[1, 999, 2]);
    assert_eq!(roster.len(), 2);
    assert_eq!(roster[0].id, 1);
    assert_eq!(roster[0].service, "NEUR");
    assert_eq!(roster[0].acuity, Acuity::High);
    assert_eq!(roster[1].id, 2);
}

#[test]
fn admission_stamps_arrival_exactly_once() {
    let config = RunConfig::default_run();
    let mut engine = engine_with_roster(4, config, walk_ins(&[301]));
    let start = engine.clock.start;

    engine.tick().expect("tick");

    // The patient was dispatched into intake the same minute; its arrival
    // stamp is the admission minute, not the service start.
    let intake = engine.stage("Intake").expect("intake stage");
    let held = intake.workers[0].slot.as_ref().expect("patient in service");
    assert_eq!(held.arrival, Some(start));
    assert_eq!(held.los_minutes, Some(7));
}
