//! Store round-trips: patient records, the event log, and run rows.

use chrono::{Duration, NaiveDate};
use clinicflow_core::{
    config::RunConfig,
    engine::SimEngine,
    event::EventLogEntry,
    patient::{Acuity, PatientRecord},
    store::SimStore,
};

fn store() -> SimStore {
    let store = SimStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

fn record(run_id: &str, record_number: u32, patient_id: u32, los: i64) -> PatientRecord {
    let arrival = NaiveDate::from_ymd_opt(2024, 9, 16)
        .expect("date")
        .and_hms_opt(7, 30, 0)
        .expect("time");
    PatientRecord {
        run_id: run_id.to_string(),
        record_number,
        patient_id,
        service: "NEUR".to_string(),
        acuity: Acuity::High,
        arrival,
        los_minutes: los,
        departure: arrival + Duration::minutes(los),
    }
}

#[test]
fn patient_records_round_trip() {
    let store = store();
    let a = record("rec-test", 1, 17, 120);
    let b = record("rec-test", 1, 32, 95);
    store.insert_patient_record(&a).expect("insert a");
    store.insert_patient_record(&b).expect("insert b");

    let read = store.patient_records("rec-test").expect("read");
    assert_eq!(read, vec![a, b]);
    assert_eq!(store.patient_record_count("rec-test").expect("count"), 2);
    assert_eq!(store.patient_record_count("other-run").expect("count"), 0);
}

#[test]
fn event_log_preserves_order_and_filters_by_type() {
    let store = store();
    for (i, kind) in ["service_started", "service_completed", "service_started"]
        .iter()
        .enumerate()
    {
        store
            .append_event(&EventLogEntry {
                id: None,
                run_id: "rec-test".to_string(),
                at: format!("2024-09-16 07:0{i}:00"),
                source: "Intake".to_string(),
                event_type: kind.to_string(),
                payload: format!("{{\"seq\":{i}}}"),
            })
            .expect("append");
    }

    let all = store.events_for_run("rec-test").expect("read");
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].payload, "{\"seq\":0}");
    assert_eq!(all[2].payload, "{\"seq\":2}");

    let starts = store.events_of_type("rec-test", "service_started").expect("filter");
    assert_eq!(starts.len(), 2);
    assert_eq!(store.event_count("rec-test").expect("count"), 3);
}

#[test]
fn duplicate_run_ids_are_rejected() {
    let store = store();
    let started = NaiveDate::from_ymd_opt(2024, 9, 16)
        .expect("date")
        .and_hms_opt(7, 0, 0)
        .expect("time");
    store.insert_run("rec-test", 42, "0.1.0", started).expect("first insert");
    assert!(store.insert_run("rec-test", 42, "0.1.0", started).is_err());
}

#[test]
fn a_full_run_persists_its_checkout_queue() {
    let db = store();
    let mut engine = SimEngine::build(
        "rec-full".to_string(),
        77,
        RunConfig::default_run(),
        db,
    )
    .expect("engine");
    engine.run().expect("run");

    let records = engine.checkout_records(1);
    assert!(!records.is_empty());
    for r in &records {
        engine.store.insert_patient_record(r).expect("persist");
    }

    let read = engine.store.patient_records("rec-full").expect("read");
    assert_eq!(read.len(), records.len());
    for r in &read {
        assert_eq!(r.departure, r.arrival + Duration::minutes(r.los_minutes));
        assert_eq!(r.record_number, 1);
    }
    assert_eq!(read, records, "persisted records must match the checkout queue");
}
