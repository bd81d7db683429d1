//! Sample scheduling data: the patient catalog, the two case orders, the
//! appointment slot list, and the physician per-service duration ranges.
//!
//! This is the external patient-catalog collaborator in data form. The only
//! lookup the simulation needs is id → (service, acuity); ids missing from
//! the catalog are skipped with a diagnostic when building a roster.

use crate::{
    patient::{Acuity, Patient},
    types::{Minutes, PatientId},
};
use chrono::NaiveTime;
use std::collections::HashMap;

use crate::patient::Acuity::{High, Low, Medium};

/// Scheduled cases: (patient id, service, acuity).
const CATALOG: [(PatientId, &str, Acuity); 55] = [
    (1, "NEUR", High),
    (2, "NEUR", High),
    (3, "GYN", Low),
    (4, "THOR", Medium),
    (5, "GYN", Low),
    (6, "PLAS", Low),
    (7, "SONC", High),
    (8, "GENS", High),
    (9, "TRNS", Medium),
    (10, "NEUR", High),
    (11, "GENS", High),
    (12, "ORTH", Medium),
    (13, "THOR", Medium),
    (14, "THOR", Medium),
    (15, "TRNS", Medium),
    (16, "NEUR", High),
    (17, "GENS", High),
    (18, "ANES", Low),
    (19, "UROL", Medium),
    (20, "UROL", Medium),
    (21, "GYN", Low),
    (22, "GENS", High),
    (23, "NEUR", High),
    (24, "NEUR", High),
    (25, "ORTH", Medium),
    (26, "TRNS", Medium),
    (27, "UROL", Medium),
    (28, "THOR", Medium),
    (29, "NEUR", High),
    (30, "SONC", High),
    (31, "OMF", High),
    (32, "GENS", High),
    (33, "UROL", Medium),
    (34, "OMF", High),
    (35, "UROL", Medium),
    (36, "SONC", High),
    (37, "GYN", Low),
    (38, "NEUR", High),
    (39, "SONC", High),
    (40, "GYN", Low),
    (41, "NEUR", High),
    (42, "GENS", High),
    (43, "ANES", Low),
    (44, "PLAS", Low),
    (45, "ORTH", Medium),
    (46, "GENS", High),
    (47, "SONC", High),
    (48, "GYN", Low),
    (49, "THOR", Medium),
    (50, "ORTH", Medium),
    (51, "ORTH", Medium),
    (52, "THOR", Medium),
    (53, "NEUR", High),
    (54, "ORTH", Medium),
    (55, "NEUR", High),
];

/// Admission order used by the interval arrival mode.
pub const SIMULATED_CASE_ORDER: [PatientId; 55] = [
    17, 32, 42, 11, 8, 22, 46, 24, 23, 55, 1, 2, 38, 41, 16, 10, 29, 53, 31, 34, 7, 39, 47, 30,
    36, 45, 54, 51, 12, 25, 50, 52, 28, 4, 13, 14, 49, 9, 15, 26, 20, 35, 27, 19, 33, 18, 43, 37,
    3, 21, 48, 5, 40, 44, 6,
];

/// Admission order used by the scheduled-slot arrival mode.
pub const APPOINTMENT_CASE_ORDER: [PatientId; 55] = [
    1, 2, 3, 4, 5, 6, 7, 8, 10, 9, 11, 12, 13, 14, 15, 16, 17, 19, 18, 20, 21, 22, 23, 24, 25,
    26, 27, 29, 30, 28, 32, 31, 34, 33, 35, 36, 37, 38, 39, 40, 41, 42, 43, 44, 45, 46, 47, 48,
    50, 49, 51, 52, 53, 54, 55,
];

/// Appointment times, one per entry of the appointment case order.
/// Duplicate times are legal: those patients are due at the same minute.
const APPOINTMENT_SLOTS: [(u32, u32); 55] = [
    (7, 0),
    (7, 0),
    (7, 0),
    (7, 15),
    (7, 15),
    (7, 15),
    (7, 23),
    (7, 45),
    (7, 45),
    (7, 45),
    (7, 55),
    (8, 15),
    (8, 15),
    (8, 15),
    (8, 15),
    (8, 47),
    (9, 10),
    (9, 15),
    (9, 15),
    (9, 17),
    (9, 27),
    (9, 45),
    (10, 4),
    (10, 7),
    (10, 15),
    (10, 15),
    (10, 16),
    (10, 45),
    (10, 45),
    (10, 45),
    (11, 4),
    (11, 4),
    (11, 15),
    (11, 15),
    (11, 30),
    (11, 48),
    (11, 49),
    (11, 51),
    (11, 55),
    (12, 15),
    (12, 47),
    (12, 57),
    (13, 12),
    (13, 15),
    (13, 28),
    (13, 45),
    (13, 47),
    (13, 50),
    (14, 0),
    (14, 0),
    (14, 16),
    (14, 38),
    (14, 43),
    (14, 52),
    (15, 0),
];

pub fn lookup(id: PatientId) -> Option<(&'static str, Acuity)> {
    CATALOG
        .iter()
        .find(|(pid, _, _)| *pid == id)
        .map(|(_, service, acuity)| (*service, *acuity))
}

/// Appointment times as clock-of-day values, in slot order.
pub fn appointment_slots() -> Vec<NaiveTime> {
    APPOINTMENT_SLOTS
        .iter()
        .map(|&(h, m)| NaiveTime::from_hms_opt(h, m, 0).expect("valid appointment slot"))
        .collect()
}

/// Physician service durations, inclusive [low, high] minutes per service.
pub fn physician_duration_ranges() -> HashMap<String, (Minutes, Minutes)> {
    [
        ("ANES", (27, 31)),
        ("GENS", (45, 52)),
        ("GYN", (28, 32)),
        ("NEUR", (41, 47)),
        ("OMF", (41, 47)),
        ("ORTH", (38, 44)),
        ("PLAS", (15, 20)),
        ("SONC", (49, 70)),
        ("THOR", (32, 37)),
        ("TRNS", (38, 44)),
        ("UROL", (38, 44)),
    ]
    .into_iter()
    .map(|(service, range)| (service.to_string(), range))
    .collect()
}

/// Build the scheduled roster for a run, in the given admission order.
/// Ids with no catalog entry are skipped with a diagnostic; no patient is
/// created for them.
pub fn build_roster(order: &[PatientId]) -> Vec<Patient> {
    let mut roster = Vec::with_capacity(order.len());
    for &id in order {
        match lookup(id) {
            Some((service, acuity)) => roster.push(Patient::new(id, service, acuity)),
            None => log::warn!("patient {id} is not in the catalog, skipping"),
        }
    }
    roster
}
