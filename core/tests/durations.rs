//! Duration policy behavior, including the dormant charting escalation and
//! the unknown-service contract.

use clinicflow_core::{
    catalog,
    duration::{DurationPolicy, NursingDurations},
    patient::{Acuity, Patient},
    rng::SimRng,
};

fn patient(service: &str, acuity: Acuity) -> Patient {
    Patient::new(1, service, acuity)
}

#[test]
fn constant_policies_ignore_the_patient() {
    let mut rng = SimRng::seed_from(1);
    let policy = DurationPolicy::Constant(7);
    assert_eq!(policy.compute(&patient("NEUR", Acuity::High), &mut rng), Some(7));
    assert_eq!(policy.compute(&patient("GYN", Acuity::Low), &mut rng), Some(7));
    assert_eq!(DurationPolicy::Constant(10).compute(&patient("ANES", Acuity::Low), &mut rng), Some(10));
}

#[test]
fn nursing_charting_totals_43_while_escalation_is_off() {
    // 5 chart + 27 assessment + 11 paperwork, threshold zero.
    let policy = DurationPolicy::NursingFormula(NursingDurations::default());
    let high = patient("NEUR", Acuity::High);
    for seed in 0..20 {
        let mut rng = SimRng::seed_from(seed);
        for _ in 0..50 {
            assert_eq!(policy.compute(&high, &mut rng), Some(43));
        }
    }
}

#[test]
fn nursing_charting_escalates_for_high_acuity_at_full_threshold() {
    // Threshold 9 catches every roll, so High acuity always escalates:
    // 20 chart + 27 assessment + 11 paperwork.
    let policy = DurationPolicy::NursingFormula(NursingDurations {
        escalation_threshold: 9,
        ..NursingDurations::default()
    });
    let mut rng = SimRng::seed_from(7);
    for _ in 0..50 {
        assert_eq!(policy.compute(&patient("NEUR", Acuity::High), &mut rng), Some(58));
    }
    for _ in 0..50 {
        assert_eq!(policy.compute(&patient("GYN", Acuity::Low), &mut rng), Some(43));
        assert_eq!(policy.compute(&patient("THOR", Acuity::Medium), &mut rng), Some(43));
    }
}

#[test]
fn physician_draws_stay_inside_the_service_range() {
    let policy = DurationPolicy::ServiceTable(catalog::physician_duration_ranges());
    let mut rng = SimRng::seed_from(11);

    for _ in 0..200 {
        let minutes = policy
            .compute(&patient("SONC", Acuity::High), &mut rng)
            .expect("SONC is configured");
        assert!((49..=70).contains(&minutes), "SONC drew {minutes}");
    }

    let mut seen = std::collections::HashSet::new();
    for _ in 0..500 {
        let minutes = policy
            .compute(&patient("PLAS", Acuity::Low), &mut rng)
            .expect("PLAS is configured");
        assert!((15..=20).contains(&minutes), "PLAS drew {minutes}");
        seen.insert(minutes);
    }
    // The range is inclusive on both ends.
    assert!(seen.contains(&15));
    assert!(seen.contains(&20));
}

#[test]
fn unknown_service_yields_no_duration_and_no_draw() {
    let policy = DurationPolicy::ServiceTable(catalog::physician_duration_ranges());

    let mut rng_a = SimRng::seed_from(99);
    assert_eq!(policy.compute(&patient("DERM", Acuity::Medium), &mut rng_a), None);

    // The failed lookup must not consume from the shared generator.
    let mut rng_b = SimRng::seed_from(99);
    assert_eq!(rng_a.next_u64(), rng_b.next_u64());
}

#[test]
fn escalation_roll_spans_one_through_nine() {
    let mut rng = SimRng::seed_from(5);
    let mut seen = std::collections::HashSet::new();
    for _ in 0..500 {
        let roll = rng.escalation_roll();
        assert!((1..=9).contains(&roll));
        seen.insert(roll);
    }
    assert!(seen.contains(&1));
    assert!(seen.contains(&9));
}
