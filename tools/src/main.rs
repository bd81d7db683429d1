//! sim-runner: headless simulation runner for clinicflow.
//!
//! Usage:
//!   sim-runner --seed 12345 --db clinic.db
//!   sim-runner --mode appointments --runs 3 --db clinic.db
//!
//! The database location comes from --db or the CLINICFLOW_DB environment
//! variable (a .env file in the current directory or any parent is honored);
//! a run refuses to start without one.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clinicflow_core::{
    config::{ArrivalMode, RunConfig},
    engine::SimEngine,
    store::SimStore,
    types::new_run_id,
};
use std::env;
use std::path::PathBuf;

const DB_ENV_VAR: &str = "CLINICFLOW_DB";

fn main() -> Result<()> {
    load_dotenv();
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let runs = parse_arg(&args, "--runs", 1u32);

    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].clone())
        .or_else(|| env::var(DB_ENV_VAR).ok())
        .with_context(|| {
            format!("No database configured. Pass --db <path> or set {DB_ENV_VAR} (a .env file works too).")
        })?;

    let config_path = args.windows(2).find(|w| w[0] == "--config").map(|w| w[1].clone());
    let mut config = match &config_path {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default_run(),
    };

    if let Some(w) = args.windows(2).find(|w| w[0] == "--mode") {
        config.arrival_mode = match w[1].as_str() {
            "interval" => ArrivalMode::Interval,
            "appointments" => ArrivalMode::Appointments,
            other => anyhow::bail!("Unknown arrival mode '{other}' (interval|appointments)"),
        };
    }

    // --date wins; otherwise a config file keeps its own day and the
    // default configuration simulates today.
    if let Some(w) = args.windows(2).find(|w| w[0] == "--date") {
        config.day = NaiveDate::parse_from_str(&w[1], "%Y-%m-%d")
            .with_context(|| format!("Bad --date '{}', expected YYYY-MM-DD", w[1]))?;
    } else if config_path.is_none() {
        config.day = chrono::Local::now().date_naive();
    }

    println!("clinicflow — sim-runner");
    println!("  seed: {seed}");
    println!("  runs: {runs}");
    println!("  day:  {}", config.day);
    println!("  db:   {db}");
    println!();

    log::info!("opening database {db}");
    let store = SimStore::open(&db)?;
    store.migrate()?;

    for record_number in 1..=runs {
        let run_id = new_run_id();
        store.insert_run(
            &run_id,
            seed,
            env!("CARGO_PKG_VERSION"),
            config.start_datetime(),
        )?;

        let mut engine = SimEngine::build(run_id.clone(), seed, config.clone(), store.reopen()?)?;
        engine.run()?;

        print_summary(&engine, record_number);

        for record in engine.checkout_records(record_number) {
            store.insert_patient_record(&record)?;
        }
    }

    Ok(())
}

fn print_summary(engine: &SimEngine, record_number: u32) {
    println!("=== RUN {record_number} SUMMARY ===");
    println!("  run_id:     {}", engine.run_id);
    println!("  checked out: {}", engine.checkout().len());
    println!("  rejected:    {}", engine.rejected.len());
    println!("  room peak:   {}/{}", engine.exam_rooms.peak_occupancy(), engine.exam_rooms.capacity());
    for patient in engine.checkout() {
        let arrival = patient
            .arrival
            .map(|a| a.format("%H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  patient {:>3} | arrived {arrival} | LOS {:>4} min",
            patient.id,
            patient.los_minutes.unwrap_or(0)
        );
    }
    println!();
}

/// Load KEY=VALUE pairs from the nearest .env, walking up from the current
/// directory. Variables already set in the environment win.
fn load_dotenv() {
    let Some(path) = find_dotenv() else { return };
    let Ok(content) = std::fs::read_to_string(&path) else {
        return;
    };
    for raw in content.lines() {
        let mut line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(rest) = line.strip_prefix("export ") {
            line = rest.trim();
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim().trim_matches('"');
        if key.is_empty() || env::var(key).is_ok() {
            continue;
        }
        env::set_var(key, value);
    }
}

fn find_dotenv() -> Option<PathBuf> {
    let mut dir = env::current_dir().ok()?;
    loop {
        let candidate = dir.join(".env");
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
