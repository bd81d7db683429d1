//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database. The engine and the runner
//! call store methods — they never execute SQL directly.

use crate::{
    error::{SimError, SimResult},
    event::EventLogEntry,
    patient::{Acuity, PatientRecord},
};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

/// Timestamp column format. SQLite's lexicographic TEXT ordering matches
/// chronological ordering under this format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct SimStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl SimStore {
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (:memory: ignores it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    /// Reopen a new connection to the same database.
    /// For in-memory databases this returns a fresh, isolated database.
    pub fn reopen(&self) -> SimResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(
        &self,
        run_id: &str,
        seed: u64,
        version: &str,
        started_at: NaiveDateTime,
    ) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, version, started_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                run_id,
                seed as i64,
                version,
                started_at.format(TIMESTAMP_FORMAT).to_string()
            ],
        )?;
        Ok(())
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (run_id, at, source, event_type, payload)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.run_id,
                entry.at,
                entry.source,
                entry.event_type,
                entry.payload,
            ],
        )?;
        Ok(())
    }

    /// All events of a run in emission order.
    pub fn events_for_run(&self, run_id: &str) -> SimResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, at, source, event_type, payload
             FROM event_log WHERE run_id = ?1
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![run_id], event_row_mapper)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn events_of_type(&self, run_id: &str, event_type: &str) -> SimResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, at, source, event_type, payload
             FROM event_log WHERE run_id = ?1 AND event_type = ?2
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![run_id, event_type], event_row_mapper)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn event_count(&self, run_id: &str) -> SimResult<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM event_log WHERE run_id = ?1",
                params![run_id],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }

    // ── Patient records ────────────────────────────────────────

    pub fn insert_patient_record(&self, record: &PatientRecord) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO patient_record (
                run_id, record_number, patient_id, service, acuity,
                arrival, los_minutes, departure
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.run_id,
                record.record_number,
                record.patient_id,
                record.service,
                record.acuity.as_str(),
                record.arrival.format(TIMESTAMP_FORMAT).to_string(),
                record.los_minutes,
                record.departure.format(TIMESTAMP_FORMAT).to_string(),
            ],
        )?;
        Ok(())
    }

    /// All records of a run, in checkout order.
    pub fn patient_records(&self, run_id: &str) -> SimResult<Vec<PatientRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT run_id, record_number, patient_id, service, acuity,
                    arrival, los_minutes, departure
             FROM patient_record WHERE run_id = ?1
             ORDER BY id ASC",
        )?;
        let raw = stmt
            .query_map(params![run_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, u32>(1)?,
                    row.get::<_, u32>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, i64>(6)?,
                    row.get::<_, String>(7)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(
                |(run_id, record_number, patient_id, service, acuity, arrival, los, departure)| {
                    Ok(PatientRecord {
                        run_id,
                        record_number,
                        patient_id,
                        service,
                        acuity: parse_acuity(&acuity)?,
                        arrival: parse_timestamp(&arrival)?,
                        los_minutes: los,
                        departure: parse_timestamp(&departure)?,
                    })
                },
            )
            .collect()
    }

    pub fn patient_record_count(&self, run_id: &str) -> SimResult<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM patient_record WHERE run_id = ?1",
                params![run_id],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }
}

fn event_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<EventLogEntry> {
    Ok(EventLogEntry {
        id: Some(row.get(0)?),
        run_id: row.get(1)?,
        at: row.get(2)?,
        source: row.get(3)?,
        event_type: row.get(4)?,
        payload: row.get(5)?,
    })
}

fn parse_timestamp(text: &str) -> SimResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .map_err(|e| SimError::Other(anyhow::anyhow!("bad timestamp '{text}': {e}")))
}

fn parse_acuity(text: &str) -> SimResult<Acuity> {
    Acuity::parse(text).ok_or_else(|| SimError::Other(anyhow::anyhow!("bad acuity '{text}'")))
}
