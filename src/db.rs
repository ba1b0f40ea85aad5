//! Database schema and operations
//!
//! The reading history is append-only: weeks are inserted, never updated.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::models::{MeterReading, Resource, WeeklyReading};

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- One row per submitted week, in submission order
        CREATE TABLE IF NOT EXISTS weeks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            start_at TEXT NOT NULL,
            end_at TEXT NOT NULL
        );

        -- Raw readings; position keeps ingestion order within a week
        CREATE TABLE IF NOT EXISTS readings (
            week_id INTEGER NOT NULL REFERENCES weeks(id),
            position INTEGER NOT NULL,
            hall TEXT NOT NULL,
            resource TEXT NOT NULL,
            value REAL NOT NULL,
            PRIMARY KEY (week_id, position)
        );

        CREATE INDEX IF NOT EXISTS idx_readings_hall ON readings(hall);
        "#,
    )?;
    Ok(())
}

/// Append a week and its readings, returning the new week id
pub fn append_week(conn: &Connection, week: &WeeklyReading) -> Result<i64> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO weeks (start_at, end_at) VALUES (?1, ?2)",
        (week.start.to_rfc3339(), week.end.to_rfc3339()),
    )?;
    let week_id = tx.last_insert_rowid();

    {
        let mut stmt = tx.prepare(
            "INSERT INTO readings (week_id, position, hall, resource, value)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for (position, r) in week.readings.iter().enumerate() {
            stmt.execute((week_id, position as i64, &r.hall, r.resource.label(), r.value))?;
        }
    }

    tx.commit()?;
    Ok(week_id)
}

/// Append several weeks in order
pub fn append_weeks(conn: &Connection, weeks: &[WeeklyReading]) -> Result<()> {
    for week in weeks {
        append_week(conn, week)?;
    }
    Ok(())
}

fn parse_stored_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("Corrupt timestamp in database: {raw:?}"))?
        .with_timezone(&Utc))
}

fn get_week_readings(conn: &Connection, week_id: i64) -> Result<Vec<MeterReading>> {
    let mut stmt = conn.prepare(
        "SELECT hall, resource, value
         FROM readings
         WHERE week_id = ?1
         ORDER BY position",
    )?;

    let rows = stmt.query_map([week_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, f64>(2)?,
        ))
    })?;

    let mut results = Vec::new();
    for row in rows {
        let (hall, resource, value) = row?;
        let resource = Resource::from_label(&resource)
            .ok_or_else(|| anyhow!("Unknown resource in database: {resource:?}"))?;
        results.push(MeterReading {
            hall,
            resource,
            value,
        });
    }
    Ok(results)
}

/// Load the full reading history in submission order
pub fn load_history(conn: &Connection) -> Result<Vec<WeeklyReading>> {
    let mut stmt = conn.prepare("SELECT id, start_at, end_at FROM weeks ORDER BY id")?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    let mut weeks = Vec::new();
    for row in rows {
        let (id, start, end) = row?;
        weeks.push(WeeklyReading {
            start: parse_stored_timestamp(&start)?,
            end: parse_stored_timestamp(&end)?,
            readings: get_week_readings(conn, id)?,
        });
    }
    Ok(weeks)
}

/// Number of stored weeks
pub fn week_count(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM weeks", [], |row| row.get(0))?;
    Ok(count as usize)
}

/// Clear all stored weeks (for re-seeding or re-import)
pub fn clear_history(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DELETE FROM readings;
        DELETE FROM weeks;
        "#,
    )?;
    Ok(())
}
