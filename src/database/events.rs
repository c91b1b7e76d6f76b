use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use super::models::parse_column;
use crate::domain::{Event, EventId, EventState};

const EVENT_COLUMNS: &str = "id, sport, event_no, name, state";

pub fn insert_event(conn: &Connection, sport: &str, number: i32, name: &str) -> Result<Event> {
    let sql = format!(
        "INSERT INTO events (sport, event_no, name) VALUES (?1, ?2, ?3) RETURNING {}",
        EVENT_COLUMNS
    );

    conn.query_row(&sql, params![sport, number, name], parse_event_row)
        .with_context(|| format!("Failed to insert event {}", name))
}

pub fn find_by_id(conn: &Connection, id: EventId) -> Result<Option<Event>> {
    let sql = format!("SELECT {} FROM events WHERE id = ?1", EVENT_COLUMNS);

    conn.query_row(&sql, params![id], parse_event_row)
        .optional()
        .context("Failed to query event by id")
}

pub fn list_all(conn: &Connection) -> Result<Vec<Event>> {
    let sql = format!("SELECT {} FROM events ORDER BY event_no, id", EVENT_COLUMNS);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_event_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list events")?;

    Ok(rows)
}

pub fn update_state(conn: &Connection, id: EventId, state: EventState) -> Result<()> {
    let updated = conn
        .execute("UPDATE events SET state = ?1 WHERE id = ?2", params![state.as_str(), id])
        .context("Failed to update event state")?;

    if updated == 0 {
        anyhow::bail!("Event {} does not exist", id);
    }
    Ok(())
}

fn parse_event_row(row: &rusqlite::Row) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get(0)?,
        sport: row.get(1)?,
        number: row.get(2)?,
        name: row.get(3)?,
        state: parse_column(row, 4)?,
    })
}
