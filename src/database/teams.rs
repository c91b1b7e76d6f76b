use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use super::models::parse_pool;
use crate::domain::{Pool, Team};

const TEAM_COLUMNS: &str = "id, code, name, pool";

pub fn insert_team(conn: &Connection, code: &str, name: &str, pool: Option<Pool>) -> Result<Team> {
    let sql = format!(
        "INSERT INTO teams (code, name, pool) VALUES (?1, ?2, ?3) RETURNING {}",
        TEAM_COLUMNS
    );

    conn.query_row(&sql, params![code, name, pool.map(|p| p.as_str())], parse_team_row)
        .with_context(|| format!("Failed to insert team {}", code))
}

pub fn list_all(conn: &Connection) -> Result<Vec<Team>> {
    let sql = format!("SELECT {} FROM teams ORDER BY id", TEAM_COLUMNS);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_team_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list teams")?;

    Ok(rows)
}

fn parse_team_row(row: &rusqlite::Row) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        pool: parse_pool(row, 3)?,
    })
}
