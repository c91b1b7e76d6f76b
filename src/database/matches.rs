use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use super::models::{NewMatch, parse_column, parse_json, to_json};
use crate::domain::{EventId, Match, MatchId, Scores, Side, TeamId};
use crate::engine::SlotAssignment;

const MATCH_COLUMNS: &str = "id, event_id, match_no, match_group, kind, opponent_rule, seeding, \
     team1_id, team2_id, team1_score, team2_score, completed, winner_id, \
     team1_squad, team2_squad, scheduled_at, venue";

pub fn insert_match(conn: &Connection, new: &NewMatch) -> Result<Match> {
    let sql = format!(
        "INSERT INTO matches (event_id, match_no, match_group, kind, opponent_rule, seeding, scheduled_at, venue) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) RETURNING {}",
        MATCH_COLUMNS
    );

    conn.query_row(
        &sql,
        params![
            new.event_id,
            new.match_no,
            new.group.as_str(),
            new.kind.as_str(),
            new.opponent_rule,
            to_json(&new.seeding)?,
            new.scheduled_at,
            new.venue,
        ],
        parse_match_row,
    )
    .with_context(|| format!("Failed to insert match {} of event {}", new.match_no, new.event_id))
}

pub fn find_by_id(conn: &Connection, id: MatchId) -> Result<Option<Match>> {
    let sql = format!("SELECT {} FROM matches WHERE id = ?1", MATCH_COLUMNS);

    conn.query_row(&sql, params![id], parse_match_row)
        .optional()
        .context("Failed to query match by id")
}

pub fn list_for_event(conn: &Connection, event_id: EventId) -> Result<Vec<Match>> {
    let sql = format!(
        "SELECT {} FROM matches WHERE event_id = ?1 ORDER BY match_no",
        MATCH_COLUMNS
    );
    query_matches(conn, &sql, event_id)
}

pub fn list_completed_for_event(conn: &Connection, event_id: EventId) -> Result<Vec<Match>> {
    let sql = format!(
        "SELECT {} FROM matches WHERE event_id = ?1 AND completed = 1 ORDER BY match_no",
        MATCH_COLUMNS
    );
    query_matches(conn, &sql, event_id)
}

fn query_matches(conn: &Connection, sql: &str, event_id: EventId) -> Result<Vec<Match>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![event_id], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("Failed to list matches of event {}", event_id))?;

    Ok(rows)
}

pub fn assign_teams(conn: &Connection, assignment: &SlotAssignment) -> Result<()> {
    conn.execute(
        "UPDATE matches SET team1_id = ?1, team2_id = ?2, team1_squad = ?3, team2_squad = ?4 \
         WHERE id = ?5 AND completed = 0",
        params![
            assignment.team1,
            assignment.team2,
            assignment.team1_squad,
            assignment.team2_squad,
            assignment.match_id,
        ],
    )
    .with_context(|| format!("Failed to seed match {}", assignment.match_id))?;

    Ok(())
}

pub fn save_result(conn: &Connection, id: MatchId, scores: Scores, winner: TeamId) -> Result<()> {
    conn.execute(
        "UPDATE matches SET team1_score = ?1, team2_score = ?2, winner_id = ?3, completed = 1 WHERE id = ?4",
        params![scores.team1, scores.team2, winner, id],
    )
    .with_context(|| format!("Failed to save result of match {}", id))?;

    Ok(())
}

pub fn save_squad(conn: &Connection, id: MatchId, side: Side, squad: Option<&str>) -> Result<()> {
    let sql = match side {
        Side::Team1 => "UPDATE matches SET team1_squad = ?1 WHERE id = ?2",
        Side::Team2 => "UPDATE matches SET team2_squad = ?1 WHERE id = ?2",
    };

    conn.execute(sql, params![squad, id])
        .with_context(|| format!("Failed to save squad for match {}", id))?;

    Ok(())
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    let team1_score: Option<i32> = row.get(9)?;
    let team2_score: Option<i32> = row.get(10)?;

    Ok(Match {
        id: row.get(0)?,
        event_id: row.get(1)?,
        match_no: row.get(2)?,
        group: parse_column(row, 3)?,
        kind: parse_column(row, 4)?,
        opponent_rule: row.get(5)?,
        seeding: parse_json(row, 6)?,
        team1: row.get(7)?,
        team2: row.get(8)?,
        scores: team1_score
            .zip(team2_score)
            .map(|(team1, team2)| Scores { team1, team2 }),
        completed: row.get(11)?,
        winner: row.get(12)?,
        team1_squad: row.get(13)?,
        team2_squad: row.get(14)?,
        scheduled_at: row.get(15)?,
        venue: row.get(16)?,
    })
}
