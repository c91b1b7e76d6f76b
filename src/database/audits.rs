use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use crate::domain::{MatchAudit, MatchId, Scores};

pub fn insert_audit(conn: &Connection, audit: &MatchAudit) -> Result<()> {
    conn.execute(
        "INSERT INTO match_audits \
         (match_id, changed_by, changed_at, old_team1_score, old_team2_score, new_team1_score, new_team2_score) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            audit.match_id,
            audit.changed_by,
            audit.changed_at,
            audit.old_scores.map(|s| s.team1),
            audit.old_scores.map(|s| s.team2),
            audit.new_scores.team1,
            audit.new_scores.team2,
        ],
    )
    .with_context(|| format!("Failed to audit match {}", audit.match_id))?;

    Ok(())
}

/// Score history of one match, oldest first
pub fn list_for_match(conn: &Connection, match_id: MatchId) -> Result<Vec<MatchAudit>> {
    let mut stmt = conn.prepare(
        "SELECT match_id, changed_by, changed_at, old_team1_score, old_team2_score, \
         new_team1_score, new_team2_score FROM match_audits WHERE match_id = ?1 ORDER BY id",
    )?;
    let rows = stmt
        .query_map(params![match_id], parse_audit_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list match audits")?;

    Ok(rows)
}

fn parse_audit_row(row: &rusqlite::Row) -> rusqlite::Result<MatchAudit> {
    let old_team1: Option<i32> = row.get(3)?;
    let old_team2: Option<i32> = row.get(4)?;

    Ok(MatchAudit {
        match_id: row.get(0)?,
        changed_by: row.get(1)?,
        changed_at: row.get(2)?,
        old_scores: old_team1
            .zip(old_team2)
            .map(|(team1, team2)| Scores { team1, team2 }),
        new_scores: Scores {
            team1: row.get(5)?,
            team2: row.get(6)?,
        },
    })
}
