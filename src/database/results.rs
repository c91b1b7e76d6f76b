use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use super::models::parse_column;
use crate::domain::{EventId, GroupRanking, RankedEntry, RankedFinal};

pub fn upsert_group_ranking(conn: &Connection, ranking: &GroupRanking) -> Result<()> {
    let [first, second, third] = ranking.placings;

    conn.execute(
        "INSERT INTO group_ranking_results \
         (event_id, pool, first_team_id, first_score, second_team_id, second_score, third_team_id, third_score) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) \
         ON CONFLICT(event_id, pool) DO UPDATE SET \
         first_team_id = excluded.first_team_id, first_score = excluded.first_score, \
         second_team_id = excluded.second_team_id, second_score = excluded.second_score, \
         third_team_id = excluded.third_team_id, third_score = excluded.third_score",
        params![
            ranking.event_id,
            ranking.pool.as_str(),
            first.team_id,
            first.score,
            second.team_id,
            second.score,
            third.team_id,
            third.score,
        ],
    )
    .with_context(|| {
        format!(
            "Failed to save group {} ranking of event {}",
            ranking.pool, ranking.event_id
        )
    })?;

    Ok(())
}

pub fn group_rankings_for_event(conn: &Connection, event_id: EventId) -> Result<Vec<GroupRanking>> {
    let sql = "SELECT event_id, pool, first_team_id, first_score, second_team_id, second_score, \
               third_team_id, third_score FROM group_ranking_results WHERE event_id = ?1 ORDER BY pool";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![event_id], parse_group_ranking_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list group rankings")?;

    Ok(rows)
}

fn parse_group_ranking_row(row: &rusqlite::Row) -> rusqlite::Result<GroupRanking> {
    let entry = |team_idx: usize| -> rusqlite::Result<RankedEntry> {
        Ok(RankedEntry {
            team_id: row.get(team_idx)?,
            score: row.get(team_idx + 1)?,
        })
    };

    Ok(GroupRanking {
        event_id: row.get(0)?,
        pool: parse_column(row, 1)?,
        placings: [entry(2)?, entry(4)?, entry(6)?],
    })
}

/// Replaces the whole finishing order of a ranked final
pub fn replace_ranked_final(conn: &Connection, result: &RankedFinal) -> Result<()> {
    conn.execute(
        "DELETE FROM ranked_final_results WHERE event_id = ?1",
        params![result.event_id],
    )
    .context("Failed to clear ranked final")?;

    let mut stmt = conn.prepare(
        "INSERT INTO ranked_final_results (event_id, placement, team_id) VALUES (?1, ?2, ?3)",
    )?;
    for (idx, team_id) in result.placings.iter().enumerate() {
        stmt.execute(params![result.event_id, idx as i64 + 1, team_id])
            .with_context(|| {
                format!(
                    "Failed to save placement {} of event {}",
                    idx + 1,
                    result.event_id
                )
            })?;
    }

    Ok(())
}

pub fn ranked_final_for_event(conn: &Connection, event_id: EventId) -> Result<Option<RankedFinal>> {
    let mut stmt = conn.prepare(
        "SELECT team_id FROM ranked_final_results WHERE event_id = ?1 ORDER BY placement",
    )?;
    let placings = stmt
        .query_map(params![event_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<i64>>>()
        .context("Failed to load ranked final")?;

    if placings.is_empty() {
        return Ok(None);
    }
    Ok(Some(RankedFinal { event_id, placings }))
}
