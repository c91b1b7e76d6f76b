use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::domain::{Match, MatchGroup, Pool, Team, TeamId};
use crate::errors::EngineError;

/// One line of a pool table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    pub team_id: TeamId,
    pub team_name: String,
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    pub score_diff: i32,
}

/// Ranks the teams of `pool` from its completed round-robin matches.
///
/// Bracket matches never count, even when both teams come from `pool`.
///
/// Order is wins, then score differential, then seed (team id) order. The input
/// order of `matches` has no influence on the result.
pub fn compute_standings(
    teams: &[Team],
    matches: &[Match],
    pool: Pool,
) -> Result<Vec<StandingRow>, EngineError> {
    let mut rows = initialize_rows(teams, pool);
    let members: HashSet<TeamId> = rows.iter().map(|r| r.team_id).collect();

    let by_team: HashMap<TeamId, usize> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| (row.team_id, idx))
        .collect();

    for m in matches.iter().filter(|m| is_pool_result(m, pool, &members)) {
        accumulate(&mut rows, &by_team, m)?;
    }

    rows.sort_by(compare_rows);
    Ok(rows)
}

pub fn ranked_team_ids(rows: &[StandingRow]) -> Vec<TeamId> {
    rows.iter().map(|r| r.team_id).collect()
}

fn initialize_rows(teams: &[Team], pool: Pool) -> Vec<StandingRow> {
    let mut rows: Vec<StandingRow> = teams
        .iter()
        .filter(|t| t.pool == Some(pool))
        .map(|t| StandingRow {
            team_id: t.id,
            team_name: t.name.clone(),
            played: 0,
            wins: 0,
            losses: 0,
            score_diff: 0,
        })
        .collect();

    rows.sort_by_key(|r| r.team_id);
    rows
}

fn is_pool_result(m: &Match, pool: Pool, members: &HashSet<TeamId>) -> bool {
    let both_in_pool = matches!(
        (m.team1, m.team2),
        (Some(t1), Some(t2)) if members.contains(&t1) && members.contains(&t2)
    );
    m.group == MatchGroup::Pool(pool) && m.completed && m.scores.is_some() && both_in_pool
}

fn accumulate(
    rows: &mut [StandingRow],
    by_team: &HashMap<TeamId, usize>,
    m: &Match,
) -> Result<(), EngineError> {
    let Some(outcome) = m.outcome()? else {
        return Ok(());
    };
    let Some(scores) = m.scores else {
        return Ok(());
    };

    let diff = scores.team1 - scores.team2;
    let winner_diff = if m.team1 == Some(outcome.winner) { diff } else { -diff };

    if let Some(&idx) = by_team.get(&outcome.winner) {
        let row = &mut rows[idx];
        row.played += 1;
        row.wins += 1;
        row.score_diff += winner_diff;
    }

    if let Some(&idx) = by_team.get(&outcome.loser) {
        let row = &mut rows[idx];
        row.played += 1;
        row.losses += 1;
        row.score_diff -= winner_diff;
    }

    Ok(())
}

fn compare_rows(a: &StandingRow, b: &StandingRow) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then_with(|| b.score_diff.cmp(&a.score_diff))
        .then_with(|| a.team_id.cmp(&b.team_id))
}
