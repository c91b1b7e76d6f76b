use std::collections::HashMap;

use log::debug;

use super::squads;
use super::standings::{compute_standings, ranked_team_ids};
use super::store::SlotAssignment;
use crate::domain::{
    Event, GroupRanking, Match, Outcome, Pool, ResolutionPolicy, SeedSource, Seeding, Team, TeamId,
};
use crate::errors::EngineError;

/// Everything the resolver reads for one event
pub struct EventSnapshot<'a> {
    pub event: &'a Event,
    pub teams: &'a [Team],
    pub matches: &'a [Match],
    pub group_rankings: &'a [GroupRanking],
}

/// Pool finishing orders, present only once the event's policy says they are final
struct PoolSeeds {
    ranked: HashMap<Pool, Vec<TeamId>>,
}

impl PoolSeeds {
    fn for_event(snapshot: &EventSnapshot<'_>) -> Result<Self, EngineError> {
        let ranked = match snapshot.event.policy() {
            ResolutionPolicy::StandardBracket => from_round_robin(snapshot)?,
            ResolutionPolicy::GroupRanking => from_group_rankings(snapshot.group_rankings),
            ResolutionPolicy::RankedFinal => HashMap::new(),
        };
        Ok(Self { ranked })
    }

    fn get(&self, pool: Pool, rank: usize) -> Option<TeamId> {
        let idx = rank.checked_sub(1)?;
        self.ranked.get(&pool)?.get(idx).copied()
    }
}

fn from_round_robin(
    snapshot: &EventSnapshot<'_>,
) -> Result<HashMap<Pool, Vec<TeamId>>, EngineError> {
    let mut pool_matches = snapshot.matches.iter().filter(|m| m.is_pool_match()).peekable();

    if pool_matches.peek().is_none() || !pool_matches.all(|m| m.completed) {
        return Ok(HashMap::new());
    }

    let mut ranked = HashMap::new();
    for pool in Pool::ALL {
        let rows = compute_standings(snapshot.teams, snapshot.matches, pool)?;
        ranked.insert(pool, ranked_team_ids(&rows));
    }
    Ok(ranked)
}

fn from_group_rankings(rankings: &[GroupRanking]) -> HashMap<Pool, Vec<TeamId>> {
    let by_pool: HashMap<Pool, Vec<TeamId>> = rankings
        .iter()
        .map(|r| (r.pool, r.placings.iter().map(|p| p.team_id).collect()))
        .collect();

    if Pool::ALL.iter().all(|pool| by_pool.contains_key(pool)) {
        by_pool
    } else {
        HashMap::new()
    }
}

/// Works out which open slots of an event can now be given teams.
///
/// Completed matches are never touched and slots that already hold the
/// resolved teams produce nothing, so an unchanged event yields no
/// assignments. Locked events are read-only.
pub fn resolve_event(snapshot: &EventSnapshot<'_>) -> Result<Vec<SlotAssignment>, EngineError> {
    if snapshot.event.is_locked() {
        return Ok(Vec::new());
    }

    let seeds = PoolSeeds::for_event(snapshot)?;
    let mut assignments = Vec::new();

    for m in snapshot.matches.iter().filter(|m| !m.completed) {
        let Some(teams) = desired_teams(snapshot, &seeds, m)? else {
            continue;
        };

        if m.team1 == Some(teams.0) && m.team2 == Some(teams.1) {
            continue;
        }

        let (team1_squad, team2_squad) = squads::carry_forward(m, teams, snapshot.matches);
        debug!(
            "Event {} match {}: seeding teams {} and {}",
            snapshot.event.id, m.match_no, teams.0, teams.1
        );

        assignments.push(SlotAssignment {
            match_id: m.id,
            match_no: m.match_no,
            team1: teams.0,
            team2: teams.1,
            team1_squad,
            team2_squad,
        });
    }

    Ok(assignments)
}

fn desired_teams(
    snapshot: &EventSnapshot<'_>,
    seeds: &PoolSeeds,
    m: &Match,
) -> Result<Option<(TeamId, TeamId)>, EngineError> {
    match m.seeding {
        Seeding::FixedPair { team1, team2 } => Ok(Some((team1, team2))),
        Seeding::Derived { team1, team2 } => {
            let first = resolve_source(snapshot, seeds, team1)?;
            let second = resolve_source(snapshot, seeds, team2)?;
            Ok(first.zip(second))
        }
        Seeding::PoolPlay { .. } | Seeding::Open => Ok(placeholder_pairing(snapshot, m)),
    }
}

fn resolve_source(
    snapshot: &EventSnapshot<'_>,
    seeds: &PoolSeeds,
    source: SeedSource,
) -> Result<Option<TeamId>, EngineError> {
    match source {
        SeedSource::PoolRank { pool, rank } => Ok(seeds.get(pool, rank)),
        SeedSource::WinnerOf { match_no } => {
            Ok(outcome_of(snapshot, match_no)?.map(|o| o.winner))
        }
        SeedSource::LoserOf { match_no } => {
            Ok(outcome_of(snapshot, match_no)?.map(|o| o.loser))
        }
    }
}

fn outcome_of(
    snapshot: &EventSnapshot<'_>,
    match_no: i32,
) -> Result<Option<Outcome>, EngineError> {
    match snapshot.matches.iter().find(|m| m.match_no == match_no) {
        Some(source) => source.outcome(),
        None => Ok(None),
    }
}

/// Ranked finals have no opponents; a lane only needs some team on each side
/// to accept a result.
///
/// A team already sitting on a side stays there. Only an empty side gets the
/// placeholder (the lowest team id).
fn placeholder_pairing(snapshot: &EventSnapshot<'_>, m: &Match) -> Option<(TeamId, TeamId)> {
    if snapshot.event.policy() != ResolutionPolicy::RankedFinal {
        return None;
    }

    let placeholder = snapshot.teams.iter().map(|t| t.id).min()?;
    Some((m.team1.unwrap_or(placeholder), m.team2.unwrap_or(placeholder)))
}
