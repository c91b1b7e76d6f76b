use std::collections::HashMap;
use std::fmt;

use log::warn;
use serde::Serialize;

use crate::domain::{
    ChampionshipStanding, Event, EventId, GroupRanking, Match, MatchKind, RankedFinal,
    ResolutionPolicy, Team, TeamId,
};
use crate::errors::EngineError;

pub const DEFAULT_SCALE: [i32; 6] = [100, 70, 50, 40, 30, 10];

/// Championship points per finishing place, 1st place first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointsScale {
    points: Vec<i32>,
}

impl PointsScale {
    pub fn new(points: Vec<i32>) -> Self {
        Self { points }
    }

    /// Points for a 1-based placement; places beyond the scale earn nothing
    pub fn points_for(&self, placement: usize) -> i32 {
        placement
            .checked_sub(1)
            .and_then(|idx| self.points.get(idx))
            .copied()
            .unwrap_or(0)
    }

    pub fn places(&self) -> usize {
        self.points.len()
    }
}

impl Default for PointsScale {
    fn default() -> Self {
        Self::new(DEFAULT_SCALE.to_vec())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn for_placement(placement: usize) -> Option<Self> {
        match placement {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Award {
    pub team_id: TeamId,
    pub placement: usize,
}

/// Everything the allocator reads for one event
#[derive(Debug, Clone)]
pub struct EventResults {
    pub event: Event,
    pub matches: Vec<Match>,
    pub group_rankings: Vec<GroupRanking>,
    pub ranked_final: Option<RankedFinal>,
}

/// An event whose stored results could not be scored
#[derive(Debug)]
pub struct SweepFault {
    pub event_id: EventId,
    pub error: EngineError,
}

impl fmt::Display for SweepFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event {}: {}", self.event_id, self.error)
    }
}

/// Finishing places an event has settled so far
pub fn event_awards(results: &EventResults) -> Result<Vec<Award>, EngineError> {
    match results.event.policy() {
        ResolutionPolicy::RankedFinal => Ok(results
            .ranked_final
            .iter()
            .flat_map(|r| r.placings.iter().enumerate())
            .map(|(idx, &team_id)| Award { team_id, placement: idx + 1 })
            .collect()),
        ResolutionPolicy::GroupRanking => Ok(results
            .group_rankings
            .iter()
            .flat_map(|r| r.placings.iter().enumerate())
            .map(|(idx, entry)| Award { team_id: entry.team_id, placement: idx + 1 })
            .collect()),
        ResolutionPolicy::StandardBracket => bracket_awards(&results.matches),
    }
}

fn bracket_awards(matches: &[Match]) -> Result<Vec<Award>, EngineError> {
    let mut awards = Vec::new();

    for m in matches {
        let top = match m.kind {
            MatchKind::Final => 1,
            MatchKind::Playoff34 => 3,
            MatchKind::Playoff56 => 5,
            _ => continue,
        };

        if let Some(outcome) = m.outcome()? {
            awards.push(Award { team_id: outcome.winner, placement: top });
            awards.push(Award { team_id: outcome.loser, placement: top + 1 });
        }
    }

    Ok(awards)
}

/// Fresh standings for every team plus the events that had to be skipped
#[derive(Debug, Default)]
pub struct Allocation {
    pub standings: Vec<ChampionshipStanding>,
    pub faults: Vec<SweepFault>,
}

/// Recomputes the whole championship from zero.
///
/// An event with faulty results contributes nothing and is reported; the
/// remaining events are still scored.
pub fn allocate(teams: &[Team], events: &[EventResults], scale: &PointsScale) -> Allocation {
    let mut by_team: HashMap<TeamId, ChampionshipStanding> = teams
        .iter()
        .map(|t| (t.id, ChampionshipStanding::empty(t.id)))
        .collect();
    let mut faults = Vec::new();

    for results in events {
        let awards = match event_awards(results) {
            Ok(awards) => awards,
            Err(error) => {
                warn!("Skipping event {} in points sweep: {}", results.event.id, error);
                faults.push(SweepFault { event_id: results.event.id, error });
                continue;
            }
        };

        for award in awards {
            let standing = by_team
                .entry(award.team_id)
                .or_insert_with(|| ChampionshipStanding::empty(award.team_id));
            standing.total_points += scale.points_for(award.placement);
            match Medal::for_placement(award.placement) {
                Some(Medal::Gold) => standing.gold += 1,
                Some(Medal::Silver) => standing.silver += 1,
                Some(Medal::Bronze) => standing.bronze += 1,
                None => {}
            }
        }
    }

    let mut standings: Vec<ChampionshipStanding> = by_team.into_values().collect();
    standings.sort_by_key(|s| s.team_id);

    Allocation { standings, faults }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub rank: usize,
    pub team_id: TeamId,
    pub code: String,
    pub name: String,
    pub total_points: i32,
    pub gold: i32,
    pub silver: i32,
    pub bronze: i32,
}

/// Leaderboard order: points, gold, silver, bronze, then team id
pub fn championship_table(teams: &[Team], standings: &[ChampionshipStanding]) -> Vec<TableRow> {
    let by_team: HashMap<TeamId, &ChampionshipStanding> =
        standings.iter().map(|s| (s.team_id, s)).collect();

    let mut rows: Vec<TableRow> = teams
        .iter()
        .map(|team| {
            let standing = by_team.get(&team.id).copied().copied().unwrap_or_default();
            TableRow {
                rank: 0,
                team_id: team.id,
                code: team.code.clone(),
                name: team.name.clone(),
                total_points: standing.total_points,
                gold: standing.gold,
                silver: standing.silver,
                bronze: standing.bronze,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then(b.gold.cmp(&a.gold))
            .then(b.silver.cmp(&a.silver))
            .then(b.bronze.cmp(&a.bronze))
            .then(a.team_id.cmp(&b.team_id))
    });

    for (idx, row) in rows.iter_mut().enumerate() {
        row.rank = idx + 1;
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MatchGroup, Pool, RankedEntry, Seeding};
    use crate::engine::test_support::{event, open_match, play, six_teams};

    fn bracket_match(id: i64, kind: MatchKind) -> Match {
        open_match(id, id as i32, MatchGroup::Bracket, kind, Seeding::Open)
    }

    fn group_ranking(event_id: EventId, pool: Pool, teams: [TeamId; 3]) -> GroupRanking {
        let placings = teams.map(|team_id| RankedEntry { team_id, score: None });
        GroupRanking { event_id, pool, placings }
    }

    fn bracket_results(
        event_id: EventId,
        settled: &[(MatchKind, (TeamId, TeamId), TeamId)],
    ) -> EventResults {
        let mut matches = Vec::new();
        for (idx, (kind, teams, winner)) in settled.iter().enumerate() {
            let mut m = bracket_match(idx as i64 + 1, *kind);
            m.event_id = event_id;
            play(&mut m, *teams, (21, 15), *winner);
            matches.push(m);
        }
        EventResults {
            event: event(event_id, "Pickleball"),
            matches,
            group_rankings: Vec::new(),
            ranked_final: None,
        }
    }

    fn standing(allocation: &Allocation, team_id: TeamId) -> ChampionshipStanding {
        allocation.standings.iter().find(|s| s.team_id == team_id).copied().unwrap()
    }

    #[test]
    fn test_final_awards_gold_and_silver() {
        // Golden Eagles beat Flying Phantoms in the final
        let results = bracket_results(1, &[(MatchKind::Final, (1, 3), 1)]);
        let allocation = allocate(&six_teams(), &[results], &PointsScale::default());

        let eagles = standing(&allocation, 1);
        assert_eq!((eagles.total_points, eagles.gold), (100, 1));
        let phantoms = standing(&allocation, 3);
        assert_eq!((phantoms.total_points, phantoms.silver), (70, 1));
        assert_eq!(standing(&allocation, 2), ChampionshipStanding::empty(2));
        assert!(allocation.faults.is_empty());
    }

    #[test]
    fn test_full_bracket_places() {
        let results = bracket_results(
            1,
            &[
                (MatchKind::Final, (1, 2), 2),
                (MatchKind::Playoff34, (4, 5), 5),
                (MatchKind::Playoff56, (3, 6), 3),
                (MatchKind::SemiFinal1, (1, 4), 1),
            ],
        );
        let allocation = allocate(&six_teams(), &[results], &PointsScale::default());

        let points: Vec<i32> = (1..=6).map(|id| standing(&allocation, id).total_points).collect();
        assert_eq!(points, vec![70, 100, 30, 40, 50, 10]);
        assert_eq!(standing(&allocation, 5).bronze, 1);
        assert_eq!(standing(&allocation, 4).bronze, 0);
    }

    #[test]
    fn test_open_final_awards_nothing() {
        let mut results = bracket_results(1, &[]);
        results.matches.push(bracket_match(1, MatchKind::Final));

        let allocation = allocate(&six_teams(), &[results], &PointsScale::default());
        assert!(allocation.standings.iter().all(|s| s.total_points == 0));
    }

    #[test]
    fn test_event_order_does_not_matter() {
        let first = bracket_results(1, &[(MatchKind::Final, (1, 3), 1)]);
        let second = bracket_results(2, &[(MatchKind::Final, (3, 5), 3)]);
        let scale = PointsScale::default();

        let forward = allocate(&six_teams(), &[first.clone(), second.clone()], &scale);
        let backward = allocate(&six_teams(), &[second, first], &scale);
        assert_eq!(forward.standings, backward.standings);
    }

    #[test]
    fn test_full_recompute_equals_sum_of_single_events() {
        let scale = PointsScale::default();
        let events = vec![
            bracket_results(
                1,
                &[
                    (MatchKind::Final, (1, 5), 5),
                    (MatchKind::Playoff34, (2, 4), 2),
                    (MatchKind::Playoff56, (3, 6), 6),
                ],
            ),
            EventResults {
                event: event(2, "Swimming"),
                matches: Vec::new(),
                group_rankings: Vec::new(),
                ranked_final: Some(RankedFinal { event_id: 2, placings: vec![3, 1, 6, 2] }),
            },
            EventResults {
                event: event(3, "Bridge"),
                matches: Vec::new(),
                group_rankings: vec![
                    group_ranking(3, Pool::A, [1, 3, 2]),
                    group_ranking(3, Pool::B, [4, 6, 5]),
                ],
                ranked_final: None,
            },
        ];

        let mut summed: HashMap<TeamId, ChampionshipStanding> = HashMap::new();
        for results in &events {
            let single = allocate(&six_teams(), std::slice::from_ref(results), &scale);
            for s in single.standings {
                let total = summed
                    .entry(s.team_id)
                    .or_insert_with(|| ChampionshipStanding::empty(s.team_id));
                total.total_points += s.total_points;
                total.gold += s.gold;
                total.silver += s.silver;
                total.bronze += s.bronze;
            }
        }
        let mut summed: Vec<ChampionshipStanding> = summed.into_values().collect();
        summed.sort_by_key(|s| s.team_id);

        let full = allocate(&six_teams(), &events, &scale);
        assert!(full.faults.is_empty());
        assert_eq!(full.standings, summed);
        assert_eq!(standing(&full, 1).total_points, 70 + 70 + 100);
    }

    #[test]
    fn test_corrected_final_leaves_no_residual_points() {
        let scale = PointsScale::default();
        let first_result = bracket_results(1, &[(MatchKind::Final, (1, 3), 1)]);
        allocate(&six_teams(), &[first_result], &scale);

        let corrected = bracket_results(1, &[(MatchKind::Final, (1, 3), 3)]);
        let allocation = allocate(&six_teams(), &[corrected], &scale);

        let eagles = standing(&allocation, 1);
        assert_eq!((eagles.total_points, eagles.gold, eagles.silver), (70, 0, 1));
        let phantoms = standing(&allocation, 3);
        assert_eq!((phantoms.total_points, phantoms.gold), (100, 1));
    }

    #[test]
    fn test_faulty_event_is_isolated() {
        let good = bracket_results(1, &[(MatchKind::Final, (1, 3), 1)]);
        let mut bad = bracket_results(2, &[(MatchKind::Final, (2, 4), 2)]);
        bad.matches[0].winner = Some(6);

        let allocation = allocate(&six_teams(), &[bad, good], &PointsScale::default());

        assert_eq!(allocation.faults.len(), 1);
        assert_eq!(allocation.faults[0].event_id, 2);
        assert!(allocation.faults[0].error.is_integrity_fault());
        assert_eq!(standing(&allocation, 1).total_points, 100);
        assert_eq!(standing(&allocation, 2).total_points, 0);
    }

    #[test]
    fn test_ranked_final_awards_every_place() {
        let results = EventResults {
            event: event(3, "Swimming"),
            matches: Vec::new(),
            group_rankings: Vec::new(),
            ranked_final: Some(RankedFinal { event_id: 3, placings: vec![4, 2, 6, 1, 3, 5] }),
        };
        let allocation = allocate(&six_teams(), &[results], &PointsScale::default());

        let points: Vec<i32> = (1..=6).map(|id| standing(&allocation, id).total_points).collect();
        assert_eq!(points, vec![40, 70, 30, 100, 10, 50]);
    }

    #[test]
    fn test_group_ranking_awards_each_pool() {
        let results = EventResults {
            event: event(4, "Bridge"),
            matches: Vec::new(),
            group_rankings: vec![
                group_ranking(4, Pool::A, [2, 1, 3]),
                group_ranking(4, Pool::B, [6, 4, 5]),
            ],
            ranked_final: None,
        };
        let allocation = allocate(&six_teams(), &[results], &PointsScale::default());

        assert_eq!(standing(&allocation, 2).gold, 1);
        assert_eq!(standing(&allocation, 6).gold, 1);
        assert_eq!(standing(&allocation, 1).total_points, 70);
        assert_eq!(standing(&allocation, 5).total_points, 50);
    }

    #[test]
    fn test_table_breaks_point_ties_on_medals() {
        let teams = six_teams();
        let standings = vec![
            ChampionshipStanding { team_id: 1, total_points: 100, gold: 0, silver: 1, bronze: 1 },
            ChampionshipStanding { team_id: 2, total_points: 100, gold: 1, silver: 0, bronze: 0 },
            ChampionshipStanding { team_id: 3, total_points: 140, gold: 0, silver: 2, bronze: 0 },
        ];

        let table = championship_table(&teams, &standings);
        let order: Vec<TeamId> = table.iter().map(|r| r.team_id).collect();
        assert_eq!(order, vec![3, 2, 1, 4, 5, 6]);
        assert_eq!(table[0].rank, 1);
        assert_eq!(table[5].rank, 6);
    }

    #[test]
    fn test_scale_beyond_sixth_place() {
        let scale = PointsScale::default();
        assert_eq!(scale.points_for(6), 10);
        assert_eq!(scale.points_for(7), 0);
        assert_eq!(scale.points_for(0), 0);
    }
}
