use std::cell::RefCell;

use anyhow::{Result, anyhow};

use super::store::{SlotAssignment, TournamentStore};
use crate::domain::{
    ChampionshipStanding, Event, EventId, EventState, GroupRanking, Match, MatchAudit, MatchGroup,
    MatchId, MatchKind, Pool, RankedFinal, Scores, SeedSource, Seeding, Side, Team, TeamId,
};

pub fn pool_team(id: TeamId, name: &str, pool: Pool) -> Team {
    Team {
        id,
        code: format!("T{}", id),
        name: name.to_string(),
        pool: Some(pool),
    }
}

/// Six teams: 1-3 in pool A, 4-6 in pool B
pub fn six_teams() -> Vec<Team> {
    vec![
        pool_team(1, "Golden Eagles", Pool::A),
        pool_team(2, "Rising Phoenix", Pool::A),
        pool_team(3, "Flying Phantoms", Pool::A),
        pool_team(4, "Royal Warriors", Pool::B),
        pool_team(5, "Mighty Titans", Pool::B),
        pool_team(6, "Super Rangers", Pool::B),
    ]
}

pub fn event(id: EventId, sport: &str) -> Event {
    Event {
        id,
        sport: sport.to_string(),
        number: id as i32,
        name: format!("{} Open", sport),
        state: EventState::Open,
    }
}

pub fn open_match(
    id: MatchId,
    match_no: i32,
    group: MatchGroup,
    kind: MatchKind,
    seeding: Seeding,
) -> Match {
    Match {
        id,
        event_id: 1,
        match_no,
        group,
        kind,
        opponent_rule: String::new(),
        seeding,
        team1: None,
        team2: None,
        scores: None,
        completed: false,
        winner: None,
        team1_squad: None,
        team2_squad: None,
        scheduled_at: None,
        venue: None,
    }
}

/// Completed pool-A round-robin match between `teams`
pub fn completed_match(
    id: MatchId,
    match_no: i32,
    teams: (TeamId, TeamId),
    scores: (i32, i32),
    winner: TeamId,
) -> Match {
    let mut m = open_match(
        id,
        match_no,
        MatchGroup::Pool(Pool::A),
        MatchKind::RoundRobin,
        Seeding::FixedPair { team1: teams.0, team2: teams.1 },
    );
    play(&mut m, teams, scores, winner);
    m
}

pub fn play(m: &mut Match, teams: (TeamId, TeamId), scores: (i32, i32), winner: TeamId) {
    m.team1 = Some(teams.0);
    m.team2 = Some(teams.1);
    m.scores = Some(Scores { team1: scores.0, team2: scores.1 });
    m.completed = true;
    m.winner = Some(winner);
}

pub fn rank(pool: Pool, rank: usize) -> SeedSource {
    SeedSource::PoolRank { pool, rank }
}

pub fn winner_of(match_no: i32) -> SeedSource {
    SeedSource::WinnerOf { match_no }
}

pub fn loser_of(match_no: i32) -> SeedSource {
    SeedSource::LoserOf { match_no }
}

/// Pool round robins (matches 1-6) followed by SF1, SF2, P56, P34 and F (7-11)
pub fn standard_event_matches() -> Vec<Match> {
    let pair = |id, no, pool, team1, team2| {
        let seeding = Seeding::FixedPair { team1, team2 };
        open_match(id, no, MatchGroup::Pool(pool), MatchKind::RoundRobin, seeding)
    };
    let bracket = |id, no, kind, team1, team2| {
        open_match(id, no, MatchGroup::Bracket, kind, Seeding::Derived { team1, team2 })
    };

    vec![
        pair(1, 1, Pool::A, 1, 3),
        pair(2, 2, Pool::B, 5, 4),
        pair(3, 3, Pool::A, 1, 2),
        pair(4, 4, Pool::B, 5, 6),
        pair(5, 5, Pool::A, 2, 3),
        pair(6, 6, Pool::B, 4, 6),
        bracket(7, 7, MatchKind::SemiFinal1, rank(Pool::A, 1), rank(Pool::B, 2)),
        bracket(8, 8, MatchKind::SemiFinal2, rank(Pool::B, 1), rank(Pool::A, 2)),
        bracket(9, 9, MatchKind::Playoff56, rank(Pool::A, 3), rank(Pool::B, 3)),
        bracket(10, 10, MatchKind::Playoff34, loser_of(7), loser_of(8)),
        bracket(11, 11, MatchKind::Final, winner_of(7), winner_of(8)),
    ]
}

pub fn apply(matches: &mut [Match], assignments: &[SlotAssignment]) {
    for a in assignments {
        if let Some(m) = matches.iter_mut().find(|m| m.id == a.match_id) {
            m.team1 = Some(a.team1);
            m.team2 = Some(a.team2);
            m.team1_squad = a.team1_squad.clone();
            m.team2_squad = a.team2_squad.clone();
        }
    }
}

#[derive(Default)]
struct MemoryData {
    teams: Vec<Team>,
    events: Vec<Event>,
    matches: Vec<Match>,
    group_rankings: Vec<GroupRanking>,
    ranked_finals: Vec<RankedFinal>,
    standings: Vec<ChampionshipStanding>,
    audits: Vec<MatchAudit>,
}

/// In-memory store for engine tests
#[derive(Default)]
pub struct MemoryStore {
    data: RefCell<MemoryData>,
}

impl MemoryStore {
    pub fn new(teams: Vec<Team>, events: Vec<Event>, matches: Vec<Match>) -> Self {
        Self {
            data: RefCell::new(MemoryData { teams, events, matches, ..MemoryData::default() }),
        }
    }

    pub fn match_by_id(&self, id: MatchId) -> Match {
        self.data.borrow().matches.iter().find(|m| m.id == id).cloned().unwrap()
    }

    pub fn audits(&self) -> Vec<MatchAudit> {
        self.data.borrow().audits.clone()
    }

    pub fn snapshot(&self) -> (Vec<Match>, Vec<ChampionshipStanding>) {
        let data = self.data.borrow();
        (data.matches.clone(), data.standings.clone())
    }

    fn with_match(&self, id: MatchId, update: impl FnOnce(&mut Match)) -> Result<()> {
        let mut data = self.data.borrow_mut();
        let m = data
            .matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| anyhow!("match {} not found", id))?;
        update(m);
        Ok(())
    }
}

impl TournamentStore for MemoryStore {
    fn teams(&self) -> Result<Vec<Team>> {
        Ok(self.data.borrow().teams.clone())
    }

    fn events(&self) -> Result<Vec<Event>> {
        Ok(self.data.borrow().events.clone())
    }

    fn event(&self, id: EventId) -> Result<Option<Event>> {
        Ok(self.data.borrow().events.iter().find(|e| e.id == id).cloned())
    }

    fn find_match(&self, id: MatchId) -> Result<Option<Match>> {
        Ok(self.data.borrow().matches.iter().find(|m| m.id == id).cloned())
    }

    fn matches_for_event(&self, event_id: EventId) -> Result<Vec<Match>> {
        let mut matches: Vec<Match> = self
            .data
            .borrow()
            .matches
            .iter()
            .filter(|m| m.event_id == event_id)
            .cloned()
            .collect();
        matches.sort_by_key(|m| m.match_no);
        Ok(matches)
    }

    fn group_rankings(&self, event_id: EventId) -> Result<Vec<GroupRanking>> {
        Ok(self
            .data
            .borrow()
            .group_rankings
            .iter()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect())
    }

    fn ranked_final(&self, event_id: EventId) -> Result<Option<RankedFinal>> {
        Ok(self.data.borrow().ranked_finals.iter().find(|r| r.event_id == event_id).cloned())
    }

    fn standings(&self) -> Result<Vec<ChampionshipStanding>> {
        Ok(self.data.borrow().standings.clone())
    }

    fn assign_slot(&self, assignment: &SlotAssignment) -> Result<()> {
        self.with_match(assignment.match_id, |m| {
            m.team1 = Some(assignment.team1);
            m.team2 = Some(assignment.team2);
            m.team1_squad = assignment.team1_squad.clone();
            m.team2_squad = assignment.team2_squad.clone();
        })
    }

    fn save_result(&self, match_id: MatchId, scores: Scores, winner: TeamId) -> Result<()> {
        self.with_match(match_id, |m| {
            m.scores = Some(scores);
            m.winner = Some(winner);
            m.completed = true;
        })
    }

    fn save_squad(&self, match_id: MatchId, side: Side, squad: Option<&str>) -> Result<()> {
        let squad = squad.map(str::to_string);
        self.with_match(match_id, |m| match side {
            Side::Team1 => m.team1_squad = squad,
            Side::Team2 => m.team2_squad = squad,
        })
    }

    fn save_group_ranking(&self, ranking: &GroupRanking) -> Result<()> {
        let mut data = self.data.borrow_mut();
        data.group_rankings
            .retain(|r| !(r.event_id == ranking.event_id && r.pool == ranking.pool));
        data.group_rankings.push(ranking.clone());
        Ok(())
    }

    fn save_ranked_final(&self, result: &RankedFinal) -> Result<()> {
        let mut data = self.data.borrow_mut();
        data.ranked_finals.retain(|r| r.event_id != result.event_id);
        data.ranked_finals.push(result.clone());
        Ok(())
    }

    fn replace_standings(&self, standings: &[ChampionshipStanding]) -> Result<()> {
        self.data.borrow_mut().standings = standings.to_vec();
        Ok(())
    }

    fn record_audit(&self, audit: &MatchAudit) -> Result<()> {
        self.data.borrow_mut().audits.push(audit.clone());
        Ok(())
    }

    fn set_event_state(&self, id: EventId, state: EventState) -> Result<()> {
        let mut data = self.data.borrow_mut();
        let event = data
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| anyhow!("event {} not found", id))?;
        event.state = state;
        Ok(())
    }
}
