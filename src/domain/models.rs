use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::seeding::Seeding;
use crate::errors::EngineError;

pub type TeamId = i64;
pub type EventId = i64;
pub type MatchId = i64;

/// One of the two round-robin pools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pool {
    A,
    B,
}

impl Pool {
    pub const ALL: [Pool; 2] = [Pool::A, Pool::B];

    pub fn as_str(&self) -> &'static str {
        match self {
            Pool::A => "A",
            Pool::B => "B",
        }
    }
}

impl FromStr for Pool {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Pool::A),
            "B" => Ok(Pool::B),
            other => Err(EngineError::InvalidCode(format!("pool '{}'", other))),
        }
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub code: String,
    pub name: String,
    pub pool: Option<Pool>,
}

/// Event lifecycle. Only `Open` events accept writes; transitions come from an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventState {
    Open,
    Locked,
}

impl EventState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventState::Open => "open",
            EventState::Locked => "locked",
        }
    }
}

impl FromStr for EventState {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(EventState::Open),
            "locked" => Ok(EventState::Locked),
            other => Err(EngineError::InvalidCode(format!("event state '{}'", other))),
        }
    }
}

/// How an event turns results into bracket seeds and placements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPolicy {
    StandardBracket,
    GroupRanking,
    RankedFinal,
}

impl ResolutionPolicy {
    pub fn for_sport(sport: &str) -> Self {
        let sport = sport.to_lowercase();
        if sport.contains("swimming") {
            ResolutionPolicy::RankedFinal
        } else if sport.contains("bridge") {
            ResolutionPolicy::GroupRanking
        } else {
            ResolutionPolicy::StandardBracket
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub sport: String,
    pub number: i32,
    pub name: String,
    pub state: EventState,
}

impl Event {
    pub fn policy(&self) -> ResolutionPolicy {
        ResolutionPolicy::for_sport(&self.sport)
    }

    pub fn is_locked(&self) -> bool {
        self.state == EventState::Locked
    }

    pub fn ensure_open(&self) -> Result<(), EngineError> {
        if self.is_locked() {
            return Err(EngineError::EventLocked(self.id));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchGroup {
    Pool(Pool),
    Bracket,
}

impl MatchGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchGroup::Pool(pool) => pool.as_str(),
            MatchGroup::Bracket => "A&B",
        }
    }

    pub fn pool(&self) -> Option<Pool> {
        match self {
            MatchGroup::Pool(pool) => Some(*pool),
            MatchGroup::Bracket => None,
        }
    }
}

impl FromStr for MatchGroup {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A&B" | "a&b" | "AB" => Ok(MatchGroup::Bracket),
            other => other.parse().map(MatchGroup::Pool),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchKind {
    RoundRobin,
    SemiFinal1,
    SemiFinal2,
    Playoff56,
    Playoff34,
    Final,
    RankedFinal,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::RoundRobin => "RR",
            MatchKind::SemiFinal1 => "SF1",
            MatchKind::SemiFinal2 => "SF2",
            MatchKind::Playoff56 => "P56",
            MatchKind::Playoff34 => "P34",
            MatchKind::Final => "F",
            MatchKind::RankedFinal => "RF",
        }
    }
}

impl FromStr for MatchKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RR" => Ok(MatchKind::RoundRobin),
            "SF1" => Ok(MatchKind::SemiFinal1),
            "SF2" => Ok(MatchKind::SemiFinal2),
            "P56" => Ok(MatchKind::Playoff56),
            "P34" => Ok(MatchKind::Playoff34),
            "F" => Ok(MatchKind::Final),
            "RF" | "FINAL" => Ok(MatchKind::RankedFinal),
            other => Err(EngineError::InvalidCode(format!("match type '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Team1,
    Team2,
}

impl FromStr for Side {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "team1" | "1" | "home" => Ok(Side::Team1),
            "team2" | "2" | "away" => Ok(Side::Team2),
            other => Err(EngineError::InvalidCode(format!("side '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub team1: i32,
    pub team2: i32,
}

impl Scores {
    /// Validates raw operator input before anything is written
    pub fn parse(team1: &str, team2: &str) -> Result<Self, EngineError> {
        Ok(Self {
            team1: parse_score(team1, "team1")?,
            team2: parse_score(team2, "team2")?,
        })
    }
}

fn parse_score(raw: &str, label: &str) -> Result<i32, EngineError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidScore(format!("{} score is missing", label)));
    }

    let value: i32 = trimmed.parse().map_err(|_| {
        EngineError::InvalidScore(format!("{} score '{}' is not a number", label, trimmed))
    })?;

    if value < 0 {
        return Err(EngineError::InvalidScore(format!("{} score {} is negative", label, value)));
    }
    Ok(value)
}

/// Winner and loser of a completed match, derived from the stored winner id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub winner: TeamId,
    pub loser: TeamId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub event_id: EventId,
    pub match_no: i32,
    pub group: MatchGroup,
    pub kind: MatchKind,
    pub opponent_rule: String,
    pub seeding: Seeding,
    pub team1: Option<TeamId>,
    pub team2: Option<TeamId>,
    pub scores: Option<Scores>,
    pub completed: bool,
    pub winner: Option<TeamId>,
    pub team1_squad: Option<String>,
    pub team2_squad: Option<String>,
    pub scheduled_at: Option<NaiveDateTime>,
    pub venue: Option<String>,
}

impl Match {
    pub fn team(&self, side: Side) -> Option<TeamId> {
        match side {
            Side::Team1 => self.team1,
            Side::Team2 => self.team2,
        }
    }

    pub fn squad(&self, side: Side) -> Option<&str> {
        let squad = match side {
            Side::Team1 => self.team1_squad.as_deref(),
            Side::Team2 => self.team2_squad.as_deref(),
        };
        squad.filter(|s| !s.trim().is_empty())
    }

    pub fn side_of(&self, team: TeamId) -> Option<Side> {
        if self.team1 == Some(team) {
            Some(Side::Team1)
        } else if self.team2 == Some(team) {
            Some(Side::Team2)
        } else {
            None
        }
    }

    pub fn involves(&self, team: TeamId) -> bool {
        self.side_of(team).is_some()
    }

    pub fn is_pool_match(&self) -> bool {
        matches!(self.group, MatchGroup::Pool(_))
    }

    /// `None` while the match is still open.
    pub fn outcome(&self) -> Result<Option<Outcome>, EngineError> {
        if !self.completed {
            return Ok(None);
        }

        let (Some(team1), Some(team2), Some(winner)) = (self.team1, self.team2, self.winner) else {
            return Err(EngineError::IncompleteRecord(self.id));
        };

        if winner == team1 {
            Ok(Some(Outcome { winner: team1, loser: team2 }))
        } else if winner == team2 {
            Ok(Some(Outcome { winner: team2, loser: team1 }))
        } else {
            Err(EngineError::WinnerMismatch { match_id: self.id, winner })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub team_id: TeamId,
    pub score: Option<f64>,
}

/// Top three of a panel-scored pool (Bridge style)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRanking {
    pub event_id: EventId,
    pub pool: Pool,
    pub placings: [RankedEntry; 3],
}

/// Full finishing order of a single scored final (swimming style)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedFinal {
    pub event_id: EventId,
    pub placings: Vec<TeamId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionshipStanding {
    pub team_id: TeamId,
    pub total_points: i32,
    pub gold: i32,
    pub silver: i32,
    pub bronze: i32,
}

impl ChampionshipStanding {
    pub fn empty(team_id: TeamId) -> Self {
        Self {
            team_id,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchAudit {
    pub match_id: MatchId,
    pub changed_by: String,
    pub changed_at: NaiveDateTime,
    pub old_scores: Option<Scores>,
    pub new_scores: Scores,
}
