use serde::{Deserialize, Serialize};

use crate::domain::{EventId, Match, MatchId, RankedEntry, Scores, Team, TeamId};
use crate::engine::SweepReport;
use crate::errors::EngineError;

/// Score as typed by the scorer; numbers and numeric strings are both accepted
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ScoreInput {
    Number(i64),
    Text(String),
}

impl ScoreInput {
    fn raw(input: &Option<ScoreInput>) -> String {
        match input {
            Some(ScoreInput::Number(n)) => n.to_string(),
            Some(ScoreInput::Text(s)) => s.clone(),
            None => String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRequest {
    pub team1_score: Option<ScoreInput>,
    pub team2_score: Option<ScoreInput>,
    pub winner: String,
    pub changed_by: Option<String>,
}

impl ResultRequest {
    pub fn scores(&self) -> Result<Scores, EngineError> {
        Scores::parse(&ScoreInput::raw(&self.team1_score), &ScoreInput::raw(&self.team2_score))
    }
}

#[derive(Debug, Deserialize)]
pub struct SquadRequest {
    pub side: String,
    pub squad: String,
}

#[derive(Debug, Deserialize)]
pub struct GroupRankingRequest {
    pub pool: String,
    pub placings: Vec<RankedEntry>,
}

impl GroupRankingRequest {
    pub fn top_three(&self) -> Result<[RankedEntry; 3], EngineError> {
        <[RankedEntry; 3]>::try_from(self.placings.as_slice()).map_err(|_| {
            EngineError::InvalidRanking(format!(
                "a group ranking needs exactly 3 teams, got {}",
                self.placings.len()
            ))
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RankedFinalRequest {
    pub placings: Vec<TeamId>,
}

#[derive(Debug, Deserialize)]
pub struct FixtureParams {
    pub event: Option<EventId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepResponse {
    pub assigned: usize,
    pub faults: Vec<String>,
}

impl From<SweepReport> for SweepResponse {
    fn from(report: SweepReport) -> Self {
        Self {
            assigned: report.assigned,
            faults: report.faults.iter().map(|f| f.to_string()).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureItem {
    pub id: MatchId,
    pub event_id: EventId,
    pub match_no: i32,
    pub group: &'static str,
    pub kind: &'static str,
    pub rule: String,
    pub team1: Option<String>,
    pub team2: Option<String>,
    pub team1_score: Option<i32>,
    pub team2_score: Option<i32>,
    pub winner: Option<String>,
    pub completed: bool,
    pub team1_squad: Option<String>,
    pub team2_squad: Option<String>,
    pub scheduled_at: Option<String>,
    pub venue: Option<String>,
}

impl FixtureItem {
    pub fn new(m: Match, teams: &[Team]) -> Self {
        let name = |id: Option<TeamId>| {
            id.and_then(|id| teams.iter().find(|t| t.id == id))
                .map(|t| t.name.clone())
        };

        Self {
            id: m.id,
            event_id: m.event_id,
            match_no: m.match_no,
            group: m.group.as_str(),
            kind: m.kind.as_str(),
            team1: name(m.team1),
            team2: name(m.team2),
            team1_score: m.scores.map(|s| s.team1),
            team2_score: m.scores.map(|s| s.team2),
            winner: name(m.winner),
            completed: m.completed,
            scheduled_at: m.scheduled_at.map(|at| at.format("%Y-%m-%d %H:%M").to_string()),
            rule: m.opponent_rule,
            team1_squad: m.team1_squad,
            team2_squad: m.team2_squad,
            venue: m.venue,
        }
    }
}
