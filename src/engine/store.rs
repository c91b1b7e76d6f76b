use anyhow::Result;

use crate::domain::{
    ChampionshipStanding, Event, EventId, EventState, GroupRanking, Match, MatchAudit, MatchId,
    RankedFinal, Scores, Side, Team, TeamId,
};

/// Team assignment produced by the resolver for one bracket slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAssignment {
    pub match_id: MatchId,
    pub match_no: i32,
    pub team1: TeamId,
    pub team2: TeamId,
    pub team1_squad: Option<String>,
    pub team2_squad: Option<String>,
}

/// Query and write access the engine needs from the data layer.
///
/// Match lists are always ordered by match number.
pub trait TournamentStore {
    fn teams(&self) -> Result<Vec<Team>>;

    fn events(&self) -> Result<Vec<Event>>;

    fn event(&self, id: EventId) -> Result<Option<Event>>;

    fn find_match(&self, id: MatchId) -> Result<Option<Match>>;

    fn matches_for_event(&self, event_id: EventId) -> Result<Vec<Match>>;

    fn group_rankings(&self, event_id: EventId) -> Result<Vec<GroupRanking>>;

    fn ranked_final(&self, event_id: EventId) -> Result<Option<RankedFinal>>;

    fn standings(&self) -> Result<Vec<ChampionshipStanding>>;

    fn assign_slot(&self, assignment: &SlotAssignment) -> Result<()>;

    fn save_result(&self, match_id: MatchId, scores: Scores, winner: TeamId) -> Result<()>;

    fn save_squad(&self, match_id: MatchId, side: Side, squad: Option<&str>) -> Result<()>;

    fn save_group_ranking(&self, ranking: &GroupRanking) -> Result<()>;

    fn save_ranked_final(&self, result: &RankedFinal) -> Result<()>;

    fn replace_standings(&self, standings: &[ChampionshipStanding]) -> Result<()>;

    fn record_audit(&self, audit: &MatchAudit) -> Result<()>;

    fn set_event_state(&self, id: EventId, state: EventState) -> Result<()>;

    /// Completed matches of one event, by match number.
    fn completed_matches(&self, event_id: EventId) -> Result<Vec<Match>> {
        let mut matches = self.matches_for_event(event_id)?;
        matches.retain(|m| m.completed);
        Ok(matches)
    }
}
