use anyhow::Result;
use rusqlite::Connection;

use super::{audits, events, matches, results, standings, teams};
use crate::domain::{
    ChampionshipStanding, Event, EventId, EventState, GroupRanking, Match, MatchAudit, MatchId,
    RankedFinal, Scores, Side, Team, TeamId,
};
use crate::engine::{SlotAssignment, TournamentStore};

/// `TournamentStore` over one SQLite connection or open transaction
pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl TournamentStore for SqliteStore<'_> {
    fn teams(&self) -> Result<Vec<Team>> {
        teams::list_all(self.conn)
    }

    fn events(&self) -> Result<Vec<Event>> {
        events::list_all(self.conn)
    }

    fn event(&self, id: EventId) -> Result<Option<Event>> {
        events::find_by_id(self.conn, id)
    }

    fn find_match(&self, id: MatchId) -> Result<Option<Match>> {
        matches::find_by_id(self.conn, id)
    }

    fn matches_for_event(&self, event_id: EventId) -> Result<Vec<Match>> {
        matches::list_for_event(self.conn, event_id)
    }

    fn completed_matches(&self, event_id: EventId) -> Result<Vec<Match>> {
        matches::list_completed_for_event(self.conn, event_id)
    }

    fn group_rankings(&self, event_id: EventId) -> Result<Vec<GroupRanking>> {
        results::group_rankings_for_event(self.conn, event_id)
    }

    fn ranked_final(&self, event_id: EventId) -> Result<Option<RankedFinal>> {
        results::ranked_final_for_event(self.conn, event_id)
    }

    fn standings(&self) -> Result<Vec<ChampionshipStanding>> {
        standings::list_all(self.conn)
    }

    fn assign_slot(&self, assignment: &SlotAssignment) -> Result<()> {
        matches::assign_teams(self.conn, assignment)
    }

    fn save_result(&self, match_id: MatchId, scores: Scores, winner: TeamId) -> Result<()> {
        matches::save_result(self.conn, match_id, scores, winner)
    }

    fn save_squad(&self, match_id: MatchId, side: Side, squad: Option<&str>) -> Result<()> {
        matches::save_squad(self.conn, match_id, side, squad)
    }

    fn save_group_ranking(&self, ranking: &GroupRanking) -> Result<()> {
        results::upsert_group_ranking(self.conn, ranking)
    }

    fn save_ranked_final(&self, result: &RankedFinal) -> Result<()> {
        results::replace_ranked_final(self.conn, result)
    }

    fn replace_standings(&self, standings: &[ChampionshipStanding]) -> Result<()> {
        standings::replace_all(self.conn, standings)
    }

    fn record_audit(&self, audit: &MatchAudit) -> Result<()> {
        audits::insert_audit(self.conn, audit)
    }

    fn set_event_state(&self, id: EventId, state: EventState) -> Result<()> {
        events::update_state(self.conn, id, state)
    }
}
