use std::collections::HashSet;

use anyhow::Result;
use chrono::Local;
use log::{info, warn};

use super::points::{self, Allocation, EventResults, PointsScale, SweepFault, TableRow};
use super::resolver::{self, EventSnapshot};
use super::standings::{self, StandingRow};
use super::store::TournamentStore;
use crate::domain::{
    Event, EventId, EventState, GroupRanking, Match, MatchAudit, MatchId, Pool, RankedEntry,
    RankedFinal, ResolutionPolicy, Scores, Side, TeamId,
};
use crate::errors::EngineError;

/// What one sweep changed
#[derive(Debug, Default)]
pub struct SweepReport {
    pub assigned: usize,
    pub faults: Vec<SweepFault>,
}

/// Single entry point for every championship write.
///
/// Each write validates its input, stores it, then sweeps: the touched event's
/// bracket slots are resolved and the points table is rebuilt from zero.
pub struct Championship<S: TournamentStore> {
    store: S,
    scale: PointsScale,
}

impl<S: TournamentStore> Championship<S> {
    pub fn new(store: S, scale: PointsScale) -> Self {
        Self { store, scale }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn load_event(&self, id: EventId) -> Result<Event> {
        Ok(self.store.event(id)?.ok_or(EngineError::EventNotFound(id))?)
    }

    fn load_match(&self, id: MatchId) -> Result<Match> {
        Ok(self.store.find_match(id)?.ok_or(EngineError::MatchNotFound(id))?)
    }

    /// Resolves one event's slots and rebuilds the championship table
    pub fn sweep(&self, event_id: EventId) -> Result<SweepReport> {
        let event = self.load_event(event_id)?;
        let assigned = self.resolve(&event)?;
        let faults = self.allocate()?;
        Ok(SweepReport { assigned, faults })
    }

    /// Sweeps every open event; a faulty event is reported and skipped
    pub fn sweep_all(&self) -> Result<SweepReport> {
        let mut report = SweepReport::default();

        for event in self.store.events()? {
            match self.resolve(&event) {
                Ok(assigned) => report.assigned += assigned,
                Err(err) => match err.downcast::<EngineError>() {
                    Ok(error) => {
                        warn!("Skipping event {} in slot sweep: {}", event.id, error);
                        report.faults.push(SweepFault { event_id: event.id, error });
                    }
                    Err(err) => return Err(err),
                },
            }
        }

        report.faults.extend(self.allocate()?);
        info!(
            "  → Swept all events: {} slots assigned, {} faults",
            report.assigned,
            report.faults.len()
        );
        Ok(report)
    }

    fn resolve(&self, event: &Event) -> Result<usize> {
        if event.is_locked() {
            return Ok(0);
        }

        let teams = self.store.teams()?;
        let matches = self.store.matches_for_event(event.id)?;
        let group_rankings = self.store.group_rankings(event.id)?;

        let snapshot = EventSnapshot {
            event,
            teams: &teams,
            matches: &matches,
            group_rankings: &group_rankings,
        };
        let assignments = resolver::resolve_event(&snapshot)?;

        for assignment in &assignments {
            self.store.assign_slot(assignment)?;
        }

        if !assignments.is_empty() {
            info!("  → Event {}: seeded {} slots", event.id, assignments.len());
        }
        Ok(assignments.len())
    }

    fn allocate(&self) -> Result<Vec<SweepFault>> {
        let teams = self.store.teams()?;
        let mut events = Vec::new();
        for event in self.store.events()? {
            events.push(EventResults {
                matches: self.store.completed_matches(event.id)?,
                group_rankings: self.store.group_rankings(event.id)?,
                ranked_final: self.store.ranked_final(event.id)?,
                event,
            });
        }

        let Allocation { standings, faults } = points::allocate(&teams, &events, &self.scale);
        self.store.replace_standings(&standings)?;
        Ok(faults)
    }

    /// Stores a final score with the declared winning side, audits it, then sweeps
    pub fn record_result(
        &self,
        match_id: MatchId,
        scores: Scores,
        winner_side: Side,
        changed_by: &str,
    ) -> Result<SweepReport> {
        let m = self.load_match(match_id)?;
        self.load_event(m.event_id)?.ensure_open()?;

        if m.team1.is_none() || m.team2.is_none() {
            return Err(EngineError::NotPlayable(match_id).into());
        }
        let winner = m.team(winner_side).ok_or(EngineError::NotPlayable(match_id))?;

        self.store.save_result(match_id, scores, winner)?;
        self.store.record_audit(&MatchAudit {
            match_id,
            changed_by: changed_by.to_string(),
            changed_at: Local::now().naive_local(),
            old_scores: m.scores,
            new_scores: scores,
        })?;
        info!(
            "Match {} recorded {}-{} (winner team {}) by {}",
            match_id, scores.team1, scores.team2, winner, changed_by
        );

        self.sweep(m.event_id)
    }

    /// Stores the panel's top three for one pool of a group-ranked event
    pub fn submit_group_ranking(
        &self,
        event_id: EventId,
        pool: Pool,
        placings: [RankedEntry; 3],
    ) -> Result<SweepReport> {
        let event = self.load_event(event_id)?;
        event.ensure_open()?;

        if event.policy() != ResolutionPolicy::GroupRanking {
            return Err(EngineError::InvalidRanking(format!(
                "{} does not take group rankings",
                event.name
            ))
            .into());
        }

        let teams = self.store.teams()?;
        let mut seen = HashSet::new();
        for entry in &placings {
            let team = teams
                .iter()
                .find(|t| t.id == entry.team_id)
                .ok_or(EngineError::TeamNotFound(entry.team_id))?;
            if team.pool != Some(pool) {
                return Err(EngineError::InvalidRanking(format!(
                    "{} is not in group {}",
                    team.name, pool
                ))
                .into());
            }
            if !seen.insert(entry.team_id) {
                let reason = format!("{} is ranked twice", team.name);
                return Err(EngineError::InvalidRanking(reason).into());
            }
        }

        self.store.save_group_ranking(&GroupRanking { event_id, pool, placings })?;
        info!("Event {}: group {} ranking saved", event_id, pool);

        self.sweep(event_id)
    }

    /// Stores the finishing order of a ranked final, winner first
    pub fn submit_ranked_final(
        &self,
        event_id: EventId,
        placings: Vec<TeamId>,
    ) -> Result<SweepReport> {
        let event = self.load_event(event_id)?;
        event.ensure_open()?;

        if event.policy() != ResolutionPolicy::RankedFinal {
            return Err(EngineError::InvalidRanking(format!(
                "{} does not take a ranked final",
                event.name
            ))
            .into());
        }
        if placings.is_empty() || placings.len() > self.scale.places() {
            return Err(EngineError::InvalidRanking(format!(
                "expected 1 to {} teams, got {}",
                self.scale.places(),
                placings.len()
            ))
            .into());
        }

        let teams = self.store.teams()?;
        let mut seen = HashSet::new();
        for &team_id in &placings {
            if !teams.iter().any(|t| t.id == team_id) {
                return Err(EngineError::TeamNotFound(team_id).into());
            }
            if !seen.insert(team_id) {
                let reason = format!("team {} is placed twice", team_id);
                return Err(EngineError::InvalidRanking(reason).into());
            }
        }

        self.store.save_ranked_final(&RankedFinal { event_id, placings })?;
        info!("Event {}: ranked final saved", event_id);

        self.sweep(event_id)
    }

    /// Captain's squad pick for one side of an upcoming match
    pub fn select_squad(&self, match_id: MatchId, side: Side, squad: &str) -> Result<SweepReport> {
        let m = self.load_match(match_id)?;
        self.load_event(m.event_id)?.ensure_open()?;

        if m.completed {
            return Err(EngineError::MatchCompleted(match_id).into());
        }
        if m.team(side).is_none() {
            return Err(EngineError::NotPlayable(match_id).into());
        }

        let squad = squad.trim();
        self.store.save_squad(match_id, side, (!squad.is_empty()).then_some(squad))?;

        self.sweep(m.event_id)
    }

    /// Locking freezes an event; unlocking sweeps it again
    pub fn set_event_state(&self, event_id: EventId, state: EventState) -> Result<SweepReport> {
        let event = self.load_event(event_id)?;
        if event.state == state {
            return Ok(SweepReport::default());
        }

        self.store.set_event_state(event_id, state)?;
        info!("Event {} is now {}", event_id, state.as_str());

        match state {
            EventState::Locked => Ok(SweepReport::default()),
            EventState::Open => self.sweep(event_id),
        }
    }

    pub fn current_standings(&self, event_id: EventId, pool: Pool) -> Result<Vec<StandingRow>> {
        self.load_event(event_id)?;
        let teams = self.store.teams()?;
        let completed = self.store.completed_matches(event_id)?;
        Ok(standings::compute_standings(&teams, &completed, pool)?)
    }

    pub fn championship_table(&self) -> Result<Vec<TableRow>> {
        let teams = self.store.teams()?;
        let standings = self.store.standings()?;
        Ok(points::championship_table(&teams, &standings))
    }

    /// Matches ordered by event, then match number
    pub fn fixtures(&self, event_id: Option<EventId>) -> Result<Vec<Match>> {
        let events = match event_id {
            Some(id) => vec![self.load_event(id)?],
            None => self.store.events()?,
        };

        let mut fixtures = Vec::new();
        for event in events {
            fixtures.extend(self.store.matches_for_event(event.id)?);
        }
        Ok(fixtures)
    }
}
