use anyhow::{Context, Result};
use log::error;
use rusqlite::TransactionBehavior;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::database::{self, DbPool, SqliteStore};
use crate::domain::{
    Event, EventId, EventState, Match, MatchAudit, MatchId, Pool, RankedEntry, Scores, Side, Team,
    TeamId,
};
use crate::engine::{Championship, PointsScale, StandingRow, SweepReport, TableRow, TournamentStore};
use crate::errors::EngineError;

/// One mutex per event, handed out on demand
#[derive(Default)]
struct EventLocks {
    locks: Mutex<HashMap<EventId, Arc<Mutex<()>>>>,
}

impl EventLocks {
    fn for_event(&self, event_id: EventId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(event_id).or_default().clone()
    }
}

/// Runs championship operations against the database.
///
/// Writes hold the event's mutex and run inside one immediate transaction, so
/// a write and its sweep land together or not at all.
pub struct ScoringService {
    pool: DbPool,
    scale: PointsScale,
    locks: EventLocks,
}

impl ScoringService {
    pub fn new(pool: DbPool, scale: PointsScale) -> Self {
        Self {
            pool,
            scale,
            locks: EventLocks::default(),
        }
    }

    fn read<T>(&self, op: impl FnOnce(&Championship<SqliteStore<'_>>) -> Result<T>) -> Result<T> {
        let conn = database::get_connection(&self.pool)?;
        let championship = Championship::new(SqliteStore::new(&conn), self.scale.clone());
        op(&championship)
    }

    fn write<T>(
        &self,
        event_id: Option<EventId>,
        op: impl FnOnce(&Championship<SqliteStore<'_>>) -> Result<T>,
    ) -> Result<T> {
        let lock = event_id.map(|id| self.locks.for_event(id));
        let _guard = lock
            .as_ref()
            .map(|lock| lock.lock().unwrap_or_else(PoisonError::into_inner));

        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("Failed to begin transaction")?;

        let result = {
            let championship = Championship::new(SqliteStore::new(&tx), self.scale.clone());
            op(&championship)
        };

        match result {
            Ok(value) => {
                tx.commit().context("Failed to commit transaction")?;
                Ok(value)
            }
            Err(e) => {
                if !is_rejection(&e) {
                    error!("Write rolled back: {:?}", e);
                }
                Err(e)
            }
        }
    }

    fn event_of_match(&self, match_id: MatchId) -> Result<EventId> {
        self.read(|c| {
            let m = c.store().find_match(match_id)?.ok_or(EngineError::MatchNotFound(match_id))?;
            Ok(m.event_id)
        })
    }

    pub fn record_result(
        &self,
        match_id: MatchId,
        scores: Scores,
        winner_side: Side,
        changed_by: &str,
    ) -> Result<SweepReport> {
        let event_id = self.event_of_match(match_id)?;
        self.write(Some(event_id), |c| c.record_result(match_id, scores, winner_side, changed_by))
    }

    pub fn select_squad(&self, match_id: MatchId, side: Side, squad: &str) -> Result<SweepReport> {
        let event_id = self.event_of_match(match_id)?;
        self.write(Some(event_id), |c| c.select_squad(match_id, side, squad))
    }

    pub fn submit_group_ranking(
        &self,
        event_id: EventId,
        pool: Pool,
        placings: [RankedEntry; 3],
    ) -> Result<SweepReport> {
        self.write(Some(event_id), |c| c.submit_group_ranking(event_id, pool, placings))
    }

    pub fn submit_ranked_final(
        &self,
        event_id: EventId,
        placings: Vec<TeamId>,
    ) -> Result<SweepReport> {
        self.write(Some(event_id), |c| c.submit_ranked_final(event_id, placings))
    }

    pub fn set_event_state(&self, event_id: EventId, state: EventState) -> Result<SweepReport> {
        self.write(Some(event_id), |c| c.set_event_state(event_id, state))
    }

    pub fn sweep(&self, event_id: EventId) -> Result<SweepReport> {
        self.write(Some(event_id), |c| c.sweep(event_id))
    }

    pub fn sweep_all(&self) -> Result<SweepReport> {
        self.write(None, |c| c.sweep_all())
    }

    pub fn current_standings(&self, event_id: EventId, pool: Pool) -> Result<Vec<StandingRow>> {
        self.read(|c| c.current_standings(event_id, pool))
    }

    pub fn championship_table(&self) -> Result<Vec<TableRow>> {
        self.read(|c| c.championship_table())
    }

    pub fn fixtures(&self, event_id: Option<EventId>) -> Result<Vec<Match>> {
        self.read(|c| c.fixtures(event_id))
    }

    pub fn teams(&self) -> Result<Vec<Team>> {
        self.read(|c| c.store().teams())
    }

    pub fn events(&self) -> Result<Vec<Event>> {
        self.read(|c| c.store().events())
    }

    pub fn audit_trail(&self, match_id: MatchId) -> Result<Vec<MatchAudit>> {
        let conn = database::get_connection(&self.pool)?;
        database::audits::list_for_match(&conn, match_id)
    }
}

/// Rejected operator input, as opposed to a failure worth logging
fn is_rejection(err: &anyhow::Error) -> bool {
    err.downcast_ref::<EngineError>()
        .is_some_and(|e| !e.is_integrity_fault())
}
