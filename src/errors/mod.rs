use thiserror::Error;

use crate::domain::{EventId, MatchId, TeamId};

/// Domain failures the engine reports to its caller.
///
/// Everything else (storage, IO) travels as a plain `anyhow::Error`; handlers
/// downcast to this type to decide how to present a rejection.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("event {0} is locked; its matches can no longer be changed")]
    EventLocked(EventId),

    #[error("invalid score: {0}")]
    InvalidScore(String),

    #[error("match {0} has no teams assigned yet")]
    NotPlayable(MatchId),

    #[error("match {0} is already completed")]
    MatchCompleted(MatchId),

    #[error("winner {winner} of match {match_id} is neither of its teams")]
    WinnerMismatch { match_id: MatchId, winner: TeamId },

    #[error("match {0} is marked completed but is missing teams or a winner")]
    IncompleteRecord(MatchId),

    #[error("invalid ranking: {0}")]
    InvalidRanking(String),

    #[error("invalid opponent rule: {0}")]
    InvalidRule(String),

    #[error("invalid value: {0}")]
    InvalidCode(String),

    #[error("match {0} not found")]
    MatchNotFound(MatchId),

    #[error("event {0} not found")]
    EventNotFound(EventId),

    #[error("team {0} not found")]
    TeamNotFound(TeamId),
}

impl EngineError {
    /// Faults in stored data, as opposed to rejected operator input
    pub fn is_integrity_fault(&self) -> bool {
        matches!(
            self,
            EngineError::WinnerMismatch { .. } | EngineError::IncompleteRecord(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::MatchNotFound(_)
                | EngineError::EventNotFound(_)
                | EngineError::TeamNotFound(_)
        )
    }
}

/// Add context to import errors
pub fn import_context(event: &str, match_no: i32) -> String {
    format!("Failed to import match {} of {}", match_no, event)
}
