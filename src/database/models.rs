use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::Row;
use rusqlite::types::Type;
use serde::de::DeserializeOwned;

use crate::domain::{EventId, MatchGroup, MatchKind, Pool, Seeding};

/// A match as laid down by the fixture import, before any team is seeded
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub event_id: EventId,
    pub match_no: i32,
    pub group: MatchGroup,
    pub kind: MatchKind,
    pub opponent_rule: String,
    pub seeding: Seeding,
    pub scheduled_at: Option<NaiveDateTime>,
    pub venue: Option<String>,
}

/// Reads a text column through the type's `FromStr`
pub fn parse_column<T>(row: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub fn parse_pool(row: &Row, idx: usize) -> rusqlite::Result<Option<Pool>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|value| {
        value
            .parse()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

/// Reads a JSON text column
pub fn parse_json<T: DeserializeOwned>(row: &Row, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub fn to_json(seeding: &Seeding) -> rusqlite::Result<String> {
    serde_json::to_string(seeding).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}
