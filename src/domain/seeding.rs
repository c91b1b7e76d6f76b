use serde::{Deserialize, Serialize};

use super::models::{Pool, TeamId};

/// Where one side of a bracket slot takes its team from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum SeedSource {
    PoolRank { pool: Pool, rank: usize },
    #[serde(rename_all = "camelCase")]
    WinnerOf { match_no: i32 },
    #[serde(rename_all = "camelCase")]
    LoserOf { match_no: i32 },
}

/// Typed replacement for the free-text opponent rule of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Seeding {
    /// Teams known at schedule time
    FixedPair { team1: TeamId, team2: TeamId },
    /// Both sides wait on seeds that materialise later
    Derived { team1: SeedSource, team2: SeedSource },
    /// Whole pool plays together and is ranked by a panel
    PoolPlay { pool: Pool },
    /// Teams are entered by hand
    Open,
}
