use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use crate::domain::ChampionshipStanding;

/// Drops every stored standing and writes the given ones
pub fn replace_all(conn: &Connection, standings: &[ChampionshipStanding]) -> Result<()> {
    conn.execute("DELETE FROM championship_standings", [])
        .context("Failed to clear championship standings")?;

    let mut stmt = conn.prepare(
        "INSERT INTO championship_standings (team_id, total_points, gold, silver, bronze) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for standing in standings {
        stmt.execute(params![
            standing.team_id,
            standing.total_points,
            standing.gold,
            standing.silver,
            standing.bronze
        ])
        .with_context(|| format!("Failed to save standing for team {}", standing.team_id))?;
    }

    Ok(())
}

pub fn list_all(conn: &Connection) -> Result<Vec<ChampionshipStanding>> {
    let mut stmt = conn.prepare(
        "SELECT team_id, total_points, gold, silver, bronze FROM championship_standings ORDER BY team_id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ChampionshipStanding {
                team_id: row.get(0)?,
                total_points: row.get(1)?,
                gold: row.get(2)?,
                silver: row.get(3)?,
                bronze: row.get(4)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list championship standings")?;

    Ok(rows)
}
