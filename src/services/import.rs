use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use log::info;
use serde::Deserialize;
use std::path::Path;

use crate::database::{self, DbPool, NewMatch, SqliteStore};
use crate::domain::{
    MatchGroup, MatchKind, Pool, ResolutionPolicy, RuleParser, SemiFinals, Team,
};
use crate::engine::{Championship, PointsScale};
use crate::errors::import_context;

#[derive(Debug, Deserialize)]
pub struct TournamentFixture {
    pub teams: Vec<TeamFixture>,
    pub events: Vec<EventFixture>,
}

#[derive(Debug, Deserialize)]
pub struct TeamFixture {
    pub code: String,
    pub name: String,
    pub pool: Option<Pool>,
}

#[derive(Debug, Deserialize)]
pub struct EventFixture {
    pub number: i32,
    pub sport: String,
    pub name: String,
    pub matches: Vec<MatchFixture>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchFixture {
    pub match_no: i32,
    pub group: String,
    pub kind: String,
    #[serde(default)]
    pub rule: String,
    pub scheduled_at: Option<NaiveDateTime>,
    pub venue: Option<String>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub teams: usize,
    pub events: usize,
    pub matches: usize,
    pub assigned: usize,
}

/// Lays down a tournament from a JSON fixture, replacing whatever was stored
pub struct ImportService {
    pool: DbPool,
    scale: PointsScale,
    rules: RuleParser,
}

impl ImportService {
    pub fn new(pool: DbPool, scale: PointsScale) -> Result<Self> {
        Ok(Self {
            pool,
            scale,
            rules: RuleParser::new()?,
        })
    }

    pub fn import_file(&self, path: &Path) -> Result<ImportSummary> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        let fixture: TournamentFixture = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse fixture {}", path.display()))?;
        self.import(&fixture)
    }

    pub fn import(&self, fixture: &TournamentFixture) -> Result<ImportSummary> {
        info!("=== Importing Tournament ===\n");

        let mut conn = database::get_connection(&self.pool)?;
        database::setup::reset_database(&conn)?;
        info!("  → Database schema reset\n");

        let tx = conn.transaction().context("Failed to begin import transaction")?;
        let mut summary = ImportSummary::default();

        let mut teams = Vec::with_capacity(fixture.teams.len());
        for team in &fixture.teams {
            teams.push(database::teams::insert_team(&tx, &team.code, &team.name, team.pool)?);
        }
        summary.teams = teams.len();
        info!("  → Imported {} teams", summary.teams);

        for event_fixture in &fixture.events {
            summary.matches += self.import_event(&tx, event_fixture, &teams)?;
            summary.events += 1;
        }
        info!("  → Imported {} events with {} matches\n", summary.events, summary.matches);

        {
            let championship = Championship::new(SqliteStore::new(&tx), self.scale.clone());
            let report = championship.sweep_all()?;
            summary.assigned = report.assigned;
        }

        tx.commit().context("Failed to commit import")?;
        info!("=== Import Complete ===");
        Ok(summary)
    }

    fn import_event(
        &self,
        conn: &rusqlite::Connection,
        fixture: &EventFixture,
        teams: &[Team],
    ) -> Result<usize> {
        let event =
            database::events::insert_event(conn, &fixture.sport, fixture.number, &fixture.name)?;
        let policy = event.policy();

        let mut parsed = Vec::with_capacity(fixture.matches.len());
        for m in &fixture.matches {
            let context = || import_context(&event.name, m.match_no);
            let group: MatchGroup = m.group.parse().with_context(context)?;
            let mut kind: MatchKind = m.kind.parse().with_context(context)?;
            if policy == ResolutionPolicy::RankedFinal {
                kind = MatchKind::RankedFinal;
            }
            parsed.push((m, group, kind));
        }

        let semis = semi_finals(parsed.iter().map(|(m, _, kind)| (m.match_no, *kind)));

        for (m, group, kind) in &parsed {
            let seeding = self
                .rules
                .parse(&m.rule, teams, semis)
                .with_context(|| import_context(&event.name, m.match_no))?;

            database::matches::insert_match(
                conn,
                &NewMatch {
                    event_id: event.id,
                    match_no: m.match_no,
                    group: *group,
                    kind: *kind,
                    opponent_rule: m.rule.clone(),
                    seeding,
                    scheduled_at: m.scheduled_at,
                    venue: m.venue.clone(),
                },
            )?;
        }

        info!("    → {} ({} matches)", event.name, parsed.len());
        Ok(parsed.len())
    }
}

fn semi_finals(kinds: impl Iterator<Item = (i32, MatchKind)>) -> Option<SemiFinals> {
    let mut first = None;
    let mut second = None;
    for (match_no, kind) in kinds {
        match kind {
            MatchKind::SemiFinal1 => first = Some(match_no),
            MatchKind::SemiFinal2 => second = Some(match_no),
            _ => {}
        }
    }
    Some(SemiFinals { first: first?, second: second? })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SeedSource, Seeding};
    use crate::engine::TournamentStore;

    fn fixture(json: &str) -> TournamentFixture {
        serde_json::from_str(json).unwrap()
    }

    const TEAMS: &str = r#"[
        {"code": "T1", "name": "Golden Eagles", "pool": "A"},
        {"code": "T2", "name": "Rising Phoenix", "pool": "A"},
        {"code": "T3", "name": "Flying Phantoms", "pool": "A"},
        {"code": "T4", "name": "Royal Warriors", "pool": "B"},
        {"code": "T5", "name": "Mighty Titans", "pool": "B"},
        {"code": "T6", "name": "Super Rangers", "pool": "B"}
    ]"#;

    #[test]
    fn test_bridge_rules_become_typed_seedings() {
        let json = format!(
            r#"{{"teams": {}, "events": [{{"number": 3, "sport": "Bridge", "name": "Bridge Pairs", "matches": [
                {{"matchNo": 1, "group": "A", "kind": "RR", "rule": "All Teams of Group A"}},
                {{"matchNo": 2, "group": "B", "kind": "RR", "rule": "All Teams of Group B"}},
                {{"matchNo": 3, "group": "A&B", "kind": "SF1", "rule": "1st of Group A vs 2nd of Group B"}},
                {{"matchNo": 4, "group": "A&B", "kind": "SF2", "rule": "1st of Group B vs 2nd of Group A"}},
                {{"matchNo": 6, "group": "A&B", "kind": "P34", "rule": "Losers of Semi Finals"}},
                {{"matchNo": 7, "group": "A&B", "kind": "F", "rule": "Winners of Semi Finals",
                  "scheduledAt": "2026-03-21T16:00:00", "venue": "Card Room"}}
            ]}}]}}"#,
            TEAMS
        );

        let pool = database::create_memory_pool().unwrap();
        let service = ImportService::new(pool.clone(), PointsScale::default()).unwrap();
        let summary = service.import(&fixture(&json)).unwrap();
        assert_eq!(summary, ImportSummary { teams: 6, events: 1, matches: 6, assigned: 0 });

        let conn = database::get_connection(&pool).unwrap();
        let store = SqliteStore::new(&conn);
        let event = store.events().unwrap().remove(0);
        let matches = store.matches_for_event(event.id).unwrap();

        assert_eq!(matches[0].seeding, Seeding::PoolPlay { pool: Pool::A });
        assert_eq!(
            matches[5].seeding,
            Seeding::Derived {
                team1: SeedSource::WinnerOf { match_no: 3 },
                team2: SeedSource::WinnerOf { match_no: 4 },
            }
        );
        assert_eq!(matches[5].venue.as_deref(), Some("Card Room"));
        assert!(matches[5].scheduled_at.is_some());
    }

    #[test]
    fn test_swimming_lanes_are_made_playable() {
        let json = format!(
            r#"{{"teams": {}, "events": [{{"number": 9, "sport": "Swimming", "name": "Swimming Relay", "matches": [
                {{"matchNo": 1, "group": "A&B", "kind": "Final", "rule": "Golden Eagles vs Super Rangers"}},
                {{"matchNo": 2, "group": "A&B", "kind": "Final"}}
            ]}}]}}"#,
            TEAMS
        );

        let pool = database::create_memory_pool().unwrap();
        let service = ImportService::new(pool.clone(), PointsScale::default()).unwrap();
        let summary = service.import(&fixture(&json)).unwrap();
        assert_eq!(summary.assigned, 2);

        let conn = database::get_connection(&pool).unwrap();
        let matches = SqliteStore::new(&conn).matches_for_event(1).unwrap();
        assert!(matches.iter().all(|m| m.kind == MatchKind::RankedFinal));
        assert_eq!((matches[0].team1, matches[0].team2), (Some(1), Some(6)));
        assert_eq!((matches[1].team1, matches[1].team2), (Some(1), Some(1)));
    }

    #[test]
    fn test_unknown_team_in_rule_fails_import() {
        let json = format!(
            r#"{{"teams": {}, "events": [{{"number": 5, "sport": "Snooker", "name": "Snooker Singles", "matches": [
                {{"matchNo": 1, "group": "A", "kind": "RR", "rule": "Golden Eagles vs Silver Sharks"}}
            ]}}]}}"#,
            TEAMS
        );

        let pool = database::create_memory_pool().unwrap();
        let service = ImportService::new(pool, PointsScale::default()).unwrap();
        let err = service.import(&fixture(&json)).unwrap_err();
        assert!(format!("{:#}", err).contains("match 1 of Snooker Singles"));
    }

    #[test]
    fn test_sample_fixture_imports() {
        let sample = fixture(include_str!("../../fixtures/mgcl_2026.json"));
        let pool = database::create_memory_pool().unwrap();
        let service = ImportService::new(pool, PointsScale::default()).unwrap();

        let summary = service.import(&sample).unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                teams: 6,
                events: 4,
                matches: 32,
                assigned: 15
            }
        );
    }

    #[test]
    fn test_semi_finals_need_both_kinds() {
        let kinds = [
            (7, MatchKind::SemiFinal1),
            (8, MatchKind::SemiFinal2),
            (11, MatchKind::Final),
        ];
        assert_eq!(
            semi_finals(kinds.into_iter()),
            Some(SemiFinals { first: 7, second: 8 })
        );
        assert_eq!(semi_finals([(7, MatchKind::SemiFinal1)].into_iter()), None);
    }
}
