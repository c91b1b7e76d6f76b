use anyhow::{Context, Result};
use regex::Regex;

use super::models::{Pool, Team, TeamId};
use super::seeding::{SeedSource, Seeding};
use crate::errors::EngineError;

/// Match numbers of the two semi-finals of an event, used by "winners of semi finals" rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemiFinals {
    pub first: i32,
    pub second: i32,
}

/// Turns free-text opponent rules from the schedule into typed seedings.
///
/// Understood forms (case-insensitive):
/// - `1st of Group A vs 2nd of Group B`
/// - `Winners of Semi Finals` / `Loser of Semi Finals`
/// - `Winner of Match 3 vs Winner of Match 4`
/// - `All Teams of Group A`
/// - `Golden Eagles vs Flying Phantoms` (team names or codes)
pub struct RuleParser {
    pool_rank_regex: Regex,
    match_ref_regex: Regex,
    semi_ref_regex: Regex,
    whole_pool_regex: Regex,
}

impl RuleParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pool_rank_regex: compile(r"(\d)(?:st|nd|rd|th) of group ([ab])\b")?,
            match_ref_regex: compile(r"(winner|loser)s? of match (\d+)")?,
            semi_ref_regex: compile(r"^(winner|loser)s? of semi[ -]?finals?$")?,
            whole_pool_regex: compile(r"^all teams of group ([ab])$")?,
        })
    }

    pub fn parse(
        &self,
        rule: &str,
        teams: &[Team],
        semis: Option<SemiFinals>,
    ) -> Result<Seeding, EngineError> {
        let normalized = normalize(rule);

        if normalized.is_empty() {
            return Ok(Seeding::Open);
        }

        if let Some(seeding) = self.parse_whole_pool(&normalized) {
            return Ok(seeding);
        }

        if let Some(seeding) = self.parse_pool_ranks(&normalized) {
            return Ok(seeding);
        }

        if let Some(seeding) = self.parse_match_refs(&normalized) {
            return Ok(seeding);
        }

        if let Some(result) = self.parse_semi_refs(&normalized, semis) {
            return result;
        }

        parse_fixed_pair(rule, teams)
    }

    fn parse_whole_pool(&self, rule: &str) -> Option<Seeding> {
        let captures = self.whole_pool_regex.captures(rule)?;
        let pool = pool_from_letter(&captures[1])?;
        Some(Seeding::PoolPlay { pool })
    }

    fn parse_pool_ranks(&self, rule: &str) -> Option<Seeding> {
        let seeds: Vec<SeedSource> = self
            .pool_rank_regex
            .captures_iter(rule)
            .filter_map(|c| {
                let rank = c[1].parse().ok()?;
                let pool = pool_from_letter(&c[2])?;
                Some(SeedSource::PoolRank { pool, rank })
            })
            .collect();

        match seeds.as_slice() {
            [team1, team2] => Some(Seeding::Derived { team1: *team1, team2: *team2 }),
            [single] => cross_pool_pairing(*single),
            _ => None,
        }
    }

    fn parse_match_refs(&self, rule: &str) -> Option<Seeding> {
        let seeds: Vec<SeedSource> = self
            .match_ref_regex
            .captures_iter(rule)
            .filter_map(|c| {
                let match_no = c[2].parse().ok()?;
                Some(match &c[1] {
                    "winner" => SeedSource::WinnerOf { match_no },
                    _ => SeedSource::LoserOf { match_no },
                })
            })
            .collect();

        match seeds.as_slice() {
            [team1, team2] => Some(Seeding::Derived { team1: *team1, team2: *team2 }),
            _ => None,
        }
    }

    fn parse_semi_refs(
        &self,
        rule: &str,
        semis: Option<SemiFinals>,
    ) -> Option<Result<Seeding, EngineError>> {
        let captures = self.semi_ref_regex.captures(rule)?;

        let Some(semis) = semis else {
            return Some(Err(EngineError::InvalidRule(format!(
                "'{}' needs SF1 and SF2 matches in the same event",
                rule
            ))));
        };

        let seeding = if &captures[1] == "winner" {
            Seeding::Derived {
                team1: SeedSource::WinnerOf { match_no: semis.first },
                team2: SeedSource::WinnerOf { match_no: semis.second },
            }
        } else {
            Seeding::Derived {
                team1: SeedSource::LoserOf { match_no: semis.first },
                team2: SeedSource::LoserOf { match_no: semis.second },
            }
        };
        Some(Ok(seeding))
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).with_context(|| format!("Failed to compile rule pattern {}", pattern))
}

fn normalize(rule: &str) -> String {
    rule.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn pool_from_letter(letter: &str) -> Option<Pool> {
    letter.parse().ok()
}

/// Schedules sometimes name only one of the two seeds; the opposite seed follows
/// the usual cross-pool pattern (A1-B2, B1-A2, A3-B3).
fn cross_pool_pairing(seed: SeedSource) -> Option<Seeding> {
    let SeedSource::PoolRank { pool, rank } = seed else {
        return None;
    };

    let other = match pool {
        Pool::A => Pool::B,
        Pool::B => Pool::A,
    };

    let seed = |pool, rank| SeedSource::PoolRank { pool, rank };
    let (team1, team2) = match rank {
        1 => (seed(pool, 1), seed(other, 2)),
        2 => (seed(other, 1), seed(pool, 2)),
        3 => (seed(Pool::A, 3), seed(Pool::B, 3)),
        _ => return None,
    };
    Some(Seeding::Derived { team1, team2 })
}

fn parse_fixed_pair(rule: &str, teams: &[Team]) -> Result<Seeding, EngineError> {
    let parts: Vec<&str> = rule.split(" vs ").map(str::trim).collect();

    let [first, second] = parts.as_slice() else {
        return Err(EngineError::InvalidRule(format!("unrecognised opponent rule '{}'", rule)));
    };

    let team1 = find_team(teams, first)?;
    let team2 = find_team(teams, second)?;

    if team1 == team2 {
        return Err(EngineError::InvalidRule(format!("'{}' pairs a team with itself", rule)));
    }
    Ok(Seeding::FixedPair { team1, team2 })
}

fn find_team(teams: &[Team], label: &str) -> Result<TeamId, EngineError> {
    teams
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(label) || t.code.eq_ignore_ascii_case(label))
        .map(|t| t.id)
        .ok_or_else(|| EngineError::InvalidRule(format!("no team called '{}'", label)))
}
