pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod services;

use std::path::Path;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;
use colored::Colorize;
use log::{info, warn};

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::domain::{EventId, EventState, MatchId, Pool, RankedEntry, Scores, Side, TeamId};
use crate::engine::SweepReport;
use crate::services::import::ImportService;
use crate::services::scoring::ScoringService;
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

fn scoring_service(config: &AppConfig) -> Result<ScoringService> {
    let pool = database::create_pool(&config.database.path)?;
    Ok(ScoringService::new(pool, config.points.points_scale()))
}

fn report(report: &SweepReport) {
    info!("  → {} bracket slots seeded", report.assigned);
    for fault in &report.faults {
        warn!("  → {}", fault);
    }
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_init() -> Result<()> {
    let config = AppConfig::new();
    let pool = database::create_pool(&config.database.path)?;
    let conn = database::get_connection(&pool)?;
    database::setup::reset_database(&conn)?;
    info!("Initialised {}", config.database.path);
    Ok(())
}

pub fn handle_import(file: &Path) -> Result<()> {
    let config = AppConfig::new();
    let pool = database::create_pool(&config.database.path)?;
    let summary = ImportService::new(pool, config.points.points_scale())?.import_file(file)?;
    info!(
        "Imported {} teams, {} events, {} matches ({} slots seeded)",
        summary.teams, summary.events, summary.matches, summary.assigned
    );
    Ok(())
}

pub fn handle_record(
    match_id: MatchId,
    team1_score: &str,
    team2_score: &str,
    winner: &str,
    by: &str,
) -> Result<()> {
    let scores = Scores::parse(team1_score, team2_score)?;
    let side: Side = winner.parse()?;
    let service = scoring_service(&AppConfig::new())?;
    report(&service.record_result(match_id, scores, side, by)?);
    Ok(())
}

pub fn handle_squad(match_id: MatchId, side: &str, squad: &str) -> Result<()> {
    let side: Side = side.parse()?;
    let service = scoring_service(&AppConfig::new())?;
    report(&service.select_squad(match_id, side, squad)?);
    Ok(())
}

pub fn handle_group_ranking(event_id: EventId, pool: &str, teams: &[TeamId]) -> Result<()> {
    let pool: Pool = pool.parse()?;
    let [first, second, third] = teams else {
        anyhow::bail!("A group ranking needs exactly 3 teams");
    };
    let entry = |team_id: &TeamId| RankedEntry { team_id: *team_id, score: None };

    let service = scoring_service(&AppConfig::new())?;
    let placings = [entry(first), entry(second), entry(third)];
    report(&service.submit_group_ranking(event_id, pool, placings)?);
    Ok(())
}

pub fn handle_ranked_final(event_id: EventId, teams: &[TeamId]) -> Result<()> {
    let service = scoring_service(&AppConfig::new())?;
    report(&service.submit_ranked_final(event_id, teams.to_vec())?);
    Ok(())
}

pub fn handle_set_state(event_id: EventId, state: EventState) -> Result<()> {
    let service = scoring_service(&AppConfig::new())?;
    report(&service.set_event_state(event_id, state)?);
    info!("Event {} is {}", event_id, state.as_str());
    Ok(())
}

pub fn handle_sweep(event_id: Option<EventId>) -> Result<()> {
    let service = scoring_service(&AppConfig::new())?;
    let result = match event_id {
        Some(id) => service.sweep(id)?,
        None => service.sweep_all()?,
    };
    report(&result);
    Ok(())
}

pub fn handle_standings(event_id: EventId, pool: &str) -> Result<()> {
    let pool: Pool = pool.parse()?;
    let service = scoring_service(&AppConfig::new())?;
    let rows = service.current_standings(event_id, pool)?;

    println!("{}", format!("Group {}", pool).bold());
    println!("{:<4} {:<24} {:>3} {:>3} {:>3} {:>6}", "#", "Team", "P", "W", "L", "Diff");
    for (idx, row) in rows.iter().enumerate() {
        println!(
            "{:<4} {:<24} {:>3} {:>3} {:>3} {:>6}",
            idx + 1,
            row.team_name,
            row.played,
            row.wins,
            row.losses,
            format!("{:+}", row.score_diff)
        );
    }
    Ok(())
}

pub fn handle_table() -> Result<()> {
    let service = scoring_service(&AppConfig::new())?;
    let rows = service.championship_table()?;

    println!("{}", "Championship".bold());
    println!(
        "{:<4} {:<5} {:<24} {:>6} {:>4} {:>4} {:>4}",
        "#", "Code", "Team", "Pts", "G", "S", "B"
    );
    for row in &rows {
        let line = format!(
            "{:<4} {:<5} {:<24} {:>6} {:>4} {:>4} {:>4}",
            row.rank, row.code, row.name, row.total_points, row.gold, row.silver, row.bronze
        );
        if row.rank == 1 && row.total_points > 0 {
            println!("{}", line.green().bold());
        } else {
            println!("{}", line);
        }
    }
    Ok(())
}

pub fn handle_fixtures(event_id: Option<EventId>) -> Result<()> {
    let service = scoring_service(&AppConfig::new())?;
    let teams = service.teams()?;
    let events = service.events()?;
    let name = |id: Option<TeamId>| {
        id.and_then(|id| teams.iter().find(|t| t.id == id))
            .map(|t| t.name.clone())
            .unwrap_or_else(|| "TBD".to_string())
    };

    let mut current_event = None;
    for m in service.fixtures(event_id)? {
        if current_event != Some(m.event_id) {
            current_event = Some(m.event_id);
            let title = events
                .iter()
                .find(|e| e.id == m.event_id)
                .map(|e| format!("{} [{}]", e.name, e.state.as_str()))
                .unwrap_or_default();
            println!("\n{}", title.bold());
        }

        let score = m
            .scores
            .map(|s| format!("{}-{}", s.team1, s.team2))
            .unwrap_or_default();
        let line = format!(
            "{:>4} {:<4} {:<3} {:<20} vs {:<20} {:>7}",
            m.id,
            m.kind.as_str(),
            m.group.as_str(),
            name(m.team1),
            name(m.team2),
            score
        );
        if m.completed {
            println!("{}", line.dimmed());
        } else {
            println!("{}", line);
        }
    }
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
