use anyhow::Result;

use club_championship::cli::Command;
use club_championship::domain::EventState;
use club_championship::{
    handle_completions, handle_fixtures, handle_group_ranking, handle_import, handle_init,
    handle_ranked_final, handle_record, handle_serve, handle_set_state, handle_squad,
    handle_standings, handle_sweep, handle_table, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Init => handle_init(),
        Command::Import { file } => handle_import(file),
        Command::Record { match_id, team1_score, team2_score, winner, by } => {
            handle_record(*match_id, team1_score, team2_score, winner, by)
        }
        Command::Squad { match_id, side, squad } => handle_squad(*match_id, side, squad),
        Command::GroupRanking { event_id, pool, teams } => {
            handle_group_ranking(*event_id, pool, teams)
        }
        Command::RankedFinal { event_id, teams } => handle_ranked_final(*event_id, teams),
        Command::Lock { event_id } => handle_set_state(*event_id, EventState::Locked),
        Command::Unlock { event_id } => handle_set_state(*event_id, EventState::Open),
        Command::Sweep { event } => handle_sweep(*event),
        Command::Standings { event_id, pool } => handle_standings(*event_id, pool),
        Command::Table => handle_table(),
        Command::Fixtures { event } => handle_fixtures(*event),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
