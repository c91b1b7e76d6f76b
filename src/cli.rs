use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "club championship results engine")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Create an empty database, dropping any existing tables
    Init,
    /// Load teams, events and schedule from a JSON fixture file
    Import {
        file: PathBuf,
    },
    /// Record or correct the score of a match
    Record {
        match_id: i64,
        team1_score: String,
        team2_score: String,
        /// Winning side: team1 or team2
        #[arg(short, long)]
        winner: String,
        /// Name kept in the audit trail
        #[arg(long, default_value = "operator")]
        by: String,
    },
    /// Set the squad one side fields in a match
    Squad {
        match_id: i64,
        /// team1 or team2
        side: String,
        squad: String,
    },
    /// Submit the top three of one group of a panel-ranked event
    GroupRanking {
        event_id: i64,
        pool: String,
        /// Team ids, winner first
        #[arg(num_args = 3, required = true)]
        teams: Vec<i64>,
    },
    /// Submit the finishing order of a ranked final
    RankedFinal {
        event_id: i64,
        /// Team ids, winner first
        #[arg(required = true)]
        teams: Vec<i64>,
    },
    /// Freeze an event so no result can change
    Lock {
        event_id: i64,
    },
    /// Reopen a locked event
    Unlock {
        event_id: i64,
    },
    /// Re-run bracket seeding and points for one event or all of them
    Sweep {
        #[arg(short, long)]
        event: Option<i64>,
    },
    /// Show the round-robin table of one pool
    Standings {
        event_id: i64,
        pool: String,
    },
    /// Show the championship points table
    Table,
    /// List matches by event and match number
    Fixtures {
        #[arg(short, long)]
        event: Option<i64>,
    },
    /// Print shell completions
    Completions {
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_arguments() {
        let args = ["club_championship", "record", "7", "21", "15", "--winner", "team1"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(
            cli.command,
            Command::Record {
                match_id: 7,
                team1_score: "21".to_string(),
                team2_score: "15".to_string(),
                winner: "team1".to_string(),
                by: "operator".to_string(),
            }
        );
    }

    #[test]
    fn test_group_ranking_takes_exactly_three_teams() {
        let short = ["club_championship", "group-ranking", "3", "A", "1", "2"];
        assert!(Cli::try_parse_from(short).is_err());

        let args = ["club_championship", "group-ranking", "3", "A", "2", "1", "3"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.command,
            Command::GroupRanking { teams, .. } if teams == vec![2, 1, 3]
        ));
    }
}
