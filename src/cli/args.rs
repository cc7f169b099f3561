//! CLI argument definitions using clap
//!
//! Commands:
//! - aeroquery run --data <path> --collection <name> [--query <path>] [--config <path>]
//! - aeroquery explain [--query <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// aeroquery - run extended-operator queries against a JSON dataset
#[derive(Parser, Debug)]
#[command(name = "aeroquery")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute a query and print the matching documents
    Run {
        /// Dataset file: {"<collection>": [{"id": .., ..}]}
        #[arg(long)]
        data: PathBuf,

        /// Collection to query
        #[arg(long)]
        collection: String,

        /// Query file (reads one JSON line from stdin when absent)
        #[arg(long)]
        query: Option<PathBuf>,

        /// Runner configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show how a query would be executed
    Explain {
        /// Query file (reads one JSON line from stdin when absent)
        #[arg(long)]
        query: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "aeroquery",
            "run",
            "--data",
            "people.json",
            "--collection",
            "people",
        ])
        .unwrap();

        match cli.command {
            Command::Run {
                data,
                collection,
                query,
                config,
            } => {
                assert_eq!(data, PathBuf::from("people.json"));
                assert_eq!(collection, "people");
                assert!(query.is_none());
                assert!(config.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_run_requires_collection() {
        assert!(Cli::try_parse_from(["aeroquery", "run", "--data", "d.json"]).is_err());
    }
}
