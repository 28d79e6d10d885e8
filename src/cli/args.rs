//! CLI argument definitions using clap
//!
//! Commands:
//! - catalogq query --config <path>
//! - catalogq explain --config <path>
//! - catalogq start --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// catalogq - filter, sort and keyset-paginate list resources
#[derive(Parser, Debug)]
#[command(name = "catalogq")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve newline-delimited list requests from stdin until EOF
    Start {
        /// Path to configuration file
        #[arg(long, default_value = "./catalogq.json")]
        config: PathBuf,
    },

    /// Resolve and execute a single list request and exit
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./catalogq.json")]
        config: PathBuf,
    },

    /// Print the resolved predicate, ORDER BY and limit of a single request
    Explain {
        /// Path to configuration file
        #[arg(long, default_value = "./catalogq.json")]
        config: PathBuf,
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
    fn test_parse_query() {
        let cli = Cli::try_parse_from(["catalogq", "query", "--config", "/tmp/c.json"]).unwrap();
        match cli.command {
            Command::Query { config } => assert_eq!(config, PathBuf::from("/tmp/c.json")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_default_config_path() {
        let cli = Cli::try_parse_from(["catalogq", "start"]).unwrap();
        match cli.command {
            Command::Start { config } => assert_eq!(config, PathBuf::from("./catalogq.json")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
