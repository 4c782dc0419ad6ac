// src/cli.rs
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "Companion CLI for the Pale Grind workout tracker", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the exercise catalog, one table per section
    Catalog {
        /// Only print the section with this id (e.g., "chest")
        #[arg(short, long)]
        section: Option<String>,
    },
    /// Fetch tips for an exercise (e.g., "Barbell Row")
    Tip {
        /// Exercise name, matched case-insensitively against the catalog
        exercise: String,
    },
    /// Inspect the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Store the text generation API key in the config file
    SetApiKey {
        key: String,
    },
    /// Remove the API key from the config file
    ClearApiKey,
    /// Generate shell completion scripts
    GenerateCompletion {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show the path to the config file
    Path,
    /// Print the effective configuration (API key masked)
    Show,
}

// Function to parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
