use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "options-cli")]
#[command(about = "Inspect and change stored options")]
pub struct Cli {
    /// Database file to use instead of the configured one
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Show all options with their current and default values
    #[command(alias = "show")]
    List,
    /// Print the current value of an option
    Get {
        /// Option name
        name: String,
    },
    /// Print the default value of an option
    Default {
        /// Option name
        name: String,
    },
    /// Create an option unless it already exists
    Create {
        /// Option name
        name: String,
        /// Default value for a newly created option
        #[arg(long)]
        default: Option<String>,
    },
    /// Set the current value of an option, creating it if needed
    Set {
        /// Option name
        name: String,
        /// New value
        value: String,
    },
    /// Reset an option to its default value
    Reset {
        /// Option name
        name: String,
    },
    /// Reset all options to their default values
    ResetAll {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Remove an option
    Remove {
        /// Option name
        name: String,
    },
    /// Insert or replace an option with explicit current and default values
    Add {
        /// Option name
        name: String,
        /// Current value
        value: String,
        /// Default value; the current value if omitted
        #[arg(long)]
        default: Option<String>,
    },
    /// Schema migrations of the SQLite database
    Migrations(MigrationsCommands),
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct MigrationsCommands {
    #[command(subcommand)]
    pub command: MigrationsSubcommands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum MigrationsSubcommands {
    /// Show applied and pending migrations
    Status,
    /// Roll back migrations
    Down {
        /// Version to roll back to; everything if omitted
        #[arg(long)]
        to: Option<i64>,
    },
}
