//! Command-line interface definitions.
//!
//! Defines the CLI structure for the tirestock application using `clap`.
//! Numeric inputs are taken as text and validated by the domain so that a
//! malformed number is reported like any other validation failure.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::paths;

/// Stock ledger for a motorcycle tire shop
#[derive(Parser, Debug)]
#[command(name = "tirestock")]
#[command(version)]
pub struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands for the tirestock CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage tires
    #[command(subcommand)]
    Tire(TireCommand),

    /// Register stock movements
    #[command(subcommand)]
    Movement(MovementCommand),

    /// Show the movement history
    History(HistoryArgs),

    /// Show dashboard statistics
    Stats(StatsArgs),

    /// Inspect the storage backend and migrate local records
    #[command(subcommand)]
    Backend(BackendCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `tirestock tire`.
#[derive(Subcommand, Debug)]
pub enum TireCommand {
    /// Add a tire, optionally with initial stock
    Add(TireAddArgs),
    /// Edit tire attributes
    Edit(TireEditArgs),
    /// Delete a tire (its movements are kept)
    Delete(TireDeleteArgs),
    /// Quick adjust stock by one unit
    Adjust(TireAdjustArgs),
    /// List tires
    List(TireListArgs),
}

#[derive(Args, Debug)]
pub struct TireAddArgs {
    /// Tire size, e.g. 120/70-17
    #[arg(long)]
    pub measure: String,
    #[arg(long)]
    pub brand: String,
    /// Model name
    #[arg(long)]
    pub reference: String,
    /// Sport, Trail, Urban or Cruiser
    #[arg(long)]
    pub category: String,
    /// Front or Rear
    #[arg(long = "type")]
    pub tire_type: String,
    /// Unit price
    #[arg(long, allow_hyphen_values = true)]
    pub price: String,
    /// Initial stock
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub stock: String,
    /// Minimum stock threshold (defaults to the configured value)
    #[arg(long, allow_hyphen_values = true)]
    pub min_stock: Option<String>,
}

#[derive(Args, Debug)]
pub struct TireEditArgs {
    /// Tire identifier
    pub id: String,
    #[arg(long)]
    pub measure: Option<String>,
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub reference: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long = "type")]
    pub tire_type: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub price: Option<String>,
    /// New stock; recorded as an adjustment movement
    #[arg(long, allow_hyphen_values = true)]
    pub stock: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub min_stock: Option<String>,
}

#[derive(Args, Debug)]
pub struct TireDeleteArgs {
    /// Tire identifier
    pub id: String,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct TireAdjustArgs {
    /// Tire identifier
    pub id: String,
    /// up, down, +1 or -1
    #[arg(allow_hyphen_values = true)]
    pub change: String,
}

#[derive(Args, Debug)]
pub struct TireListArgs {
    /// Search brand, reference and measure
    #[arg(short, long)]
    pub search: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long = "type")]
    pub tire_type: Option<String>,
    /// Only tires at or below their minimum stock
    #[arg(long)]
    pub low: bool,
}

/// Subcommands for `tirestock movement`.
#[derive(Subcommand, Debug)]
pub enum MovementCommand {
    /// Register a movement: entrada, salida, transferencia or ajuste
    Add(MovementAddArgs),
}

#[derive(Args, Debug)]
pub struct MovementAddArgs {
    /// Tire identifier
    pub tire_id: String,
    /// entrada, salida, transferencia or ajuste
    pub kind: String,
    /// Units moved, or the target stock for ajuste
    #[arg(allow_hyphen_values = true)]
    pub quantity: String,
    #[arg(short, long, default_value = "")]
    pub reason: String,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// First day, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<chrono::NaiveDate>,
    /// Last day, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<chrono::NaiveDate>,
    /// Movement type
    #[arg(long = "type")]
    pub kind: Option<String>,
    /// Show at most this many rows
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Number of recent movements to show
    #[arg(long, default_value_t = 5)]
    pub recent: usize,
}

/// Subcommands for `tirestock backend`.
#[derive(Subcommand, Debug)]
pub enum BackendCommand {
    /// Show the active backend and pending local records
    Status,
    /// Copy local tires to the hosted backend
    Migrate(MigrateArgs),
}

#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Subcommands for `tirestock config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write a documented config template
    Init(ConfigInitArgs),
    /// Validate the configuration file
    Validate,
    /// Display the effective configuration with defaults applied
    Show,
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn negative_quick_adjust_parses() {
        let cli = Cli::parse_from(["tirestock", "tire", "adjust", "abc", "-1"]);
        match cli.command {
            Commands::Tire(TireCommand::Adjust(args)) => assert_eq!(args.change, "-1"),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
