//! CLI command definitions for pilot-sheet-sync
//!
//! The entry point is the `Cli` struct; each subcommand's arguments live in
//! their own module.

pub mod attributes;
pub mod settings;
pub mod sync;

use attributes::AttributesArgs;
use clap::{Parser, Subcommand};
use settings::SettingsArgs;
use sync::SyncArgs;

/// Import and refresh race pilots from a spreadsheet
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Path to database file (overrides config)
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add pilots from the sheet that are not in the database yet
    Import(SyncArgs),

    /// Refresh existing pilots from the sheet row carrying their name
    Update(SyncArgs),

    /// List pilots in the database
    Pilots(PilotsArgs),

    /// Manage custom pilot attributes
    Attributes(AttributesArgs),

    /// Read or change stored settings
    Settings(SettingsArgs),
}

/// Arguments for the pilots subcommand
#[derive(clap::Args, Debug)]
pub struct PilotsArgs {
    /// Output format
    #[arg(long, default_value = "markdown", value_parser = ["json", "markdown", "md"])]
    pub format: String,
}
