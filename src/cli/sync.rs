//! Arguments shared by the import and update subcommands.

use clap::Args;

/// Arguments for the import and update subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct SyncArgs {
    /// Sheet to read, overriding the stored sheet-name setting
    #[arg(long, value_name = "NAME")]
    pub sheet: Option<String>,

    /// Show what would change without writing anything
    ///
    /// Reads the sheet and prints the plan. No pilots are created or
    /// altered and no refresh is broadcast.
    #[arg(long)]
    pub dry_run: bool,
}

impl SyncArgs {
    /// Describe the run mode for logging
    pub fn mode(&self) -> &'static str {
        if self.dry_run { "dry-run" } else { "apply" }
    }
}
