//! Settings subcommand: stored options such as the sheet name.

use crate::db::options::SHEET_NAME_OPTION;
use clap::{Args, Subcommand, ValueEnum};

/// Arguments for the settings subcommand
#[derive(Args, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print a setting
    Get { key: SettingKey },

    /// Store a setting
    Set { key: SettingKey, value: String },

    /// Remove a setting
    Clear { key: SettingKey },
}

/// Settings that can be changed from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SettingKey {
    /// Sheet read by import and update
    SheetName,
}

impl SettingKey {
    /// Key in the options table.
    pub fn option_key(self) -> &'static str {
        match self {
            SettingKey::SheetName => SHEET_NAME_OPTION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;

    #[test]
    fn test_set_sheet_name() {
        let cli = Cli::parse_from(["pilot-sheet-sync", "settings", "set", "sheet-name", "Race Day"]);
        let Command::Settings(args) = cli.command else {
            panic!("expected settings command");
        };
        match args.command {
            SettingsCommand::Set { key, value } => {
                assert_eq!(key.option_key(), "sheet_name");
                assert_eq!(value, "Race Day");
            }
            other => panic!("unexpected subcommand: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Cli::try_parse_from(["pilot-sheet-sync", "settings", "get", "theme"]).is_err());
    }
}
