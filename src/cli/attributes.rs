//! Attributes subcommand: list and register custom pilot attributes.

use crate::types::FieldType;
use clap::{Args, Subcommand, ValueEnum};

/// Arguments for the attributes subcommand
#[derive(Args, Debug)]
pub struct AttributesArgs {
    #[command(subcommand)]
    pub command: AttributesCommand,
}

#[derive(Subcommand, Debug)]
pub enum AttributesCommand {
    /// List registered attributes
    List,

    /// Register an attribute so imports and updates may write it
    Register {
        /// Attribute name, e.g. `country` or `comm_elrs`
        name: String,

        /// Display label
        #[arg(long)]
        label: Option<String>,

        /// Field kind
        #[arg(long, value_enum, default_value_t = AttributeKind::Text)]
        kind: AttributeKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AttributeKind {
    #[default]
    Text,
    Checkbox,
}

impl From<AttributeKind> for FieldType {
    fn from(kind: AttributeKind) -> Self {
        match kind {
            AttributeKind::Text => FieldType::Text,
            AttributeKind::Checkbox => FieldType::Checkbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;

    #[test]
    fn test_register_checkbox() {
        let cli = Cli::parse_from([
            "pilot-sheet-sync",
            "attributes",
            "register",
            "elrs_active",
            "--kind",
            "checkbox",
        ]);
        let Command::Attributes(args) = cli.command else {
            panic!("expected attributes command");
        };
        match args.command {
            AttributesCommand::Register { name, label, kind } => {
                assert_eq!(name, "elrs_active");
                assert!(label.is_none());
                assert_eq!(FieldType::from(kind), FieldType::Checkbox);
            }
            other => panic!("unexpected subcommand: {:?}", other),
        }
    }
}
