//! pilot-sheet-sync CLI
//!
//! Reads pilots from a spreadsheet and reconciles them with the timing
//! database.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use pilot_sheet_sync::cli::attributes::AttributesCommand;
use pilot_sheet_sync::cli::settings::SettingsCommand;
use pilot_sheet_sync::cli::sync::SyncArgs;
use pilot_sheet_sync::cli::{Cli, Command, PilotsArgs};
use pilot_sheet_sync::config::{Config, ConfigLoader};
use pilot_sheet_sync::db::Database;
use pilot_sheet_sync::format::{self, OutputFormat};
use pilot_sheet_sync::logging::{LogLevel, Logger, log_level_to_tracing};
use pilot_sheet_sync::source::FileSheetClient;
use pilot_sheet_sync::sync::{ConsoleNotifier, SyncJob, SyncOutcome};
use std::fs::OpenOptions;
use tracing::{debug, info};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut loader = match cli.config {
        Some(ref path) => ConfigLoader::load_file(Default::default(), path.into())?,
        None => ConfigLoader::load()?,
    };

    let config = loader.config_mut();
    if let Some(ref db_path) = cli.database {
        config.database.path = db_path.into();
    }
    if cli.verbose {
        config.logging.level = LogLevel::Debug;
    }

    // Initialize logging based on --log option
    let level = log_level_to_tracing(config.logging.level);
    match cli.log.as_str() {
        "0" | "off" => {}
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    for source in loader.sources() {
        debug!("Loaded config from {}", source.display());
    }
    let config = loader.config();

    config.ensure_db_dir()?;
    let db = Database::open(&config.database.path)
        .with_context(|| format!("failed to open {}", config.database.path.display()))?;
    info!("Using database {}", config.database.path.display());

    match cli.command {
        Command::Import(args) => run_import(config, &db, args),
        Command::Update(args) => run_update(config, &db, args),
        Command::Pilots(args) => run_pilots(&db, args),
        Command::Attributes(args) => match args.command {
            AttributesCommand::List => {
                print!("{}", format::format_attributes_markdown(&db.list_attributes()?));
                Ok(())
            }
            AttributesCommand::Register { name, label, kind } => {
                let field = db.register_attribute(&name, label.as_deref(), kind.into())?;
                eprintln!(
                    "Registered attribute {} ({})",
                    field.name,
                    field.field_type.as_str()
                );
                Ok(())
            }
        },
        Command::Settings(args) => match args.command {
            SettingsCommand::Get { key } => {
                match db.option(key.option_key())? {
                    Some(value) => println!("{}", value),
                    None => eprintln!("{} is not set", key.option_key()),
                }
                Ok(())
            }
            SettingsCommand::Set { key, value } => {
                db.set_option(key.option_key(), &value)?;
                Ok(())
            }
            SettingsCommand::Clear { key } => {
                db.clear_option(key.option_key())?;
                Ok(())
            }
        },
    }
}

fn job_logger(config: &Config, job: &str) -> Logger {
    Logger::new(config.logging.level).with_name(job)
}

fn run_import(config: &Config, db: &Database, args: SyncArgs) -> Result<()> {
    debug!("Import mode: {}", args.mode());
    let notifier = ConsoleNotifier;
    let job = SyncJob::new(db, &notifier, &config.source.credentials_path)
        .with_logger(job_logger(config, "import"))
        .with_sheet_name(args.sheet)
        .with_fallback_sheet_name(config.source.sheet_name.clone())
        .with_dry_run(args.dry_run);

    let sheets_dir = config.source.sheets_dir.clone();
    match job.import(|creds| FileSheetClient::from_credentials(creds, sheets_dir)) {
        SyncOutcome::Applied(report) => {
            print!("{}", format::format_import_report_markdown(&report));
            Ok(())
        }
        SyncOutcome::Planned(plan) => {
            print!("{}", format::format_import_plan_markdown(&plan));
            Ok(())
        }
        SyncOutcome::NotConfigured => {
            debug!("No sheet name set; use --sheet or `settings set sheet-name NAME`");
            Ok(())
        }
        SyncOutcome::Aborted(err) => Err(anyhow!(err)),
    }
}

fn run_update(config: &Config, db: &Database, args: SyncArgs) -> Result<()> {
    debug!("Update mode: {}", args.mode());
    let notifier = ConsoleNotifier;
    let job = SyncJob::new(db, &notifier, &config.source.credentials_path)
        .with_logger(job_logger(config, "update"))
        .with_sheet_name(args.sheet)
        .with_fallback_sheet_name(config.source.sheet_name.clone())
        .with_dry_run(args.dry_run);

    let sheets_dir = config.source.sheets_dir.clone();
    match job.update(|creds| FileSheetClient::from_credentials(creds, sheets_dir)) {
        SyncOutcome::Applied(report) => {
            print!("{}", format::format_update_report_markdown(&report));
            Ok(())
        }
        SyncOutcome::Planned(plan) => {
            print!("{}", format::format_update_plan_markdown(&plan));
            Ok(())
        }
        SyncOutcome::NotConfigured => {
            debug!("No sheet name set; use --sheet or `settings set sheet-name NAME`");
            Ok(())
        }
        SyncOutcome::Aborted(err) => Err(anyhow!(err)),
    }
}

fn run_pilots(db: &Database, args: PilotsArgs) -> Result<()> {
    let pilots = db.list_pilots()?;
    match OutputFormat::from_str(&args.format) {
        Some(OutputFormat::Json) => println!("{}", format::to_json(&pilots)?),
        _ => print!("{}", format::format_pilots_markdown(&pilots)),
    }
    Ok(())
}
