//! Import and update jobs: credentials, sheet lookup, plan, apply, notify.
//!
//! A job runs start to finish in one call:
//!
//! 1. announce the job to the user
//! 2. load credentials (missing or invalid: abort with a message)
//! 3. resolve the sheet name (unset: stop quietly, nothing written)
//! 4. open the sheet and read every row (failure: abort, full error in the log)
//! 5. plan against the current pilots and attribute schema
//! 6. apply row by row, then notify once and broadcast the pilot list

use super::import::{ImportPlan, ImportReport, apply_import, plan_import};
use super::schema::AttributeSchema;
use super::store::{Notifier, PilotStore};
use super::update::{UpdatePlan, UpdateReport, apply_update, plan_update};
use crate::db::options::SHEET_NAME_OPTION;
use crate::error::{ErrorCode, JobKind, SyncError, SyncResult};
use crate::logging::{LogLevel, Logger};
use crate::source::{Credentials, Record, SheetClient};
use crate::types::Pilot;
use std::path::PathBuf;

/// How a job ended.
#[derive(Debug)]
pub enum SyncOutcome<P, R> {
    /// Changes were written.
    Applied(R),
    /// Dry run: the plan that would have been applied.
    Planned(P),
    /// No sheet name is configured; nothing happened.
    NotConfigured,
    /// The job stopped before writing anything.
    Aborted(SyncError),
}

impl<P, R> SyncOutcome<P, R> {
    pub fn applied(&self) -> Option<&R> {
        match self {
            SyncOutcome::Applied(report) => Some(report),
            _ => None,
        }
    }

    pub fn planned(&self) -> Option<&P> {
        match self {
            SyncOutcome::Planned(plan) => Some(plan),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SyncError> {
        match self {
            SyncOutcome::Aborted(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, SyncOutcome::Aborted(_))
    }
}

pub type ImportOutcome = SyncOutcome<ImportPlan, ImportReport>;
pub type UpdateOutcome = SyncOutcome<UpdatePlan, UpdateReport>;

/// Rows and the database state to reconcile them against.
struct Snapshot {
    records: Vec<Record>,
    pilots: Vec<Pilot>,
    schema: AttributeSchema,
}

/// A single import or update run against a store.
pub struct SyncJob<'a, S: PilotStore + ?Sized, N: Notifier + ?Sized> {
    store: &'a S,
    notifier: &'a N,
    logger: Logger,
    credentials_path: PathBuf,
    sheet_name: Option<String>,
    fallback_sheet_name: Option<String>,
    dry_run: bool,
}

impl<'a, S: PilotStore + ?Sized, N: Notifier + ?Sized> SyncJob<'a, S, N> {
    pub fn new(store: &'a S, notifier: &'a N, credentials_path: impl Into<PathBuf>) -> Self {
        Self {
            store,
            notifier,
            logger: Logger::default(),
            credentials_path: credentials_path.into(),
            sheet_name: None,
            fallback_sheet_name: None,
            dry_run: false,
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Use this sheet regardless of the stored option.
    pub fn with_sheet_name(mut self, name: Option<String>) -> Self {
        self.sheet_name = name.filter(|n| !n.is_empty());
        self
    }

    /// Sheet to use when the stored option is unset.
    pub fn with_fallback_sheet_name(mut self, name: Option<String>) -> Self {
        self.fallback_sheet_name = name.filter(|n| !n.is_empty());
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Add pilots for rows that match nobody in the database.
    pub fn import<C, F>(&self, connect: F) -> ImportOutcome
    where
        C: SheetClient,
        F: FnOnce(&Credentials) -> C,
    {
        self.notifier
            .message_notify("Beginning pilot sheet import...");

        let snapshot = match self.snapshot(JobKind::Import, connect) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return SyncOutcome::NotConfigured,
            Err(err) => return self.abort(JobKind::Import, err),
        };

        let plan = plan_import(&snapshot.records, &snapshot.pilots, &snapshot.schema);
        self.logger.debug(&format!(
            "Import plan: {} to create, {} skipped",
            plan.create.len(),
            plan.skipped.len()
        ));

        if self.dry_run {
            self.notifier.message_notify(&format!(
                "Dry run: {} pilot(s) would be added, {} skipped.",
                plan.create.len(),
                plan.skipped.len()
            ));
            return SyncOutcome::Planned(plan);
        }

        let report = apply_import(self.store, plan, &self.logger);
        if !report.failed.is_empty() {
            self.logger.warning(&format!(
                "{} row(s) failed during import",
                report.failed.len()
            ));
        }
        self.notifier.message_notify(&format!(
            "Import complete: {} pilot(s) added, please refresh.",
            report.created_count()
        ));
        self.notifier.broadcast_pilots();
        SyncOutcome::Applied(report)
    }

    /// Refresh existing pilots from the row carrying their name.
    pub fn update<C, F>(&self, connect: F) -> UpdateOutcome
    where
        C: SheetClient,
        F: FnOnce(&Credentials) -> C,
    {
        self.notifier
            .message_notify("Beginning pilot details update...");

        let snapshot = match self.snapshot(JobKind::Update, connect) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return SyncOutcome::NotConfigured,
            Err(err) => return self.abort(JobKind::Update, err),
        };

        let plan = plan_update(&snapshot.records, &snapshot.pilots, &snapshot.schema);
        self.logger.debug(&format!(
            "Update plan: {} to update, {} unchanged, {} unmatched",
            plan.updates.len(),
            plan.unchanged.len(),
            plan.unmatched.len()
        ));

        if self.dry_run {
            self.notifier.message_notify(&format!(
                "Dry run: {} pilot(s) would be updated.",
                plan.updates.len()
            ));
            return SyncOutcome::Planned(plan);
        }

        let report = apply_update(self.store, plan, &self.logger);
        if !report.failed.is_empty() {
            self.logger.warning(&format!(
                "{} pilot(s) failed during update",
                report.failed.len()
            ));
        }
        self.notifier.message_notify(&format!(
            "Update complete. Updated {} pilot(s).",
            report.updated_count()
        ));
        self.notifier.broadcast_pilots();
        SyncOutcome::Applied(report)
    }

    fn abort<P, R>(&self, job: JobKind, err: SyncError) -> SyncOutcome<P, R> {
        let message = format!("Pilot sheet {} failed: {}", job, err);
        match err.code {
            ErrorCode::DatabaseError | ErrorCode::InternalError => self.logger.error(&message),
            _ => self.logger.warning(&message),
        }
        if let Some(ref details) = err.details {
            self.logger.debug(details);
        }
        self.notifier.message_notify(&err.user_message(job));
        SyncOutcome::Aborted(err)
    }

    /// The sheet name from the override, the stored option, or the fallback.
    fn resolve_sheet_name(&self) -> SyncResult<Option<String>> {
        if let Some(ref name) = self.sheet_name {
            return Ok(Some(name.clone()));
        }
        let stored = self
            .store
            .option(SHEET_NAME_OPTION)
            .map_err(|e| SyncError::database(format!("{:#}", e)))?;
        Ok(stored.or_else(|| self.fallback_sheet_name.clone()))
    }

    fn snapshot<C, F>(&self, job: JobKind, connect: F) -> SyncResult<Option<Snapshot>>
    where
        C: SheetClient,
        F: FnOnce(&Credentials) -> C,
    {
        let credentials = Credentials::load(&self.credentials_path)
            .map_err(|e| SyncError::credentials(&e))?;

        let Some(sheet_name) = self.resolve_sheet_name()? else {
            self.logger
                .debug(&format!("No sheet name configured; skipping {}", job));
            return Ok(None);
        };

        let client = connect(&credentials);
        let records = client
            .open(&sheet_name)
            .and_then(|sheet| sheet.get_all_records())
            .map_err(|e| SyncError::source(&e))?;
        self.logger.info(&format!(
            "Read {} row(s) from sheet '{}'",
            records.len(),
            sheet_name
        ));

        let schema = AttributeSchema::new(
            self.store
                .attribute_names()
                .map_err(|e| SyncError::database(format!("{:#}", e)))?,
        );
        if self.logger.enabled(LogLevel::Debug) {
            self.logger.debug(&format!(
                "Registered attributes: {}",
                schema.sorted_names().join(", ")
            ));
        }

        let pilots = self
            .store
            .pilots()
            .map_err(|e| SyncError::database(format!("{:#}", e)))?;

        Ok(Some(Snapshot {
            records,
            pilots,
            schema,
        }))
    }
}
