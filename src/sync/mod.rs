//! Pilot sync engine.
//!
//! Reconciles sheet rows with the pilots in a [`PilotStore`]. Each mode is
//! split into a pure planning step and an apply step so a job can be
//! previewed before anything is written.

pub mod columns;
pub mod import;
pub mod job;
pub mod schema;
pub mod store;
pub mod update;

pub use import::{ImportPlan, ImportReport, apply_import, plan_import};
pub use job::{ImportOutcome, SyncJob, SyncOutcome, UpdateOutcome};
pub use schema::AttributeSchema;
pub use store::{ConsoleNotifier, MemoryNotifier, Notification, Notifier, PilotStore};
pub use update::{UpdatePlan, UpdateReport, apply_update, plan_update};
