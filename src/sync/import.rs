//! Import: create pilots for sheet rows that match nobody in the database.
//!
//! A row matches an existing pilot when its (placeholder-substituted) name
//! equals that pilot's name, or its callsign equals that pilot's callsign.
//! Comparison is exact and case-sensitive.
//! Pilots created earlier in the same batch count as existing once written.

use super::columns::{CALLSIGN, COLOUR, NAME, PHONETIC};
use super::schema::AttributeSchema;
use super::store::PilotStore;
use crate::logging::Logger;
use crate::source::Record;
use crate::types::{AttributeValue, DEFAULT_PILOT_COLOR, NewPilot, Pilot, PilotChanges};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Placeholder name for the `row`th record (1-based).
pub fn placeholder_name(row: usize) -> String {
    format!("~Pilot {} Name", row)
}

/// Placeholder callsign for the `row`th record (1-based).
pub fn placeholder_callsign(row: usize) -> String {
    format!("~Callsign {}", row)
}

/// Pilot fields for a record, with placeholders for anything missing.
pub fn new_pilot_from_record(record: &Record, row: usize) -> NewPilot {
    NewPilot {
        name: record
            .non_empty(NAME)
            .map(str::to_string)
            .unwrap_or_else(|| placeholder_name(row)),
        callsign: record
            .non_empty(CALLSIGN)
            .map(str::to_string)
            .unwrap_or_else(|| placeholder_callsign(row)),
        phonetic: record.non_empty(PHONETIC).unwrap_or_default().to_string(),
        color: record
            .non_empty(COLOUR)
            .unwrap_or(DEFAULT_PILOT_COLOR)
            .to_string(),
    }
}

/// A pilot the import will create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedPilot {
    /// 1-based position of the source record.
    pub row: usize,
    pub pilot: NewPilot,
    pub attributes: BTreeMap<String, AttributeValue>,
}

/// Why a record was not imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum SkipReason {
    /// A pilot with this name already exists.
    NameExists { name: String },
    /// A pilot with this callsign already exists.
    CallsignExists { callsign: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub row: usize,
    #[serde(flatten)]
    pub reason: SkipReason,
    /// Set when the only conflict is with an earlier row of this batch. If
    /// that row fails to write, this one is created instead.
    #[serde(skip)]
    pub candidate: Option<PlannedPilot>,
}

/// Everything an import would do, computed without touching the store.
///
/// The plan assumes every planned row is written successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportPlan {
    pub create: Vec<PlannedPilot>,
    pub skipped: Vec<SkippedRecord>,
}

impl ImportPlan {
    pub fn is_empty(&self) -> bool {
        self.create.is_empty()
    }
}

/// The conflict, if any, between a pilot and a set of names and callsigns.
fn conflict(pilot: &NewPilot, names: &HashSet<String>, callsigns: &HashSet<String>) -> Option<SkipReason> {
    if names.contains(&pilot.name) {
        Some(SkipReason::NameExists {
            name: pilot.name.clone(),
        })
    } else if callsigns.contains(&pilot.callsign) {
        Some(SkipReason::CallsignExists {
            callsign: pilot.callsign.clone(),
        })
    } else {
        None
    }
}

/// Work out which records become new pilots.
pub fn plan_import(records: &[Record], existing: &[Pilot], schema: &AttributeSchema) -> ImportPlan {
    let existing_names: HashSet<String> = existing.iter().map(|p| p.name.clone()).collect();
    let existing_callsigns: HashSet<String> =
        existing.iter().map(|p| p.callsign.clone()).collect();
    let mut batch_names = HashSet::new();
    let mut batch_callsigns = HashSet::new();

    let mut plan = ImportPlan::default();
    for (idx, record) in records.iter().enumerate() {
        let row = idx + 1;
        let pilot = new_pilot_from_record(record, row);

        if let Some(reason) = conflict(&pilot, &existing_names, &existing_callsigns) {
            plan.skipped.push(SkippedRecord {
                row,
                reason,
                candidate: None,
            });
            continue;
        }

        let planned = PlannedPilot {
            row,
            attributes: schema.attributes_from(record),
            pilot,
        };
        if let Some(reason) = conflict(&planned.pilot, &batch_names, &batch_callsigns) {
            plan.skipped.push(SkippedRecord {
                row,
                reason,
                candidate: Some(planned),
            });
            continue;
        }

        batch_names.insert(planned.pilot.name.clone());
        batch_callsigns.insert(planned.pilot.callsign.clone());
        plan.create.push(planned);
    }

    plan
}

/// A row whose write failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedRow {
    pub row: usize,
    pub name: String,
    pub error: String,
}

/// Outcome of applying an import plan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    /// Pilots created, in source order.
    pub created: Vec<Pilot>,
    pub skipped: Vec<SkippedRecord>,
    pub failed: Vec<FailedRow>,
}

impl ImportReport {
    pub fn created_count(&self) -> usize {
        self.created.len()
    }
}

/// Create the planned pilots. Each row is independent: a failed row is logged
/// and reported, and the remaining rows are still written.
///
/// Rows are checked again against the pilots actually created, so a row that
/// was only blocked by a failed row is created after all.
pub fn apply_import<S: PilotStore + ?Sized>(
    store: &S,
    plan: ImportPlan,
    logger: &Logger,
) -> ImportReport {
    let mut report = ImportReport::default();
    let mut candidates: Vec<PlannedPilot> = plan.create;
    for skipped in plan.skipped {
        match skipped.candidate {
            Some(planned) => candidates.push(planned),
            None => report.skipped.push(SkippedRecord {
                candidate: None,
                ..skipped
            }),
        }
    }
    candidates.sort_by_key(|planned| planned.row);

    let mut names = HashSet::new();
    let mut callsigns = HashSet::new();
    for planned in candidates {
        if let Some(reason) = conflict(&planned.pilot, &names, &callsigns) {
            report.skipped.push(SkippedRecord {
                row: planned.row,
                reason,
                candidate: None,
            });
            continue;
        }

        let mut pilot = match store.add_pilot(&planned.pilot) {
            Ok(pilot) => pilot,
            Err(e) => {
                logger.warning(&format!(
                    "Failed to add pilot {} (row {}): {:#}",
                    planned.pilot.name, planned.row, e
                ));
                report.failed.push(FailedRow {
                    row: planned.row,
                    name: planned.pilot.name,
                    error: format!("{:#}", e),
                });
                continue;
            }
        };
        logger.info(&format!(
            "Added pilot {}-{} with id:{}",
            pilot.name, pilot.callsign, pilot.id
        ));
        names.insert(pilot.name.clone());
        callsigns.insert(pilot.callsign.clone());

        let changes = PilotChanges::attributes(planned.attributes);
        if let Err(e) = store.alter_pilot(pilot.id, &changes) {
            // The pilot exists; only its attributes are missing
            logger.warning(&format!(
                "Failed to set attributes for pilot {} (id {}): {:#}",
                pilot.name, pilot.id, e
            ));
            report.failed.push(FailedRow {
                row: planned.row,
                name: pilot.name.clone(),
                error: format!("{:#}", e),
            });
        } else {
            pilot.attributes = changes.attributes;
        }
        report.created.push(pilot);
    }

    report.skipped.sort_by_key(|skipped| skipped.row);
    report
}
