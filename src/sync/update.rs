//! Update: refresh existing pilots from the sheet row carrying their name.

use super::columns::{CALLSIGN, COLOUR, NAME, PHONETIC};
use super::import::FailedRow;
use super::schema::AttributeSchema;
use super::store::PilotStore;
use crate::logging::Logger;
use crate::source::Record;
use crate::types::{Pilot, PilotChanges};
use serde::Serialize;
use std::collections::HashMap;

/// Changes for one pilot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedUpdate {
    pub pilot_id: i64,
    pub name: String,
    /// 1-based position of the matching record.
    pub row: usize,
    pub changes: PilotChanges,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdatePlan {
    pub updates: Vec<PlannedUpdate>,
    /// Pilots with no row carrying their name.
    pub unmatched: Vec<String>,
    /// Pilots whose row produced no changes.
    pub unchanged: Vec<String>,
}

/// Compute the changes a record makes to a pilot.
///
/// Callsign and colour are written only when the cell is non-empty. Phonetic is
/// written whenever the column exists, even when the cell is blank.
pub fn changes_from_record(record: &Record, schema: &AttributeSchema) -> PilotChanges {
    PilotChanges {
        callsign: record.non_empty(CALLSIGN).map(str::to_string),
        phonetic: record.get(PHONETIC).map(str::to_string),
        color: record.non_empty(COLOUR).map(str::to_string),
        attributes: schema.update_attributes_from(record),
    }
}

/// Index of the first record for each non-empty name.
fn index_by_name(records: &[Record]) -> HashMap<&str, usize> {
    let mut index = HashMap::new();
    for (idx, record) in records.iter().enumerate() {
        if let Some(name) = record.non_empty(NAME) {
            index.entry(name).or_insert(idx);
        }
    }
    index
}

/// Work out the changes for every pilot that has a matching record.
pub fn plan_update(records: &[Record], pilots: &[Pilot], schema: &AttributeSchema) -> UpdatePlan {
    let by_name = index_by_name(records);
    let mut plan = UpdatePlan::default();

    for pilot in pilots {
        let Some(&idx) = by_name.get(pilot.name.as_str()) else {
            plan.unmatched.push(pilot.name.clone());
            continue;
        };

        let changes = changes_from_record(&records[idx], schema);
        if changes.is_empty() {
            plan.unchanged.push(pilot.name.clone());
            continue;
        }

        plan.updates.push(PlannedUpdate {
            pilot_id: pilot.id,
            name: pilot.name.clone(),
            row: idx + 1,
            changes,
        });
    }

    plan
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateReport {
    pub updated: Vec<PlannedUpdate>,
    pub unmatched: Vec<String>,
    pub unchanged: Vec<String>,
    pub failed: Vec<FailedRow>,
}

impl UpdateReport {
    /// Pilots actually written.
    pub fn updated_count(&self) -> usize {
        self.updated.len()
    }
}

/// Write the planned updates. A failing pilot is logged and reported; the rest
/// are still written.
pub fn apply_update<S: PilotStore + ?Sized>(
    store: &S,
    plan: UpdatePlan,
    logger: &Logger,
) -> UpdateReport {
    let mut report = UpdateReport {
        unmatched: plan.unmatched,
        unchanged: plan.unchanged,
        ..Default::default()
    };

    for update in plan.updates {
        match store.alter_pilot(update.pilot_id, &update.changes) {
            Ok(()) => {
                logger.info(&format!(
                    "Updated pilot {} (ID: {})",
                    update.name, update.pilot_id
                ));
                report.updated.push(update);
            }
            Err(e) => {
                logger.warning(&format!(
                    "Failed to update pilot {} (ID: {}): {:#}",
                    update.name, update.pilot_id, e
                ));
                report.failed.push(FailedRow {
                    row: update.row,
                    name: update.name,
                    error: format!("{:#}", e),
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AttributeValue, DEFAULT_PILOT_COLOR};
    use std::collections::BTreeMap;

    fn pilot(id: i64, name: &str, callsign: &str) -> Pilot {
        Pilot {
            id,
            name: name.to_string(),
            callsign: callsign.to_string(),
            phonetic: String::new(),
            color: DEFAULT_PILOT_COLOR.to_string(),
            attributes: BTreeMap::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_phonetic_written_when_blank() {
        let record = Record::from_pairs([
            ("Name", "Alice"),
            ("Callsign", ""),
            ("Phonetic", ""),
            ("Colour", ""),
        ]);
        let changes = changes_from_record(&record, &AttributeSchema::default());
        assert_eq!(changes.callsign, None);
        assert_eq!(changes.color, None);
        assert_eq!(changes.phonetic.as_deref(), Some(""));
    }

    #[test]
    fn test_absent_phonetic_not_written() {
        let record = Record::from_pairs([("Name", "Alice"), ("Callsign", "AL2")]);
        let changes = changes_from_record(&record, &AttributeSchema::default());
        assert_eq!(changes.callsign.as_deref(), Some("AL2"));
        assert_eq!(changes.phonetic, None);
    }

    #[test]
    fn test_first_matching_record_wins() {
        let pilots = vec![pilot(1, "Alice", "AL1")];
        let records = vec![
            Record::from_pairs([("Name", "Bob"), ("Callsign", "BB")]),
            Record::from_pairs([("Name", "Alice"), ("Callsign", "FIRST")]),
            Record::from_pairs([("Name", "Alice"), ("Callsign", "SECOND")]),
        ];
        let plan = plan_update(&records, &pilots, &AttributeSchema::default());
        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].row, 2);
        assert_eq!(plan.updates[0].changes.callsign.as_deref(), Some("FIRST"));
    }

    #[test]
    fn test_unmatched_and_unchanged() {
        let pilots = vec![pilot(1, "Alice", "AL1"), pilot(2, "Carol", "CC")];
        let records = vec![Record::from_pairs([("Name", "Alice"), ("Callsign", "")])];
        let plan = plan_update(&records, &pilots, &AttributeSchema::default());
        assert!(plan.updates.is_empty());
        assert_eq!(plan.unchanged, vec!["Alice".to_string()]);
        assert_eq!(plan.unmatched, vec!["Carol".to_string()]);
    }

    #[test]
    fn test_blank_names_never_match() {
        // A pilot can't have an empty name, but a blank cell must not match one anyway
        let pilots = vec![pilot(1, "", "X")];
        let records = vec![Record::from_pairs([("Name", ""), ("Callsign", "Y")])];
        let plan = plan_update(&records, &pilots, &AttributeSchema::default());
        assert!(plan.updates.is_empty());
    }

    #[test]
    fn test_attribute_only_update_counts() {
        let pilots = vec![pilot(1, "Alice", "AL1")];
        let records = vec![Record::from_pairs([
            ("Name", "Alice"),
            ("ELRS Bind Phrase", "bind-me"),
        ])];
        let schema = AttributeSchema::new(["comm_elrs", "elrs_active"]);
        let plan = plan_update(&records, &pilots, &schema);
        assert_eq!(plan.updates.len(), 1);
        let attrs = &plan.updates[0].changes.attributes;
        assert_eq!(attrs["comm_elrs"], AttributeValue::text("bind-me"));
        assert_eq!(attrs["elrs_active"], AttributeValue::Flag(true));
    }
}
