//! Output formatting utilities for markdown and JSON.

use crate::sync::import::{FailedRow, SkipReason, SkippedRecord};
use crate::sync::{ImportPlan, ImportReport, UpdatePlan, UpdateReport};
use crate::types::{AttributeField, Pilot};
use serde::Serialize;

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "markdown" | "md" => Some(OutputFormat::Markdown),
            _ => None,
        }
    }
}

/// Pretty JSON for any serializable value.
pub fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Format a single pilot as markdown.
pub fn format_pilot_markdown(pilot: &Pilot) -> String {
    let mut md = String::new();

    md.push_str(&format!("## {} ({})\n", pilot.name, pilot.callsign));
    md.push_str(&format!("- **id**: {}\n", pilot.id));
    if !pilot.phonetic.is_empty() {
        md.push_str(&format!("- **phonetic**: {}\n", pilot.phonetic));
    }
    md.push_str(&format!("- **color**: `{}`\n", pilot.color));

    for (name, value) in &pilot.attributes {
        md.push_str(&format!("- **{}**: {}\n", name, value));
    }

    md
}

/// Format a list of pilots as markdown.
pub fn format_pilots_markdown(pilots: &[Pilot]) -> String {
    let mut md = format!("# Pilots ({})\n", pilots.len());
    for pilot in pilots {
        md.push('\n');
        md.push_str(&format_pilot_markdown(pilot));
    }
    md
}

pub fn format_attributes_markdown(fields: &[AttributeField]) -> String {
    let mut md = format!("# Attributes ({})\n\n", fields.len());
    for field in fields {
        md.push_str(&format!("- `{}` ({})", field.name, field.field_type.as_str()));
        if field.label != field.name {
            md.push_str(&format!(": {}", field.label));
        }
        md.push('\n');
    }
    md
}

fn skipped_line(skipped: &SkippedRecord) -> String {
    match skipped.reason {
        SkipReason::NameExists { ref name } => {
            format!("- row {}: name `{}` already exists\n", skipped.row, name)
        }
        SkipReason::CallsignExists { ref callsign } => {
            format!("- row {}: callsign `{}` already exists\n", skipped.row, callsign)
        }
    }
}

fn push_failed(md: &mut String, failed: &[FailedRow]) {
    if failed.is_empty() {
        return;
    }
    md.push_str(&format!("\n## Failed ({})\n", failed.len()));
    for row in failed {
        md.push_str(&format!("- row {} `{}`: {}\n", row.row, row.name, row.error));
    }
}

fn push_names(md: &mut String, heading: &str, names: &[String]) {
    if names.is_empty() {
        return;
    }
    md.push_str(&format!("\n## {} ({})\n", heading, names.len()));
    for name in names {
        md.push_str(&format!("- {}\n", name));
    }
}

pub fn format_import_plan_markdown(plan: &ImportPlan) -> String {
    let mut md = format!("# Import plan: {} to create\n", plan.create.len());
    for planned in &plan.create {
        md.push_str(&format!(
            "- row {}: {} ({})",
            planned.row, planned.pilot.name, planned.pilot.callsign
        ));
        if !planned.attributes.is_empty() {
            let names: Vec<&str> = planned.attributes.keys().map(String::as_str).collect();
            md.push_str(&format!(" [{}]", names.join(", ")));
        }
        md.push('\n');
    }
    if !plan.skipped.is_empty() {
        md.push_str(&format!("\n## Skipped ({})\n", plan.skipped.len()));
        for skipped in &plan.skipped {
            md.push_str(&skipped_line(skipped));
        }
    }
    md
}

pub fn format_import_report_markdown(report: &ImportReport) -> String {
    let mut md = format!("# Import: {} pilot(s) added\n", report.created_count());
    for pilot in &report.created {
        md.push_str(&format!("- {} ({}) id {}\n", pilot.name, pilot.callsign, pilot.id));
    }
    if !report.skipped.is_empty() {
        md.push_str(&format!("\n## Skipped ({})\n", report.skipped.len()));
        for skipped in &report.skipped {
            md.push_str(&skipped_line(skipped));
        }
    }
    push_failed(&mut md, &report.failed);
    md
}

pub fn format_update_plan_markdown(plan: &UpdatePlan) -> String {
    let mut md = format!("# Update plan: {} to update\n", plan.updates.len());
    for update in &plan.updates {
        let mut fields: Vec<&str> = Vec::new();
        if update.changes.callsign.is_some() {
            fields.push("callsign");
        }
        if update.changes.phonetic.is_some() {
            fields.push("phonetic");
        }
        if update.changes.color.is_some() {
            fields.push("color");
        }
        fields.extend(update.changes.attributes.keys().map(String::as_str));
        md.push_str(&format!(
            "- {} (id {}, row {}): {}\n",
            update.name,
            update.pilot_id,
            update.row,
            fields.join(", ")
        ));
    }
    push_names(&mut md, "Unchanged", &plan.unchanged);
    push_names(&mut md, "Not in sheet", &plan.unmatched);
    md
}

pub fn format_update_report_markdown(report: &UpdateReport) -> String {
    let mut md = format!("# Update: {} pilot(s) updated\n", report.updated_count());
    for update in &report.updated {
        md.push_str(&format!("- {} (id {})\n", update.name, update.pilot_id));
    }
    push_names(&mut md, "Unchanged", &report.unchanged);
    push_names(&mut md, "Not in sheet", &report.unmatched);
    push_failed(&mut md, &report.failed);
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AttributeValue, FieldType};
    use std::collections::BTreeMap;

    fn sample_pilot() -> Pilot {
        let mut attributes = BTreeMap::new();
        attributes.insert("country".to_string(), AttributeValue::text("NZ"));
        attributes.insert("elrs_active".to_string(), AttributeValue::Flag(true));
        Pilot {
            id: 3,
            name: "Alice".into(),
            callsign: "AL1".into(),
            phonetic: String::new(),
            color: "#ff0055".into(),
            attributes,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("md"), Some(OutputFormat::Markdown));
        assert_eq!(OutputFormat::from_str("yaml"), None);
    }

    #[test]
    fn test_pilot_markdown() {
        let md = format_pilot_markdown(&sample_pilot());
        assert!(md.starts_with("## Alice (AL1)\n"));
        assert!(md.contains("- **country**: NZ\n"));
        assert!(md.contains("- **elrs_active**: true\n"));
        assert!(!md.contains("phonetic"));
    }

    #[test]
    fn test_attributes_markdown() {
        let fields = vec![AttributeField {
            name: "comm_elrs".into(),
            label: "ELRS Bind Phrase".into(),
            field_type: FieldType::Text,
            registered_at: 0,
        }];
        assert_eq!(
            format_attributes_markdown(&fields),
            "# Attributes (1)\n\n- `comm_elrs` (text): ELRS Bind Phrase\n"
        );
    }

    #[test]
    fn test_pilots_json_has_attributes() {
        let json = to_json(&vec![sample_pilot()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["attributes"]["elrs_active"], serde_json::json!(true));
        assert_eq!(value[0]["attributes"]["country"], serde_json::json!("NZ"));
    }
}
