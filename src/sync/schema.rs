//! Registered attribute names, looked up once per job.

use super::columns::{ATTRIBUTE_COLUMNS, COMM_ELRS, ELRS_ACTIVE, ELRS_BIND_PHRASE};
use crate::source::Record;
use crate::types::AttributeValue;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSchema {
    names: HashSet<String>,
}

impl AttributeSchema {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Registered names in sorted order, for logging.
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Attributes a record supplies: non-empty cells whose attribute is registered.
    pub fn attributes_from(&self, record: &Record) -> BTreeMap<String, AttributeValue> {
        ATTRIBUTE_COLUMNS
            .iter()
            .filter(|c| self.contains(c.attribute))
            .filter_map(|c| {
                record
                    .non_empty(c.column)
                    .map(|value| (c.attribute.to_string(), AttributeValue::text(value)))
            })
            .collect()
    }

    /// Like [`attributes_from`](Self::attributes_from), and also flags
    /// `elrs_active` when a bind phrase is being written and the flag exists.
    pub fn update_attributes_from(&self, record: &Record) -> BTreeMap<String, AttributeValue> {
        let mut attributes = self.attributes_from(record);
        let writes_bind_phrase =
            attributes.contains_key(COMM_ELRS) && record.non_empty(ELRS_BIND_PHRASE).is_some();
        if writes_bind_phrase && self.contains(ELRS_ACTIVE) {
            attributes.insert(ELRS_ACTIVE.to_string(), AttributeValue::Flag(true));
        }
        attributes
    }
}
