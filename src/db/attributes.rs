//! Registered pilot attribute fields.

use super::{Database, now_ms};
use crate::types::{AttributeField, FieldType};
use anyhow::{Result, anyhow};
use rusqlite::{Connection, params};

/// Maximum length for attribute names.
pub const MAX_ATTRIBUTE_NAME_LEN: usize = 64;

/// Check whether `name` is registered, using an existing connection.
pub(crate) fn is_registered(conn: &Connection, name: &str) -> Result<bool> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM attribute_fields WHERE name = ?1",
            params![name],
            |_| Ok(true),
        )
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(false),
            e => Err(e),
        })?;
    Ok(exists)
}

impl Database {
    /// Register a custom attribute field. Re-registering updates label and type.
    pub fn register_attribute(
        &self,
        name: &str,
        label: Option<&str>,
        field_type: FieldType,
    ) -> Result<AttributeField> {
        if name.is_empty() {
            return Err(anyhow!("Attribute name cannot be empty"));
        }
        if name.len() > MAX_ATTRIBUTE_NAME_LEN {
            return Err(anyhow!(
                "Attribute name must be at most {} characters, got {}",
                MAX_ATTRIBUTE_NAME_LEN,
                name.len()
            ));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(anyhow!(
                "Attribute name '{}' may only contain letters, digits, '_' and '-'",
                name
            ));
        }

        let label = label.unwrap_or(name).to_string();
        let now = now_ms();

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO attribute_fields (name, label, field_type, registered_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(name) DO UPDATE SET label = excluded.label,
                                                 field_type = excluded.field_type",
                params![name, label, field_type.as_str(), now],
            )?;

            let registered_at: i64 = conn.query_row(
                "SELECT registered_at FROM attribute_fields WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )?;

            Ok(AttributeField {
                name: name.to_string(),
                label,
                field_type,
                registered_at,
            })
        })
    }

    /// List registered attribute fields in registration order.
    pub fn list_attributes(&self) -> Result<Vec<AttributeField>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT name, label, field_type, registered_at
                 FROM attribute_fields ORDER BY registered_at, name",
            )?;

            let fields = stmt
                .query_map([], |row| {
                    let field_type: String = row.get(2)?;
                    Ok(AttributeField {
                        name: row.get(0)?,
                        label: row.get(1)?,
                        field_type: FieldType::parse(&field_type).unwrap_or_default(),
                        registered_at: row.get(3)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(fields)
        })
    }

    /// Names of all registered attribute fields.
    pub fn attribute_names(&self) -> Result<Vec<String>> {
        Ok(self
            .list_attributes()?
            .into_iter()
            .map(|field| field.name)
            .collect())
    }

    /// Remove an attribute field and every stored value for it.
    pub fn unregister_attribute(&self, name: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM attribute_fields WHERE name = ?1",
                params![name],
            )?;
            Ok(removed > 0)
        })
    }
}
