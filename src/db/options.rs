//! Named settings stored alongside the pilots.

use super::{Database, now_ms};
use anyhow::Result;
use rusqlite::params;

/// Option key holding the name of the sheet to sync from.
pub const SHEET_NAME_OPTION: &str = "sheet_name";

impl Database {
    /// Read an option. Unset and empty values both come back as `None`.
    pub fn option(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            let result = conn.query_row(
                "SELECT value FROM options WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            );

            match result {
                Ok(value) if value.is_empty() => Ok(None),
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn set_option(&self, key: &str, value: &str) -> Result<()> {
        let now = now_ms();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO options (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                                updated_at = excluded.updated_at",
                params![key, value, now],
            )?;
            Ok(())
        })
    }

    /// Remove an option. Returns whether it was set.
    pub fn clear_option(&self, key: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM options WHERE key = ?1", params![key])?;
            Ok(removed > 0)
        })
    }
}
