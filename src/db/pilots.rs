//! Pilot CRUD operations.

use super::attributes::is_registered;
use super::{Database, now_ms};
use crate::types::{AttributeValue, NewPilot, Pilot, PilotChanges};
use anyhow::{Result, anyhow};
use rusqlite::{Connection, params};
use std::collections::BTreeMap;

fn load_attributes(conn: &Connection, pilot_id: i64) -> Result<BTreeMap<String, AttributeValue>> {
    let mut stmt =
        conn.prepare("SELECT name, value FROM pilot_attributes WHERE pilot_id = ?1 ORDER BY name")?;
    let attributes = stmt
        .query_map(params![pilot_id], |row| {
            let name: String = row.get(0)?;
            let value: String = row.get(1)?;
            Ok((name, AttributeValue::from_stored(&value)))
        })?
        .collect::<rusqlite::Result<BTreeMap<_, _>>>()?;
    Ok(attributes)
}

/// Internal helper to get a pilot using an existing connection (avoids deadlock).
fn get_pilot_internal(conn: &Connection, pilot_id: i64) -> Result<Option<Pilot>> {
    let result = conn.query_row(
        "SELECT id, name, callsign, phonetic, color, created_at, updated_at
         FROM pilots WHERE id = ?1",
        params![pilot_id],
        |row| {
            Ok(Pilot {
                id: row.get(0)?,
                name: row.get(1)?,
                callsign: row.get(2)?,
                phonetic: row.get(3)?,
                color: row.get(4)?,
                attributes: BTreeMap::new(),
                created_at: row.get(5)?,
                updated_at: row.get(6)?,
            })
        },
    );

    match result {
        Ok(mut pilot) => {
            pilot.attributes = load_attributes(conn, pilot.id)?;
            Ok(Some(pilot))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Database {
    /// Create a pilot. Name and callsign must be non-empty.
    pub fn add_pilot(&self, pilot: &NewPilot) -> Result<Pilot> {
        if pilot.name.is_empty() {
            return Err(anyhow!("Pilot name cannot be empty"));
        }
        if pilot.callsign.is_empty() {
            return Err(anyhow!("Pilot callsign cannot be empty"));
        }

        let now = now_ms();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO pilots (name, callsign, phonetic, color, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![pilot.name, pilot.callsign, pilot.phonetic, pilot.color, now, now],
            )?;

            Ok(Pilot {
                id: conn.last_insert_rowid(),
                name: pilot.name.clone(),
                callsign: pilot.callsign.clone(),
                phonetic: pilot.phonetic.clone(),
                color: pilot.color.clone(),
                attributes: BTreeMap::new(),
                created_at: now,
                updated_at: now,
            })
        })
    }

    /// Get a pilot by ID.
    pub fn get_pilot(&self, pilot_id: i64) -> Result<Option<Pilot>> {
        self.with_conn(|conn| get_pilot_internal(conn, pilot_id))
    }

    /// Get a pilot by ID. Returns error if not found.
    pub fn require_pilot(&self, pilot_id: i64) -> Result<Pilot> {
        self.get_pilot(pilot_id)?
            .ok_or_else(|| anyhow!("Pilot {} not found", pilot_id))
    }

    /// List all pilots in creation order, with their attributes.
    pub fn list_pilots(&self) -> Result<Vec<Pilot>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, callsign, phonetic, color, created_at, updated_at
                 FROM pilots ORDER BY id",
            )?;
            let mut pilots = stmt
                .query_map([], |row| {
                    Ok(Pilot {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        callsign: row.get(2)?,
                        phonetic: row.get(3)?,
                        color: row.get(4)?,
                        attributes: BTreeMap::new(),
                        created_at: row.get(5)?,
                        updated_at: row.get(6)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            let mut stmt = conn.prepare(
                "SELECT pilot_id, name, value FROM pilot_attributes ORDER BY pilot_id, name",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?;

            let mut by_pilot: BTreeMap<i64, BTreeMap<String, AttributeValue>> = BTreeMap::new();
            for row in rows {
                let (pilot_id, name, value) = row?;
                by_pilot
                    .entry(pilot_id)
                    .or_default()
                    .insert(name, AttributeValue::from_stored(&value));
            }
            for pilot in &mut pilots {
                if let Some(attributes) = by_pilot.remove(&pilot.id) {
                    pilot.attributes = attributes;
                }
            }

            Ok(pilots)
        })
    }

    /// Apply a partial update to a pilot.
    ///
    /// Every attribute named in `changes` must be registered; otherwise nothing
    /// is written and an error is returned.
    pub fn alter_pilot(&self, pilot_id: i64, changes: &PilotChanges) -> Result<Pilot> {
        if changes.callsign.as_deref() == Some("") {
            return Err(anyhow!("Pilot callsign cannot be empty"));
        }

        let now = now_ms();
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            for name in changes.attributes.keys() {
                if !is_registered(&tx, name)? {
                    return Err(anyhow!("Attribute '{}' is not registered", name));
                }
            }

            let updated = tx.execute(
                "UPDATE pilots SET callsign = COALESCE(?2, callsign),
                                   phonetic = COALESCE(?3, phonetic),
                                   color = COALESCE(?4, color),
                                   updated_at = ?5
                 WHERE id = ?1",
                params![pilot_id, changes.callsign, changes.phonetic, changes.color, now],
            )?;
            if updated == 0 {
                return Err(anyhow!("Pilot {} not found", pilot_id));
            }

            for (name, value) in &changes.attributes {
                tx.execute(
                    "INSERT INTO pilot_attributes (pilot_id, name, value) VALUES (?1, ?2, ?3)
                     ON CONFLICT(pilot_id, name) DO UPDATE SET value = excluded.value",
                    params![pilot_id, name, value.to_stored()],
                )?;
            }

            let pilot = get_pilot_internal(&tx, pilot_id)?
                .ok_or_else(|| anyhow!("Pilot {} not found", pilot_id))?;
            tx.commit()?;
            Ok(pilot)
        })
    }

    /// Delete a pilot and its attributes.
    pub fn delete_pilot(&self, pilot_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM pilots WHERE id = ?1", params![pilot_id])?;
            Ok(removed > 0)
        })
    }
}
