//! Collaborators a sync job writes through.

use crate::db::Database;
use crate::types::{NewPilot, Pilot, PilotChanges};
use anyhow::Result;
use std::cell::RefCell;

/// Pilot storage used by sync jobs.
pub trait PilotStore {
    /// All pilots, in the order the store keeps them.
    fn pilots(&self) -> Result<Vec<Pilot>>;

    /// Names of registered custom attributes.
    fn attribute_names(&self) -> Result<Vec<String>>;

    fn add_pilot(&self, pilot: &NewPilot) -> Result<Pilot>;

    fn alter_pilot(&self, pilot_id: i64, changes: &PilotChanges) -> Result<()>;

    /// Read a settings option.
    fn option(&self, key: &str) -> Result<Option<String>>;
}

impl PilotStore for Database {
    fn pilots(&self) -> Result<Vec<Pilot>> {
        self.list_pilots()
    }

    fn attribute_names(&self) -> Result<Vec<String>> {
        Database::attribute_names(self)
    }

    fn add_pilot(&self, pilot: &NewPilot) -> Result<Pilot> {
        Database::add_pilot(self, pilot)
    }

    fn alter_pilot(&self, pilot_id: i64, changes: &PilotChanges) -> Result<()> {
        Database::alter_pilot(self, pilot_id, changes).map(|_| ())
    }

    fn option(&self, key: &str) -> Result<Option<String>> {
        Database::option(self, key)
    }
}

/// User-visible notifications.
pub trait Notifier {
    /// Show a message to the user.
    fn message_notify(&self, message: &str);

    /// Announce that the pilot list changed.
    fn broadcast_pilots(&self);
}

/// Prints messages to stdout and logs broadcasts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn message_notify(&self, message: &str) {
        println!("{}", message);
    }

    fn broadcast_pilots(&self) {
        tracing::info!("Pilot list changed");
    }
}

/// Something a [`MemoryNotifier`] was told.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Message(String),
    PilotsChanged,
}

/// Keeps every notification in order.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    events: RefCell<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Notification> {
        self.events.borrow().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Notification::Message(m) => Some(m.clone()),
                Notification::PilotsChanged => None,
            })
            .collect()
    }

    pub fn broadcast_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| **e == Notification::PilotsChanged)
            .count()
    }
}

impl Notifier for MemoryNotifier {
    fn message_notify(&self, message: &str) {
        self.events
            .borrow_mut()
            .push(Notification::Message(message.to_string()));
    }

    fn broadcast_pilots(&self) {
        self.events.borrow_mut().push(Notification::PilotsChanged);
    }
}
