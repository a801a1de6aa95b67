//! Pilot sheet sync library
//!
//! Imports and refreshes race pilots from a spreadsheet into a SQLite timing
//! database. The binary is a thin CLI over [`sync::SyncJob`].

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod logging;
pub mod source;
pub mod sync;
pub mod types;
