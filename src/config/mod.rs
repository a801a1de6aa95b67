//! Layered configuration.
//!
//! Tiers, lowest priority first, merged field by field:
//! 1. **Defaults** - built in
//! 2. **Project** - `$CWD/pilot-sync/config.yaml`
//! 3. **User** - `~/.pilot-sync/config.yaml`
//! 4. **Environment** - the variables below
//!
//! ## Environment Variables
//! - `PILOT_SYNC_CONFIG_PATH` - Explicit config file (replaces the file tiers)
//! - `PILOT_SYNC_DB_PATH` - Database path
//! - `PILOT_SYNC_SHEETS_DIR` - Directory holding sheet files
//! - `PILOT_SYNC_CREDENTIALS` - Credential file
//! - `PILOT_SYNC_SHEET_NAME` - Fallback sheet name
//! - `PILOT_SYNC_LOG_LEVEL` - debug, info, warning or error
//! - `PILOT_SYNC_USER_DIR` - User config dir (default: `~/.pilot-sync`)
//! - `PILOT_SYNC_PROJECT_DIR` - Project config dir (default: `./pilot-sync`)

mod loader;
mod merge;
mod types;

pub use loader::{ConfigLoader, ConfigPaths, ConfigTier, apply_env_overrides};
pub use merge::{deep_merge, deep_merge_all};
pub use types::*;
