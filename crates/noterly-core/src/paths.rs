//! Local filesystem paths for the note store.

use std::path::PathBuf;

/// Build the default local database path.
#[must_use]
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::data_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("noterly")
        .join("noterly.db")
}
