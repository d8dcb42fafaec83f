//! Storage location and file layout.

use crate::error::{LedgerError, Result};
use log::debug;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// Environment variable naming the storage root.
pub const DATA_DIR_ENV: &str = "SALES_DATA_DIR";

/// Storage root used when nothing else is configured.
pub const DEFAULT_DATA_DIR: &str = "data";

const USERS_FILE: &str = "users.txt";
const SALES_FILE_PREFIX: &str = "sales_";
const SALES_FILE_SUFFIX: &str = ".txt";

/// Where the ledger keeps its files.
///
/// Layout under `root`:
///
/// - `users.txt`: one account per line
/// - `sales_<username>.txt`: one transaction per line, per user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    root: PathBuf,
}

impl StoreConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        StoreConfig { root: root.into() }
    }

    /// Reads the root from `SALES_DATA_DIR`, falling back to `./data`.
    pub fn from_env() -> Self {
        let root = std::env::var(DATA_DIR_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn users_path(&self) -> PathBuf {
        self.root.join(USERS_FILE)
    }

    /// Path of the record file for `username`.
    ///
    /// Rejects names that would resolve outside the storage root.
    pub fn sales_path(&self, username: &str) -> Result<PathBuf> {
        if !is_safe_file_component(username) {
            return Err(LedgerError::InvalidUsername(username.to_string()));
        }
        Ok(self
            .root
            .join(format!("{SALES_FILE_PREFIX}{username}{SALES_FILE_SUFFIX}")))
    }

    /// Creates the storage root and an empty users file if they are missing.
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.users_path())?;
        debug!("Initialized storage at {}", self.root.display());
        Ok(())
    }
}

fn is_safe_file_component(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '\0'])
}
