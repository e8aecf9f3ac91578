//! Filesystem location resolution
//!
//! Resolves the config record and database directory once, up front; every
//! other component receives an explicit [`Paths`] value instead of reading
//! ambient location state.

use crate::{Error, Result};
use directories::{BaseDirs, ProjectDirs};
use std::fs;
use std::path::{Path, PathBuf};

/// Config record file name in the user's home directory
const CONFIG_FILE_NAME: &str = ".safe-pm.conf";

/// Resolved filesystem locations for one invocation
#[derive(Debug, Clone)]
pub struct Paths {
    config_file: PathBuf,
    data_dir: PathBuf,
}

impl Paths {
    /// Resolve the default locations for the current user.
    pub fn resolve() -> Result<Self> {
        let base = BaseDirs::new()
            .ok_or_else(|| Error::Path("Could not determine home directory".to_string()))?;
        let project = ProjectDirs::from("", "", "safe-pm")
            .ok_or_else(|| Error::Path("Could not determine data directory".to_string()))?;

        Ok(Self {
            config_file: base.home_dir().join(CONFIG_FILE_NAME),
            data_dir: project.data_dir().to_path_buf(),
        })
    }

    /// Create with explicit locations (tests, alternate roots).
    pub fn new(config_file: PathBuf, data_dir: PathBuf) -> Self {
        Self {
            config_file,
            data_dir,
        }
    }

    /// Path of the config record.
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Directory holding the database files.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of a named database file.
    pub fn database_path(&self, db_name: &str) -> PathBuf {
        self.data_dir.join(db_name)
    }

    /// Check whether a named database file exists.
    pub fn database_exists(&self, db_name: &str) -> bool {
        self.database_path(db_name).exists()
    }

    /// Ensure the data directory exists.
    pub fn ensure_data_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| Error::Path(format!("Could not create data directory: {}", e)))
    }

    /// Remove a named database file.
    pub fn remove_database(&self, db_name: &str) -> Result<()> {
        fs::remove_file(self.database_path(db_name))
            .map_err(|e| Error::Path(format!("Could not remove database file: {}", e)))
    }
}
