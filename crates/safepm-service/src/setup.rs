//! Database setup

use crate::vault::storage_err;
use safepm_core::{config, Error, MasterCredential, Paths, Result};
use safepm_storage_sqlite::Database;

/// Creates new databases and their config entries
pub struct SetupManager<'a> {
    paths: &'a Paths,
}

impl<'a> SetupManager<'a> {
    /// Create manager
    pub fn new(paths: &'a Paths) -> Self {
        Self { paths }
    }

    /// Create a new database file with its schema and register its master
    /// credential in the config record.
    ///
    /// If the config write fails after the file was created, the file is
    /// removed so no unreachable database is left behind.
    pub fn create_database(&self, db_name: &str, master_password: &str) -> Result<()> {
        if db_name.is_empty() {
            return Err(Error::Database("Database name cannot be empty".to_string()));
        }

        let credential = MasterCredential::generate(master_password)?;

        if self.paths.database_exists(db_name) {
            return Err(Error::DatabaseExists(db_name.to_string()));
        }

        self.paths.ensure_data_dir()?;
        Database::open(self.paths.database_path(db_name)).map_err(storage_err)?;

        if let Err(e) = config::update_entry(
            self.paths.config_file(),
            db_name,
            &credential.hash,
            &credential.salt,
        ) {
            let _ = self.paths.remove_database(db_name);
            return Err(e);
        }

        tracing::debug!(db = %db_name, "database created");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use safepm_core::Paths;
    use tempfile::tempdir;

    #[test]
    fn test_create_database() {
        let dir = tempdir().unwrap();
        let paths = Paths::new(dir.path().join("conf"), dir.path().join("db"));

        SetupManager::new(&paths)
            .create_database("vault", "Master1!")
            .unwrap();

        assert!(paths.database_exists("vault"));
        assert!(config::lookup_entry(paths.config_file(), "vault")
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_existing_database_rejected() {
        let dir = tempdir().unwrap();
        let paths = Paths::new(dir.path().join("conf"), dir.path().join("db"));
        let manager = SetupManager::new(&paths);

        manager.create_database("vault", "Master1!").unwrap();
        assert!(matches!(
            manager.create_database("vault", "Master1!"),
            Err(Error::DatabaseExists(_))
        ));
    }

    #[test]
    fn test_empty_master_password_rejected() {
        let dir = tempdir().unwrap();
        let paths = Paths::new(dir.path().join("conf"), dir.path().join("db"));

        let result = SetupManager::new(&paths).create_database("vault", "");
        assert!(matches!(result, Err(Error::Crypto(_))));
        assert!(!paths.database_exists("vault"));
    }
}
