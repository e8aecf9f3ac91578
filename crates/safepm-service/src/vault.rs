//! Vault session
//!
//! One unlocked database for the duration of one operation: the master
//! password is verified against the config record, the session key is
//! derived, and the database is opened. The key lives only as long as the
//! `Vault` value.

use safepm_core::{
    config, decrypt_field, encrypt_field, Error, MasterCredential, Paths, Result, SessionKey,
};
use safepm_storage_sqlite::{Database, Repository};

/// Map a storage-layer failure that carries no domain context.
pub(crate) fn storage_err(err: safepm_storage_sqlite::Error) -> Error {
    Error::Database(err.to_string())
}

/// An unlocked database session
pub struct Vault {
    db_name: String,
    key: SessionKey,
    db: Database,
}

impl Vault {
    /// Verify the master password and open the named database.
    ///
    /// A missing config entry or database file reports the database as not
    /// found; a credential mismatch is the recoverable
    /// [`Error::PasswordIncorrect`] outcome, never a crash.
    pub fn open(paths: &Paths, db_name: &str, master_password: &str) -> Result<Self> {
        let entry = config::lookup_entry(paths.config_file(), db_name)?
            .ok_or_else(|| Error::DatabaseNotFound(db_name.to_string()))?;

        if !MasterCredential::verify(master_password, &entry.hash, &entry.salt)? {
            return Err(Error::PasswordIncorrect);
        }

        if !paths.database_exists(db_name) {
            return Err(Error::DatabaseNotFound(db_name.to_string()));
        }

        let key = SessionKey::derive(master_password)?;
        let db = Database::open(paths.database_path(db_name)).map_err(storage_err)?;

        tracing::debug!(db = %db_name, "vault unlocked");

        Ok(Self {
            db_name: db_name.to_string(),
            key,
            db,
        })
    }

    /// Name of the open database.
    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    /// Repository over the open database.
    pub(crate) fn repository(&self) -> Repository<'_> {
        Repository::new(&self.db)
    }

    /// Encrypt one field under the session key.
    pub(crate) fn encrypt(&self, plaintext: &str) -> Result<String> {
        encrypt_field(plaintext, &self.key)
    }

    /// Decrypt one field under the session key.
    pub(crate) fn decrypt(&self, token: &str) -> Result<String> {
        decrypt_field(token, &self.key)
    }
}
