//! Store operations

use crate::table::TableData;
use crate::vault::{storage_err, Vault};
use safepm_core::{deterministic_hash, Error, Result};
use safepm_storage_sqlite::StoreRecord;

/// Store operations over an unlocked vault
pub struct StoreManager<'a> {
    vault: &'a Vault,
}

impl<'a> StoreManager<'a> {
    /// Create manager
    pub fn new(vault: &'a Vault) -> Self {
        Self { vault }
    }

    fn store_by_name(&self, name: &str) -> Result<StoreRecord> {
        self.vault
            .repository()
            .store_by_hid(&deterministic_hash(name))
            .map_err(storage_err)?
            .ok_or_else(|| Error::StoreNotFound(name.to_string()))
    }

    /// Create a store.
    pub fn create(&self, name: &str) -> Result<()> {
        let hid = deterministic_hash(name);
        let encrypted_name = self.vault.encrypt(name)?;

        self.vault
            .repository()
            .insert_store(&hid, &encrypted_name)
            .map_err(|e| match e {
                safepm_storage_sqlite::Error::Duplicate(_) => {
                    Error::StoreExists(name.to_string())
                }
                other => storage_err(other),
            })?;

        tracing::debug!(db = %self.vault.db_name(), "store created");
        Ok(())
    }

    /// Rename a store. Both the lookup hash and the encrypted name change.
    pub fn rename(&self, old_name: &str, new_name: &str) -> Result<()> {
        let old_hid = deterministic_hash(old_name);
        let new_hid = deterministic_hash(new_name);
        let encrypted_name = self.vault.encrypt(new_name)?;

        self.vault
            .repository()
            .rename_store(&old_hid, &new_hid, &encrypted_name)
            .map_err(|e| match e {
                safepm_storage_sqlite::Error::NotFound(_) => {
                    Error::StoreNotFound(old_name.to_string())
                }
                safepm_storage_sqlite::Error::Duplicate(_) => {
                    Error::StoreExists(new_name.to_string())
                }
                other => storage_err(other),
            })?;

        Ok(())
    }

    /// Delete a store together with all of its accounts and their history.
    pub fn delete(&self, name: &str) -> Result<()> {
        let store = self.store_by_name(name)?;
        let store_id = store.id.ok_or_else(|| {
            Error::Database("store row is missing its id".to_string())
        })?;

        self.vault
            .repository()
            .delete_store(store_id)
            .map_err(|e| match e {
                safepm_storage_sqlite::Error::NotFound(_) => {
                    Error::StoreNotFound(name.to_string())
                }
                other => storage_err(other),
            })
    }

    /// List stores with decrypted names.
    pub fn list(&self) -> Result<TableData> {
        let records = self.vault.repository().list_stores().map_err(storage_err)?;

        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            rows.push(vec![self.vault.decrypt(&record.name)?, record.date_created]);
        }

        Ok(TableData::new(vec!["Store", "Created At"], rows))
    }
}
