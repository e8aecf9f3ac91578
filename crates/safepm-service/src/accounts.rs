//! Account operations

use crate::table::TableData;
use crate::vault::{storage_err, Vault};
use safepm_core::quality::{
    find_nearest, generate_password, strength_score, GeneratorOptions,
    SIMILARITY_WARNING_DISTANCE,
};
use safepm_core::{deterministic_hash, Error, Result};
use safepm_storage_sqlite::{AccountRecord, StoreRecord};
use zeroize::Zeroizing;

/// How the password for a create/update operation is chosen
pub enum NewPassword {
    /// Manually entered password, subject to quality assessment
    Manual(Zeroizing<String>),
    /// Randomly generated password
    Generated(GeneratorOptions),
}

/// Quality assessment of a manually chosen password
#[derive(Debug, Clone)]
pub struct PasswordAssessment {
    /// Strength score in [0, 1]
    pub strength: f64,
    /// Nearest dictionary entry and its distance, when a dictionary was given
    pub nearest: Option<(String, u32)>,
}

impl PasswordAssessment {
    /// Whether the nearest dictionary entry is close enough to warn about.
    /// Warnings never block the operation.
    pub fn similarity_warning(&self) -> Option<(&str, u32)> {
        match &self.nearest {
            Some((entry, distance)) if *distance < SIMILARITY_WARNING_DISTANCE => {
                Some((entry.as_str(), *distance))
            }
            _ => None,
        }
    }
}

/// A decrypted credential field for the clipboard sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialField {
    /// Account username
    Username,
    /// Account email
    Email,
    /// Current password
    Password,
}

/// Account operations over an unlocked vault
pub struct AccountManager<'a> {
    vault: &'a Vault,
}

impl<'a> AccountManager<'a> {
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

    fn account_in_store(&self, store: &StoreRecord, name: &str) -> Result<AccountRecord> {
        let store_id = store
            .id
            .ok_or_else(|| Error::Database("store row is missing its id".to_string()))?;

        self.vault
            .repository()
            .account_by_hid(store_id, &deterministic_hash(name))
            .map_err(storage_err)?
            .ok_or_else(|| Error::AccountNotFound(name.to_string()))
    }

    /// Resolve the password to set, assessing manual choices against the
    /// quality engine and the dictionary.
    fn resolve_password(
        &self,
        password: NewPassword,
        dictionary: Option<&[String]>,
    ) -> Result<(Zeroizing<String>, Option<PasswordAssessment>)> {
        match password {
            NewPassword::Manual(value) => {
                let assessment = PasswordAssessment {
                    strength: strength_score(&value),
                    nearest: dictionary.and_then(|entries| {
                        find_nearest(&value, entries)
                            .map(|(entry, distance)| (entry.to_string(), distance))
                    }),
                };
                Ok((value, Some(assessment)))
            }
            NewPassword::Generated(opts) => {
                let value = Zeroizing::new(generate_password(&opts)?);
                Ok((value, None))
            }
        }
    }

    /// Create an account with its first password version.
    ///
    /// Returns the quality assessment for manually entered passwords so the
    /// caller can warn; generated passwords are not assessed.
    pub fn create(
        &self,
        store_name: &str,
        account_name: &str,
        username: &str,
        email: &str,
        password: NewPassword,
        dictionary: Option<&[String]>,
    ) -> Result<Option<PasswordAssessment>> {
        let store = self.store_by_name(store_name)?;
        let store_id = store
            .id
            .ok_or_else(|| Error::Database("store row is missing its id".to_string()))?;

        let (selected, assessment) = self.resolve_password(password, dictionary)?;

        let record = AccountRecord {
            id: None,
            hid: deterministic_hash(account_name),
            name: self.vault.encrypt(account_name)?,
            username: self.vault.encrypt(username)?,
            email: self.vault.encrypt(email)?,
            store_id,
            date_created: String::new(),
        };
        let encrypted_password = self.vault.encrypt(&selected)?;

        self.vault
            .repository()
            .insert_account_with_password(&record, &encrypted_password)
            .map_err(|e| match e {
                safepm_storage_sqlite::Error::Duplicate(_) => {
                    Error::AccountExists(account_name.to_string())
                }
                other => storage_err(other),
            })?;

        tracing::debug!(db = %self.vault.db_name(), "account created");
        Ok(assessment)
    }

    /// View one account with its decrypted fields and current password.
    pub fn view(&self, store_name: &str, account_name: &str) -> Result<TableData> {
        let store = self.store_by_name(store_name)?;
        let account = self.account_in_store(&store, account_name)?;
        let account_id = account
            .id
            .ok_or_else(|| Error::Database("account row is missing its id".to_string()))?;

        let current = self
            .vault
            .repository()
            .current_password(account_id)
            .map_err(storage_err)?
            .ok_or_else(|| Error::Database("account has no password history".to_string()))?;

        let row = vec![
            self.vault.decrypt(&account.name)?,
            self.vault.decrypt(&account.username)?,
            self.vault.decrypt(&account.email)?,
            self.vault.decrypt(&current.password)?,
            account.date_created,
        ];

        Ok(TableData::new(
            vec!["Name", "Username", "Email", "Password", "Created At"],
            vec![row],
        ))
    }

    /// List the accounts of a store (without passwords).
    pub fn list(&self, store_name: &str) -> Result<TableData> {
        let store = self.store_by_name(store_name)?;
        let store_id = store
            .id
            .ok_or_else(|| Error::Database("store row is missing its id".to_string()))?;

        let records = self
            .vault
            .repository()
            .list_accounts(store_id)
            .map_err(storage_err)?;

        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            rows.push(vec![
                self.vault.decrypt(&record.name)?,
                self.vault.decrypt(&record.username)?,
                self.vault.decrypt(&record.email)?,
                record.date_created,
            ]);
        }

        Ok(TableData::new(
            vec!["Name", "Username", "Email", "Created At"],
            rows,
        ))
    }

    /// Set a new password for an account by appending a version row.
    pub fn update_password(
        &self,
        store_name: &str,
        account_name: &str,
        password: NewPassword,
        dictionary: Option<&[String]>,
    ) -> Result<Option<PasswordAssessment>> {
        let store = self.store_by_name(store_name)?;
        let account = self.account_in_store(&store, account_name)?;
        let account_id = account
            .id
            .ok_or_else(|| Error::Database("account row is missing its id".to_string()))?;

        let (selected, assessment) = self.resolve_password(password, dictionary)?;
        let encrypted_password = self.vault.encrypt(&selected)?;

        self.vault
            .repository()
            .append_password(account_id, &encrypted_password)
            .map_err(storage_err)?;

        Ok(assessment)
    }

    /// Delete an account and its whole password history.
    pub fn delete(&self, store_name: &str, account_name: &str) -> Result<()> {
        let store = self.store_by_name(store_name)?;
        let account = self.account_in_store(&store, account_name)?;
        let account_id = account
            .id
            .ok_or_else(|| Error::Database("account row is missing its id".to_string()))?;

        self.vault
            .repository()
            .delete_account(account_id)
            .map_err(|e| match e {
                safepm_storage_sqlite::Error::NotFound(_) => {
                    Error::AccountNotFound(account_name.to_string())
                }
                other => storage_err(other),
            })
    }

    /// List the full password history of an account, newest first.
    pub fn history(&self, store_name: &str, account_name: &str) -> Result<TableData> {
        let store = self.store_by_name(store_name)?;
        let account = self.account_in_store(&store, account_name)?;
        let account_id = account
            .id
            .ok_or_else(|| Error::Database("account row is missing its id".to_string()))?;

        let records = self
            .vault
            .repository()
            .list_passwords(account_id)
            .map_err(storage_err)?;

        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            rows.push(vec![
                self.vault.decrypt(&record.password)?,
                record.date_created,
            ]);
        }

        Ok(TableData::new(vec!["Password", "Created At"], rows))
    }

    /// Decrypt one field for the clipboard sink.
    pub fn copy_field(
        &self,
        store_name: &str,
        account_name: &str,
        field: CredentialField,
    ) -> Result<Zeroizing<String>> {
        let store = self.store_by_name(store_name)?;
        let account = self.account_in_store(&store, account_name)?;

        let token = match field {
            CredentialField::Username => account.username.clone(),
            CredentialField::Email => account.email.clone(),
            CredentialField::Password => {
                let account_id = account.id.ok_or_else(|| {
                    Error::Database("account row is missing its id".to_string())
                })?;
                self.vault
                    .repository()
                    .current_password(account_id)
                    .map_err(storage_err)?
                    .ok_or_else(|| {
                        Error::Database("account has no password history".to_string())
                    })?
                    .password
            }
        };

        Ok(Zeroizing::new(self.vault.decrypt(&token)?))
    }
}
