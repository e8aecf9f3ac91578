//! Data access layer
//!
//! All lookups go through `hid` (the deterministic name hash); all multi-row
//! mutations run inside one IMMEDIATE transaction and insert a change-counter
//! row before committing.

use crate::models::{AccountRecord, PasswordRecord, StoreRecord};
use crate::{Database, Error, Result};
use rusqlite::{params, Connection, OptionalExtension};

/// Repository for database operations
pub struct Repository<'a> {
    db: &'a Database,
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn bump_version(conn: &Connection) -> Result<()> {
    conn.execute("INSERT INTO version DEFAULT VALUES", [])?;
    Ok(())
}

impl<'a> Repository<'a> {
    /// Create repository
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Run a closure inside one IMMEDIATE transaction, rolling back on error.
    fn in_transaction<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.db.conn();
        conn.execute_batch("BEGIN IMMEDIATE")?;

        match f(conn) {
            Ok(value) => {
                conn.execute_batch("COMMIT")?;
                Ok(value)
            }
            Err(e) => {
                let _ = conn.execute_batch("ROLLBACK");
                Err(e)
            }
        }
    }

    /// Look up a store by its name hash.
    pub fn store_by_hid(&self, hid: &str) -> Result<Option<StoreRecord>> {
        let record = self
            .db
            .conn()
            .query_row(
                "SELECT id, hid, name, date_created FROM store WHERE hid = ?1",
                params![hid],
                |row| {
                    Ok(StoreRecord {
                        id: Some(row.get(0)?),
                        hid: row.get(1)?,
                        name: row.get(2)?,
                        date_created: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(record)
    }

    /// Insert a store. A duplicate name hash maps to `Duplicate`.
    pub fn insert_store(&self, hid: &str, encrypted_name: &str) -> Result<i64> {
        if hid.is_empty() || encrypted_name.is_empty() {
            return Err(Error::Validation(
                "Store hash and encrypted name cannot be empty".to_string(),
            ));
        }

        self.in_transaction(|conn| {
            conn.execute(
                "INSERT INTO store (hid, name, date_created) VALUES (?1, ?2, ?3)",
                params![hid, encrypted_name, now_rfc3339()],
            )
            .map_err(|e| {
                if Error::is_unique_violation(&e) {
                    Error::Duplicate("store name hash already present".to_string())
                } else {
                    Error::from(e)
                }
            })?;

            let id = conn.last_insert_rowid();
            bump_version(conn)?;
            Ok(id)
        })
    }

    /// Rename a store: both the name hash and the encrypted name change.
    pub fn rename_store(&self, old_hid: &str, new_hid: &str, encrypted_name: &str) -> Result<()> {
        self.in_transaction(|conn| {
            let rows = conn
                .execute(
                    "UPDATE store SET hid = ?1, name = ?2 WHERE hid = ?3",
                    params![new_hid, encrypted_name, old_hid],
                )
                .map_err(|e| {
                    if Error::is_unique_violation(&e) {
                        Error::Duplicate("store name hash already present".to_string())
                    } else {
                        Error::from(e)
                    }
                })?;

            if rows == 0 {
                return Err(Error::NotFound("store".to_string()));
            }
            bump_version(conn)?;
            Ok(())
        })
    }

    /// Delete a store together with its accounts and their password history.
    pub fn delete_store(&self, store_id: i64) -> Result<()> {
        self.in_transaction(|conn| {
            conn.execute(
                "DELETE FROM password WHERE account_id IN (SELECT id FROM account WHERE store_id = ?1)",
                params![store_id],
            )?;
            conn.execute("DELETE FROM account WHERE store_id = ?1", params![store_id])?;
            let rows = conn.execute("DELETE FROM store WHERE id = ?1", params![store_id])?;

            if rows == 0 {
                return Err(Error::NotFound("store".to_string()));
            }
            bump_version(conn)?;
            Ok(())
        })
    }

    /// List all stores in insertion order.
    pub fn list_stores(&self) -> Result<Vec<StoreRecord>> {
        let mut stmt = self
            .db
            .conn()
            .prepare("SELECT id, hid, name, date_created FROM store ORDER BY id")?;

        let records = stmt
            .query_map([], |row| {
                Ok(StoreRecord {
                    id: Some(row.get(0)?),
                    hid: row.get(1)?,
                    name: row.get(2)?,
                    date_created: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Insert an account together with its first password version, atomically.
    pub fn insert_account_with_password(
        &self,
        account: &AccountRecord,
        encrypted_password: &str,
    ) -> Result<i64> {
        if account.hid.is_empty() || account.name.is_empty() || encrypted_password.is_empty() {
            return Err(Error::Validation(
                "Account hash, encrypted name, and password cannot be empty".to_string(),
            ));
        }

        self.in_transaction(|conn| {
            let created = now_rfc3339();
            conn.execute(
                "INSERT INTO account (hid, name, username, email, store_id, date_created)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    account.hid,
                    account.name,
                    account.username,
                    account.email,
                    account.store_id,
                    created,
                ],
            )
            .map_err(|e| {
                if Error::is_unique_violation(&e) {
                    Error::Duplicate("account name hash already present".to_string())
                } else {
                    Error::from(e)
                }
            })?;

            let account_id = conn.last_insert_rowid();
            conn.execute(
                "INSERT INTO password (account_id, password, date_created) VALUES (?1, ?2, ?3)",
                params![account_id, encrypted_password, created],
            )?;

            bump_version(conn)?;
            Ok(account_id)
        })
    }

    /// Look up an account by name hash within a store.
    pub fn account_by_hid(&self, store_id: i64, hid: &str) -> Result<Option<AccountRecord>> {
        let record = self
            .db
            .conn()
            .query_row(
                "SELECT id, hid, name, username, email, store_id, date_created
                 FROM account WHERE store_id = ?1 AND hid = ?2",
                params![store_id, hid],
                |row| {
                    Ok(AccountRecord {
                        id: Some(row.get(0)?),
                        hid: row.get(1)?,
                        name: row.get(2)?,
                        username: row.get(3)?,
                        email: row.get(4)?,
                        store_id: row.get(5)?,
                        date_created: row.get(6)?,
                    })
                },
            )
            .optional()?;

        Ok(record)
    }

    /// List all accounts in a store in insertion order.
    pub fn list_accounts(&self, store_id: i64) -> Result<Vec<AccountRecord>> {
        let mut stmt = self.db.conn().prepare(
            "SELECT id, hid, name, username, email, store_id, date_created
             FROM account WHERE store_id = ?1 ORDER BY id",
        )?;

        let records = stmt
            .query_map(params![store_id], |row| {
                Ok(AccountRecord {
                    id: Some(row.get(0)?),
                    hid: row.get(1)?,
                    name: row.get(2)?,
                    username: row.get(3)?,
                    email: row.get(4)?,
                    store_id: row.get(5)?,
                    date_created: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Delete an account and its whole password history, atomically.
    pub fn delete_account(&self, account_id: i64) -> Result<()> {
        self.in_transaction(|conn| {
            conn.execute(
                "DELETE FROM password WHERE account_id = ?1",
                params![account_id],
            )?;
            let rows = conn.execute("DELETE FROM account WHERE id = ?1", params![account_id])?;

            if rows == 0 {
                return Err(Error::NotFound("account".to_string()));
            }
            bump_version(conn)?;
            Ok(())
        })
    }

    /// Append a new password version for an account.
    pub fn append_password(&self, account_id: i64, encrypted_password: &str) -> Result<i64> {
        self.in_transaction(|conn| {
            conn.execute(
                "INSERT INTO password (account_id, password, date_created) VALUES (?1, ?2, ?3)",
                params![account_id, encrypted_password, now_rfc3339()],
            )?;

            let id = conn.last_insert_rowid();
            bump_version(conn)?;
            Ok(id)
        })
    }

    /// List password versions for an account, newest first. Timestamp ties
    /// break on the higher insertion id.
    pub fn list_passwords(&self, account_id: i64) -> Result<Vec<PasswordRecord>> {
        let mut stmt = self.db.conn().prepare(
            "SELECT id, account_id, password, date_created
             FROM password WHERE account_id = ?1
             ORDER BY date_created DESC, id DESC",
        )?;

        let records = stmt
            .query_map(params![account_id], |row| {
                Ok(PasswordRecord {
                    id: Some(row.get(0)?),
                    account_id: row.get(1)?,
                    password: row.get(2)?,
                    date_created: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Get the current (newest) password version for an account.
    pub fn current_password(&self, account_id: i64) -> Result<Option<PasswordRecord>> {
        let record = self
            .db
            .conn()
            .query_row(
                "SELECT id, account_id, password, date_created
                 FROM password WHERE account_id = ?1
                 ORDER BY date_created DESC, id DESC LIMIT 1",
                params![account_id],
                |row| {
                    Ok(PasswordRecord {
                        id: Some(row.get(0)?),
                        account_id: row.get(1)?,
                        password: row.get(2)?,
                        date_created: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(record)
    }

    /// Read the change counter (highest version row).
    pub fn change_counter(&self) -> Result<i64> {
        let counter: i64 = self.db.conn().query_row(
            "SELECT COALESCE(MAX(version), 0) FROM version",
            [],
            |row| row.get(0),
        )?;
        Ok(counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn open_test_db(file: &NamedTempFile) -> Database {
        Database::open(file.path()).unwrap()
    }

    fn sample_account(store_id: i64, hid: &str) -> AccountRecord {
        AccountRecord {
            id: None,
            hid: hid.to_string(),
            name: format!("enc-name-{hid}"),
            username: "enc-user".to_string(),
            email: "enc-email".to_string(),
            store_id,
            date_created: String::new(),
        }
    }

    #[test]
    fn test_store_crud() {
        let file = NamedTempFile::new().unwrap();
        let db = open_test_db(&file);
        let repo = Repository::new(&db);

        assert!(repo.store_by_hid("h1").unwrap().is_none());

        let id = repo.insert_store("h1", "enc-work").unwrap();
        let store = repo.store_by_hid("h1").unwrap().unwrap();
        assert_eq!(store.id, Some(id));
        assert_eq!(store.name, "enc-work");

        repo.rename_store("h1", "h2", "enc-office").unwrap();
        assert!(repo.store_by_hid("h1").unwrap().is_none());
        assert_eq!(repo.store_by_hid("h2").unwrap().unwrap().name, "enc-office");

        repo.delete_store(id).unwrap();
        assert!(repo.store_by_hid("h2").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_store_hid_rejected() {
        let file = NamedTempFile::new().unwrap();
        let db = open_test_db(&file);
        let repo = Repository::new(&db);

        repo.insert_store("h1", "enc-a").unwrap();
        assert!(matches!(
            repo.insert_store("h1", "enc-b"),
            Err(Error::Duplicate(_))
        ));
    }

    #[test]
    fn test_empty_identifiers_rejected() {
        let file = NamedTempFile::new().unwrap();
        let db = open_test_db(&file);
        let repo = Repository::new(&db);

        assert!(matches!(
            repo.insert_store("", "enc"),
            Err(Error::Validation(_))
        ));

        let store_id = repo.insert_store("s1", "enc-store").unwrap();
        let mut account = sample_account(store_id, "a1");
        account.hid = String::new();
        assert!(matches!(
            repo.insert_account_with_password(&account, "enc-pw"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_rename_missing_store_is_not_found() {
        let file = NamedTempFile::new().unwrap();
        let db = open_test_db(&file);
        let repo = Repository::new(&db);

        assert!(matches!(
            repo.rename_store("absent", "h2", "enc"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_account_create_is_atomic_with_first_password() {
        let file = NamedTempFile::new().unwrap();
        let db = open_test_db(&file);
        let repo = Repository::new(&db);

        let store_id = repo.insert_store("s1", "enc-store").unwrap();
        let account_id = repo
            .insert_account_with_password(&sample_account(store_id, "a1"), "enc-pw-1")
            .unwrap();

        let history = repo.list_passwords(account_id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].password, "enc-pw-1");
    }

    #[test]
    fn test_duplicate_account_leaves_no_partial_rows() {
        let file = NamedTempFile::new().unwrap();
        let db = open_test_db(&file);
        let repo = Repository::new(&db);

        let store_id = repo.insert_store("s1", "enc-store").unwrap();
        repo.insert_account_with_password(&sample_account(store_id, "a1"), "enc-pw")
            .unwrap();

        let counter_before = repo.change_counter().unwrap();
        let result =
            repo.insert_account_with_password(&sample_account(store_id, "a1"), "enc-pw-2");
        assert!(matches!(result, Err(Error::Duplicate(_))));

        // Nothing committed: one account, one password row, no counter bump.
        assert_eq!(repo.list_accounts(store_id).unwrap().len(), 1);
        assert_eq!(repo.change_counter().unwrap(), counter_before);
    }

    #[test]
    fn test_password_history_newest_first() {
        let file = NamedTempFile::new().unwrap();
        let db = open_test_db(&file);
        let repo = Repository::new(&db);

        let store_id = repo.insert_store("s1", "enc-store").unwrap();
        let account_id = repo
            .insert_account_with_password(&sample_account(store_id, "a1"), "enc-pw-1")
            .unwrap();
        repo.append_password(account_id, "enc-pw-2").unwrap();
        repo.append_password(account_id, "enc-pw-3").unwrap();

        let history = repo.list_passwords(account_id).unwrap();
        let values: Vec<&str> = history.iter().map(|r| r.password.as_str()).collect();
        assert_eq!(values, vec!["enc-pw-3", "enc-pw-2", "enc-pw-1"]);

        let current = repo.current_password(account_id).unwrap().unwrap();
        assert_eq!(current.password, "enc-pw-3");
    }

    #[test]
    fn test_delete_account_cascades_history() {
        let file = NamedTempFile::new().unwrap();
        let db = open_test_db(&file);
        let repo = Repository::new(&db);

        let store_id = repo.insert_store("s1", "enc-store").unwrap();
        let account_id = repo
            .insert_account_with_password(&sample_account(store_id, "a1"), "enc-pw-1")
            .unwrap();
        repo.append_password(account_id, "enc-pw-2").unwrap();

        repo.delete_account(account_id).unwrap();

        assert!(repo.account_by_hid(store_id, "a1").unwrap().is_none());
        assert!(repo.list_passwords(account_id).unwrap().is_empty());
    }

    #[test]
    fn test_delete_store_cascades_accounts_and_passwords() {
        let file = NamedTempFile::new().unwrap();
        let db = open_test_db(&file);
        let repo = Repository::new(&db);

        let store_id = repo.insert_store("s1", "enc-store").unwrap();
        let a1 = repo
            .insert_account_with_password(&sample_account(store_id, "a1"), "enc-pw")
            .unwrap();
        let a2 = repo
            .insert_account_with_password(&sample_account(store_id, "a2"), "enc-pw")
            .unwrap();

        repo.delete_store(store_id).unwrap();

        assert!(repo.store_by_hid("s1").unwrap().is_none());
        assert!(repo.list_passwords(a1).unwrap().is_empty());
        assert!(repo.list_passwords(a2).unwrap().is_empty());
    }

    #[test]
    fn test_change_counter_bumps_on_every_mutation() {
        let file = NamedTempFile::new().unwrap();
        let db = open_test_db(&file);
        let repo = Repository::new(&db);

        assert_eq!(repo.change_counter().unwrap(), 0);

        let store_id = repo.insert_store("s1", "enc-store").unwrap();
        assert_eq!(repo.change_counter().unwrap(), 1);

        let account_id = repo
            .insert_account_with_password(&sample_account(store_id, "a1"), "enc-pw")
            .unwrap();
        assert_eq!(repo.change_counter().unwrap(), 2);

        repo.append_password(account_id, "enc-pw-2").unwrap();
        assert_eq!(repo.change_counter().unwrap(), 3);

        repo.delete_account(account_id).unwrap();
        assert_eq!(repo.change_counter().unwrap(), 4);
    }

    #[test]
    fn test_account_scoped_to_store() {
        let file = NamedTempFile::new().unwrap();
        let db = open_test_db(&file);
        let repo = Repository::new(&db);

        let s1 = repo.insert_store("s1", "enc-a").unwrap();
        let s2 = repo.insert_store("s2", "enc-b").unwrap();
        repo.insert_account_with_password(&sample_account(s1, "a1"), "enc-pw")
            .unwrap();

        assert!(repo.account_by_hid(s1, "a1").unwrap().is_some());
        assert!(repo.account_by_hid(s2, "a1").unwrap().is_none());
    }
}
