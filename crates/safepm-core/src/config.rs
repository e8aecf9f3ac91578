//! Config record access
//!
//! One line per managed database in an external plaintext record:
//! `name:hash,salt`. Updating an entry removes any prior line for that
//! database and appends the new one; file line order is not preserved.
//!
//! The config path is always passed in explicitly rather than read from
//! ambient process state.

use crate::{Error, Result};
use std::fs;
use std::path::Path;

/// One parsed config line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    /// Database name
    pub name: String,
    /// Hex-encoded master password hash
    pub hash: String,
    /// Hex-encoded salt
    pub salt: String,
}

impl ConfigEntry {
    /// Parse a `name:hash,salt` line.
    fn parse_line(line: &str) -> Result<Self> {
        let (name, rest) = line
            .split_once(':')
            .ok_or_else(|| Error::Config(format!("Malformed config line: '{}'", line)))?;
        let (hash, salt) = rest
            .split_once(',')
            .ok_or_else(|| Error::Config(format!("Malformed config line: '{}'", line)))?;

        Ok(Self {
            name: name.to_string(),
            hash: hash.to_string(),
            salt: salt.to_string(),
        })
    }

    fn to_line(&self) -> String {
        format!("{}:{},{}", self.name, self.hash, self.salt)
    }
}

/// Look up the (hash, salt) entry for a database.
///
/// A missing file or missing entry is `Ok(None)`; only unreadable or
/// malformed content is an error.
pub fn lookup_entry(config_path: &Path, db_name: &str) -> Result<Option<ConfigEntry>> {
    if db_name.is_empty() {
        return Err(Error::Config("Database name cannot be empty".to_string()));
    }
    if !config_path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(config_path)
        .map_err(|e| Error::Config(format!("Could not read config record: {}", e)))?;

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let entry = ConfigEntry::parse_line(line)?;
        if entry.name == db_name {
            return Ok(Some(entry));
        }
    }

    Ok(None)
}

/// Insert or replace the entry for a database and rewrite the record.
///
/// Any existing line for the same database name is dropped and the new entry
/// is appended (last write wins).
pub fn update_entry(config_path: &Path, db_name: &str, hash: &str, salt: &str) -> Result<()> {
    if db_name.is_empty() || hash.is_empty() || salt.is_empty() {
        return Err(Error::Config(
            "Database name, password hash, and salt cannot be empty".to_string(),
        ));
    }

    let mut lines: Vec<String> = Vec::new();
    if config_path.exists() {
        let contents = fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Could not read config record: {}", e)))?;
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            // Keep unrelated entries; match on the exact name field, not a
            // raw string prefix.
            match line.split_once(':') {
                Some((name, _)) if name == db_name => {}
                _ => lines.push(line.to_string()),
            }
        }
    }

    let entry = ConfigEntry {
        name: db_name.to_string(),
        hash: hash.to_string(),
        salt: salt.to_string(),
    };
    lines.push(entry.to_line());

    let mut body = lines.join("\n");
    body.push('\n');
    fs::write(config_path, body)
        .map_err(|e| Error::Config(format!("Could not write config record: {}", e)))
}

/// Remove the entry for a database, if present.
pub fn remove_entry(config_path: &Path, db_name: &str) -> Result<()> {
    if !config_path.exists() {
        return Ok(());
    }

    let contents = fs::read_to_string(config_path)
        .map_err(|e| Error::Config(format!("Could not read config record: {}", e)))?;

    let lines: Vec<&str> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !matches!(line.split_once(':'), Some((name, _)) if name == db_name))
        .collect();

    let mut body = lines.join("\n");
    if !body.is_empty() {
        body.push('\n');
    }
    fs::write(config_path, body)
        .map_err(|e| Error::Config(format!("Could not write config record: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_lookup_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".safe-pm.conf");
        assert!(lookup_entry(&path, "vault").unwrap().is_none());
    }

    #[test]
    fn test_update_then_lookup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".safe-pm.conf");

        update_entry(&path, "vault", "deadbeef", "cafebabe").unwrap();
        let entry = lookup_entry(&path, "vault").unwrap().unwrap();
        assert_eq!(entry.hash, "deadbeef");
        assert_eq!(entry.salt, "cafebabe");
    }

    #[test]
    fn test_update_replaces_existing_entry() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".safe-pm.conf");

        update_entry(&path, "vault", "aaaa", "1111").unwrap();
        update_entry(&path, "other", "bbbb", "2222").unwrap();
        update_entry(&path, "vault", "cccc", "3333").unwrap();

        let entry = lookup_entry(&path, "vault").unwrap().unwrap();
        assert_eq!(entry.hash, "cccc");
        assert_eq!(entry.salt, "3333");

        // The replaced entry's old line is gone.
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches("vault:").count(), 1);
        assert!(contents.contains("other:bbbb,2222"));
    }

    #[test]
    fn test_name_match_is_exact_not_prefix() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".safe-pm.conf");

        update_entry(&path, "work", "aaaa", "1111").unwrap();
        update_entry(&path, "work2", "bbbb", "2222").unwrap();

        let entry = lookup_entry(&path, "work").unwrap().unwrap();
        assert_eq!(entry.hash, "aaaa");
        let entry = lookup_entry(&path, "work2").unwrap().unwrap();
        assert_eq!(entry.hash, "bbbb");
    }

    #[test]
    fn test_remove_entry() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".safe-pm.conf");

        update_entry(&path, "vault", "aaaa", "1111").unwrap();
        update_entry(&path, "other", "bbbb", "2222").unwrap();
        remove_entry(&path, "vault").unwrap();

        assert!(lookup_entry(&path, "vault").unwrap().is_none());
        assert!(lookup_entry(&path, "other").unwrap().is_some());
    }

    #[test]
    fn test_malformed_line_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".safe-pm.conf");
        std::fs::write(&path, "garbage without separator\n").unwrap();

        assert!(matches!(
            lookup_entry(&path, "vault"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_empty_arguments_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".safe-pm.conf");
        assert!(update_entry(&path, "", "h", "s").is_err());
        assert!(update_entry(&path, "db", "", "s").is_err());
        assert!(update_entry(&path, "db", "h", "").is_err());
    }
}
