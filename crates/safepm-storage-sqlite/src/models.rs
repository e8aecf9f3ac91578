//! Database models
//!
//! Rows as persisted: `hid` columns carry the deterministic lookup hash,
//! name/username/email/password columns carry field-cipher tokens. Nothing
//! in this crate sees plaintext.

use serde::{Deserialize, Serialize};

/// Store record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreRecord {
    /// Store ID
    pub id: Option<i64>,
    /// Deterministic hash of the plaintext store name
    pub hid: String,
    /// Encrypted store name
    pub name: String,
    /// Created timestamp (RFC 3339)
    pub date_created: String,
}

/// Account record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Account ID
    pub id: Option<i64>,
    /// Deterministic hash of the plaintext account name
    pub hid: String,
    /// Encrypted account name
    pub name: String,
    /// Encrypted username
    pub username: String,
    /// Encrypted email
    pub email: String,
    /// Parent store ID
    pub store_id: i64,
    /// Created timestamp (RFC 3339)
    pub date_created: String,
}

/// Password version record (append-only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordRecord {
    /// Password version ID
    pub id: Option<i64>,
    /// Owning account ID
    pub account_id: i64,
    /// Encrypted password value
    pub password: String,
    /// Created timestamp (RFC 3339)
    pub date_created: String,
}
