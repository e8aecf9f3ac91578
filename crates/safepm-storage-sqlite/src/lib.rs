//! SQLite storage for SafePM
//!
//! Credential store model: schema migrations, row models, and a repository
//! whose multi-row operations are atomic. Every persisted identifier is a
//! deterministic name hash and every sensitive column is field-cipher
//! ciphertext produced by the caller; this crate never handles plaintext.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod database;
pub mod error;
pub mod migrations;
pub mod models;
pub mod repository;

pub use database::Database;
pub use error::{Error, Result};
pub use models::{AccountRecord, PasswordRecord, StoreRecord};
pub use repository::Repository;
