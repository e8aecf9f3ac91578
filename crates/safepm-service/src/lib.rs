//! SafePM service layer
//!
//! Composes the core crypto primitives and the SQLite credential store into
//! the setup/store/account operations. Every operation verifies the master
//! password, derives the session key, and works on individually encrypted
//! fields; decrypted values and keys never outlive the operation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod accounts;
pub mod clipboard;
pub mod setup;
pub mod stores;
pub mod table;
pub mod vault;

pub use accounts::{
    AccountManager, CredentialField, NewPassword, PasswordAssessment,
};
pub use clipboard::{ClipboardSink, MockClipboard};
pub use setup::SetupManager;
pub use stores::StoreManager;
pub use table::TableData;
pub use vault::Vault;
