//! SafePM core
//!
//! This crate implements the credential-manager core primitives: master
//! credential hashing and verification, deterministic lookup hashes, session
//! key derivation, the authenticated field cipher, the password quality
//! engine, and config record access.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod crypto;
pub mod dictionary;
pub mod error;
pub mod paths;
pub mod quality;

pub use config::{lookup_entry, remove_entry, update_entry, ConfigEntry};
pub use crypto::{
    decrypt_field, deterministic_hash, encrypt_field, generate_salt, MasterCredential, SessionKey,
};
pub use dictionary::load_dictionary;
pub use error::{Error, ErrorCategory, Result};
pub use paths::Paths;
pub use quality::{
    edit_distance, find_nearest, generate_password, strength_score, GeneratorOptions,
    SIMILARITY_WARNING_DISTANCE,
};
