//! Error types for SafePM core
//!
//! Domain error taxonomy shared by the managers and the CLI.

use std::fmt;

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// SafePM core errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Config record read/write/parse error
    #[error("Config error: {0}")]
    Config(String),

    /// Hash, key-derivation, encryption or decryption failure
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Filesystem path resolution error
    #[error("Path error: {0}")]
    Path(String),

    /// Entered master password does not match the stored credential
    #[error("Entered password is incorrect")]
    PasswordIncorrect,

    /// Store not found
    #[error("Store not found: {0}")]
    StoreNotFound(String),

    /// Store already exists
    #[error("Store already exists: {0}")]
    StoreExists(String),

    /// Account not found
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Account already exists
    #[error("Account already exists: {0}")]
    AccountExists(String),

    /// Database does not exist
    #[error("Database not found: {0}")]
    DatabaseNotFound(String),

    /// Database already exists
    #[error("Database already exists: {0}")]
    DatabaseExists(String),

    /// Unclassified persistence failure
    #[error("Database error: {0}")]
    Database(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if error is an expected, recoverable user-facing outcome
    /// (vs an internal error)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::PasswordIncorrect
                | Error::StoreNotFound(_)
                | Error::StoreExists(_)
                | Error::AccountNotFound(_)
                | Error::AccountExists(_)
                | Error::DatabaseNotFound(_)
                | Error::DatabaseExists(_)
        )
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Error::PasswordIncorrect => {
                "The entered master password is incorrect.".to_string()
            }
            Error::StoreNotFound(name) => {
                format!("The store '{}' does not exist in this database.", name)
            }
            Error::StoreExists(name) => {
                format!("A store named '{}' already exists in this database.", name)
            }
            Error::AccountNotFound(name) => {
                format!("The account '{}' does not exist in this store.", name)
            }
            Error::AccountExists(name) => {
                format!("An account named '{}' already exists in this store.", name)
            }
            Error::DatabaseNotFound(name) => {
                format!("The database '{}' does not exist. Run setup first.", name)
            }
            Error::DatabaseExists(name) => {
                format!("A database named '{}' already exists.", name)
            }
            _ => self.to_string(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) => ErrorCategory::Config,
            Error::Crypto(_) | Error::PasswordIncorrect => ErrorCategory::Crypto,
            Error::Path(_) => ErrorCategory::Path,
            Error::StoreNotFound(_) | Error::StoreExists(_) => ErrorCategory::Store,
            Error::AccountNotFound(_) | Error::AccountExists(_) => ErrorCategory::Account,
            Error::DatabaseNotFound(_) | Error::DatabaseExists(_) | Error::Database(_) => {
                ErrorCategory::Database
            }
            Error::Io(_) => ErrorCategory::Internal,
        }
    }
}

/// Error categories for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Config record errors
    Config,
    /// Crypto errors
    Crypto,
    /// Path errors
    Path,
    /// Store-level errors
    Store,
    /// Account-level errors
    Account,
    /// Database errors
    Database,
    /// Internal/system errors
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "Config"),
            ErrorCategory::Crypto => write!(f, "Crypto"),
            ErrorCategory::Path => write!(f, "Path"),
            ErrorCategory::Store => write!(f, "Store"),
            ErrorCategory::Account => write!(f, "Account"),
            ErrorCategory::Database => write!(f, "Database"),
            ErrorCategory::Internal => write!(f, "Internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_detection() {
        assert!(Error::PasswordIncorrect.is_user_error());
        assert!(Error::StoreNotFound("work".to_string()).is_user_error());
        assert!(Error::AccountExists("github".to_string()).is_user_error());
        assert!(!Error::Crypto("bad token".to_string()).is_user_error());
        assert!(!Error::Database("locked".to_string()).is_user_error());
    }

    #[test]
    fn test_user_messages() {
        let msg = Error::PasswordIncorrect.user_message();
        assert!(msg.contains("master password is incorrect"));

        let msg = Error::StoreNotFound("work".to_string()).user_message();
        assert!(msg.contains("'work'"));
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            Error::Config("missing entry".to_string()).category(),
            ErrorCategory::Config
        );
        assert_eq!(Error::PasswordIncorrect.category(), ErrorCategory::Crypto);
        assert_eq!(
            Error::StoreExists("work".to_string()).category(),
            ErrorCategory::Store
        );
        assert_eq!(
            Error::Database("oops".to_string()).category(),
            ErrorCategory::Database
        );
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::Crypto.to_string(), "Crypto");
        assert_eq!(ErrorCategory::Store.to_string(), "Store");
        assert_eq!(ErrorCategory::Internal.to_string(), "Internal");
    }
}
