//! Command-line argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// SafePM: a secure, simple, open-source password manager.
#[derive(Debug, Parser)]
#[command(name = "safe-pm", version)]
pub struct Cli {
    /// Print the full diagnostic chain on errors
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a new database for storing passwords
    Setup(SetupArgs),
    /// Manage stores within a database
    Store {
        #[command(subcommand)]
        command: StoreCommand,
    },
    /// Manage accounts within a store
    Account {
        #[command(subcommand)]
        command: AccountCommand,
    },
}

#[derive(Debug, Args)]
pub struct SetupArgs {
    /// Name of the database to create
    #[arg(long)]
    pub db: String,
}

#[derive(Debug, Subcommand)]
pub enum StoreCommand {
    /// Create a new store
    Create {
        /// Name of the database
        #[arg(long)]
        db: String,
        /// Name of the store to create
        #[arg(long)]
        store: String,
    },
    /// Rename an existing store
    Rename {
        /// Name of the database
        #[arg(long)]
        db: String,
        /// Current name of the store
        #[arg(long)]
        store: String,
        /// New name for the store
        #[arg(long)]
        new_name: String,
    },
    /// Delete a store and all of its accounts
    Delete {
        /// Name of the database
        #[arg(long)]
        db: String,
        /// Name of the store to delete
        #[arg(long)]
        store: String,
    },
    /// List all stores in the database
    List {
        /// Name of the database
        #[arg(long)]
        db: String,
    },
}

#[derive(Debug, Args)]
pub struct AccountTarget {
    /// Name of the database
    #[arg(long)]
    pub db: String,
    /// Name of the store
    #[arg(long)]
    pub store: String,
    /// Name of the account
    #[arg(long)]
    pub account: String,
}

#[derive(Debug, Args)]
#[command(group = clap::ArgGroup::new("password_source").required(true).multiple(false))]
pub struct PasswordArgs {
    /// Prompt for the password to save
    #[arg(long, group = "password_source")]
    pub password: bool,
    /// Generate a random password instead
    #[arg(long, group = "password_source")]
    pub auto_gen_password: bool,
    /// Minimum length for generated passwords
    #[arg(long)]
    pub pass_min_length: Option<usize>,
    /// Maximum length for generated passwords
    #[arg(long)]
    pub pass_max_length: Option<usize>,
    /// Generate without special characters
    #[arg(long)]
    pub pass_no_special: bool,
    /// Generate without digits
    #[arg(long)]
    pub pass_no_digits: bool,
    /// Characters to exclude from generated passwords
    #[arg(long)]
    pub pass_exclude_chars: Option<String>,
    /// Dictionary file for similarity warnings on manual passwords
    #[arg(long)]
    pub dictionary: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CopyField {
    /// Account username
    Username,
    /// Account email
    Email,
    /// Current password
    Password,
}

#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Create an account with its first password
    Create {
        #[command(flatten)]
        target: AccountTarget,
        /// Username to store
        #[arg(long)]
        username: Option<String>,
        /// Email to store
        #[arg(long)]
        email: Option<String>,
        #[command(flatten)]
        password: PasswordArgs,
    },
    /// View an account with its current password
    View {
        #[command(flatten)]
        target: AccountTarget,
    },
    /// List accounts in a store
    List {
        /// Name of the database
        #[arg(long)]
        db: String,
        /// Name of the store
        #[arg(long)]
        store: String,
    },
    /// Set a new password for an account
    Update {
        #[command(flatten)]
        target: AccountTarget,
        #[command(flatten)]
        password: PasswordArgs,
    },
    /// Delete an account and its password history
    Delete {
        #[command(flatten)]
        target: AccountTarget,
    },
    /// Show the full password history of an account
    History {
        #[command(flatten)]
        target: AccountTarget,
    },
    /// Copy one credential field to the clipboard
    Copy {
        #[command(flatten)]
        target: AccountTarget,
        /// Field to copy
        #[arg(long, value_enum, default_value_t = CopyField::Password)]
        field: CopyField,
    },
}
