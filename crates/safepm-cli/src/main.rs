//! SafePM command-line interface
//!
//! Thin outer layer: argument parsing, secret prompts, table rendering, and
//! the OS clipboard shim. All credential logic lives in the service crate.

mod cli;
mod clipboard;
mod prompt;
mod render;

use clap::Parser;
use cli::{AccountCommand, Cli, Command, CopyField, PasswordArgs, StoreCommand};
use safepm_core::quality::GeneratorOptions;
use safepm_core::{load_dictionary, Error, Paths, Result};
use safepm_service::{
    AccountManager, ClipboardSink, CredentialField, NewPassword, PasswordAssessment,
    SetupManager, StoreManager, Vault,
};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        if cli.verbose {
            eprintln!("Error [{}]: {:?}", e.category(), e);
        } else {
            eprintln!("Error: {}", e.user_message());
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let paths = Paths::resolve()?;

    match &cli.command {
        Command::Setup(args) => {
            let master = prompt::new_master_password()?;
            SetupManager::new(&paths).create_database(&args.db, &master)?;
            println!("Database created successfully!");
            Ok(())
        }
        Command::Store { command } => run_store(&paths, command),
        Command::Account { command } => run_account(&paths, command),
    }
}

fn unlock(paths: &Paths, db: &str) -> Result<Vault> {
    let master = prompt::master_password()?;
    Vault::open(paths, db, &master)
}

fn run_store(paths: &Paths, command: &StoreCommand) -> Result<()> {
    match command {
        StoreCommand::Create { db, store } => {
            let vault = unlock(paths, db)?;
            StoreManager::new(&vault).create(store)?;
            println!("Store created successfully!");
        }
        StoreCommand::Rename {
            db,
            store,
            new_name,
        } => {
            let vault = unlock(paths, db)?;
            StoreManager::new(&vault).rename(store, new_name)?;
            println!("Store renamed successfully!");
        }
        StoreCommand::Delete { db, store } => {
            let vault = unlock(paths, db)?;
            StoreManager::new(&vault).delete(store)?;
            println!("Store deleted successfully!");
        }
        StoreCommand::List { db } => {
            let vault = unlock(paths, db)?;
            let table = StoreManager::new(&vault).list()?;
            render::print_table(&table);
        }
    }
    Ok(())
}

/// Resolve the password source from the CLI flags.
///
/// For manual passwords this prompts before the master password is asked
/// for, so quality feedback relates to the value just typed.
fn select_password(args: &PasswordArgs) -> Result<(NewPassword, Option<Vec<String>>)> {
    if args.password {
        let value = prompt::account_password()?;
        let dictionary = match &args.dictionary {
            Some(path) => Some(load_dictionary(path)?),
            None => None,
        };
        Ok((NewPassword::Manual(value), dictionary))
    } else {
        let defaults = GeneratorOptions::default();
        let opts = GeneratorOptions {
            min_length: args.pass_min_length.unwrap_or(defaults.min_length),
            max_length: args.pass_max_length.unwrap_or(defaults.max_length),
            no_special: args.pass_no_special,
            no_digits: args.pass_no_digits,
            exclude_chars: args.pass_exclude_chars.clone().unwrap_or_default(),
        };
        Ok((NewPassword::Generated(opts), None))
    }
}

fn report_assessment(assessment: Option<PasswordAssessment>) {
    if let Some(assessment) = assessment {
        println!(
            "You have chosen a password with strength: {}",
            assessment.strength
        );
        if let Some((entry, _)) = assessment.similarity_warning() {
            println!(
                "Your chosen password is very similar to a dictionary password '{}'",
                entry
            );
        }
    }
}

fn run_account(paths: &Paths, command: &AccountCommand) -> Result<()> {
    match command {
        AccountCommand::Create {
            target,
            username,
            email,
            password,
        } => {
            let (source, dictionary) = select_password(password)?;
            let vault = unlock(paths, &target.db)?;
            let assessment = AccountManager::new(&vault).create(
                &target.store,
                &target.account,
                username.as_deref().unwrap_or(""),
                email.as_deref().unwrap_or(""),
                source,
                dictionary.as_deref(),
            )?;
            report_assessment(assessment);
            println!("Account created successfully!");
        }
        AccountCommand::View { target } => {
            let vault = unlock(paths, &target.db)?;
            let table = AccountManager::new(&vault).view(&target.store, &target.account)?;
            render::print_table(&table);
        }
        AccountCommand::List { db, store } => {
            let vault = unlock(paths, db)?;
            let table = AccountManager::new(&vault).list(store)?;
            render::print_table(&table);
        }
        AccountCommand::Update { target, password } => {
            let (source, dictionary) = select_password(password)?;
            let vault = unlock(paths, &target.db)?;
            let assessment = AccountManager::new(&vault).update_password(
                &target.store,
                &target.account,
                source,
                dictionary.as_deref(),
            )?;
            report_assessment(assessment);
            println!("Password updated successfully!");
        }
        AccountCommand::Delete { target } => {
            let vault = unlock(paths, &target.db)?;
            AccountManager::new(&vault).delete(&target.store, &target.account)?;
            println!("Account deleted successfully!");
        }
        AccountCommand::History { target } => {
            let vault = unlock(paths, &target.db)?;
            let table = AccountManager::new(&vault).history(&target.store, &target.account)?;
            render::print_table(&table);
        }
        AccountCommand::Copy { target, field } => {
            let field = match field {
                CopyField::Username => CredentialField::Username,
                CopyField::Email => CredentialField::Email,
                CopyField::Password => CredentialField::Password,
            };
            let vault = unlock(paths, &target.db)?;
            let value =
                AccountManager::new(&vault).copy_field(&target.store, &target.account, field)?;

            if !clipboard::OsClipboard.copy(&value) {
                return Err(Error::Io(std::io::Error::other(
                    "no clipboard command available",
                )));
            }
            println!("Copied to clipboard.");
        }
    }
    Ok(())
}
