//! Interactive secret prompts (no echo)

use safepm_core::Result;
use zeroize::Zeroizing;

/// Prompt for the master password of an existing database.
pub fn master_password() -> Result<Zeroizing<String>> {
    let password = rpassword::prompt_password("Enter password: ")?;
    Ok(Zeroizing::new(password))
}

/// Prompt for the master password of a database being created.
pub fn new_master_password() -> Result<Zeroizing<String>> {
    let password = rpassword::prompt_password("Enter master password for this db: ")?;
    Ok(Zeroizing::new(password))
}

/// Prompt for the password to save for an account.
pub fn account_password() -> Result<Zeroizing<String>> {
    let password = rpassword::prompt_password("Enter password to save for this account: ")?;
    Ok(Zeroizing::new(password))
}
