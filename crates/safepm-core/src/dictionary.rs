//! Dictionary ("rainbow" list) loading
//!
//! An ordered flat list of common plaintext passwords consumed by the
//! quality engine for similarity warnings. Not a precomputed hash-chain
//! table despite the nickname.

use crate::{Error, Result};
use std::fs;
use std::path::Path;

/// Load a dictionary file, one entry per line.
///
/// Entries keep their file order (the nearest-match scan is order-sensitive
/// for ties); blank lines are skipped.
pub fn load_dictionary(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::Path(format!("Could not read dictionary file: {}", e)))?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
