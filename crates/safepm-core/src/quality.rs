//! Password quality engine
//!
//! Strength scoring against a fixed weak-pattern catalogue, a custom
//! directional edit distance for dictionary similarity warnings, and random
//! password generation.

use crate::{Error, Result};
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;

/// Penalty for matching a whole-string weak pattern
const WEAK_PATTERN_PENALTY: i32 = 5;

/// Penalty per unmet strength criterion
const CRITERIA_PENALTY: i32 = 2;

/// Minimum length counted as a strength criterion
const STRONG_LENGTH: usize = 12;

/// Punctuation set used by the strength criteria and weak patterns
const SPECIAL_CHARS: &str = "!@#$%^&*()_+=<>?";

/// Symbol pool used by the password generator
const GENERATOR_SYMBOLS: &str = "!@#$%^&*([{}])_+=<>?";

/// Dictionary distance below which callers should warn
pub const SIMILARITY_WARNING_DISTANCE: u32 = 5;

/// Edit-distance cost of deleting a password character
const DELETION_COST: u32 = 8;

/// Edit-distance cost of inserting a dictionary character
const INSERTION_COST: u32 = 4;

/// Edit-distance cost of an unrelated substitution
const SUBSTITUTION_COST: u32 = 3;

/// Edit-distance cost of a leet-for-letter substitution
const LEET_COST: u32 = 1;

/// Whole-string weak patterns: pure digits, pure letters, and the simple
/// letter/digit/symbol run permutations.
static WEAK_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^[0-9]+$",
        r"^[a-zA-Z]+$",
        r"^[a-zA-Z]+[0-9]+$",
        r"^[0-9]+[a-zA-Z]+$",
        r"^[a-zA-Z]+[0-9]+[!@#$%^&*()_+=<>?]+$",
        r"^[a-zA-Z]+[!@#$%^&*()_+=<>?]+[0-9]+$",
        r"^[0-9]+[a-zA-Z]+[!@#$%^&*()_+=<>?]+$",
        r"^[0-9]+[!@#$%^&*()_+=<>?]+[a-zA-Z]+$",
        r"^[!@#$%^&*()_+=<>?]+[a-zA-Z]+[0-9]+$",
        r"^[!@#$%^&*()_+=<>?]+[0-9]+[a-zA-Z]+$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static weak pattern must compile"))
    .collect()
});

/// Score a password in [0, 1].
///
/// Starts from a penalty budget of one weak-pattern hit plus four criteria
/// misses, subtracts the configured penalty for every whole-string weak
/// pattern matched and every unmet criterion, then normalizes. The empty
/// password scores exactly 0.0.
pub fn strength_score(password: &str) -> f64 {
    if password.is_empty() {
        return 0.0;
    }

    let mut penalty = 0i32;

    for pattern in WEAK_PATTERNS.iter() {
        if pattern.is_match(password) {
            penalty += WEAK_PATTERN_PENALTY;
        }
    }

    let criteria = [
        password.chars().count() >= STRONG_LENGTH,
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| SPECIAL_CHARS.contains(c)),
    ];
    for met in criteria {
        if !met {
            penalty += CRITERIA_PENALTY;
        }
    }

    let budget = WEAK_PATTERN_PENALTY + 4 * CRITERIA_PENALTY;
    let remaining = (budget - penalty).max(0) as f64;
    (remaining / budget as f64 * 100.0).ceil() / 100.0
}

/// Leet counterpart of a password character, if one is defined.
fn leet_counterpart(c: char) -> Option<char> {
    match c {
        'a' | 'A' => Some('@'),
        'e' => Some('3'),
        'i' | 'I' => Some('1'),
        'o' | 'O' => Some('0'),
        'p' | 'P' => Some('9'),
        's' | 'S' => Some('$'),
        't' | 'T' => Some('7'),
        'z' | 'Z' => Some('2'),
        _ => None,
    }
}

/// Substitution cost for transforming a password character into a dictionary
/// character. Case-insensitive equality wins over the leet rule.
fn substitution_cost(from: char, to: char) -> u32 {
    if from == to || from.eq_ignore_ascii_case(&to) {
        return 0;
    }
    if leet_counterpart(from) == Some(to) {
        return LEET_COST;
    }
    SUBSTITUTION_COST
}

/// Directional edit distance transforming `password` into `entry`.
///
/// Deletions are expensive and insertions cheap so that a password which is a
/// small mutation of a common word scores low while unrelated strings score
/// high.
pub fn edit_distance(password: &str, entry: &str) -> u32 {
    let a: Vec<char> = password.chars().collect();
    let b: Vec<char> = entry.chars().collect();

    let mut dp = vec![vec![0u32; b.len() + 1]; a.len() + 1];
    for i in 1..=a.len() {
        dp[i][0] = dp[i - 1][0] + DELETION_COST;
    }
    for j in 1..=b.len() {
        dp[0][j] = dp[0][j - 1] + INSERTION_COST;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let substitution = dp[i - 1][j - 1] + substitution_cost(a[i - 1], b[j - 1]);
            let deletion = dp[i - 1][j] + DELETION_COST;
            let insertion = dp[i][j - 1] + INSERTION_COST;
            dp[i][j] = substitution.min(deletion).min(insertion);
        }
    }

    dp[a.len()][b.len()]
}

/// Find the dictionary entry nearest to `password`.
///
/// Linear scan; the first entry reaching the minimum distance wins ties.
/// Callers warn (never block) when the distance is below
/// [`SIMILARITY_WARNING_DISTANCE`].
pub fn find_nearest<'a>(password: &str, dictionary: &'a [String]) -> Option<(&'a str, u32)> {
    let mut nearest: Option<(&str, u32)> = None;

    for entry in dictionary {
        let distance = edit_distance(password, entry);
        match nearest {
            Some((_, best)) if distance >= best => {}
            _ => nearest = Some((entry.as_str(), distance)),
        }
    }

    nearest
}

/// Options for random password generation
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Minimum password length
    pub min_length: usize,
    /// Maximum password length
    pub max_length: usize,
    /// Skip special characters
    pub no_special: bool,
    /// Skip digits
    pub no_digits: bool,
    /// Characters removed from every pool
    pub exclude_chars: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 16,
            no_special: false,
            no_digits: false,
            exclude_chars: String::new(),
        }
    }
}

/// Generate a random password.
///
/// The effective minimum length is raised to leave room for one mandatory
/// digit and one mandatory symbol when both categories are enabled, and the
/// effective maximum is raised to the effective minimum. Mandatory characters
/// are placed first, the remainder is filled from the combined pool, and the
/// whole buffer is shuffled so mandatory characters are not positionally
/// predictable.
pub fn generate_password(opts: &GeneratorOptions) -> Result<String> {
    let keep = |c: &char| !opts.exclude_chars.contains(*c);

    let letters: Vec<char> = ('a'..='z').chain('A'..='Z').filter(keep).collect();
    let digits: Vec<char> = ('0'..='9').filter(keep).collect();
    let symbols: Vec<char> = GENERATOR_SYMBOLS.chars().filter(keep).collect();

    if !opts.no_digits && digits.is_empty() {
        return Err(Error::Crypto(
            "Digit pool is empty after exclusions".to_string(),
        ));
    }
    if !opts.no_special && symbols.is_empty() {
        return Err(Error::Crypto(
            "Symbol pool is empty after exclusions".to_string(),
        ));
    }

    let mut pool = letters;
    if !opts.no_digits {
        pool.extend_from_slice(&digits);
    }
    if !opts.no_special {
        pool.extend_from_slice(&symbols);
    }
    if pool.is_empty() {
        return Err(Error::Crypto(
            "Character pool is empty after exclusions".to_string(),
        ));
    }

    let required = match (!opts.no_special, !opts.no_digits) {
        (true, true) => 3,
        (true, false) | (false, true) => 1,
        (false, false) => 0,
    };
    let effective_min = opts.min_length.max(required);
    let effective_max = opts.max_length.max(effective_min);

    let mut rng = rand::thread_rng();
    let length = rng.gen_range(effective_min..=effective_max);

    let mut buffer: Vec<char> = Vec::with_capacity(length);
    if !opts.no_special {
        let c = symbols
            .choose(&mut rng)
            .ok_or_else(|| Error::Crypto("Symbol pool is empty".to_string()))?;
        buffer.push(*c);
    }
    if !opts.no_digits {
        let c = digits
            .choose(&mut rng)
            .ok_or_else(|| Error::Crypto("Digit pool is empty".to_string()))?;
        buffer.push(*c);
    }

    while buffer.len() < length {
        let c = pool
            .choose(&mut rng)
            .ok_or_else(|| Error::Crypto("Character pool is empty".to_string()))?;
        buffer.push(*c);
    }

    buffer.shuffle(&mut rng);
    Ok(buffer.into_iter().collect())
}
