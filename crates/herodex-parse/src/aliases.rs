// Alias filtering.
//
// The alias field mixes proper names with translations, descriptive
// fragments, and stray punctuation from value-text splitting. Only
// clean Latin-script names and titles are kept.

use crate::PUNCTUATION_NOISE;

/// Minimum length for a kept alias. Shorter tokens are almost always
/// particles or markup debris.
const MIN_ALIAS_LEN: usize = 5;

/// Extract clean aliases from a raw labeled-field value.
///
/// The value is split on `delimiter` and each trimmed token kept only
/// if it is printable 7-bit ASCII, not solely brackets/digits, not a
/// punctuation-noise token, at least five characters long, and not
/// entirely lowercase (which filters descriptive fragments while
/// keeping proper names and titles). Duplicates are dropped, first
/// occurrence wins.
pub fn filter_aliases(raw: &str, delimiter: char) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut aliases = Vec::new();

    for token in raw.split(delimiter) {
        let token = token.trim();
        if !keep(token) {
            continue;
        }
        if seen.insert(token.to_string()) {
            aliases.push(token.to_string());
        }
    }

    aliases
}

fn keep(token: &str) -> bool {
    !token.is_empty()
        && token.chars().all(|c| (' '..='~').contains(&c))
        && !token.chars().all(|c| c == '[' || c == ']' || c.is_ascii_digit())
        && !PUNCTUATION_NOISE.contains(&token)
        && token.len() >= MIN_ALIAS_LEN
        && !is_entirely_lowercase(token)
}

/// True when the token has at least one letter and none of its letters
/// are uppercase.
fn is_entirely_lowercase(token: &str) -> bool {
    let mut has_cased = false;
    for c in token.chars() {
        if c.is_uppercase() {
            return false;
        }
        if c.is_lowercase() {
            has_cased = true;
        }
    }
    has_cased
}
