pub mod affiliations;
pub mod aliases;
pub mod quirks;
pub mod slug;

/// Tokens that are pure punctuation noise left behind by value-text
/// splitting. They are never kept as an alias or affiliation name.
pub(crate) const PUNCTUATION_NOISE: &[&str] = &["(", ")", ",", "?"];
