// Affiliation extraction from a raw labeled-field value.
//
// The raw text mixes duplicate-language glyphs, footnote markers, and
// inconsistent delimiters. Cleaning happens in fixed stages; the final
// token walk attaches "(Formerly)" markers to the entry they follow.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use herodex_model::Affiliation;
use regex::Regex;

use crate::PUNCTUATION_NOISE;

/// Marker token that qualifies the entry immediately before it.
const FORMERLY_MARKER: &str = "(formerly)";

/// Known-garbled name corrections, keyed by the exact garbled string.
///
/// Stripping duplicate-language glyphs mangles the handful of names
/// that are romanized with non-ASCII letters; this table maps each
/// mangled form back to its intended name. It is data, not code: the
/// default ships as a JSON asset and a replacement can be supplied at
/// runtime.
#[derive(Debug, Clone, Default)]
pub struct CorrectionTable {
    map: HashMap<String, String>,
}

impl CorrectionTable {
    /// The table shipped with the crate.
    pub fn builtin() -> Self {
        Self::from_json_str(include_str!("../assets/corrections.json"))
            .expect("builtin correction table is valid JSON")
    }

    /// Load a table from a JSON object of `garbled -> corrected` pairs.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let map: HashMap<String, String> =
            serde_json::from_str(json).context("Correction table must be a JSON object of strings")?;
        Ok(Self { map })
    }

    /// Load a table from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read correction table {}", path.display()))?;
        Self::from_json_str(&text)
    }

    /// An empty table, for callers that want no corrections applied.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn correct(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }
}

/// Extract ordered affiliation name/note pairs from a raw field value.
///
/// Cleaning stages, in order: strip non-ASCII glyphs, remove footnote
/// markers (`[ 1 ]`, `[|2|]`), normalize pipe delimiters, collapse
/// whitespace. The cleaned text is split on `|`; each non-marker token
/// starts an entry, and a following `(formerly)` token attaches
/// `note: "Formerly"` to it. Corrections from `table` are applied last.
pub fn parse_affiliations(raw: &str, table: &CorrectionTable) -> Vec<Affiliation> {
    let non_ascii = Regex::new(r"[^\x00-\x7F]+").expect("valid regex");
    let footnote = Regex::new(r"\[\s*\|?\s*\d+\s*\|?\s*\]").expect("valid regex");
    let pipe = Regex::new(r"\s*\|\s*").expect("valid regex");
    let whitespace = Regex::new(r"\s+").expect("valid regex");

    let ascii_only = non_ascii.replace_all(raw, "");
    let no_footnotes = footnote.replace_all(&ascii_only, "");
    let standardized = pipe.replace_all(&no_footnotes, "|");
    let cleaned = whitespace.replace_all(&standardized, " ");
    let cleaned = cleaned.trim();

    let parts: Vec<&str> = cleaned
        .split('|')
        .map(str::trim)
        .filter(|p| !p.is_empty() && !PUNCTUATION_NOISE.contains(p))
        .collect();

    let mut affiliations = Vec::new();
    let mut i = 0;
    while i < parts.len() {
        let name = parts[i];
        if i + 1 < parts.len() && parts[i + 1].eq_ignore_ascii_case(FORMERLY_MARKER) {
            affiliations.push(Affiliation::with_note(name, "Formerly"));
            i += 1;
        } else {
            affiliations.push(Affiliation::new(name));
        }
        i += 1;
    }

    for aff in &mut affiliations {
        if let Some(corrected) = table.correct(&aff.name) {
            tracing::debug!(from = %aff.name, to = corrected, "Applied name correction");
            aff.name = corrected.to_string();
        }
    }

    affiliations
}
