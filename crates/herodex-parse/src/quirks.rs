// Quirk extraction from a raw labeled-field value.
//
// The source text lists one or more quirks, each optionally followed
// by a parenthetical qualifier ("Explosion (left arm)").

use herodex_model::Quirk;
use regex::Regex;

/// Extract quirk name/note pairs from a raw field value, in order of
/// appearance.
///
/// Candidate names are runs of word characters, spaces, and hyphens,
/// optionally followed by a parenthesized qualifier. A qualifier that
/// is case-insensitively identical to its name is dropped; some pages
/// repeat the quirk name in parentheses.
pub fn parse_quirks(value: &str) -> Vec<Quirk> {
    let re = Regex::new(r"([\w\s\-]+)(?:\s*\(([^)]+)\))?").expect("valid regex");

    let mut quirks = Vec::new();
    for caps in re.captures_iter(value) {
        let name = caps[1].trim();
        if name.is_empty() {
            continue;
        }
        let note = caps.get(2).map(|m| m.as_str());
        match note {
            Some(note) if note.to_lowercase() != name.to_lowercase() => {
                quirks.push(Quirk::with_note(name, note.trim()));
            }
            _ => quirks.push(Quirk::new(name)),
        }
    }
    quirks
}
