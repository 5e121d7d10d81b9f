// Affiliation deduplication.
//
// Collapses repeated names to one entry each, keeping the richer
// (noted) variant when both forms appear.

use std::collections::HashMap;

use crate::record::Affiliation;

/// Collapse repeated affiliation entries to one per distinct name.
///
/// Output order is the order of each name's first occurrence. Among
/// entries sharing a name, one carrying a `note` replaces one that does
/// not; a note is never lost once kept. This is a most-informative-wins
/// merge, not first-wins or last-wins.
pub fn dedupe_affiliations(affiliations: Vec<Affiliation>) -> Vec<Affiliation> {
    let mut kept: Vec<Affiliation> = Vec::with_capacity(affiliations.len());
    let mut index_by_name: HashMap<String, usize> = HashMap::new();

    for aff in affiliations {
        match index_by_name.get(&aff.name) {
            Some(&i) => {
                if aff.note.is_some() && kept[i].note.is_none() {
                    kept[i] = aff;
                }
            }
            None => {
                index_by_name.insert(aff.name.clone(), kept.len());
                kept.push(aff);
            }
        }
    }

    kept
}
