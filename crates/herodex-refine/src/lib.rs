// Post-processing passes over an already-written record file.
//
// Both passes operate on raw JSON values rather than the record type,
// so fields the type does not model pass through a rewrite untouched.

use std::path::Path;

use anyhow::Result;
use serde_json::Value;

use herodex_model::io;

/// Default media URL prefix rewritten to a relative path.
pub const DEFAULT_MEDIA_PREFIX: &str = "http://localhost:8000/media/";

/// Sort key for records with no affiliations: the maximum scalar value,
/// so they order after every real name.
const NO_AFFILIATION_SENTINEL: &str = "\u{10FFFF}";

/// Counters reported after a pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RefineStats {
    pub ids_stripped: usize,
    pub images_relativized: usize,
}

/// Remove internal numeric `id` members and rewrite absolute media URLs
/// to their storage-relative trailing path. Running it twice changes
/// nothing the second time.
pub fn strip_and_relativize(records: &mut [Value], media_prefix: &str) -> RefineStats {
    let mut stats = RefineStats::default();

    for record in records.iter_mut() {
        let Some(obj) = record.as_object_mut() else {
            continue;
        };

        if obj.get("id").is_some_and(Value::is_number) {
            obj.remove("id");
            stats.ids_stripped += 1;
        }

        if let Some(image) = obj.get("image").and_then(Value::as_str) {
            if let Some(relative) = image.strip_prefix(media_prefix) {
                let relative = relative.to_string();
                obj.insert("image".to_string(), Value::String(relative));
                stats.images_relativized += 1;
            }
        }
    }

    stats
}

/// Stably sort records by the name of their first affiliation, for
/// side-by-side review of teams and schools. Records with no
/// affiliations sort after all records that have one.
pub fn sort_by_affiliation(records: &mut [Value]) {
    records.sort_by(|a, b| first_affiliation(a).cmp(first_affiliation(b)));
}

fn first_affiliation(record: &Value) -> &str {
    record
        .get("affiliations")
        .and_then(Value::as_array)
        .and_then(|affs| affs.first())
        .and_then(|aff| aff.get("name"))
        .and_then(Value::as_str)
        .unwrap_or(NO_AFFILIATION_SENTINEL)
}

/// Apply [`strip_and_relativize`] to a file in place.
pub fn strip_file(path: &Path, media_prefix: &str) -> Result<RefineStats> {
    let mut records = io::read_values(path)?;
    let stats = strip_and_relativize(&mut records, media_prefix);
    io::write_values(path, &records)?;
    tracing::info!(
        records = records.len(),
        ids_stripped = stats.ids_stripped,
        images_relativized = stats.images_relativized,
        path = %path.display(),
        "Stripped and relativized"
    );
    Ok(stats)
}

/// Apply [`sort_by_affiliation`] to a file in place.
pub fn sort_file(path: &Path) -> Result<()> {
    let mut records = io::read_values(path)?;
    sort_by_affiliation(&mut records);
    io::write_values(path, &records)?;
    tracing::info!(records = records.len(), path = %path.display(), "Sorted by first affiliation");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_removes_numeric_id_and_relativizes() {
        let mut records = vec![json!({
            "id": 42,
            "url": "u",
            "name": "Thirteen",
            "image": "http://localhost:8000/media/characters/thirteen.png"
        })];

        let stats = strip_and_relativize(&mut records, DEFAULT_MEDIA_PREFIX);

        assert_eq!(stats, RefineStats { ids_stripped: 1, images_relativized: 1 });
        assert!(records[0].get("id").is_none());
        assert_eq!(records[0]["image"], "characters/thirteen.png");
        // Unmodeled fields survive.
        assert_eq!(records[0]["name"], "Thirteen");
    }

    #[test]
    fn test_strip_is_idempotent() {
        let mut records = vec![json!({
            "id": 7,
            "url": "u",
            "image": "http://localhost:8000/media/characters/nezu.png"
        })];

        strip_and_relativize(&mut records, DEFAULT_MEDIA_PREFIX);
        let after_first = records.clone();
        let stats = strip_and_relativize(&mut records, DEFAULT_MEDIA_PREFIX);

        assert_eq!(records, after_first);
        assert_eq!(stats, RefineStats::default());
    }

    #[test]
    fn test_strip_leaves_non_numeric_id_and_foreign_urls() {
        let mut records = vec![json!({
            "id": "external-key",
            "url": "u",
            "image": "https://static.example.org/remote.png"
        })];

        let stats = strip_and_relativize(&mut records, DEFAULT_MEDIA_PREFIX);

        assert_eq!(stats, RefineStats::default());
        assert_eq!(records[0]["id"], "external-key");
        assert_eq!(records[0]["image"], "https://static.example.org/remote.png");
    }

    #[test]
    fn test_sort_no_affiliation_last() {
        let mut records = vec![
            json!({"url": "1", "affiliations": []}),
            json!({"url": "2", "affiliations": [{"name": "Z"}]}),
            json!({"url": "3", "affiliations": [{"name": "A"}]}),
        ];

        sort_by_affiliation(&mut records);

        let order: Vec<&str> = records.iter().map(|r| r["url"].as_str().unwrap()).collect();
        assert_eq!(order, vec!["3", "2", "1"]);
    }

    #[test]
    fn test_sort_is_stable_within_equal_keys() {
        let mut records = vec![
            json!({"url": "1", "affiliations": [{"name": "U.A."}]}),
            json!({"url": "2"}),
            json!({"url": "3", "affiliations": [{"name": "U.A."}]}),
            json!({"url": "4"}),
        ];

        sort_by_affiliation(&mut records);

        let order: Vec<&str> = records.iter().map(|r| r["url"].as_str().unwrap()).collect();
        assert_eq!(order, vec!["1", "3", "2", "4"]);
    }
}
