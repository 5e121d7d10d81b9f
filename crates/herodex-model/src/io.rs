// Record-file I/O.
//
// The output file is a pretty-printed UTF-8 JSON array with non-ASCII
// preserved literally. Readers also accept a relaxed variant with `//`
// line comments outside quoted strings, used for hand-curated fixture
// files.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::record::CharacterRecord;

/// Write records as a pretty-printed JSON array, creating parent
/// directories as needed.
pub fn write_records(path: &Path, records: &[CharacterRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, &json)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!(records = records.len(), path = %path.display(), "Wrote record file");
    Ok(())
}

/// Read a record array, accepting the relaxed comment-tolerant variant.
pub fn read_records(path: &Path) -> Result<Vec<CharacterRecord>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let stripped = strip_line_comments(&text);
    serde_json::from_str(&stripped)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Read a record array as raw JSON values, preserving any fields the
/// record type does not model. Post-processing passes use this so
/// unknown internal fields survive a rewrite.
pub fn read_values(path: &Path) -> Result<Vec<Value>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let stripped = strip_line_comments(&text);
    serde_json::from_str(&stripped)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Write raw JSON values back as a pretty-printed array.
pub fn write_values(path: &Path, values: &[Value]) -> Result<()> {
    let json = serde_json::to_string_pretty(values)?;
    fs::write(path, &json)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Remove `//` line comments that appear outside quoted strings.
///
/// Everything from `//` to the end of its line is dropped; the newline
/// itself is kept so line numbers in parse errors stay meaningful.
/// Content inside quoted strings is never altered, and string escapes
/// (including `\"`) are respected.
pub fn strip_line_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                // Drop to end of line, keep the newline.
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_removes_line_comments() {
        let input = "[\n  // curated by hand\n  {\"url\": \"u\"} // trailing\n]\n";
        let stripped = strip_line_comments(input);
        let parsed: Vec<Value> = serde_json::from_str(&stripped).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0]["url"], "u");
    }

    #[test]
    fn test_strip_leaves_quoted_slashes_alone() {
        let input = r#"{"url": "https://wiki.example.org/wiki/Deku"}"#;
        assert_eq!(strip_line_comments(input), input);
    }

    #[test]
    fn test_strip_respects_escaped_quotes() {
        let input = r#"{"name": "he said \"hi\" // not a comment"}"#;
        assert_eq!(strip_line_comments(input), input);
    }

    #[test]
    fn test_strip_is_idempotent_on_clean_json() {
        let record = CharacterRecord::stub("u");
        let json = serde_json::to_string_pretty(&[record]).unwrap();
        assert_eq!(strip_line_comments(&json), json);
    }

    #[test]
    fn test_file_roundtrip() {
        let path = std::env::temp_dir().join("herodex-io-roundtrip.json");
        let mut record = CharacterRecord::stub("https://wiki.example.org/wiki/Tsuyu_Asui");
        record.name = Some("Tsuyu Asui".to_string());

        write_records(&path, std::slice::from_ref(&record)).unwrap();
        let read_back = read_records(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(read_back, vec![record]);
    }

    #[test]
    fn test_relaxed_parse_roundtrip() {
        let input = "[\n  {\n    \"url\": \"u\", // source page\n    \"name\": \"Ochaco Uraraka\"\n  }\n]\n";
        let stripped = strip_line_comments(input);
        let parsed: Vec<CharacterRecord> = serde_json::from_str(&stripped).unwrap();
        assert_eq!(parsed[0].name.as_deref(), Some("Ochaco Uraraka"));
    }
}
