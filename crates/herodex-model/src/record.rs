use serde::{Deserialize, Serialize};

/// One extracted character, as it appears in the output JSON array.
///
/// A record starts as a bare `{url}` stub and is populated in a single
/// pass by the extractor. Optional fields are omitted from the JSON
/// entirely when absent or empty, so hand-curated files stay terse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    /// Source page URL. Acts as the natural external key.
    pub url: String,
    /// Display name. A record without one is incomplete and never
    /// reaches the output file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Non-ASCII rendering of the name. Latin annotation is discarded
    /// during extraction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kanji: Option<String>,
    /// Either an absolute source URL awaiting acquisition, or a
    /// storage-relative path once the image has been downloaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Unique, first-seen order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quirks: Vec<Quirk>,
    /// Unique by name after deduplication.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affiliations: Vec<Affiliation>,
}

/// A quirk with an optional qualifier (e.g., a body-part note).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quirk {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// An affiliation with an optional qualifier (e.g., "Formerly").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affiliation {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CharacterRecord {
    /// Create a bare stub for a page that could not be extracted past
    /// locating its info container.
    pub fn stub(url: &str) -> Self {
        Self {
            url: url.to_string(),
            name: None,
            kanji: None,
            image: None,
            aliases: Vec::new(),
            quirks: Vec::new(),
            affiliations: Vec::new(),
        }
    }

    /// Whether the record carries enough data to be emitted.
    pub fn is_complete(&self) -> bool {
        self.name.is_some()
    }
}

impl Quirk {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            note: None,
        }
    }

    pub fn with_note(name: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            note: Some(note.into()),
        }
    }
}

impl Affiliation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            note: None,
        }
    }

    pub fn with_note(name: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            note: Some(note.into()),
        }
    }
}
