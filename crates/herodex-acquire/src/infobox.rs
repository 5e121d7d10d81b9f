// Character record extraction from a wiki page.
//
// The structured info container is a Fandom "portable infobox": an
// `<aside>` of labeled key/value rows. Extraction is a single pass per
// page; a page without the container yields a bare stub that the batch
// driver filters out.

use anyhow::Result;
use scraper::{ElementRef, Html, Selector};

use herodex_model::dedupe::dedupe_affiliations;
use herodex_model::CharacterRecord;
use herodex_parse::affiliations::{parse_affiliations, CorrectionTable};
use herodex_parse::aliases::filter_aliases;
use herodex_parse::quirks::parse_quirks;
use herodex_parse::slug::slugify;

use crate::config::AcquireConfig;
use crate::{fetch, image};

/// How repeated labeled fields of the same kind combine into a record.
///
/// Source pages occasionally carry more than one "Quirk" or
/// "Affiliation" row; with `LastWins` the final row determines the
/// record. That looks like an accident of page authoring rather than a
/// contract, so the choice is named here instead of buried in the
/// field loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMergePolicy {
    LastWins,
}

impl FieldMergePolicy {
    fn apply<T>(self, slot: &mut Vec<T>, parsed: Vec<T>) {
        match self {
            FieldMergePolicy::LastWins => *slot = parsed,
        }
    }
}

const MERGE_POLICY: FieldMergePolicy = FieldMergePolicy::LastWins;

/// A pending image download discovered during page parsing.
///
/// Parsing is synchronous; the fetch happens afterwards so the HTML
/// document never lives across an await point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageJob {
    pub source_url: String,
    pub filename: String,
}

/// Extract one character record from a page URL.
///
/// A transport failure fetching the page is an error; everything past
/// that degrades to a partial or stub record instead. On success the
/// record's affiliations are already deduplicated.
pub async fn extract(
    client: &reqwest::Client,
    url: &str,
    config: &AcquireConfig,
    corrections: &CorrectionTable,
) -> Result<CharacterRecord> {
    let html = fetch::fetch_page(client, url).await?;

    if let Some(cache_dir) = &config.cache_dir {
        cache_page(cache_dir, url, &html);
    }

    let (mut record, image_job) = parse_character_page(&html, url, corrections);

    if let Some(job) = image_job {
        match image::download_image(client, &job.source_url, &job.filename, &config.storage).await {
            Ok(relative) => record.image = Some(relative),
            Err(err) => {
                tracing::warn!(
                    url = %job.source_url,
                    kind = err.kind(),
                    error = %err,
                    "Image download failed, keeping record without local image"
                );
            }
        }
    }

    record.affiliations = dedupe_affiliations(std::mem::take(&mut record.affiliations));

    Ok(record)
}

/// Parse a fetched page into a record plus any pending image download.
///
/// Pure and synchronous; all network work happens in [`extract`].
pub fn parse_character_page(
    html: &str,
    url: &str,
    corrections: &CorrectionTable,
) -> (CharacterRecord, Option<ImageJob>) {
    let document = Html::parse_document(html);

    let infobox_sel = Selector::parse("aside.portable-infobox").expect("valid selector");
    let Some(infobox) = document.select(&infobox_sel).next() else {
        tracing::warn!(url = %url, "No infobox found");
        return (CharacterRecord::stub(url), None);
    };

    let mut record = CharacterRecord::stub(url);

    let name_sel = Selector::parse(r#"h2[data-source="name"]"#).expect("valid selector");
    if let Some(name_el) = infobox.select(&name_sel).next() {
        record.name = Some(full_text(name_el).trim().to_string());
    }

    let kanji_sel =
        Selector::parse(r#"[data-source="kanji"] .pi-data-value"#).expect("valid selector");
    if let Some(kanji_el) = infobox.select(&kanji_sel).next() {
        let kanji: String = stripped_text(kanji_el)
            .chars()
            .filter(|&c| c as u32 > 127)
            .collect();
        if !kanji.is_empty() {
            record.kanji = Some(kanji);
        }
    }

    // Provisional image URL; superseded if the high-fidelity figure
    // below downloads successfully.
    let anchor_sel = Selector::parse(".wds-tab__content.wds-is-current figure a")
        .expect("valid selector");
    if let Some(anchor) = infobox.select(&anchor_sel).next() {
        if let Some(href) = anchor.value().attr("href") {
            record.image = Some(href.to_string());
        }
    }

    let pi_data_sel = Selector::parse("div.pi-data").expect("valid selector");
    let label_sel = Selector::parse(".pi-data-label").expect("valid selector");
    let value_sel = Selector::parse(".pi-data-value").expect("valid selector");

    for item in infobox.select(&pi_data_sel) {
        let (Some(label_el), Some(value_el)) =
            (item.select(&label_sel).next(), item.select(&value_sel).next())
        else {
            continue;
        };

        let label = full_text(label_el).trim().to_lowercase();
        let value = joined_text(value_el, " | ");

        record.aliases = extract_aliases(&document);

        if label.contains("quirk") {
            MERGE_POLICY.apply(&mut record.quirks, parse_quirks(&value));
        } else if label.contains("affiliation") {
            MERGE_POLICY.apply(&mut record.affiliations, parse_affiliations(&value, corrections));
        }
    }

    let figure_sel = Selector::parse("figure.pi-item.pi-image img").expect("valid selector");
    let image_job = match (&record.name, infobox.select(&figure_sel).next()) {
        (Some(name), Some(img)) => img.value().attr("src").map(|src| ImageJob {
            source_url: src.to_string(),
            filename: format!("{}.png", slugify(name)),
        }),
        _ => None,
    };

    (record, image_job)
}

/// Pull aliases from the dedicated alias row, searched on the whole
/// document. Independent of the field loop's position, so recomputing
/// it per row is idempotent.
fn extract_aliases(document: &Html) -> Vec<String> {
    let alias_sel =
        Selector::parse(r#"div[data-source="alias"] .pi-data-value"#).expect("valid selector");
    match document.select(&alias_sel).next() {
        Some(value_el) => filter_aliases(&joined_text(value_el, "|"), '|'),
        None => Vec::new(),
    }
}

/// All text under an element, concatenated as-is.
fn full_text(el: ElementRef) -> String {
    el.text().collect()
}

/// All text under an element with each text node trimmed and empties
/// dropped, concatenated without separator.
fn stripped_text(el: ElementRef) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// All text under an element with each text node trimmed and empties
/// dropped, joined by `separator`. Markup boundaries inside the value
/// become delimiters the field parsers can split on.
fn joined_text(el: ElementRef, separator: &str) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

fn cache_page(cache_dir: &std::path::Path, url: &str, html: &str) {
    let filename = format!("{}.html", slugify(url));
    let path = cache_dir.join(filename);
    let result = std::fs::create_dir_all(cache_dir).and_then(|_| std::fs::write(&path, html));
    match result {
        Ok(()) => tracing::debug!(path = %path.display(), bytes = html.len(), "Cached raw HTML"),
        Err(err) => tracing::warn!(path = %path.display(), error = %err, "Failed to cache HTML"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herodex_model::{Affiliation, Quirk};

    const URL: &str = "https://wiki.example.org/wiki/Izuku_Midoriya";

    fn page(infobox_body: &str) -> String {
        format!(
            "<html><body><main><aside class=\"portable-infobox\">{infobox_body}</aside>\
             <p>Article body text.</p></main></body></html>"
        )
    }

    #[test]
    fn test_full_extraction() {
        let html = page(
            r#"
            <h2 data-source="name">Izuku Midoriya</h2>
            <div class="wds-tab__content wds-is-current">
              <figure><a href="https://static.example.org/izuku-tab.png">tab</a></figure>
            </div>
            <figure class="pi-item pi-image">
              <img src="https://static.example.org/izuku-full.png">
            </figure>
            <div class="pi-data" data-source="kanji">
              <h3 class="pi-data-label">Kanji</h3>
              <div class="pi-data-value">緑谷出久 (Midoriya Izuku)</div>
            </div>
            <div class="pi-data" data-source="alias">
              <h3 class="pi-data-label">Alias</h3>
              <div class="pi-data-value">Dekiru<br>hero<br>デク</div>
            </div>
            <div class="pi-data" data-source="quirk">
              <h3 class="pi-data-label">Quirk</h3>
              <div class="pi-data-value">One For All (inherited)</div>
            </div>
            <div class="pi-data" data-source="affiliation">
              <h3 class="pi-data-label">Affiliation</h3>
              <div class="pi-data-value">U.A. High School<br>(Formerly)<br>Class 1-A</div>
            </div>
            "#,
        );

        let (record, job) = parse_character_page(&html, URL, &CorrectionTable::empty());

        assert_eq!(record.name.as_deref(), Some("Izuku Midoriya"));
        // Latin annotation discarded, non-ASCII kept.
        assert_eq!(record.kanji.as_deref(), Some("緑谷出久"));
        assert_eq!(record.aliases, vec!["Dekiru"]);
        assert_eq!(record.quirks, vec![Quirk::with_note("One For All", "inherited")]);
        assert_eq!(
            record.affiliations,
            vec![
                Affiliation::with_note("U.A. High School", "Formerly"),
                Affiliation::new("Class 1-A"),
            ]
        );
        // Provisional image from the tab anchor, pending the figure job.
        assert_eq!(record.image.as_deref(), Some("https://static.example.org/izuku-tab.png"));
        assert_eq!(
            job,
            Some(ImageJob {
                source_url: "https://static.example.org/izuku-full.png".to_string(),
                filename: "izuku-midoriya.png".to_string(),
            })
        );
    }

    #[test]
    fn test_missing_infobox_yields_stub() {
        let html = "<html><body><p>Disambiguation page.</p></body></html>";
        let (record, job) = parse_character_page(html, URL, &CorrectionTable::empty());
        assert_eq!(record, CharacterRecord::stub(URL));
        assert!(job.is_none());
        assert!(!record.is_complete());
    }

    #[test]
    fn test_last_matching_field_wins() {
        let html = page(
            r#"
            <h2 data-source="name">Shoto Todoroki</h2>
            <div class="pi-data">
              <h3 class="pi-data-label">Quirk</h3>
              <div class="pi-data-value">Fire</div>
            </div>
            <div class="pi-data">
              <h3 class="pi-data-label">Quirk</h3>
              <div class="pi-data-value">Half-Cold Half-Hot</div>
            </div>
            "#,
        );
        let (record, _) = parse_character_page(&html, URL, &CorrectionTable::empty());
        assert_eq!(record.quirks, vec![Quirk::new("Half-Cold Half-Hot")]);
    }

    #[test]
    fn test_malformed_field_skipped() {
        let html = page(
            r#"
            <h2 data-source="name">Present Mic</h2>
            <div class="pi-data">
              <div class="pi-data-value">orphaned value, no label</div>
            </div>
            <div class="pi-data">
              <h3 class="pi-data-label">Quirk</h3>
              <div class="pi-data-value">Voice</div>
            </div>
            "#,
        );
        let (record, _) = parse_character_page(&html, URL, &CorrectionTable::empty());
        assert_eq!(record.quirks, vec![Quirk::new("Voice")]);
    }

    #[test]
    fn test_kanji_all_ascii_omitted() {
        let html = page(
            r#"
            <h2 data-source="name">All Might</h2>
            <div class="pi-data" data-source="kanji">
              <h3 class="pi-data-label">Kanji</h3>
              <div class="pi-data-value">All Might</div>
            </div>
            "#,
        );
        let (record, _) = parse_character_page(&html, URL, &CorrectionTable::empty());
        assert!(record.kanji.is_none());
    }

    #[test]
    fn test_no_image_job_without_name() {
        let html = page(
            r#"
            <figure class="pi-item pi-image">
              <img src="https://static.example.org/mystery.png">
            </figure>
            "#,
        );
        let (record, job) = parse_character_page(&html, URL, &CorrectionTable::empty());
        assert!(record.name.is_none());
        assert!(job.is_none());
    }
}
