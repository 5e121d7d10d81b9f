// Batch orchestration.
//
// Strictly serial: one page at a time with a randomized politeness
// delay between fetches. A failed reference is logged and skipped; an
// incomplete record (no name) is logged and dropped. Kept records are
// checkpointed to the output file periodically and written once more
// at the end.

use std::time::Duration;

use anyhow::Result;
use rand::Rng;

use herodex_model::{io, CharacterRecord};
use herodex_parse::affiliations::CorrectionTable;

use crate::config::{AcquireConfig, BatchConfig};
use crate::{fetch, infobox};

/// Run the extraction pipeline over an ordered list of page URLs and
/// write the kept records to `batch.output` as one JSON array.
///
/// Returns the kept records. The caller slices `urls` beforehand to
/// resume a partial run.
pub async fn run(
    urls: &[String],
    batch: &BatchConfig,
    acquire: &AcquireConfig,
    corrections: &CorrectionTable,
) -> Result<Vec<CharacterRecord>> {
    let client = fetch::build_client()?;
    let total = urls.len();
    let mut kept: Vec<CharacterRecord> = Vec::new();

    for (i, url) in urls.iter().enumerate() {
        tracing::info!(page = i + 1, total, url = %url, "Extracting");

        let result = infobox::extract(&client, url, acquire, corrections).await;

        politeness_pause(batch).await;

        let record = match result {
            Ok(record) => record,
            Err(err) => {
                tracing::error!(url = %url, error = %err, "Extraction failed, continuing");
                continue;
            }
        };

        if !record.is_complete() {
            tracing::warn!(url = %record.url, "Skipping incomplete entry");
            continue;
        }

        tracing::debug!(
            name = record.name.as_deref().unwrap_or_default(),
            aliases = record.aliases.len(),
            quirks = record.quirks.len(),
            affiliations = record.affiliations.len(),
            "Extracted record"
        );
        kept.push(record);

        if batch.checkpoint_every > 0 && kept.len() % batch.checkpoint_every == 0 {
            io::write_records(&batch.output, &kept)?;
            tracing::info!(records = kept.len(), path = %batch.output.display(), "Checkpointed output");
        }
    }

    io::write_records(&batch.output, &kept)?;
    tracing::info!(
        records = kept.len(),
        skipped = total - kept.len(),
        path = %batch.output.display(),
        "Wrote character records"
    );

    Ok(kept)
}

/// Sleep for a uniformly random duration within the configured bounds.
async fn politeness_pause(batch: &BatchConfig) {
    let delay_ms = {
        let mut rng = rand::thread_rng();
        rng.gen_range(batch.min_delay_ms..=batch.max_delay_ms)
    };
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
}
