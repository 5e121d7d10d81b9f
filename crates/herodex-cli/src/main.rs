use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use herodex_acquire::{AcquireConfig, BatchConfig, StorageConfig};
use herodex_parse::affiliations::CorrectionTable;

#[derive(Parser)]
#[command(name = "herodex")]
#[command(about = "Character record scraping, normalization, and refinement tool")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape character pages into one JSON record file
    Scrape {
        /// Text file of page URLs, one per line (# comments allowed)
        #[arg(short, long)]
        urls: PathBuf,

        /// Offset into the URL list, for resuming a partial run
        #[arg(long, default_value_t = 0)]
        start: usize,

        /// Process at most this many URLs
        #[arg(long)]
        limit: Option<usize>,

        /// Output file path for the record JSON array
        #[arg(short, long, default_value = "characters.json")]
        output: PathBuf,

        /// Storage root downloaded images are relative to
        #[arg(long, default_value = "media")]
        media_root: PathBuf,

        /// Collection subdirectory under the storage root
        #[arg(long, default_value = "characters")]
        collection: String,

        /// JSON file of garbled-name corrections (defaults to the built-in table)
        #[arg(long)]
        corrections: Option<PathBuf>,

        /// Minimum politeness delay between fetches, in milliseconds
        #[arg(long, default_value_t = 1500)]
        min_delay_ms: u64,

        /// Maximum politeness delay between fetches, in milliseconds
        #[arg(long, default_value_t = 2500)]
        max_delay_ms: u64,

        /// Rewrite the output every N kept records (0 disables checkpointing)
        #[arg(long, default_value_t = 25)]
        checkpoint_every: usize,

        /// Also cache each fetched page as raw HTML in this directory
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },

    /// Post-processing passes over an existing record file
    Refine {
        #[command(subcommand)]
        action: RefineAction,
    },
}

#[derive(Subcommand)]
enum RefineAction {
    /// Strip internal ids and rewrite absolute media URLs to relative paths
    Strip {
        /// Record file to rewrite in place
        file: PathBuf,

        /// Media URL prefix to strip from image paths
        #[arg(long, default_value = herodex_refine::DEFAULT_MEDIA_PREFIX)]
        media_prefix: String,
    },

    /// Sort records by the name of their first affiliation, for review
    SortByAffiliation {
        /// Record file to rewrite in place
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Map log level, suppressing noisy HTML-parsing crates at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }

    match cli.command {
        Commands::Scrape {
            urls,
            start,
            limit,
            output,
            media_root,
            collection,
            corrections,
            min_delay_ms,
            max_delay_ms,
            checkpoint_every,
            cache_dir,
        } => {
            anyhow::ensure!(
                min_delay_ms <= max_delay_ms,
                "--min-delay-ms must not exceed --max-delay-ms"
            );

            let all_urls = read_url_list(&urls)?;
            anyhow::ensure!(
                start <= all_urls.len(),
                "--start {start} is past the end of the list ({} URLs)",
                all_urls.len()
            );
            let mut slice = &all_urls[start..];
            if let Some(limit) = limit {
                slice = &slice[..limit.min(slice.len())];
            }

            let table = match &corrections {
                Some(path) => CorrectionTable::from_file(path)?,
                None => CorrectionTable::builtin(),
            };

            let batch = BatchConfig {
                output,
                min_delay_ms,
                max_delay_ms,
                checkpoint_every,
            };
            let acquire = AcquireConfig {
                storage: StorageConfig::new(media_root, collection),
                cache_dir,
            };

            tracing::info!(
                urls = slice.len(),
                start,
                corrections = table.len(),
                "Scraping character pages"
            );
            let kept = herodex_acquire::batch::run(slice, &batch, &acquire, &table).await?;
            tracing::info!(records = kept.len(), "Scrape complete");
        }
        Commands::Refine { action } => match action {
            RefineAction::Strip { file, media_prefix } => {
                tracing::info!(file = %file.display(), "Stripping and relativizing");
                herodex_refine::strip_file(&file, &media_prefix)?;
            }
            RefineAction::SortByAffiliation { file } => {
                tracing::info!(file = %file.display(), "Sorting by first affiliation");
                herodex_refine::sort_file(&file)?;
            }
        },
    }

    Ok(())
}

/// Read a URL list file: one URL per line, blank lines and `#` comment
/// lines ignored.
fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read URL list {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
