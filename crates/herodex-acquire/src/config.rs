use std::path::{Path, PathBuf};

/// Where acquired images land on disk, threaded explicitly from the CLI
/// so no module carries a process-wide destination default.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage root the stored paths are relative to (e.g. `media/`).
    pub media_root: PathBuf,
    /// Subdirectory under the root for this collection (e.g. `characters`).
    pub collection: String,
}

impl StorageConfig {
    pub fn new(media_root: impl Into<PathBuf>, collection: impl Into<String>) -> Self {
        Self {
            media_root: media_root.into(),
            collection: collection.into(),
        }
    }

    /// Directory files are written into.
    pub fn dir(&self) -> PathBuf {
        self.media_root.join(&self.collection)
    }

    /// The stored value: a path relative to the media root, portable
    /// across deployment hosts.
    pub fn relative_path(&self, filename: &str) -> String {
        format!("{}/{filename}", self.collection)
    }
}

/// Per-page acquisition settings.
#[derive(Debug, Clone)]
pub struct AcquireConfig {
    pub storage: StorageConfig,
    /// When set, every fetched page is also written here as
    /// `<slug-of-url>.html` for offline re-examination.
    pub cache_dir: Option<PathBuf>,
}

/// Batch run settings.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Output JSON array path.
    pub output: PathBuf,
    /// Politeness delay bounds between successive fetches.
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Rewrite the output file every this many kept records, so a
    /// mid-run crash loses at most one window of work. 0 disables
    /// checkpointing.
    pub checkpoint_every: usize,
}

impl BatchConfig {
    pub fn new(output: impl AsRef<Path>) -> Self {
        Self {
            output: output.as_ref().to_path_buf(),
            min_delay_ms: 1500,
            max_delay_ms: 2500,
            checkpoint_every: 25,
        }
    }
}
