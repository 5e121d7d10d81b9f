pub mod batch;
pub mod config;
pub mod fetch;
pub mod image;
pub mod infobox;

pub use config::{AcquireConfig, BatchConfig, StorageConfig};
