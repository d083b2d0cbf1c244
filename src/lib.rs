pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, DirectoryConfig};

pub use adapters::{DiskCacheStore, FixedLocation, HttpFetcher};
pub use app::{DirectoryBrowser, RenderOutcome};
pub use self::core::{asset_cache::AssetCache, dataset::DatasetStore, search::SearchQuery};
pub use utils::error::{DirectoryError, Result};
