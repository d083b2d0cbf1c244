pub mod cli;
pub mod toml_config;

pub use toml_config::DirectoryConfig;

#[cfg(feature = "cli")]
use crate::domain::model::GeoPoint;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "community-directory")]
#[command(about = "Browse a directory of community services from the terminal")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "community-directory.toml")]
    pub config: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Filter and rank services
    Search(SearchArgs),
    /// List the categories present in the dataset
    Categories,
    /// Fetch the dataset source and overwrite the local mirror
    Refresh,
    /// Replace the local mirror with a JSON file
    Import {
        file: String,
    },
    /// Write the local mirror to a file
    Export {
        #[arg(short, long, default_value = "services-export.json")]
        output: String,
    },
    /// Manage the offline asset cache
    #[command(subcommand)]
    Cache(CacheCommand),
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SearchArgs {
    /// Free-text query over name, description, categories, address and eligibility
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Exact category, or "all"
    #[arg(long)]
    pub category: Option<String>,

    /// Only services open right now
    #[arg(long)]
    pub open_now: bool,

    /// Your location as LAT,LNG; enables distance ranking and the radius filter
    #[arg(long, allow_hyphen_values = true)]
    pub near: Option<GeoPoint>,

    /// Radius in kilometres (defaults to search.default_max_km)
    #[arg(long)]
    pub max_km: Option<f64>,

    /// Evaluate opening hours at this local time (YYYY-MM-DDTHH:MM) instead of now
    #[arg(long)]
    pub at: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum CacheCommand {
    /// Cache every manifest asset, tolerating individual failures
    Install,
    /// Serve one asset cache-first
    Fetch {
        locator: String,
        /// Write the body here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Delete caches from previous versions
    Activate,
}
