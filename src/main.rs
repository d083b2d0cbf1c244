use chrono::NaiveDateTime;
use clap::Parser;
use community_directory::app::cards::render_list;
use community_directory::config::{CacheCommand, Command, SearchArgs};
use community_directory::core::asset_cache::FetchOutcome;
use community_directory::core::dataset::DatasetOrigin;
use community_directory::core::hours::{FixedClock, SystemClock};
use community_directory::core::Clock;
use community_directory::utils::error::ErrorSeverity;
use community_directory::utils::{logger, validation};
use community_directory::utils::validation::Validate;
use community_directory::{
    AssetCache, CliConfig, DatasetStore, DirectoryBrowser, DirectoryConfig, DirectoryError,
    DiskCacheStore, FixedLocation, HttpFetcher, LocalStorage, RenderOutcome, SearchQuery,
};
use std::io::Write;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match DirectoryConfig::from_file_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if cli.log_json || config.logging.json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(cli.command, &config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(command: Command, config: &DirectoryConfig) -> Result<(), DirectoryError> {
    let store = DatasetStore::new(LocalStorage::new(&config.dataset.data_dir), config);

    match command {
        Command::Search(args) => search(args, &store, config).await,
        Command::Categories => {
            let browser = load_browser(&store, SearchQuery::default()).await?;
            for category in browser.categories() {
                println!("{}", category);
            }
            Ok(())
        }
        Command::Refresh => {
            let loaded = store.refresh().await?;
            println!("✅ Mirrored {} services", loaded.services.len());
            Ok(())
        }
        Command::Import { file } => {
            let content = tokio::fs::read(&file).await?;
            let services = store.import(&content).await?;
            println!("✅ Imported {} services from {}", services.len(), file);
            Ok(())
        }
        Command::Export { output } => {
            let data = store.export().await?;
            tokio::fs::write(&output, &data).await?;
            println!("📁 Exported {} bytes to {}", data.len(), output);
            Ok(())
        }
        Command::Cache(command) => cache(command, config).await,
    }
}

async fn load_browser(
    store: &DatasetStore<LocalStorage>,
    query: SearchQuery,
) -> Result<DirectoryBrowser, DirectoryError> {
    let mut browser = DirectoryBrowser::with_query(query);
    let loaded = store.load().await?;
    if loaded.origin == DatasetOrigin::Mirror {
        tracing::debug!("Using mirrored dataset");
    }
    browser.replace_dataset(loaded.services);
    Ok(browser)
}

async fn search(
    args: SearchArgs,
    store: &DatasetStore<LocalStorage>,
    config: &DirectoryConfig,
) -> Result<(), DirectoryError> {
    let max_km = args.max_km.unwrap_or(config.search.default_max_km);
    validation::validate_range("--max-km", max_km, 0.0, config.search.max_radius_km)?;

    let clock: Box<dyn Clock> = match &args.at {
        Some(at) => Box::new(FixedClock(parse_local_time(at)?)),
        None => Box::new(SystemClock),
    };

    let query = SearchQuery {
        text: args.query,
        category: args.category,
        open_now_only: args.open_now,
        user_location: None,
        max_km,
    };
    let mut browser = load_browser(store, query).await?;

    if args.near.is_some() {
        if let Err(e) = browser.locate(&FixedLocation(args.near)).await {
            eprintln!("⚠️ {}", DirectoryError::from(e).user_friendly_message());
        }
    }

    let now = clock.now();
    match browser.render(&now) {
        RenderOutcome::NoData => Err(DirectoryError::NoDataError),
        RenderOutcome::Results(views) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&views)?);
            } else {
                print!("{}", render_list(&views, &now));
            }
            Ok(())
        }
    }
}

fn parse_local_time(value: &str) -> Result<NaiveDateTime, DirectoryError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| DirectoryError::InvalidConfigValueError {
            field: "--at".to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}

async fn cache(command: CacheCommand, config: &DirectoryConfig) -> Result<(), DirectoryError> {
    let cache = AssetCache::new(
        DiskCacheStore::new(&config.offline.cache_dir),
        HttpFetcher::new(&config.offline.base_url)?,
        config,
    )?;

    match command {
        CacheCommand::Install => {
            let report = cache.install().await?;
            println!(
                "✅ Cached {} assets into '{}'",
                report.cached.len(),
                cache.cache_name()
            );
            for (locator, reason) in &report.failed {
                println!("⚠️ {}: {}", locator, reason);
            }
        }
        CacheCommand::Fetch { locator, output } => {
            let outcome = cache.fetch(&locator).await?;
            let source = match &outcome {
                FetchOutcome::Cached(_) => "cache",
                FetchOutcome::Network(_) => "network",
                FetchOutcome::OfflineFallback(_) => "offline fallback",
            };
            tracing::info!("Served {} from {}", locator, source);
            let response = outcome.into_response();
            match output {
                Some(path) => tokio::fs::write(&path, &response.body).await?,
                None => std::io::stdout().write_all(&response.body)?,
            }
        }
        CacheCommand::Activate => {
            let deleted = cache.activate().await?;
            if deleted.is_empty() {
                println!("No old caches to delete");
            }
            for name in deleted {
                println!("🗑️ Deleted {}", name);
            }
        }
    }
    Ok(())
}

