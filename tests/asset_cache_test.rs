use community_directory::core::asset_cache::FetchOutcome;
use community_directory::core::CacheStore;
use community_directory::domain::model::{AssetResponse, ResponseKind};
use community_directory::{AssetCache, DirectoryConfig, DiskCacheStore, HttpFetcher};
use httpmock::prelude::*;
use tempfile::TempDir;

fn config_for(base_url: String, cache_dir: &TempDir, assets: &[&str]) -> DirectoryConfig {
    let mut config = DirectoryConfig::default();
    config.offline.base_url = base_url;
    config.offline.cache_dir = cache_dir.path().to_string_lossy().into_owned();
    config.offline.cache_name = "guide-v2.0".to_string();
    config.offline.assets = assets.iter().map(|a| a.to_string()).collect();
    config
}

fn asset_cache(config: &DirectoryConfig) -> AssetCache<DiskCacheStore, HttpFetcher> {
    AssetCache::new(
        DiskCacheStore::new(&config.offline.cache_dir),
        HttpFetcher::new(&config.offline.base_url).unwrap(),
        config,
    )
    .unwrap()
}

#[tokio::test]
async fn test_install_tolerates_missing_assets_and_serves_from_disk() {
    let cache_dir = TempDir::new().unwrap();
    let server = MockServer::start();

    let index_mock = server.mock(|when, then| {
        when.method(GET).path("/index.html");
        then.status(200)
            .header("Content-Type", "text/html")
            .body("<h1>Guide</h1>");
    });
    server.mock(|when, then| {
        when.method(GET).path("/No_Shelter_Parks.jpg");
        then.status(404);
    });

    let config = config_for(
        server.url("/"),
        &cache_dir,
        &["./index.html", "./No_Shelter_Parks.jpg"],
    );
    let cache = asset_cache(&config);

    let report = cache.install().await.unwrap();
    assert_eq!(report.cached, vec!["./index.html"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "./No_Shelter_Parks.jpg");

    let outcome = cache.fetch("./index.html").await.unwrap();
    assert!(matches!(outcome, FetchOutcome::Cached(_)));
    assert_eq!(outcome.response().body, b"<h1>Guide</h1>");
    assert_eq!(outcome.response().content_type.as_deref(), Some("text/html"));
    index_mock.assert_hits(1);
}

#[tokio::test]
async fn test_network_responses_are_cached_for_later_hits() {
    let cache_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let css_mock = server.mock(|when, then| {
        when.method(GET).path("/style.css");
        then.status(200).body("body{}");
    });

    let config = config_for(server.url("/"), &cache_dir, &[]);
    let cache = asset_cache(&config);

    assert!(matches!(
        cache.fetch("./style.css").await.unwrap(),
        FetchOutcome::Network(_)
    ));
    assert!(matches!(
        cache.fetch("./style.css").await.unwrap(),
        FetchOutcome::Cached(_)
    ));
    css_mock.assert_hits(1);
}

#[tokio::test]
async fn test_unreachable_network_serves_offline_page() {
    let cache_dir = TempDir::new().unwrap();
    // nothing listens on the discard port
    let base_url = "http://127.0.0.1:9/";
    let config = config_for(base_url.to_string(), &cache_dir, &[]);

    let store = DiskCacheStore::new(&config.offline.cache_dir);
    store
        .put(
            "guide-v2.0",
            &AssetResponse {
                url: "http://127.0.0.1:9/index.html".to_string(),
                status: 200,
                kind: ResponseKind::Basic,
                content_type: Some("text/html".to_string()),
                body: b"offline copy".to_vec(),
            },
        )
        .await
        .unwrap();

    let outcome = asset_cache(&config).fetch("./services/food-bank").await.unwrap();
    assert!(matches!(outcome, FetchOutcome::OfflineFallback(_)));
    assert_eq!(outcome.response().body, b"offline copy");
}

#[tokio::test]
async fn test_activate_deletes_previous_versions_on_disk() {
    let cache_dir = TempDir::new().unwrap();
    let config = config_for("http://127.0.0.1:9/".to_string(), &cache_dir, &[]);
    let store = DiskCacheStore::new(&config.offline.cache_dir);
    store.open("guide-v1.0").await.unwrap();
    store.open("guide-v2.0").await.unwrap();

    let deleted = asset_cache(&config).activate().await.unwrap();

    assert_eq!(deleted, vec!["guide-v1.0"]);
    assert!(!cache_dir.path().join("guide-v1.0").exists());
    assert!(cache_dir.path().join("guide-v2.0").exists());
}
