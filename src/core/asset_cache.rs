//! Cache-first mirror of the static assets needed to browse offline.
//!
//! Install caches each manifest entry on its own, so one missing asset does
//! not leave the whole cache empty. Activate drops every other cache version.

use crate::domain::model::AssetResponse;
use crate::domain::ports::{AssetFetcher, CacheStore, ConfigProvider};
use crate::utils::error::{DirectoryError, Result};
use url::Url;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstallReport {
    pub cached: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl InstallReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Where a served asset came from.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Cached(AssetResponse),
    Network(AssetResponse),
    OfflineFallback(AssetResponse),
}

impl FetchOutcome {
    pub fn response(&self) -> &AssetResponse {
        match self {
            Self::Cached(r) | Self::Network(r) | Self::OfflineFallback(r) => r,
        }
    }

    pub fn into_response(self) -> AssetResponse {
        match self {
            Self::Cached(r) | Self::Network(r) | Self::OfflineFallback(r) => r,
        }
    }
}

pub struct AssetCache<C: CacheStore, F: AssetFetcher> {
    store: C,
    fetcher: F,
    cache_name: String,
    base_url: Url,
    manifest: Vec<String>,
    offline_page: String,
}

impl<C: CacheStore, F: AssetFetcher> AssetCache<C, F> {
    pub fn new<P: ConfigProvider>(store: C, fetcher: F, config: &P) -> Result<Self> {
        Ok(Self {
            store,
            fetcher,
            cache_name: config.cache_name().to_string(),
            base_url: Url::parse(config.asset_base_url())?,
            manifest: config.asset_manifest().to_vec(),
            offline_page: config.offline_page().to_string(),
        })
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    pub fn resolve(&self, locator: &str) -> Result<Url> {
        Ok(self.base_url.join(locator)?)
    }

    pub async fn install(&self) -> Result<InstallReport> {
        tracing::info!("Installing offline cache '{}'", self.cache_name);
        self.store
            .open(&self.cache_name)
            .await
            .map_err(|e| DirectoryError::CacheError {
                message: format!("cannot open cache '{}': {}", self.cache_name, e),
            })?;

        let mut report = InstallReport::default();
        for locator in &self.manifest {
            match self.cache_one(locator).await {
                Ok(()) => report.cached.push(locator.clone()),
                Err(e) => {
                    tracing::warn!("Failed to cache {}: {}", locator, e);
                    report.failed.push((locator.clone(), e.to_string()));
                }
            }
        }

        tracing::info!(
            "Cached {} of {} assets",
            report.cached.len(),
            self.manifest.len()
        );
        Ok(report)
    }

    async fn cache_one(&self, locator: &str) -> Result<()> {
        let url = self.resolve(locator)?;
        let mut response = self.fetcher.fetch(&url).await?;
        if !(200..300).contains(&response.status) {
            return Err(DirectoryError::HttpStatusError {
                status: response.status,
                url: url.to_string(),
            });
        }
        response.url = url.to_string();
        self.store.put(&self.cache_name, &response).await
    }

    /// Cache first, then network, then the offline page.
    pub async fn fetch(&self, locator: &str) -> Result<FetchOutcome> {
        let url = self.resolve(locator)?;
        if let Some(hit) = self.store.get(&self.cache_name, url.as_str()).await? {
            tracing::debug!("Cache hit for {}", url);
            return Ok(FetchOutcome::Cached(hit));
        }

        match self.fetcher.fetch(&url).await {
            Ok(response) => {
                if response.is_cacheable() {
                    let mut stored = response.clone();
                    stored.url = url.to_string();
                    if let Err(e) = self.store.put(&self.cache_name, &stored).await {
                        tracing::warn!("Could not store {} in cache: {}", url, e);
                    }
                }
                Ok(FetchOutcome::Network(response))
            }
            Err(e) => {
                tracing::info!("Fetch failed for {}, serving offline fallback: {}", url, e);
                let fallback = self.resolve(&self.offline_page)?;
                match self.store.get(&self.cache_name, fallback.as_str()).await? {
                    Some(page) => Ok(FetchOutcome::OfflineFallback(page)),
                    None => Err(e),
                }
            }
        }
    }

    /// Delete every cache except the current version; returns the names removed.
    pub async fn activate(&self) -> Result<Vec<String>> {
        let mut deleted = Vec::new();
        for name in self.store.cache_names().await? {
            if name != self.cache_name {
                tracing::info!("Deleting old cache: {}", name);
                if self.store.delete(&name).await? {
                    deleted.push(name);
                }
            }
        }
        Ok(deleted)
    }
}
