use crate::domain::model::{AssetResponse, GeoPoint, LocationError};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Key-value blob storage backing the dataset mirror.
pub trait Storage: Send + Sync {
    /// `Ok(None)` when nothing is stored under `key`.
    fn read_file(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<Vec<u8>>>> + Send;
    fn write_file(
        &self,
        key: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn dataset_source(&self) -> &str;
    fn mirror_key(&self) -> &str;
    fn cache_name(&self) -> &str;
    fn asset_base_url(&self) -> &str;
    fn offline_page(&self) -> &str;
    fn asset_manifest(&self) -> &[String];
}

/// Source of the local wall-clock time used by the open-now check.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn locate(&self) -> std::result::Result<GeoPoint, LocationError>;
}

/// Named, versioned stores of cached assets.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Creates the named cache if it does not exist yet.
    async fn open(&self, cache_name: &str) -> Result<()>;
    async fn get(&self, cache_name: &str, url: &str) -> Result<Option<AssetResponse>>;
    async fn put(&self, cache_name: &str, response: &AssetResponse) -> Result<()>;
    async fn cache_names(&self) -> Result<Vec<String>>;
    async fn delete(&self, cache_name: &str) -> Result<bool>;
}

#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Fails only when no response was received at all.
    async fn fetch(&self, url: &url::Url) -> Result<AssetResponse>;
}
