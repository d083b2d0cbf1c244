use crate::domain::model::ServiceRecord;
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::{DirectoryError, Result};
use reqwest::Client;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetOrigin {
    Mirror,
    Source,
}

#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub services: Vec<ServiceRecord>,
    pub origin: DatasetOrigin,
}

/// The service dataset plus its local mirror.
///
/// The mirror is a single entry holding the last-known JSON array exactly as
/// it was fetched or imported.
pub struct DatasetStore<S: Storage> {
    storage: S,
    source: String,
    mirror_key: String,
    client: Client,
}

impl<S: Storage> DatasetStore<S> {
    pub fn new<C: ConfigProvider>(storage: S, config: &C) -> Self {
        Self {
            storage,
            source: config.dataset_source().to_string(),
            mirror_key: format!("{}.json", config.mirror_key()),
            client: Client::new(),
        }
    }

    /// Mirror first; on a cold mirror fetch the source and mirror it.
    pub async fn load(&self) -> Result<LoadedDataset> {
        if let Some(raw) = self.storage.read_file(&self.mirror_key).await? {
            tracing::debug!("Loading services from mirror '{}'", self.mirror_key);
            let services = parse_services(&raw)?;
            return Ok(LoadedDataset {
                services,
                origin: DatasetOrigin::Mirror,
            });
        }
        self.refresh().await
    }

    /// Fetch the source and overwrite the mirror.
    pub async fn refresh(&self) -> Result<LoadedDataset> {
        let raw = self.fetch_source().await?;
        let services = parse_services(&raw)?;
        self.storage.write_file(&self.mirror_key, &raw).await?;
        tracing::info!(
            "Mirrored {} services from {} ({} bytes)",
            services.len(),
            self.source,
            raw.len()
        );
        Ok(LoadedDataset {
            services,
            origin: DatasetOrigin::Source,
        })
    }

    /// Replace the mirror with user-supplied content.
    ///
    /// Content that is not a JSON array of services is rejected and the
    /// mirror is left untouched.
    pub async fn import(&self, content: &[u8]) -> Result<Vec<ServiceRecord>> {
        let value: serde_json::Value =
            serde_json::from_slice(content).map_err(|e| DirectoryError::ImportError {
                message: format!("not valid JSON: {}", e),
            })?;
        if !value.is_array() {
            return Err(DirectoryError::ImportError {
                message: "Expected an array".to_string(),
            });
        }
        let services: Vec<ServiceRecord> =
            serde_json::from_value(value).map_err(|e| DirectoryError::ImportError {
                message: format!("array does not hold service records: {}", e),
            })?;

        self.storage.write_file(&self.mirror_key, content).await?;
        tracing::info!("Imported {} services into the mirror", services.len());
        Ok(services)
    }

    /// Current mirror content, or an empty array when nothing is mirrored.
    pub async fn export(&self) -> Result<Vec<u8>> {
        Ok(self
            .storage
            .read_file(&self.mirror_key)
            .await?
            .unwrap_or_else(|| b"[]".to_vec()))
    }

    async fn fetch_source(&self) -> Result<Vec<u8>> {
        if self.source.starts_with("http://") || self.source.starts_with("https://") {
            tracing::debug!("Fetching dataset from {}", self.source);
            let response = self.client.get(&self.source).send().await?;
            let status = response.status();
            tracing::debug!("Dataset response status: {}", status);
            if !status.is_success() {
                return Err(DirectoryError::HttpStatusError {
                    status: status.as_u16(),
                    url: self.source.clone(),
                });
            }
            Ok(response.bytes().await?.to_vec())
        } else {
            tracing::debug!("Reading dataset from {}", self.source);
            Ok(tokio::fs::read(&self.source).await?)
        }
    }
}

pub fn parse_services(raw: &[u8]) -> Result<Vec<ServiceRecord>> {
    Ok(serde_json::from_slice(raw)?)
}
