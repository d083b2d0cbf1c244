use crate::domain::model::{AssetResponse, ResponseKind};
use crate::domain::ports::CacheStore;
use crate::utils::error::{DirectoryError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const INDEX_FILE: &str = "index.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntryMeta {
    file: String,
    status: u16,
    kind: ResponseKind,
    content_type: Option<String>,
}

type CacheIndex = BTreeMap<String, EntryMeta>;

/// One directory per cache name under `root`. Each directory holds an
/// `index.json` mapping URLs to entry metadata, and one body file per entry.
#[derive(Debug, Clone)]
pub struct DiskCacheStore {
    root: PathBuf,
}

impl DiskCacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn cache_dir(&self, cache_name: &str) -> Result<PathBuf> {
        if cache_name.is_empty()
            || cache_name.contains(['/', '\\'])
            || cache_name == "."
            || cache_name == ".."
        {
            return Err(DirectoryError::CacheError {
                message: format!("invalid cache name '{}'", cache_name),
            });
        }
        Ok(self.root.join(cache_name))
    }

    async fn read_index(dir: &Path) -> Result<Option<CacheIndex>> {
        match tokio::fs::read(dir.join(INDEX_FILE)).await {
            Ok(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_index(dir: &Path, index: &CacheIndex) -> Result<()> {
        let raw = serde_json::to_vec_pretty(index)?;
        tokio::fs::write(dir.join(INDEX_FILE), raw).await?;
        Ok(())
    }
}

#[async_trait]
impl CacheStore for DiskCacheStore {
    async fn open(&self, cache_name: &str) -> Result<()> {
        let dir = self.cache_dir(cache_name)?;
        tokio::fs::create_dir_all(&dir).await?;
        if Self::read_index(&dir).await?.is_none() {
            Self::write_index(&dir, &CacheIndex::new()).await?;
        }
        Ok(())
    }

    async fn get(&self, cache_name: &str, url: &str) -> Result<Option<AssetResponse>> {
        let dir = self.cache_dir(cache_name)?;
        let Some(index) = Self::read_index(&dir).await? else {
            return Ok(None);
        };
        let Some(meta) = index.get(url) else {
            return Ok(None);
        };
        let body = match tokio::fs::read(dir.join(&meta.file)).await {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("Cache entry for {} lost its body file", url);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Some(AssetResponse {
            url: url.to_string(),
            status: meta.status,
            kind: meta.kind,
            content_type: meta.content_type.clone(),
            body,
        }))
    }

    async fn put(&self, cache_name: &str, response: &AssetResponse) -> Result<()> {
        self.open(cache_name).await?;
        let dir = self.cache_dir(cache_name)?;
        let mut index = Self::read_index(&dir).await?.unwrap_or_default();
        let file = match index.get(&response.url) {
            Some(existing) => existing.file.clone(),
            None => format!("{:08}.body", index.len()),
        };
        tokio::fs::write(dir.join(&file), &response.body).await?;
        index.insert(
            response.url.clone(),
            EntryMeta {
                file,
                status: response.status,
                kind: response.kind,
                content_type: response.content_type.clone(),
            },
        );
        Self::write_index(&dir, &index).await
    }

    async fn cache_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    async fn delete(&self, cache_name: &str) -> Result<bool> {
        let dir = self.cache_dir(cache_name)?;
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
