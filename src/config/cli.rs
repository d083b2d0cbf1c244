use crate::core::Storage;
use crate::utils::error::Result;
use std::path::PathBuf;

/// Filesystem-backed [`Storage`]; each key is a file under `base_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let full_path = self.base_path.join(key);
        match tokio::fs::read(&full_path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_file(&self, key: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(key);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}
