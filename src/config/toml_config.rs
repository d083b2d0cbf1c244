use crate::core::search::DEFAULT_MAX_KM;
use crate::core::ConfigProvider;
use crate::utils::error::{DirectoryError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_source, validate_url,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub dataset: DatasetConfig,
    pub search: SearchConfig,
    pub offline: OfflineConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// http(s) URL or local path of the JSON array of services.
    pub source: String,
    pub data_dir: String,
    pub mirror_key: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            source: "./data/services.json".to_string(),
            data_dir: "./.community-directory".to_string(),
            mirror_key: "services-cache-v1".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub default_max_km: f64,
    /// Upper bound accepted for the radius.
    pub max_radius_km: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_max_km: DEFAULT_MAX_KM,
            max_radius_km: 500.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfflineConfig {
    /// Version-qualified; other names are deleted on activate.
    pub cache_name: String,
    pub cache_dir: String,
    pub base_url: String,
    pub offline_page: String,
    pub assets: Vec<String>,
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            cache_name: "community-directory-v2.0".to_string(),
            cache_dir: "./.community-directory/caches".to_string(),
            base_url: "http://localhost:8080/".to_string(),
            offline_page: "./index.html".to_string(),
            assets: ["./", "./index.html", "./manifest.json", "./app.js", "./data/services.json"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub json: bool,
}

impl DirectoryConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DirectoryError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Like [`DirectoryConfig::from_file`], but a missing file yields the defaults.
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                "No config file at {}, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DirectoryError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATASET_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| DirectoryError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for DirectoryConfig {
    fn validate(&self) -> Result<()> {
        validate_source("dataset.source", &self.dataset.source)?;
        validate_path("dataset.data_dir", &self.dataset.data_dir)?;
        validate_non_empty_string("dataset.mirror_key", &self.dataset.mirror_key)?;

        validate_range("search.max_radius_km", self.search.max_radius_km, 1.0, 20_000.0)?;
        validate_range(
            "search.default_max_km",
            self.search.default_max_km,
            0.0,
            self.search.max_radius_km,
        )?;

        validate_non_empty_string("offline.cache_name", &self.offline.cache_name)?;
        if self.offline.cache_name.contains(['/', '\\']) {
            return Err(DirectoryError::InvalidConfigValueError {
                field: "offline.cache_name".to_string(),
                value: self.offline.cache_name.clone(),
                reason: "Cache name cannot contain path separators".to_string(),
            });
        }
        validate_path("offline.cache_dir", &self.offline.cache_dir)?;
        validate_url("offline.base_url", &self.offline.base_url)?;
        validate_non_empty_string("offline.offline_page", &self.offline.offline_page)?;
        Ok(())
    }
}

impl ConfigProvider for DirectoryConfig {
    fn dataset_source(&self) -> &str {
        &self.dataset.source
    }

    fn mirror_key(&self) -> &str {
        &self.dataset.mirror_key
    }

    fn cache_name(&self) -> &str {
        &self.offline.cache_name
    }

    fn asset_base_url(&self) -> &str {
        &self.offline.base_url
    }

    fn offline_page(&self) -> &str {
        &self.offline.offline_page
    }

    fn asset_manifest(&self) -> &[String] {
        &self.offline.assets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = DirectoryConfig::from_toml_str("").unwrap();
        assert_eq!(config, DirectoryConfig::default());
        assert!(config.validate().is_ok());
        assert_eq!(config.search.default_max_km, 50.0);
        assert_eq!(config.mirror_key(), "services-cache-v1");
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = DirectoryConfig::from_toml_str(
            r#"
[dataset]
source = "https://guide.example/data/services.json"

[offline]
cache_name = "vernon-guide-v2.0"
assets = ["./", "./index.html"]
"#,
        )
        .unwrap();
        assert_eq!(config.dataset_source(), "https://guide.example/data/services.json");
        assert_eq!(config.dataset.data_dir, "./.community-directory");
        assert_eq!(config.cache_name(), "vernon-guide-v2.0");
        assert_eq!(config.asset_manifest().len(), 2);
        assert_eq!(config.offline_page(), "./index.html");
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("COMMUNITY_DIRECTORY_TEST_SOURCE", "https://env.example/s.json");
        let config = DirectoryConfig::from_toml_str(
            r#"
[dataset]
source = "${COMMUNITY_DIRECTORY_TEST_SOURCE}"
"#,
        )
        .unwrap();
        assert_eq!(config.dataset.source, "https://env.example/s.json");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = DirectoryConfig::default();
        config.search.default_max_km = 900.0;
        assert!(config.validate().is_err());

        let mut config = DirectoryConfig::default();
        config.offline.base_url = "file:///tmp".to_string();
        assert!(config.validate().is_err());

        let mut config = DirectoryConfig::default();
        config.offline.cache_name = "../v1".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let err = DirectoryConfig::from_toml_str("[dataset\nsource = 1").unwrap_err();
        assert!(matches!(err, DirectoryError::ConfigValidationError { .. }));
    }
}
