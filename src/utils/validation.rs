use crate::utils::error::{DirectoryError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(DirectoryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(DirectoryError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(DirectoryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// A dataset source is either an http(s) URL or a filesystem path.
pub fn validate_source(field_name: &str, source: &str) -> Result<()> {
    if source.starts_with("http://") || source.starts_with("https://") {
        validate_url(field_name, source)
    } else {
        validate_path(field_name, source)
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(DirectoryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(DirectoryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DirectoryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // written so that NaN fails too
    if !(value >= min && value <= max) {
        return Err(DirectoryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("offline.base_url", "https://example.com").is_ok());
        assert!(validate_url("offline.base_url", "http://example.com").is_ok());
        assert!(validate_url("offline.base_url", "").is_err());
        assert!(validate_url("offline.base_url", "invalid-url").is_err());
        assert!(validate_url("offline.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_source_accepts_paths_and_urls() {
        assert!(validate_source("dataset.source", "./data/services.json").is_ok());
        assert!(validate_source("dataset.source", "https://example.com/services.json").is_ok());
        assert!(validate_source("dataset.source", "").is_err());
        assert!(validate_source("dataset.source", "https://").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("search.max_km", 50.0, 0.0, 500.0).is_ok());
        assert!(validate_range("search.max_km", -1.0, 0.0, 500.0).is_err());
        assert!(validate_range("search.max_km", f64::NAN, 0.0, 500.0).is_err());
    }
}
