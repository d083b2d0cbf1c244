use thiserror::Error;

use crate::domain::model::LocationError;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP {status} returned by {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Import rejected: {message}")]
    ImportError { message: String },

    #[error("Geolocation failed: {0}")]
    GeolocationError(#[from] LocationError),

    #[error("Offline cache error: {message}")]
    CacheError { message: String },

    #[error("No data loaded")]
    NoDataError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Data,
    Configuration,
    Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DirectoryError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) | Self::HttpStatusError { .. } => ErrorCategory::Network,
            Self::IoError(_) | Self::CacheError { .. } => ErrorCategory::Storage,
            Self::SerializationError(_) | Self::ImportError { .. } | Self::NoDataError => {
                ErrorCategory::Data
            }
            Self::UrlError(_)
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
            Self::GeolocationError(_) => ErrorCategory::Location,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Location => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::HttpError(_) | Self::HttpStatusError { .. } => {
                "Check your network connection and the dataset source URL, then retry"
            }
            Self::IoError(_) => "Check that the data and cache directories exist and are writable",
            Self::SerializationError(_) => "The dataset is not valid JSON; run `refresh` to fetch it again",
            Self::UrlError(_) => "Use an absolute http(s) URL",
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => "Review the configuration file and command-line flags",
            Self::ImportError { .. } => "Import a JSON file whose top level is an array of services",
            Self::GeolocationError(_) => "Pass --near LAT,LNG to enable distance filtering",
            Self::CacheError { .. } => "Run `cache install` again or remove the cache directory",
            Self::NoDataError => "Run `refresh` or `import` to load a dataset",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::HttpError(_) | Self::HttpStatusError { .. } => {
                format!("Could not download data: {}", self)
            }
            Self::ImportError { .. } => "Invalid JSON file".to_string(),
            Self::GeolocationError(LocationError::Unsupported) => {
                "Geolocation not supported".to_string()
            }
            Self::GeolocationError(LocationError::Unavailable(_)) => {
                "Could not get your location.".to_string()
            }
            Self::NoDataError => "No service data is loaded".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DirectoryError>;
