use thiserror::Error;

#[derive(Error, Debug)]
pub enum FuelError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Access token error: {message}")]
    TokenError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid config value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Snapshot error: {message}")]
    SnapshotError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FuelError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FuelError::ApiError(_) | FuelError::TokenError { .. } => ErrorCategory::Network,
            FuelError::MissingConfigError { .. }
            | FuelError::InvalidConfigValueError { .. }
            | FuelError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            FuelError::CsvError(_)
            | FuelError::SerializationError(_)
            | FuelError::ProcessingError { .. } => ErrorCategory::Data,
            FuelError::IoError(_) | FuelError::SnapshotError { .. } => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路類錯誤稍後重試即可
            FuelError::ApiError(_) | FuelError::TokenError { .. } => ErrorSeverity::Medium,
            FuelError::MissingConfigError { .. }
            | FuelError::InvalidConfigValueError { .. }
            | FuelError::ConfigValidationError { .. } => ErrorSeverity::High,
            FuelError::CsvError(_)
            | FuelError::SerializationError(_)
            | FuelError::ProcessingError { .. }
            | FuelError::SnapshotError { .. } => ErrorSeverity::High,
            FuelError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            FuelError::ApiError(_) => {
                "Check network connectivity and NSW API status, then retry".to_string()
            }
            FuelError::TokenError { .. } => {
                "Verify the BASE64_AUTH credential; access tokens expire every 12 hours"
                    .to_string()
            }
            FuelError::MissingConfigError { field } => {
                format!("Provide '{}' via CLI flag or environment variable", field)
            }
            FuelError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}' and run again", field)
            }
            FuelError::ConfigValidationError { .. } => {
                "Fix the configuration file and run again".to_string()
            }
            FuelError::CsvError(_) | FuelError::SerializationError(_) => {
                "The data format is unexpected; re-run with --update to fetch fresh data"
                    .to_string()
            }
            FuelError::ProcessingError { .. } => {
                "Inspect the API response for schema changes".to_string()
            }
            FuelError::SnapshotError { .. } => {
                "Run with --update to create a snapshot first".to_string()
            }
            FuelError::IoError(_) => {
                "Check that the data directory exists and is writable".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            FuelError::ApiError(_) => "Could not reach the NSW fuel API".to_string(),
            FuelError::TokenError { .. } => "Could not obtain an API access token".to_string(),
            FuelError::MissingConfigError { field } => {
                format!("Required configuration '{}' is missing", field)
            }
            FuelError::InvalidConfigValueError { field, value, .. } => {
                format!("Configuration '{}' has an invalid value: {}", field, value)
            }
            FuelError::ConfigValidationError { field, message } => {
                format!("Configuration problem ({}): {}", field, message)
            }
            FuelError::CsvError(_) => "A CSV file could not be processed".to_string(),
            FuelError::SerializationError(_) => "The API response could not be parsed".to_string(),
            FuelError::ProcessingError { message } => {
                format!("Data processing failed: {}", message)
            }
            FuelError::SnapshotError { message } => format!("Snapshot problem: {}", message),
            FuelError::IoError(_) => "A file operation failed".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FuelError>;
