use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Registry request failed: {0}")]
    RegistryRequestError(#[from] reqwest::Error),

    #[error("Institution registry unavailable: {message}")]
    RegistryUnavailable { message: String },

    #[error("Malformed registry entry #{index}: {reason}")]
    MalformedRegistryEntry { index: usize, reason: String },

    #[error("Repository unavailable: {0}")]
    RepositoryUnavailable(#[from] git2::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Registry,
    Repository,
    Output,
    Configuration,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl StatsError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            StatsError::RegistryRequestError(_)
            | StatsError::RegistryUnavailable { .. }
            | StatsError::MalformedRegistryEntry { .. } => ErrorCategory::Registry,
            StatsError::RepositoryUnavailable(_) => ErrorCategory::Repository,
            StatsError::ZipError(_)
            | StatsError::CsvError(_)
            | StatsError::IoError(_)
            | StatsError::SerializationError(_) => ErrorCategory::Output,
            StatsError::ConfigError { .. }
            | StatsError::MissingConfigError { .. }
            | StatsError::InvalidConfigValueError { .. }
            | StatsError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            StatsError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路問題，重試可能成功
            ErrorCategory::Registry => match self {
                StatsError::MalformedRegistryEntry { .. } => ErrorSeverity::High,
                _ => ErrorSeverity::Medium,
            },
            ErrorCategory::Configuration | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Repository | ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            StatsError::RegistryRequestError(_) | StatsError::RegistryUnavailable { .. } => {
                "Check network access to the registry URL, raise --registry-timeout, or pass --registry-file"
            }
            StatsError::MalformedRegistryEntry { .. } => {
                "Every registry entry needs a string 'name' and a 'domains' array of strings"
            }
            StatsError::RepositoryUnavailable(_) => {
                "Make sure --path points at a git repository and the branch exists"
            }
            StatsError::ZipError(_) | StatsError::CsvError(_) | StatsError::IoError(_) => {
                "Check that the output directory is writable and has free space"
            }
            StatsError::SerializationError(_) => "Inspect the registry or report data for invalid JSON",
            StatsError::ConfigError { .. }
            | StatsError::MissingConfigError { .. }
            | StatsError::InvalidConfigValueError { .. }
            | StatsError::ConfigValidationError { .. } => {
                "Review the command line flags and the TOML configuration file"
            }
            StatsError::ProcessingError { .. } => "Re-run with --verbose to see which commit failed",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Registry => format!("Could not load the institution registry: {}", self),
            ErrorCategory::Repository => format!("Could not read the repository: {}", self),
            ErrorCategory::Output => format!("Could not write the report: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Processing => format!("Processing failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_registry_entry_is_high_severity() {
        let err = StatsError::MalformedRegistryEntry {
            index: 3,
            reason: "missing 'domains'".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Registry);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.to_string(), "Malformed registry entry #3: missing 'domains'");
    }

    #[test]
    fn test_repository_errors_are_critical() {
        let err: StatsError = git2::Error::from_str("reference not found").into();
        assert_eq!(err.category(), ErrorCategory::Repository);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().starts_with("Could not read the repository"));
    }
}
