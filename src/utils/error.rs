use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Source unavailable: {url} ({reason})")]
    SourceUnavailable { url: String, reason: String },

    #[error("All price sources unavailable: {}", .attempted.join(", "))]
    AllSourcesUnavailable { attempted: Vec<String> },

    #[error("Empty price data: {message}")]
    EmptyData { message: String },

    #[error("Unparseable timestamp: {raw:?}")]
    TimestampUnparseable { raw: Option<String> },

    #[error("Failed to write output to {path}: {source}")]
    WriteFailure {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_)
            | EtlError::SourceUnavailable { .. }
            | EtlError::AllSourcesUnavailable { .. } => ErrorCategory::Network,
            EtlError::SerializationError(_)
            | EtlError::EmptyData { .. }
            | EtlError::TimestampUnparseable { .. } => ErrorCategory::Data,
            EtlError::IoError(_) | EtlError::WriteFailure { .. } => ErrorCategory::Storage,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單一來源失敗或單筆時間戳異常都會在管道內部恢復
            EtlError::SourceUnavailable { .. } | EtlError::TimestampUnparseable { .. } => {
                ErrorSeverity::Low
            }
            EtlError::ApiError(_) | EtlError::AllSourcesUnavailable { .. } => {
                ErrorSeverity::Medium
            }
            EtlError::SerializationError(_)
            | EtlError::EmptyData { .. }
            | EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            EtlError::IoError(_) | EtlError::WriteFailure { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check network connectivity and the primary/fallback URLs, then rerun"
            }
            ErrorCategory::Data => {
                "The upstream schema may have changed; run probe-sources to inspect the response"
            }
            ErrorCategory::Storage => {
                "Check that the output directory is writable and the disk is not full"
            }
            ErrorCategory::Configuration => {
                "Fix the configuration file, environment variables or command-line flags"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::AllSourcesUnavailable { attempted } => format!(
                "No price data could be fetched (tried {} source(s)); previous output left untouched",
                attempted.len()
            ),
            EtlError::EmptyData { .. } => {
                "The price source returned no usable intervals; previous output left untouched"
                    .to_string()
            }
            EtlError::WriteFailure { path, .. } => {
                format!("Could not write the price file to {}", path)
            }
            other => other.to_string(),
        }
    }

    /// 供 CLI 使用的退出碼，致命錯誤一律非零
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
