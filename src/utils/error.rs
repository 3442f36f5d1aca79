use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    ApiStatusError { status: u16, body: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

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
    Io,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Low: 警告但成功, Medium: 可重試, High: 處理錯誤, Critical: 系統錯誤
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) | EtlError::ApiStatusError { .. } => ErrorCategory::Network,
            EtlError::CsvError(_) | EtlError::SerializationError(_) => ErrorCategory::Data,
            EtlError::IoError(_) | EtlError::InputNotFound { .. } => ErrorCategory::Io,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 找不到輸入檔只是提前結束，不算失敗
            EtlError::InputNotFound { .. } => ErrorSeverity::Low,
            EtlError::ApiError(_) | EtlError::ApiStatusError { .. } => ErrorSeverity::Medium,
            EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            EtlError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::ApiError(_) => "Check network connectivity and the Supabase URL",
            EtlError::ApiStatusError { status, .. } if *status == 401 || *status == 403 => {
                "Check that SUPABASE_KEY is a service-role key for this project"
            }
            EtlError::ApiStatusError { .. } => {
                "Check that the target table exists and has a unique constraint on the conflict key"
            }
            EtlError::CsvError(_) => "Make sure the input is a valid UTF-8 CSV export",
            EtlError::IoError(_) => "Check file permissions and available disk space",
            EtlError::SerializationError(_) => "Inspect the prepared records with --dump-path",
            EtlError::InputNotFound { .. } => {
                "Place the CSV export next to the binary or pass --input"
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => {
                "Check command line flags, environment variables and the config file"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::InputNotFound { path } => format!(
                "Could not find {}. Make sure the file is in this folder.",
                path
            ),
            EtlError::ApiStatusError { status, .. } => {
                format!("Supabase rejected the request (HTTP {})", status)
            }
            EtlError::MissingConfigError { field } => {
                format!("Missing required setting: {}", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
