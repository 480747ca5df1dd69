use std::path::PathBuf;
use thiserror::Error;

/// 抓取單一競爭者頁面失敗。只影響該列，不會中止整個流程。
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP status {status}")]
    Status { status: u16 },

    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl FetchError {
    /// Client errors and malformed URLs will fail the same way on every attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::InvalidUrl { .. } => false,
            FetchError::Status { status } => !(400..500).contains(status),
            FetchError::Timeout { .. } | FetchError::Request(_) => true,
        }
    }
}

/// 頁面結構不符或價格無法解析。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("no element matches price selector '{selector}'")]
    MissingPrice { selector: String },

    #[error("price text '{raw}' is not a number")]
    InvalidPrice { raw: String },

    #[error("invalid CSS selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
}

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("failed to write report to {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Report write failed: {0}")]
    WriteError(#[from] WriteError),
}

impl MonitorError {
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            MonitorError::ConfigError { .. }
                | MonitorError::InvalidConfigValueError { .. }
                | MonitorError::MissingConfigError { .. }
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MonitorError::IoError(e) => format!("Could not read input file: {}", e),
            MonitorError::ConfigError { message } => {
                format!("The configuration file could not be used: {}", message)
            }
            MonitorError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            MonitorError::MissingConfigError { field } => {
                format!("Configuration field '{}' is required", field)
            }
            MonitorError::WriteError(e) => format!("The price report was not written: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MonitorError::IoError(_) => "Check that the configuration file exists and is readable",
            MonitorError::ConfigError { .. } => "Check the TOML syntax of the configuration file",
            MonitorError::InvalidConfigValueError { .. } => {
                "Fix the reported field and run again, or use --dry-run to inspect the plan"
            }
            MonitorError::MissingConfigError { .. } => "Add the missing field to the configuration",
            MonitorError::WriteError(_) => {
                "Check that the output directory is writable and the disk is not full"
            }
        }
    }

    /// 1 = 配置錯誤, 2 = 報表寫入失敗
    pub fn exit_code(&self) -> i32 {
        match self {
            MonitorError::WriteError(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;
