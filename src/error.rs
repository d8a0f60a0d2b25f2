use std::path::PathBuf;

use thiserror::Error;

/// Main error type for namespace and dialect sniffing
#[derive(Error, Debug)]
pub enum SniffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scan aborted at line {line}: {source}")]
    ScanAborted {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed namespace declaration at line {line}, column {column}: {details}")]
    MalformedDeclaration {
        line: usize,
        column: usize,
        details: String,
    },

    #[error("Scan failed: {file} - {details}")]
    ScanFailed { file: PathBuf, details: String },

    #[error("Scan timeout: {file} after {timeout_seconds} seconds")]
    Timeout { file: PathBuf, timeout_seconds: u64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system traversal error: {path} - {reason}")]
    FileSystemTraversal { path: PathBuf, reason: String },

    #[error("Concurrent operation error: {details}")]
    Concurrency { details: String },
}

impl SniffError {
    /// True for faults caused by the document text rather than by I/O
    pub fn is_malformed(&self) -> bool {
        matches!(self, SniffError::MalformedDeclaration { .. })
    }
}

/// Configuration-specific error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment variable error: {0}")]
    Environment(String),

    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

impl From<ConfigError> for SniffError {
    fn from(err: ConfigError) -> Self {
        SniffError::Config(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SniffError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
