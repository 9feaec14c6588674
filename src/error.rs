//! Error types for marketplace-kit
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here,
//! except the job watcher, which keeps the last observed status typed in
//! [`WatchError`](crate::watcher::WatchError) and converts into [`Error`].

use crate::catalogue::ApiError;
use std::time::Duration;
use thiserror::Error;

/// The main error type for marketplace-kit
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Rate limited{}", fmt_retry_after(.retry_after))]
    RateLimited { retry_after: Option<Duration> },

    // ============================================================================
    // API Errors
    // ============================================================================
    #[error("API returned {} error(s): {}", .errors.len(), fmt_api_errors(.errors))]
    Api { errors: Vec<ApiError> },

    // ============================================================================
    // Pagination Errors
    // ============================================================================
    #[error("Continuation token '{token}' did not advance")]
    CursorStalled { token: String },

    #[error("Page limit ({max_pages}) exceeded")]
    PageLimitExceeded { max_pages: u64 },

    // ============================================================================
    // Job Watching Errors
    // ============================================================================
    #[error("Job still '{last_status}' after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64, last_status: String },

    #[error("Job watch cancelled")]
    Cancelled { last_status: Option<String> },

    #[error("Status fetch failed: {source}")]
    StatusFetch {
        #[source]
        source: Box<Error>,
    },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

fn fmt_retry_after(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(d) => format!(", retry after {}s", d.as_secs()),
        None => String::new(),
    }
}

fn fmt_api_errors(errors: &[ApiError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.code, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a transport error from a message
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a rate limit error
    pub fn rate_limited(retry_after: Option<Duration>) -> Self {
        Self::RateLimited { retry_after }
    }

    /// Create a status fetch error wrapping the underlying failure
    pub fn status_fetch(source: Error) -> Self {
        Self::StatusFetch {
            source: Box::new(source),
        }
    }

    /// Check if this is a throttling signal
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Error::RateLimited { .. })
    }

    /// Server-suggested wait before retrying, if any
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// Check if this is a network/HTTP-level failure
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::HttpStatus { .. } | Error::Transport { .. }
        )
    }

    /// API business errors carried by this error, if any
    pub fn api_errors(&self) -> Option<&[ApiError]> {
        match self {
            Error::Api { errors } => Some(errors),
            _ => None,
        }
    }
}

/// Result type alias for marketplace-kit
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
