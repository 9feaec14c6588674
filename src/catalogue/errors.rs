//! Error object shared by every API section

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Business error returned by the API: `{code, message, details?}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code identifying the type of error that occurred
    pub code: String,
    /// Human-readable description of the error condition
    pub message: String,
    /// Additional details that can help the caller understand or fix the issue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Create an error without details
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Attach details
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Error response body: `{errors: [...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorList {
    pub errors: Vec<ApiError>,
}

impl From<ErrorList> for Error {
    fn from(list: ErrorList) -> Self {
        Error::Api {
            errors: list.errors,
        }
    }
}

/// Turn an `errors` member of a successful response into `Error::Api`
pub(crate) fn check_errors(errors: Option<Vec<ApiError>>) -> Result<()> {
    match errors {
        Some(errors) if !errors.is_empty() => Err(Error::Api { errors }),
        _ => Ok(()),
    }
}
