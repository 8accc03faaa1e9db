use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    ServerError,
    DecodingError,
}

/// Failure of a single diagnosis fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("server error")]
    ServerError,
    #[error("decoding error: {0}")]
    DecodingError(String),
}

impl FetchError {
    pub fn decoding(reason: impl Into<String>) -> Self {
        Self::DecodingError(reason.into())
    }

    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::ServerError => ErrorCode::ServerError,
            Self::DecodingError(_) => ErrorCode::DecodingError,
        }
    }

    /// Server errors are expected at the configured failure rate; decoding
    /// errors mean the dataset itself is broken.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::ServerError)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown locale code '{0}'")]
pub struct UnknownLocale(pub String);

impl From<serde_json::Error> for FetchError {
    fn from(value: serde_json::Error) -> Self {
        Self::DecodingError(value.to_string())
    }
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
