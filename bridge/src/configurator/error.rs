//! Configurator API error types.

use thiserror::Error;

/// Any failure talking to the configurator.
///
/// Callers that only need "the service is degraded" match on the whole enum;
/// [`ApiError::kind`] names the specific class for logs.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: DNS, connect, timeout, socket.
    #[error("Configurator connection failed: {0}")]
    Connection(#[source] reqwest::Error),

    /// The configurator answered with an unexpected status.
    #[error("Configurator responded with HTTP {status}, expected {expected}")]
    StatusCode {
        status: u16,
        expected: u16,
        body: String,
    },

    /// Expected status, but the body is not valid JSON (or not the expected shape).
    #[error("Configurator response parse error at line {line} column {column}: {message}")]
    Parsing {
        message: String,
        line: usize,
        column: usize,
        body: String,
    },
}

impl ApiError {
    pub(crate) fn parsing(err: &serde_json::Error, body: &str) -> Self {
        Self::Parsing {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
            body: body.to_owned(),
        }
    }

    /// Short label of the error class.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Connection(_) => "connection",
            Self::StatusCode { .. } => "status_code",
            Self::Parsing { .. } => "parsing",
        }
    }

    /// HTTP status for [`ApiError::StatusCode`].
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::StatusCode { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Connection(e) if e.is_timeout())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Connection(err)
    }
}
