//! Response validation shared by every configurator call.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::error;

use super::error::ApiError;

/// Status every configurator endpoint answers with on success.
pub const EXPECTED_STATUS: u16 = 200;

/// Longest body prefix written to logs.
const LOG_BODY_PREVIEW: usize = 500;

fn preview(body: &str) -> String {
    body.chars().take(LOG_BODY_PREVIEW).collect()
}

/// Check the status, then parse the body as JSON.
///
/// A status mismatch is always reported as [`ApiError::StatusCode`], even
/// when the body is not JSON either.
pub fn validate(status: u16, body: &str, expected_status: u16) -> Result<Value, ApiError> {
    if status != expected_status {
        error!(
            status,
            expected_status,
            body = %preview(body),
            "Configurator returned unexpected status"
        );
        return Err(ApiError::StatusCode {
            status,
            expected: expected_status,
            body: body.to_owned(),
        });
    }

    serde_json::from_str(body).map_err(|e| {
        error!(
            line = e.line(),
            column = e.column(),
            error = %e,
            "Failed to parse configurator response"
        );
        ApiError::parsing(&e, body)
    })
}

fn shape_error(e: &serde_json::Error, body: &str) -> ApiError {
    error!(
        line = e.line(),
        column = e.column(),
        error = %e,
        body = %preview(body),
        "Unexpected configurator response shape"
    );
    ApiError::parsing(e, body)
}

/// Decode a validated body into typed records.
///
/// Shape errors keep the line and column within `body`.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| shape_error(&e, body))
}

/// Decode one element already split out of `body`.
///
/// A value has no source text, so shape errors report line and column 0.
pub fn decode_value<T: DeserializeOwned>(value: Value, body: &str) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| shape_error(&e, body))
}
