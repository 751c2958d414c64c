//! The Smite API double-encodes every payload: the HTTP body is an object whose
//! `response` field holds the real payload as a JSON string.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Unwraps both envelope layers and decodes the payload into `T`.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let inner = unwrap(body)?;
    serde_json::from_value(inner).map_err(|error| ApiError::Decode(error.to_string()))
}

/// Unwraps both envelope layers and returns the payload as raw JSON.
pub fn unwrap(body: &str) -> Result<Value, ApiError> {
    let outer: Value = serde_json::from_str(body)
        .map_err(|error| ApiError::Envelope(format!("body is not JSON: {error}")))?;

    let response = outer
        .get("response")
        .ok_or_else(|| ApiError::Envelope("missing `response` field".to_string()))?;

    let Some(encoded) = response.as_str() else {
        return Err(ApiError::Envelope(
            "`response` field is not a string".to_string(),
        ));
    };

    serde_json::from_str(encoded)
        .map_err(|error| ApiError::Envelope(format!("`response` is not JSON: {error}")))
}
