// --- File: crates/calbridge_gcal/src/error.rs ---
//! Classification of hub errors into [`CalbridgeError`].

use calbridge_common::{auth_error, CalbridgeError};
use serde_json::Value;

/// Maps an error from the generated client, keeping the remote classification.
pub fn map_api_error(err: google_calendar3::Error) -> CalbridgeError {
    match err {
        google_calendar3::Error::BadRequest(value) => from_error_body(&value),
        google_calendar3::Error::Failure(response) => {
            let status = response.status();
            CalbridgeError::from_status(
                status.as_u16(),
                None,
                status.canonical_reason().unwrap_or("request failed"),
            )
        }
        google_calendar3::Error::MissingToken(e) => auth_error(e),
        google_calendar3::Error::HttpError(e) => CalbridgeError::Transient(e.to_string()),
        google_calendar3::Error::JsonDecodeError(body, e) => {
            CalbridgeError::Decode(format!("{}: {}", e, body))
        }
        other => CalbridgeError::Internal(other.to_string()),
    }
}

/// Classifies a JSON error body.
///
/// Handles the API shape `{"error": {"code": 404, "message": "...", "errors": [{"reason": "notFound"}]}}`
/// and the OAuth shape `{"error": "invalid_grant", "error_description": "..."}`.
pub fn from_error_body(value: &Value) -> CalbridgeError {
    let error = value.get("error").unwrap_or(value);

    if let Some(code) = error.as_str() {
        let description = value
            .get("error_description")
            .and_then(Value::as_str)
            .unwrap_or_default();
        return auth_error(format!("{} {}", code, description).trim_end());
    }

    let message = error
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("request rejected")
        .to_string();
    let reason = error
        .get("errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
        .and_then(|e| e.get("reason"))
        .and_then(Value::as_str);

    match error
        .get("code")
        .and_then(Value::as_u64)
        .and_then(|code| u16::try_from(code).ok())
    {
        Some(status) => CalbridgeError::from_status(status, reason, message),
        None => CalbridgeError::Remote {
            status: 0,
            message,
        },
    }
}
