//! Response normalization.
//!
//! Two response conventions coexist on the backend: legacy endpoints return their body
//! as is, newer ones wrap it as `{ success, data, message }`. Which convention applies is
//! fixed per transport through [`ResponseMode`].

use crate::domain::model::Blob;
use crate::utils::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseMode {
    /// Return the raw body unmodified.
    #[default]
    PassThrough,
    /// Unwrap the `{ success, data, message }` envelope.
    Envelope,
}

impl std::str::FromStr for ResponseMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pass-through" | "passthrough" | "v1" => Ok(ResponseMode::PassThrough),
            "envelope" | "v2" => Ok(ResponseMode::Envelope),
            other => Err(format!(
                "unknown response mode '{other}', expected 'pass-through' or 'envelope'"
            )),
        }
    }
}

/// Body as read off the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Binary(Blob),
}

/// The three possible readings of an enveloped response.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Success(Value),
    Failure(String),
    Binary(Blob),
}

/// Classifies a response body under the envelope convention. Pure: no I/O, no logging.
pub fn classify(payload: Payload) -> Envelope {
    match payload {
        Payload::Binary(blob) => {
            if is_json_content_type(blob.content_type.as_deref()) {
                if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(&blob.data) {
                    if map.get("success") == Some(&Value::Bool(false)) {
                        return Envelope::Failure(failure_message(map.get("message")));
                    }
                }
            }
            Envelope::Binary(blob)
        }
        Payload::Json(Value::Object(mut map)) => match map.get("success") {
            Some(Value::Bool(true)) => Envelope::Success(map.remove("data").unwrap_or(Value::Null)),
            Some(Value::Bool(false)) => Envelope::Failure(failure_message(map.get("message"))),
            _ => Envelope::Failure("response envelope has no boolean 'success' field".to_string()),
        },
        Payload::Json(_) => Envelope::Failure("response envelope is not a JSON object".to_string()),
    }
}

/// Applies `mode` to a successfully received body.
pub fn normalize(mode: ResponseMode, payload: Payload) -> Result<Payload> {
    match mode {
        ResponseMode::PassThrough => Ok(payload),
        ResponseMode::Envelope => match classify(payload) {
            Envelope::Success(data) => Ok(Payload::Json(data)),
            Envelope::Binary(blob) => Ok(Payload::Binary(blob)),
            Envelope::Failure(message) => Err(ClientError::Application { message }),
        },
    }
}

/// Reads a 400 response body as the server's diagnostic payload.
pub fn bad_request_payload(body: &[u8]) -> Value {
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

/// Parses a JSON response body; non-JSON text is kept as a string and an empty body is `null`.
pub fn parse_json_body(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

fn is_json_content_type(content_type: Option<&str>) -> bool {
    let Some(content_type) = content_type else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

fn failure_message(message: Option<&Value>) -> String {
    match message {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_yields_data() {
        let payload = Payload::Json(json!({"success": true, "data": {"id": 1}}));
        assert_eq!(classify(payload), Envelope::Success(json!({"id": 1})));
    }

    #[test]
    fn test_success_without_data_yields_null() {
        let payload = Payload::Json(json!({"success": true}));
        assert_eq!(classify(payload), Envelope::Success(Value::Null));
    }

    #[test]
    fn test_failure_envelope_carries_message() {
        let payload = Payload::Json(json!({"success": false, "message": "boom"}));
        assert_eq!(classify(payload), Envelope::Failure("boom".to_string()));

        let err = normalize(
            ResponseMode::Envelope,
            Payload::Json(json!({"success": false, "message": "boom"})),
        )
        .unwrap_err();
        assert!(matches!(err, ClientError::Application { ref message } if message == "boom"));
    }

    #[test]
    fn test_missing_success_flag_is_failure() {
        let payload = Payload::Json(json!({"data": [1, 2]}));
        assert!(matches!(classify(payload), Envelope::Failure(_)));

        assert!(matches!(
            classify(Payload::Json(json!([1, 2]))),
            Envelope::Failure(_)
        ));
    }

    #[test]
    fn test_json_blob_with_failure_is_failure() {
        let blob = Blob::new(br#"{"success":false,"message":"no report"}"#.to_vec())
            .with_content_type("application/json; charset=utf-8");
        assert_eq!(
            classify(Payload::Binary(blob)),
            Envelope::Failure("no report".to_string())
        );
    }

    #[test]
    fn test_json_blob_without_failure_stays_binary() {
        let blob = Blob::new(br#"{"success":true,"data":1}"#.to_vec())
            .with_content_type("application/json");
        assert_eq!(classify(Payload::Binary(blob.clone())), Envelope::Binary(blob));

        let garbage = Blob::new(b"not json".to_vec()).with_content_type("application/json");
        assert_eq!(
            classify(Payload::Binary(garbage.clone())),
            Envelope::Binary(garbage)
        );
    }

    #[test]
    fn test_non_json_blob_is_not_inspected() {
        let blob = Blob::new(br#"{"success":false}"#.to_vec()).with_content_type("text/plain");
        assert_eq!(classify(Payload::Binary(blob.clone())), Envelope::Binary(blob));
    }

    #[test]
    fn test_pass_through_returns_body_unmodified() {
        let body = json!({"success": false, "message": "ignored"});
        let result = normalize(ResponseMode::PassThrough, Payload::Json(body.clone())).unwrap();
        assert_eq!(result, Payload::Json(body));
    }

    #[test]
    fn test_body_parsing_helpers() {
        assert_eq!(parse_json_body(b""), Value::Null);
        assert_eq!(parse_json_body(b"[1]"), json!([1]));
        assert_eq!(parse_json_body(b"plain"), json!("plain"));
        assert_eq!(
            bad_request_payload(br#"{"detail":"question is required"}"#),
            json!({"detail": "question is required"})
        );
        assert_eq!(bad_request_payload(b"bad"), json!("bad"));
    }

    #[test]
    fn test_response_mode_parsing() {
        assert_eq!("envelope".parse::<ResponseMode>(), Ok(ResponseMode::Envelope));
        assert_eq!("v1".parse::<ResponseMode>(), Ok(ResponseMode::PassThrough));
        assert!("xml".parse::<ResponseMode>().is_err());
    }
}
