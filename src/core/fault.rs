//! Single normalisation point between transport responses and the typed
//! fault taxonomy. Status codes never travel past this module except in
//! the catch-all `ClientFault`.

use crate::domain::ports::TransportResponse;
use crate::utils::error::{GluonError, Result};
use serde::de::DeserializeOwned;

const MAX_REASON_LEN: usize = 512;

/// Interprets a read: only 200 is success, and its body must parse as `R`.
pub fn decode<R: DeserializeOwned>(response: TransportResponse) -> Result<R> {
    if response.status != 200 {
        return Err(map_status(response.status, reason_from_body(&response.body)));
    }

    serde_json::from_slice(&response.body).map_err(|source| GluonError::MalformedResponse {
        body: String::from_utf8_lossy(&response.body).into_owned(),
        source,
    })
}

/// Interprets a write: any 2xx is accepted and handed back so callers can
/// tell e.g. 201 Created apart from other successes.
pub fn acknowledge(response: TransportResponse) -> Result<TransportResponse> {
    if (200..300).contains(&response.status) {
        Ok(response)
    } else {
        Err(map_status(response.status, reason_from_body(&response.body)))
    }
}

pub fn map_status(status: u16, reason: Option<String>) -> GluonError {
    match status {
        400 => GluonError::BadRequest { reason },
        401 => GluonError::Unauthorized { reason },
        403 => GluonError::Forbidden { reason },
        404 => GluonError::NotFound { reason },
        409 => GluonError::Conflict { reason },
        500 => GluonError::InternalServerError { reason },
        503 => GluonError::ServiceUnavailable { reason },
        status => GluonError::ClientFault { status, reason },
    }
}

/// Re-signals a generic 404 from a single-port fetch as `PortNotFound`.
pub fn port_lookup(err: GluonError, port_id: &str) -> GluonError {
    match err {
        GluonError::NotFound { reason } => GluonError::PortNotFound {
            port_id: port_id.to_string(),
            reason,
        },
        other => other,
    }
}

fn reason_from_body(body: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(serde_json::Value::Object(fields)) = serde_json::from_str::<serde_json::Value>(text) {
        for key in ["message", "error", "detail", "faultstring"] {
            if let Some(serde_json::Value::String(message)) = fields.get(key) {
                return Some(truncate(message));
            }
        }
    }

    Some(truncate(text))
}

fn truncate(text: &str) -> String {
    if text.len() <= MAX_REASON_LEN {
        return text.to_string();
    }
    let mut end = MAX_REASON_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, body: &str) -> TransportResponse {
        TransportResponse {
            status,
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_status_table() {
        assert!(matches!(map_status(400, None), GluonError::BadRequest { .. }));
        assert!(matches!(map_status(401, None), GluonError::Unauthorized { .. }));
        assert!(matches!(map_status(403, None), GluonError::Forbidden { .. }));
        assert!(matches!(map_status(404, None), GluonError::NotFound { .. }));
        assert!(matches!(map_status(409, None), GluonError::Conflict { .. }));
        assert!(matches!(
            map_status(500, None),
            GluonError::InternalServerError { .. }
        ));
        assert!(matches!(
            map_status(503, None),
            GluonError::ServiceUnavailable { .. }
        ));
        assert!(matches!(
            map_status(418, None),
            GluonError::ClientFault { status: 418, .. }
        ));
    }

    #[test]
    fn test_decode_success() {
        let value: serde_json::Value = decode(response(200, r#"{"id": "1"}"#)).unwrap();
        assert_eq!(value, json!({"id": "1"}));
    }

    #[test]
    fn test_decode_malformed_body_keeps_raw_text() {
        let err = decode::<serde_json::Value>(response(200, "<html>oops</html>")).unwrap_err();
        match err {
            GluonError::MalformedResponse { body, .. } => assert_eq!(body, "<html>oops</html>"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_non_200_success() {
        let err = decode::<serde_json::Value>(response(204, "")).unwrap_err();
        assert!(matches!(err, GluonError::ClientFault { status: 204, .. }));
    }

    #[test]
    fn test_acknowledge_accepts_2xx() {
        assert_eq!(acknowledge(response(201, "")).unwrap().status, 201);
        assert!(acknowledge(response(204, "")).is_ok());
        assert!(matches!(
            acknowledge(response(409, "")),
            Err(GluonError::Conflict { reason: None })
        ));
    }

    #[test]
    fn test_reason_extracted_from_json_message() {
        let err = map_status(409, reason_from_body(br#"{"message": "port in use"}"#));
        match err {
            GluonError::Conflict { reason } => assert_eq!(reason.as_deref(), Some("port in use")),
            other => panic!("unexpected error: {:?}", other),
        }

        let reason = reason_from_body(b"  plain text  ");
        assert_eq!(reason.as_deref(), Some("plain text"));
    }

    #[test]
    fn test_long_reason_truncated() {
        let body = "x".repeat(2000);
        let reason = reason_from_body(body.as_bytes()).unwrap();
        assert_eq!(reason.len(), MAX_REASON_LEN + 3);
    }

    #[test]
    fn test_port_lookup_specialises_not_found_only() {
        let err = port_lookup(GluonError::NotFound { reason: None }, "123");
        assert!(matches!(err, GluonError::PortNotFound { ref port_id, .. } if port_id == "123"));

        let err = port_lookup(GluonError::Forbidden { reason: None }, "123");
        assert!(matches!(err, GluonError::Forbidden { .. }));
    }
}
