//! Envelope decoding.
//!
//! # Responsibilities
//! - Decode response bytes into the envelope
//! - Split success from failure by the embedded response code
//! - Recover from structurally invalid payloads without panicking
//!
//! The code is checked before the body is interpreted, so a failure envelope
//! without a body still surfaces as a business error.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::envelope::codes::ResponseCodeTable;
use crate::envelope::types::{Envelope, ErrorEnvelope, NoBodyEnvelope};

/// Why a payload did not yield a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Well-formed envelope whose code is not the success code.
    #[error("business error: {0}")]
    Business(ErrorEnvelope),

    /// The payload did not match the expected envelope; carries the error
    /// envelope recovered from the raw bytes, or the fallback.
    #[error("malformed payload: {0}")]
    Malformed(ErrorEnvelope),
}

/// Decode a payload and return its typed body.
pub fn decode<T: DeserializeOwned>(
    bytes: &[u8],
    codes: &ResponseCodeTable,
) -> Result<T, CodecError> {
    let envelope = decode_envelope(bytes, codes)?;
    serde_json::from_value(envelope.body.unwrap_or(Value::Null)).map_err(|e| {
        tracing::debug!(error = %e, "Envelope body does not match expected type");
        malformed(bytes)
    })
}

/// Decode a payload whose body is optional and return the whole envelope.
pub fn decode_no_body(
    bytes: &[u8],
    codes: &ResponseCodeTable,
) -> Result<NoBodyEnvelope, CodecError> {
    let envelope = decode_envelope(bytes, codes)?;
    let body = match envelope.body {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => {
            tracing::debug!(body = %other, "No-body envelope carried a non-string body");
            return Err(malformed(bytes));
        }
    };
    Ok(Envelope {
        code: envelope.code,
        message: envelope.message,
        status: envelope.status,
        timestamp: envelope.timestamp,
        body,
    })
}

/// Decode the outer envelope and reject non-success codes.
fn decode_envelope(
    bytes: &[u8],
    codes: &ResponseCodeTable,
) -> Result<Envelope<Option<Value>>, CodecError> {
    let envelope: Envelope<Option<Value>> = serde_json::from_slice(bytes).map_err(|e| {
        tracing::debug!(error = %e, "Payload is not a response envelope");
        malformed(bytes)
    })?;

    if codes.is_success(&envelope.code) {
        Ok(envelope)
    } else {
        Err(CodecError::Business(envelope.to_error()))
    }
}

fn malformed(bytes: &[u8]) -> CodecError {
    CodecError::Malformed(ErrorEnvelope::from_slice_or_base(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Point {
        x: i64,
    }

    fn codes() -> ResponseCodeTable {
        ResponseCodeTable::builtin()
    }

    #[test]
    fn test_ok_envelope_returns_body() {
        let bytes = br#"{"code":"00000","message":"success","status":"OK","timestamp":"2024-10-29","body":{"x":1}}"#;
        assert_eq!(decode::<Point>(bytes, &codes()), Ok(Point { x: 1 }));
    }

    #[test]
    fn test_minimal_ok_envelope() {
        let bytes = br#"{"code":"00000","body":{"x":1}}"#;
        assert_eq!(decode::<Point>(bytes, &codes()), Ok(Point { x: 1 }));
    }

    #[test]
    fn test_non_ok_code_is_business_error() {
        let bytes = br#"{"code":"99999","message":"system down","status":"INTERNAL_SERVER_ERROR","timestamp":"t","body":null}"#;
        assert_eq!(
            decode::<Point>(bytes, &codes()),
            Err(CodecError::Business(ErrorEnvelope::new(
                "INTERNAL_SERVER_ERROR",
                "99999",
                "system down"
            )))
        );
    }

    #[test]
    fn test_unknown_code_without_body_is_business_error() {
        let bytes = br#"{"code":"40400","message":"not found"}"#;
        let err = decode::<Point>(bytes, &codes()).unwrap_err();
        assert_eq!(err, CodecError::Business(ErrorEnvelope::new("", "40400", "not found")));
    }

    #[test]
    fn test_body_type_mismatch_falls_back_to_error_envelope() {
        let bytes = br#"{"code":"00000","message":"success","status":"OK","body":{"y":"nope"}}"#;
        let err = decode::<Point>(bytes, &codes()).unwrap_err();
        assert_eq!(err, CodecError::Malformed(ErrorEnvelope::new("OK", "00000", "success")));
    }

    #[test]
    fn test_bare_error_envelope() {
        let bytes = br#"{"status":"UNAUTHORIZED","message":"login required","code":401}"#;
        // `code` is a number here, so neither shape matches.
        assert_eq!(
            decode::<Point>(bytes, &codes()),
            Err(CodecError::Malformed(ErrorEnvelope::base()))
        );
    }

    #[test]
    fn test_garbage_yields_fallback() {
        let payloads: [&[u8]; 5] = [b"", b"<html>502</html>", b"{", b"[1,2,3]", b"null"];
        for bytes in payloads {
            let err = decode::<Point>(bytes, &codes()).unwrap_err();
            assert_eq!(err, CodecError::Malformed(ErrorEnvelope::base()));
        }
    }

    #[test]
    fn test_unit_body() {
        let bytes = br#"{"code":"00000","message":"","status":"OK","timestamp":"t","body":null}"#;
        assert_eq!(decode::<()>(bytes, &codes()), Ok(()));
    }

    #[test]
    fn test_no_body_variant() {
        let absent = br#"{"code":"00000","message":"done","status":"OK","timestamp":"t"}"#;
        let envelope = decode_no_body(absent, &codes()).unwrap();
        assert_eq!(envelope.body, None);
        assert_eq!(envelope.message, "done");

        let text = br#"{"code":"00000","message":"done","status":"OK","timestamp":"t","body":"ok"}"#;
        assert_eq!(decode_no_body(text, &codes()).unwrap().body.as_deref(), Some("ok"));

        let failed = br#"{"code":"99999","message":"boom","status":"ERR","timestamp":"t"}"#;
        assert_eq!(
            decode_no_body(failed, &codes()),
            Err(CodecError::Business(ErrorEnvelope::new("ERR", "99999", "boom")))
        );

        let object = br#"{"code":"00000","message":"done","status":"OK","body":{"x":1}}"#;
        assert!(matches!(decode_no_body(object, &codes()), Err(CodecError::Malformed(_))));
    }

    #[test]
    fn test_deterministic() {
        let bytes = br#"{"code":"12345","message":"m","status":"s"}"#;
        assert_eq!(decode::<Point>(bytes, &codes()), decode::<Point>(bytes, &codes()));
    }
}
