//! Request and response payload logging.
//!
//! Enabled by `observability.log_payloads`. Everything is emitted at debug
//! level under the `api_orchestrator::payload` target so it can be filtered
//! separately from call-level events.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::Value;

use crate::envelope::ResponseCodeTable;
use crate::transport::{RequestTarget, TransportFailure};

pub fn log_request(target: &RequestTarget, request: &reqwest::Request) {
    let body = request
        .body()
        .and_then(|b| b.as_bytes())
        .map(pretty_json)
        .unwrap_or_default();

    tracing::debug!(
        target: "api_orchestrator::payload",
        request = %target.label(),
        method = %request.method(),
        url = %request.url(),
        headers = %format_headers(request.headers()),
        body = %body,
        "Network request"
    );
}

pub fn log_response(
    target: &RequestTarget,
    url: &str,
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
    codes: &ResponseCodeTable,
) {
    let code = envelope_code(body);
    let failed = !status.is_success() || code.as_deref().map_or(true, |c| !codes.is_success(c));

    tracing::debug!(
        target: "api_orchestrator::payload",
        request = %target.label(),
        url = %url,
        status = status.as_u16(),
        response_code = code.as_deref().unwrap_or("nil"),
        failed,
        headers = %format_headers(headers),
        body = %pretty_json(body),
        "Network response"
    );
}

pub fn log_failure(target: &RequestTarget, failure: &TransportFailure) {
    let body = failure.response_body.as_deref().map(pretty_json).unwrap_or_default();
    tracing::debug!(
        target: "api_orchestrator::payload",
        request = %target.label(),
        kind = ?failure.kind,
        error = %failure.description,
        body = %body,
        "Network error"
    );
}

/// Pretty-print JSON, or return the bytes as lossy UTF-8.
pub fn pretty_json(bytes: &[u8]) -> String {
    serde_json::from_slice::<Value>(bytes)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| String::from_utf8_lossy(bytes).into_owned())
}

fn envelope_code(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value.get("code")?.as_str().map(str::to_string)
}

fn format_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if name == reqwest::header::AUTHORIZATION {
                "<redacted>"
            } else {
                value.to_str().unwrap_or("<binary>")
            };
            format!("{name}: {shown}")
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderValue, AUTHORIZATION};

    #[test]
    fn test_pretty_json() {
        assert_eq!(pretty_json(br#"{"a":1}"#), "{\n  \"a\": 1\n}");
        assert_eq!(pretty_json(b"plain text"), "plain text");
    }

    #[test]
    fn test_envelope_code() {
        assert_eq!(envelope_code(br#"{"code":"00000"}"#), Some("00000".to_string()));
        assert_eq!(envelope_code(br#"{"code":1}"#), None);
        assert_eq!(envelope_code(b"nope"), None);
    }

    #[test]
    fn test_authorization_is_redacted() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer secret"));
        headers.insert("x-client", HeaderValue::from_static("app"));

        let formatted = format_headers(&headers);
        assert!(!formatted.contains("secret"));
        assert!(formatted.contains("x-client: app"));
    }
}
