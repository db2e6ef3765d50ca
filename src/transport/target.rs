//! Request target description.

use reqwest::Method;
use serde_json::Value;

/// One endpoint call: where, how and with what payload.
///
/// Targets are defined by the application; the orchestrator only reads them.
#[derive(Debug, Clone)]
pub struct RequestTarget {
    group: String,
    name: String,
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<Value>,
    large_payload: bool,
}

impl RequestTarget {
    /// Create a target. `group` and `name` only feed the log label.
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        method: Method,
        path: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            large_payload: false,
        }
    }

    pub fn get(group: impl Into<String>, name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(group, name, Method::GET, path)
    }

    pub fn post(
        group: impl Into<String>,
        name: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self::new(group, name, Method::POST, path)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Mark the call as carrying a large or streaming payload. Selects the
    /// long transport timeout and the long forced loading reset.
    pub fn large_payload(mut self) -> Self {
        self.large_payload = true;
        self
    }

    /// Log tag, e.g. `[UserApi] - profile`.
    pub fn label(&self) -> String {
        format!("[{}] - {}", self.group, self.name)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn is_large_payload(&self) -> bool {
        self.large_payload
    }
}
