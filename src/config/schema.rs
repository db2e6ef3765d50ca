//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the request orchestrator.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Which endpoint the client talks to.
    pub environment: Environment,

    /// Server endpoints per environment.
    pub endpoints: EndpointConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Retry configuration.
    pub retries: RetryConfig,

    /// Static headers attached to every request.
    pub headers: HeaderConfig,

    /// Access token settings.
    pub auth: AuthConfig,

    /// Response codes in addition to the built-in `OK` and `SYSTEM_ERROR`.
    pub response_codes: Vec<ResponseCodeConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ClientConfig {
    /// Base URL for the active environment, including the API prefix.
    pub fn base_url_string(&self) -> String {
        let root = match self.environment {
            Environment::Debug => &self.endpoints.debug_url,
            Environment::Release => &self.endpoints.release_url,
        };
        format!(
            "{}/{}",
            root.trim_end_matches('/'),
            self.endpoints.api_prefix.trim_matches('/')
        )
    }
}

/// Build environment selecting the server endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Debug,
    Release,
}

impl Default for Environment {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Environment::Debug
        } else {
            Environment::Release
        }
    }
}

/// Server endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Test server used by debug builds.
    pub debug_url: String,

    /// Production server.
    pub release_url: String,

    /// Path prefix appended to either server URL.
    pub api_prefix: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            debug_url: "http://localhost:8080".to_string(),
            release_url: "https://api.example.com".to_string(),
            api_prefix: "/api/v1".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Ordinary request timeout in seconds. Also the forced loading reset.
    pub request_secs: u64,

    /// Timeout for large or streaming payloads in seconds.
    pub resource_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,
}

impl TimeoutConfig {
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    pub fn resource(&self) -> Duration {
        Duration::from_secs(self.resource_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 15,
            resource_secs: 60,
            connect_secs: 10,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts granted to a call that does not specify its own budget.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds (0 retries at once).
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 0,
            max_delay_ms: 2000,
        }
    }
}

/// Static request headers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(transparent)]
pub struct HeaderConfig(pub BTreeMap<String, String>);

impl Default for HeaderConfig {
    fn default() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("x-client".to_string(), "api-orchestrator".to_string());
        Self(headers)
    }
}

/// Access token settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// Static bearer token. Empty or absent means no `Authorization` header.
    pub bearer_token: Option<String>,
}

/// An additional server response code.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResponseCodeConfig {
    /// Wire value, e.g. "40100".
    pub code: String,

    /// Symbolic name used in logs, e.g. "TOKEN_EXPIRED".
    pub name: String,

    /// How the classifier treats the code.
    #[serde(default)]
    pub meaning: CodeMeaningConfig,
}

/// Configurable meaning of a response code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CodeMeaningConfig {
    Ok,
    SystemError,
    #[default]
    Business,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format ("pretty" or "json").
    pub log_format: String,

    /// Log full request and response payloads at debug level.
    pub log_payloads: bool,

    /// Install a Prometheus recorder for call metrics (CLI only).
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            log_payloads: cfg!(debug_assertions),
            metrics_enabled: true,
        }
    }
}
