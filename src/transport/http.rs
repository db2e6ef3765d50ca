//! HTTP dispatcher backed by reqwest.
//!
//! # Responsibilities
//! - Resolve target paths against the environment base URL
//! - Attach common headers, target headers and the bearer token
//! - Apply the ordinary or large-payload timeout per target
//! - Map reqwest errors and non-2xx statuses to `TransportFailure`

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;

use crate::config::{ClientConfig, ConfigError, TimeoutConfig};
use crate::envelope::ResponseCodeTable;
use crate::observability::payload;
use crate::transport::auth::{bearer_token, StaticToken, TokenProvider};
use crate::transport::{DispatchError, Dispatcher, RequestTarget, TransportFailure};

/// Production dispatcher.
#[derive(Clone)]
pub struct ReqwestDispatcher {
    client: Client,
    base_url: String,
    timeouts: TimeoutConfig,
    tokens: Arc<dyn TokenProvider>,
    codes: Arc<ResponseCodeTable>,
    log_payloads: bool,
}

impl ReqwestDispatcher {
    /// Build a dispatcher for the configured environment.
    ///
    /// The static token from `[auth]` is used until replaced with
    /// [`ReqwestDispatcher::with_token_provider`].
    pub fn from_config(
        config: &ClientConfig,
        codes: Arc<ResponseCodeTable>,
    ) -> Result<Self, ConfigError> {
        let base_url = config.base_url_string();
        url::Url::parse(&base_url).map_err(|e| ConfigError::BaseUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers.0 {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ConfigError::Client(format!("header `{name}`: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ConfigError::Client(format!("header `{name}`: {e}")))?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(config.timeouts.connect_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        tracing::info!(
            base_url = %base_url,
            environment = ?config.environment,
            request_timeout_secs = config.timeouts.request_secs,
            resource_timeout_secs = config.timeouts.resource_secs,
            "HTTP dispatcher initialized"
        );

        Ok(Self {
            client,
            base_url,
            timeouts: config.timeouts.clone(),
            tokens: Arc::new(StaticToken::new(config.auth.bearer_token.clone())),
            codes,
            log_payloads: config.observability.log_payloads,
        })
    }

    pub fn with_token_provider(mut self, tokens: Arc<dyn TokenProvider>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, target: &RequestTarget) -> Result<url::Url, DispatchError> {
        let joined = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            target.path().trim_start_matches('/')
        );
        url::Url::parse(&joined)
            .map_err(|e| DispatchError::InvalidRequest(format!("{joined}: {e}")))
    }

    fn timeout_for(&self, target: &RequestTarget) -> std::time::Duration {
        if target.is_large_payload() {
            self.timeouts.resource()
        } else {
            self.timeouts.request()
        }
    }

    fn build_request(&self, target: &RequestTarget) -> Result<reqwest::Request, DispatchError> {
        let mut builder = self
            .client
            .request(target.method().clone(), self.url_for(target)?)
            .timeout(self.timeout_for(target));

        if !target.query().is_empty() {
            builder = builder.query(target.query());
        }
        for (name, value) in target.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(token) = bearer_token(self.tokens.as_ref()) {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = target.body() {
            builder = builder.json(body);
        }

        builder
            .build()
            .map_err(|e| DispatchError::InvalidRequest(e.to_string()))
    }

    fn transport_failure(
        &self,
        target: &RequestTarget,
        failure: TransportFailure,
    ) -> DispatchError {
        if self.log_payloads {
            payload::log_failure(target, &failure);
        }
        DispatchError::Transport(failure)
    }
}

#[async_trait]
impl Dispatcher for ReqwestDispatcher {
    async fn dispatch(&self, target: &RequestTarget) -> Result<Vec<u8>, DispatchError> {
        let request = self.build_request(target)?;
        if self.log_payloads {
            payload::log_request(target, &request);
        }

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                return Err(self.transport_failure(target, TransportFailure::from_reqwest(&e)));
            }
        };

        let status = response.status();
        let url = response.url().to_string();
        let headers = response.headers().clone();
        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                return Err(self.transport_failure(target, TransportFailure::from_reqwest(&e)));
            }
        };

        if self.log_payloads {
            payload::log_response(target, &url, status, &headers, &body, &self.codes);
        }

        if status.is_success() {
            Ok(body)
        } else {
            Err(self.transport_failure(target, TransportFailure::status(status.as_u16(), body)))
        }
    }
}

impl std::fmt::Debug for ReqwestDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestDispatcher")
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.timeouts.request_secs)
            .field("resource_timeout_secs", &self.timeouts.resource_secs)
            .finish()
    }
}
