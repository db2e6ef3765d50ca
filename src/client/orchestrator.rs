//! Request orchestration.
//!
//! # Responsibilities
//! - Bracket each logical call with one loading start and one loading end
//! - Dispatch, decode, classify, and retry within the call's budget
//! - Surface at most one notification per failed call
//!
//! # State Machine
//! ```text
//! Start → Dispatch ─ bytes → Decode ─ OK ──────────────→ Success
//!            │                  └ error ┐
//!            └ transport error ─────────┴→ Classify ─ retry → Dispatch
//!                                                    └ stop  → Failure
//! ```

use std::sync::Arc;
use std::time::Instant;

use serde::de::DeserializeOwned;

use crate::client::call::{CallId, CallOptions};
use crate::config::{ClientConfig, ConfigError, RetryConfig};
use crate::envelope::{self, CodecError, NoBodyEnvelope, ResponseCodeTable};
use crate::loading::LoadingCoordinator;
use crate::notification::NotificationSink;
use crate::observability::metrics;
use crate::resilience::{classify, Failure, RetryBudget};
use crate::transport::{Dispatcher, RequestTarget, ReqwestDispatcher, StaticToken, TokenProvider};

type DecodeFn<T> = fn(&[u8], &ResponseCodeTable) -> Result<T, CodecError>;

/// Orchestrating API client.
///
/// Cheap to clone; clones share the dispatcher, code table, loading
/// coordinator and notification sink.
#[derive(Clone)]
pub struct ApiClient {
    dispatcher: Arc<dyn Dispatcher>,
    codes: Arc<ResponseCodeTable>,
    loading: LoadingCoordinator,
    notifier: Arc<dyn NotificationSink>,
    retries: RetryConfig,
}

impl ApiClient {
    /// Create a client with the built-in response codes and default retries.
    pub fn new(
        dispatcher: Arc<dyn Dispatcher>,
        loading: LoadingCoordinator,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            dispatcher,
            codes: Arc::new(ResponseCodeTable::builtin()),
            loading,
            notifier,
            retries: RetryConfig::default(),
        }
    }

    /// Build the full production stack from configuration.
    ///
    /// Requests carry the static token from `[auth]`, if any.
    pub fn from_config(
        config: &ClientConfig,
        notifier: Arc<dyn NotificationSink>,
    ) -> Result<Self, ConfigError> {
        let tokens = Arc::new(StaticToken::new(config.auth.bearer_token.clone()));
        Self::from_config_with_tokens(config, notifier, tokens)
    }

    /// Like [`ApiClient::from_config`], with access tokens read from `tokens`
    /// on every attempt.
    pub fn from_config_with_tokens(
        config: &ClientConfig,
        notifier: Arc<dyn NotificationSink>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, ConfigError> {
        let codes = Arc::new(ResponseCodeTable::from_config(&config.response_codes));
        let dispatcher =
            ReqwestDispatcher::from_config(config, Arc::clone(&codes))?.with_token_provider(tokens);

        Ok(Self::new(
            Arc::new(dispatcher),
            LoadingCoordinator::from_config(&config.timeouts),
            notifier,
        )
        .with_response_codes(codes)
        .with_retry_config(config.retries.clone()))
    }

    pub fn with_response_codes(mut self, codes: Arc<ResponseCodeTable>) -> Self {
        self.codes = codes;
        self
    }

    pub fn with_retry_config(mut self, retries: RetryConfig) -> Self {
        self.retries = retries;
        self
    }

    /// The coordinator this client reports to.
    pub fn loading(&self) -> &LoadingCoordinator {
        &self.loading
    }

    pub fn response_codes(&self) -> &ResponseCodeTable {
        &self.codes
    }

    /// Run a call and decode the envelope body as `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        target: &RequestTarget,
        options: CallOptions,
    ) -> Result<T, Failure> {
        self.execute(target, options, envelope::decode::<T>).await
    }

    /// Run a call whose envelope has no meaningful body.
    pub async fn request_no_body(
        &self,
        target: &RequestTarget,
        options: CallOptions,
    ) -> Result<NoBodyEnvelope, Failure> {
        self.execute(target, options, envelope::decode_no_body).await
    }

    async fn execute<T>(
        &self,
        target: &RequestTarget,
        options: CallOptions,
        decode: DecodeFn<T>,
    ) -> Result<T, Failure> {
        let call_id = CallId::new();
        let label = target.label();
        let large = target.is_large_payload();
        let ignore = !options.show_loading;
        let started = Instant::now();
        let max_attempts = options.max_attempts.unwrap_or(self.retries.max_attempts);
        let mut budget = RetryBudget::new(max_attempts);

        tracing::debug!(
            call_id = %call_id,
            target = %label,
            method = %target.method(),
            path = %target.path(),
            max_attempts = budget.remaining(),
            "Request started"
        );
        self.loading.set_loading(true, &label, large, ignore);

        loop {
            let attempt = budget.used() + 1;
            let outcome = match self.dispatcher.dispatch(target).await {
                Ok(bytes) => decode(&bytes, &self.codes).map_err(Failure::from),
                Err(e) => Err(Failure::from(e)),
            };

            let failure = match outcome {
                Ok(value) => {
                    metrics::record_attempt(&label, "success");
                    self.loading.set_loading(false, &label, large, ignore);
                    metrics::record_call(&label, "success", started);
                    tracing::info!(
                        call_id = %call_id,
                        target = %label,
                        attempt,
                        elapsed = ?started.elapsed(),
                        "Request succeeded"
                    );
                    return Ok(value);
                }
                Err(failure) => failure,
            };

            metrics::record_attempt(&label, failure.kind());
            let remaining = budget.consume();
            let decision = classify(&failure, remaining, ignore, &self.codes);

            if decision.retry {
                let delay = budget.next_delay(&self.retries);
                tracing::warn!(
                    call_id = %call_id,
                    target = %label,
                    attempt,
                    remaining,
                    delay = ?delay,
                    kind = failure.kind(),
                    error = %failure,
                    "Attempt failed, retrying"
                );
                metrics::record_retry(&label);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                continue;
            }

            self.loading.set_loading(false, &label, large, ignore);
            metrics::record_call(&label, "failure", started);
            tracing::warn!(
                call_id = %call_id,
                target = %label,
                attempt,
                remaining,
                kind = failure.kind(),
                error = %failure,
                notified = decision.message.is_some(),
                "Request failed"
            );

            if let Some(message) = decision.message {
                metrics::record_notification();
                self.notifier.notify(&message);
            }
            return Err(failure);
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("loading", &self.loading)
            .field("retries", &self.retries)
            .finish()
    }
}
