//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! RequestTarget
//!     → http.rs (base URL + common headers + token + timeout)
//!     → reqwest
//!     → 2xx: raw body bytes
//!     → network error / non-2xx: TransportFailure (body kept when present)
//! ```
//!
//! # Design Decisions
//! - The orchestrator depends on the `Dispatcher` trait only; tests inject
//!   scripted dispatchers
//! - One `dispatch` call per attempt; retrying is not the transport's job
//! - Non-2xx statuses are transport failures so the classifier can inspect
//!   their bodies for structured errors

pub mod auth;
pub mod http;
pub mod target;

use async_trait::async_trait;
use thiserror::Error;

pub use auth::{StaticToken, TokenProvider};
pub use http::ReqwestDispatcher;
pub use target::RequestTarget;

/// Coarse cause of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailureKind {
    Timeout,
    Connect,
    /// The server answered with a non-success HTTP status.
    Status(u16),
    /// The response body could not be read.
    Body,
    Other,
}

/// Failure below the envelope layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{description}")]
pub struct TransportFailure {
    pub kind: TransportFailureKind,
    pub description: String,
    /// Raw response body when the server answered, empty or not. `None`
    /// means no response arrived at all.
    pub response_body: Option<Vec<u8>>,
}

impl TransportFailure {
    pub fn new(kind: TransportFailureKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            response_body: None,
        }
    }

    pub fn timeout(description: impl Into<String>) -> Self {
        Self::new(TransportFailureKind::Timeout, description)
    }

    /// Non-success HTTP status. The body is kept even when empty.
    pub fn status(code: u16, body: Vec<u8>) -> Self {
        Self {
            kind: TransportFailureKind::Status(code),
            description: format!("Server responded with status {code}"),
            response_body: Some(body),
        }
    }

    pub(crate) fn from_reqwest(error: &reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            TransportFailureKind::Timeout
        } else if error.is_connect() {
            TransportFailureKind::Connect
        } else if error.is_body() || error.is_decode() {
            TransportFailureKind::Body
        } else {
            TransportFailureKind::Other
        };
        Self::new(kind, error.to_string())
    }
}

/// Error returned by a dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The request went out (or tried to) and failed.
    #[error(transparent)]
    Transport(TransportFailure),

    /// The request could not be built (bad URL, header or body).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<TransportFailure> for DispatchError {
    fn from(failure: TransportFailure) -> Self {
        DispatchError::Transport(failure)
    }
}

/// Executes one attempt of a request.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, target: &RequestTarget) -> Result<Vec<u8>, DispatchError>;
}
