//! Wire envelope types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message shown when a failure carries no usable server message.
pub const FALLBACK_MESSAGE: &str = "데이터 통신에 실패했어요.\n잠시후 다시 시도해 주세요.";

/// Standard wrapper around every successful server response.
///
/// `code` decides whether the exchange succeeded; see
/// [`ResponseCodeTable`](crate::envelope::ResponseCodeTable).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub timestamp: String,
    pub body: T,
}

impl<T> Envelope<T> {
    /// Error view of this envelope's status fields.
    pub fn to_error(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            status: self.status.clone(),
            code: self.code.clone(),
            message: self.message.clone(),
        }
    }
}

/// Envelope for endpoints that return no meaningful body.
pub type NoBodyEnvelope = Envelope<Option<String>>;

/// Structured failure reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message} (status: {status}, code: {code})")]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub status: String,
    pub code: String,
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(
        status: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status: status.into(),
            code: code.into(),
            message: message.into(),
        }
    }

    /// The fixed fallback used when a payload cannot be decoded at all.
    pub fn base() -> Self {
        Self::new("INTERNAL_SERVER_ERROR", "000", FALLBACK_MESSAGE)
    }

    /// Try to read an error envelope from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        serde_json::from_slice(bytes).ok()
    }

    /// Read an error envelope from raw bytes, falling back to [`ErrorEnvelope::base`].
    pub fn from_slice_or_base(bytes: &[u8]) -> Self {
        Self::from_slice(bytes).unwrap_or_else(Self::base)
    }

    /// The message to show a user; blank server messages use the fallback text.
    pub fn user_message(&self) -> String {
        if self.message.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            self.message.clone()
        }
    }
}
