//! Call failure taxonomy.

use thiserror::Error;

use crate::envelope::{CodecError, ErrorEnvelope};
use crate::transport::{DispatchError, TransportFailure};

/// Why an attempt, and ultimately a call, failed.
///
/// Retry exhaustion is not a kind of its own: an exhausted call returns the
/// failure of its last attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    /// Network, timeout or non-2xx response.
    #[error("transport failure: {0}")]
    Transport(TransportFailure),

    /// The response did not match the expected envelope. Carries the error
    /// envelope recovered from the payload, or the fallback.
    #[error("undecodable response: {0}")]
    Decode(ErrorEnvelope),

    /// The server reported a non-success code.
    #[error("business error: {0}")]
    Business(ErrorEnvelope),

    /// Anything else, e.g. a request that could not be built.
    #[error("unclassified failure: {0}")]
    Unclassified(String),
}

impl Failure {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Failure::Transport(_) => "transport",
            Failure::Decode(_) => "decode",
            Failure::Business(_) => "business",
            Failure::Unclassified(_) => "unclassified",
        }
    }

    pub fn error_envelope(&self) -> Option<&ErrorEnvelope> {
        match self {
            Failure::Decode(e) | Failure::Business(e) => Some(e),
            Failure::Transport(_) | Failure::Unclassified(_) => None,
        }
    }
}

impl From<CodecError> for Failure {
    fn from(error: CodecError) -> Self {
        match error {
            CodecError::Business(e) => Failure::Business(e),
            CodecError::Malformed(e) => Failure::Decode(e),
        }
    }
}

impl From<DispatchError> for Failure {
    fn from(error: DispatchError) -> Self {
        match error {
            DispatchError::Transport(t) => Failure::Transport(t),
            DispatchError::InvalidRequest(reason) => Failure::Unclassified(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let business = ErrorEnvelope::new("ERR", "99999", "down");
        assert_eq!(
            Failure::from(CodecError::Business(business.clone())),
            Failure::Business(business.clone())
        );
        assert_eq!(Failure::from(CodecError::Malformed(ErrorEnvelope::base())).kind(), "decode");

        let failure = Failure::from(DispatchError::InvalidRequest("bad url".to_string()));
        assert_eq!(failure, Failure::Unclassified("bad url".to_string()));
        assert!(failure.error_envelope().is_none());

        let timeout = TransportFailure::timeout("timed out");
        let failure = Failure::from(DispatchError::Transport(timeout));
        assert_eq!(failure.kind(), "transport");
        assert_eq!(failure.to_string(), "transport failure: timed out");
    }
}
