//! Error classification.
//!
//! # Precedence
//! ```text
//! 1. ignore flag            → stop, silent
//! 2. transport + response  → stop, message from the body or the fallback
//! 3. transport, no response → retry while budget remains, else description
//! 4. decoded error envelope → stop, server message; OK code is logged only
//! 5. unclassified           → as 3
//! budget exhausted          → never retry
//! ```

use crate::envelope::{CodeMeaning, ErrorEnvelope, ResponseCodeTable};
use crate::resilience::failure::Failure;

/// What to do after a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Dispatch again with the remaining budget.
    pub retry: bool,
    /// Message for the user, shown only when the call stops.
    pub message: Option<String>,
}

impl Decision {
    fn retry() -> Self {
        Self {
            retry: true,
            message: None,
        }
    }

    fn stop(message: Option<String>) -> Self {
        Self {
            retry: false,
            message,
        }
    }
}

/// Classify a failure given the attempts left after it.
pub fn classify(
    failure: &Failure,
    remaining: u32,
    ignore: bool,
    codes: &ResponseCodeTable,
) -> Decision {
    if ignore {
        return Decision::stop(None);
    }

    let exhausted = remaining == 0;
    let mut decision = match failure {
        Failure::Transport(transport) => match transport.response_body.as_deref() {
            Some(body) => {
                Decision::stop(Some(ErrorEnvelope::from_slice_or_base(body).user_message()))
            }
            None => retry_or_surface(exhausted, &transport.description),
        },
        Failure::Business(envelope) => classify_business(envelope, codes),
        Failure::Decode(envelope) => {
            if codes.is_success(&envelope.code) {
                tracing::error!(code = %envelope.code, "Success envelope with an unusable body");
                Decision::stop(None)
            } else {
                Decision::stop(Some(envelope.user_message()))
            }
        }
        Failure::Unclassified(description) => retry_or_surface(exhausted, description),
    };

    if exhausted {
        decision.retry = false;
    }
    decision
}

fn retry_or_surface(exhausted: bool, description: &str) -> Decision {
    if exhausted {
        Decision::stop(Some(description.to_string()))
    } else {
        Decision::retry()
    }
}

fn classify_business(envelope: &ErrorEnvelope, codes: &ResponseCodeTable) -> Decision {
    match codes.meaning(&envelope.code) {
        Some(CodeMeaning::Ok) => {
            tracing::error!(code = %envelope.code, "Business error carries the success code");
            debug_assert!(false, "business error with success code {}", envelope.code);
            Decision::stop(None)
        }
        Some(CodeMeaning::SystemError) => Decision::stop(Some(envelope.user_message())),
        Some(CodeMeaning::Business) | None => Decision::stop(Some(envelope.user_message())),
    }
}
