//! Per-call identity and options.

use uuid::Uuid;

/// Identifier shared by every log line of one logical call, retries included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallId(Uuid);

impl CallId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CallId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "call-{}", self.0)
    }
}

/// Options for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallOptions {
    /// Drive the loading signal and show error notifications. When false the
    /// call is fully silent: no loading transitions, no notifications and no
    /// retries.
    pub show_loading: bool,

    /// Attempts for this call; the configured default when `None`.
    pub max_attempts: Option<u32>,
}

impl CallOptions {
    /// Options for a background call that must not touch the UI.
    pub fn silent() -> Self {
        Self {
            show_loading: false,
            ..Self::default()
        }
    }

    pub fn with_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            show_loading: true,
            max_attempts: None,
        }
    }
}
