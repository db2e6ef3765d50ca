//! Call orchestration subsystem.
//!
//! # Data Flow
//! ```text
//! caller
//!     → orchestrator.rs (loading start)
//!     → transport (dispatch one attempt)
//!     → envelope (decode)                    ← on bytes
//!     → resilience (classify, spend budget)  ← on any failure
//!     → retry, or loading end + notification
//!     → Result<T, Failure>
//! ```
//!
//! # Design Decisions
//! - Retries are a loop inside one call; only the call brackets the loading
//!   signal
//! - Calls cannot be cancelled once started
//! - Failures never escape as panics; callers get one terminal result

pub mod call;
pub mod orchestrator;

pub use call::{CallId, CallOptions};
pub use orchestrator::ApiClient;
