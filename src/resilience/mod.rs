//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Failed attempt:
//!     → failure.rs (normalize into Transport / Decode / Business / Unclassified)
//!     → retries.rs (spend one attempt from the call's budget)
//!     → classifier.rs (retry silently, or stop with an optional user message)
//!     → retries.rs (delay before the next attempt, zero by default)
//! ```
//!
//! # Design Decisions
//! - Business errors are terminal; only transient failures are retried
//! - A failed response is terminal; only failures without a response retry
//! - Exhaustion forces a stop whatever the failure kind

pub mod classifier;
pub mod failure;
pub mod retries;

pub use classifier::{classify, Decision};
pub use failure::Failure;
pub use retries::RetryBudget;
