//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrator, dispatcher and loading coordinator produce:
//!     → logging.rs (subscriber setup for structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!     → payload.rs (request/response dumps, debug builds)
//! ```
//!
//! # Design Decisions
//! - Every log line of one call carries the same call ID
//! - Metrics are cheap and go through the `metrics` facade
//! - Payload logging is opt-in and redacts the Authorization header

pub mod logging;
pub mod metrics;
pub mod payload;
