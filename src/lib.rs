//! API request orchestration.
//!
//! Wraps a JSON HTTP API that answers with a standard envelope
//! (`code`, `message`, `status`, `timestamp`, `body`) and gives callers one
//! typed result per logical call, with retries, a global loading signal and
//! user-facing error notifications handled along the way.

// Core call path
pub mod client;
pub mod envelope;
pub mod transport;

// Call lifecycle
pub mod loading;
pub mod notification;
pub mod resilience;

// Cross-cutting concerns
pub mod config;
pub mod observability;

pub use client::{ApiClient, CallOptions};
pub use config::ClientConfig;
pub use envelope::{Envelope, ErrorEnvelope, NoBodyEnvelope, ResponseCodeTable};
pub use loading::LoadingCoordinator;
pub use notification::{ChannelNotifier, LogNotifier, NotificationSink};
pub use resilience::Failure;
pub use transport::{Dispatcher, RequestTarget, ReqwestDispatcher};
