//! Loading signal subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrator call start/end
//!     → coordinator.rs (publish bool, arm/cancel forced-reset timer)
//!     → watch channel
//!     → UI subscribers (latest value only, no history)
//! ```
//!
//! # Design Decisions
//! - One coordinator instance per application, injected where needed
//! - At most one forced-reset timer; every start replaces it
//! - Suppressed calls never touch the signal

pub mod coordinator;

pub use coordinator::LoadingCoordinator;
