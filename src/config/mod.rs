//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → dispatcher, orchestrator and loading coordinator built from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the response-code table is read-only
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::ClientConfig;
pub use schema::{
    AuthConfig, CodeMeaningConfig, EndpointConfig, Environment, HeaderConfig, ObservabilityConfig,
    ResponseCodeConfig, RetryConfig, TimeoutConfig,
};
