//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, attempts >= 1)
//! - Check that endpoints parse and headers are valid HTTP
//! - Keep the response-code table consistent (one success code)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use reqwest::header::{HeaderName, HeaderValue};
use thiserror::Error;

use crate::config::schema::{ClientConfig, CodeMeaningConfig};
use crate::envelope::codes::{OK_CODE, SYSTEM_ERROR_CODE};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("endpoint `{field}` is not a valid URL: {reason}")]
    InvalidUrl { field: &'static str, reason: String },

    #[error("timeout `{0}` must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("resource timeout ({resource}s) is shorter than request timeout ({request}s)")]
    ResourceTimeoutTooShort { request: u64, resource: u64 },

    #[error("retries.max_attempts must be at least 1")]
    NoAttempts,

    #[error("retries.base_delay_ms ({base}) exceeds retries.max_delay_ms ({max})")]
    DelayRange { base: u64, max: u64 },

    #[error("invalid header `{name}`")]
    InvalidHeader { name: String },

    #[error("response code entry `{name}` has an empty code")]
    EmptyCode { name: String },

    #[error("response code `{0}` is defined more than once")]
    DuplicateCode(String),

    #[error("response code `{0}` cannot override a built-in code")]
    BuiltinOverride(String),

    #[error("response code `{0}` cannot claim the OK meaning; only `{OK_CODE}` means success")]
    SecondOkCode(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "endpoints.debug_url", &config.endpoints.debug_url);
    check_url(&mut errors, "endpoints.release_url", &config.endpoints.release_url);

    let timeouts = &config.timeouts;
    if timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }
    if timeouts.resource_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.resource_secs"));
    }
    if timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.connect_secs"));
    }
    if timeouts.resource_secs < timeouts.request_secs {
        errors.push(ValidationError::ResourceTimeoutTooShort {
            request: timeouts.request_secs,
            resource: timeouts.resource_secs,
        });
    }

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::NoAttempts);
    }
    if config.retries.base_delay_ms > config.retries.max_delay_ms {
        errors.push(ValidationError::DelayRange {
            base: config.retries.base_delay_ms,
            max: config.retries.max_delay_ms,
        });
    }

    for (name, value) in &config.headers.0 {
        if HeaderName::from_bytes(name.as_bytes()).is_err()
            || HeaderValue::from_str(value).is_err()
        {
            errors.push(ValidationError::InvalidHeader { name: name.clone() });
        }
    }

    let mut seen = HashSet::new();
    for entry in &config.response_codes {
        if entry.code.trim().is_empty() {
            errors.push(ValidationError::EmptyCode { name: entry.name.clone() });
            continue;
        }
        if entry.code == OK_CODE || entry.code == SYSTEM_ERROR_CODE {
            errors.push(ValidationError::BuiltinOverride(entry.code.clone()));
        } else if entry.meaning == CodeMeaningConfig::Ok {
            errors.push(ValidationError::SecondOkCode(entry.code.clone()));
        }
        if !seen.insert(entry.code.as_str()) {
            errors.push(ValidationError::DuplicateCode(entry.code.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if let Err(e) = url::Url::parse(value) {
        errors.push(ValidationError::InvalidUrl {
            field,
            reason: e.to_string(),
        });
    }
}
