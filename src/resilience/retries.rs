//! Retry budget.
//!
//! # Responsibilities
//! - Count the attempts a single call may still make
//! - Compute the delay before the next attempt
//!
//! # Design Decisions
//! - One budget per call; budgets are never shared
//! - The budget counts attempts remaining, not retries
//! - Retry delay is zero unless backoff is configured
//! - Backoff doubles per failed attempt, capped, plus up to 10% jitter

use std::time::Duration;

use rand::Rng;

use crate::config::RetryConfig;

/// Attempts remaining for one logical call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    remaining: u32,
    used: u32,
}

impl RetryBudget {
    /// Budget for `max_attempts` attempts; a call always gets at least one.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            remaining: max_attempts.max(1),
            used: 0,
        }
    }

    /// Spend one attempt and return what is left.
    pub fn consume(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.used += 1;
        self.remaining
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Attempts spent so far.
    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Delay before the attempt after `self.used()` failed ones.
    pub fn next_delay(&self, config: &RetryConfig) -> Duration {
        if self.used == 0 || config.base_delay_ms == 0 {
            return Duration::ZERO;
        }

        let factor = 1u64.checked_shl(self.used - 1).unwrap_or(u64::MAX);
        let capped = config.base_delay_ms.saturating_mul(factor).min(config.max_delay_ms);
        let jitter = match capped / 10 {
            0 => 0,
            spread => rand::thread_rng().gen_range(0..spread),
        };
        Duration::from_millis(capped + jitter)
    }
}
