//! Loading signal coordinator.
//!
//! # State
//! ```text
//! (published value, timer slot { generation, handle })
//!
//! set_loading(true)  → generation += 1, abort old timer, publish true,
//!                      arm new timer for this generation
//! set_loading(false) → generation += 1, abort old timer, publish false
//! timer fires        → publish false only if its generation is current
//! ```
//!
//! Both halves live behind one mutex, so a timer that already woke up cannot
//! clear a signal set by a newer call.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::TimeoutConfig;
use crate::observability::metrics;

/// Observable "a request is in flight" flag with a forced-reset safety net.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct LoadingCoordinator {
    shared: Arc<Shared>,
}

struct Shared {
    tx: watch::Sender<bool>,
    slot: Mutex<TimerSlot>,
    transitions: AtomicU64,
    ordinary_reset: Duration,
    large_reset: Duration,
}

#[derive(Default)]
struct TimerSlot {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl LoadingCoordinator {
    /// Create a coordinator with the given forced-reset delays.
    pub fn new(ordinary_reset: Duration, large_reset: Duration) -> Self {
        let (tx, _) = watch::channel(false);
        Self {
            shared: Arc::new(Shared {
                tx,
                slot: Mutex::new(TimerSlot::default()),
                transitions: AtomicU64::new(0),
                ordinary_reset,
                large_reset,
            }),
        }
    }

    /// Reset delays follow the request and resource timeouts.
    pub fn from_config(timeouts: &TimeoutConfig) -> Self {
        Self::new(timeouts.request(), timeouts.resource())
    }

    /// Record a loading transition.
    ///
    /// `context` names the call for logging. `large_payload` selects the long
    /// reset delay. With `ignore` set nothing happens at all.
    pub fn set_loading(&self, active: bool, context: &str, large_payload: bool, ignore: bool) {
        if ignore {
            return;
        }
        debug_assert!(!context.is_empty(), "loading context must name the call");

        let mut slot = self.shared.lock_slot();
        slot.generation += 1;
        if let Some(handle) = slot.handle.take() {
            handle.abort();
        }

        self.shared.publish(active);

        if active {
            let delay = if large_payload {
                self.shared.large_reset
            } else {
                self.shared.ordinary_reset
            };
            slot.handle = self.arm_timer(slot.generation, delay);
        }
        drop(slot);

        tracing::debug!(is_loading = active, context = %context, "Loading state changed");
    }

    /// Current value.
    pub fn is_loading(&self) -> bool {
        *self.shared.tx.borrow()
    }

    /// Receiver that sees the latest value and every later change.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shared.tx.subscribe()
    }

    /// Number of value changes published so far.
    pub fn transitions(&self) -> u64 {
        self.shared.transitions.load(Ordering::SeqCst)
    }

    /// Whether a forced-reset timer is armed.
    pub fn has_pending_reset(&self) -> bool {
        self.shared
            .lock_slot()
            .handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn arm_timer(&self, generation: u64, delay: Duration) -> Option<JoinHandle<()>> {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                tracing::warn!("No async runtime; loading signal has no forced reset");
                return None;
            }
        };

        let shared = Arc::clone(&self.shared);
        Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            shared.force_reset(generation, delay);
        }))
    }
}

impl Shared {
    fn lock_slot(&self) -> MutexGuard<'_, TimerSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, value: bool) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
        if changed {
            self.transitions.fetch_add(1, Ordering::SeqCst);
            metrics::record_loading(value);
        }
    }

    fn force_reset(&self, generation: u64, delay: Duration) {
        let mut slot = self.lock_slot();
        if slot.generation != generation {
            return;
        }
        slot.handle = None;
        self.publish(false);
        drop(slot);

        metrics::record_forced_reset();
        tracing::warn!(after = ?delay, "Loading signal force-reset; a call never completed");
    }
}

impl Default for LoadingCoordinator {
    fn default() -> Self {
        Self::from_config(&TimeoutConfig::default())
    }
}

impl std::fmt::Debug for LoadingCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadingCoordinator")
            .field("is_loading", &self.is_loading())
            .field("ordinary_reset", &self.shared.ordinary_reset)
            .field("large_reset", &self.shared.large_reset)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinator() -> LoadingCoordinator {
        LoadingCoordinator::new(Duration::from_secs(15), Duration::from_secs(60))
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_and_end() {
        let loading = coordinator();
        let mut rx = loading.subscribe();
        assert!(!*rx.borrow_and_update());

        loading.set_loading(true, "[Api] - a", false, false);
        assert!(rx.has_changed().unwrap());
        assert!(*rx.borrow_and_update());
        assert!(loading.has_pending_reset());

        loading.set_loading(false, "[Api] - a", false, false);
        assert!(!loading.is_loading());
        assert!(!loading.has_pending_reset());
        assert_eq!(loading.transitions(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ignore_is_a_no_op() {
        let loading = coordinator();
        let rx = loading.subscribe();

        loading.set_loading(true, "[Api] - quiet", false, true);
        assert!(!loading.is_loading());
        assert!(!rx.has_changed().unwrap());
        assert!(!loading.has_pending_reset());
        assert_eq!(loading.transitions(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_forced_reset_fires() {
        let loading = coordinator();
        loading.set_loading(true, "[Api] - hang", false, false);

        tokio::time::sleep(Duration::from_secs(14)).await;
        assert!(loading.is_loading());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!loading.is_loading());
        assert!(!loading.has_pending_reset());
    }

    #[tokio::test(start_paused = true)]
    async fn test_large_payload_uses_long_reset() {
        let loading = coordinator();
        loading.set_loading(true, "[Api] - upload", true, false);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(loading.is_loading());

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert!(!loading.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_start_replaces_timer() {
        let loading = coordinator();
        loading.set_loading(true, "[Api] - first", false, false);

        tokio::time::sleep(Duration::from_secs(10)).await;
        loading.set_loading(true, "[Api] - second", false, false);

        // The first timer would have fired at 15s.
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(loading.is_loading());

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(!loading.is_loading());
        assert_eq!(loading.transitions(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_call_cancels_reset() {
        let loading = coordinator();
        loading.set_loading(true, "[Api] - a", false, false);
        loading.set_loading(false, "[Api] - a", false, false);
        loading.set_loading(true, "[Api] - b", false, false);

        tokio::time::sleep(Duration::from_secs(16)).await;
        assert!(!loading.is_loading());
        // true, false, true, forced false
        assert_eq!(loading.transitions(), 4);
    }

    #[test]
    fn test_without_runtime_no_timer() {
        let loading = coordinator();
        loading.set_loading(true, "[Api] - sync", false, false);
        assert!(loading.is_loading());
        assert!(!loading.has_pending_reset());
    }
}
