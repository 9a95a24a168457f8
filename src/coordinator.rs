//! Single-flight refresh coordination.
//!
//! The coordinator owns the only path that writes fresh data into the store.
//! Background refreshes are deduplicated through a single-slot guard: while one
//! is in flight, further requests to refresh are dropped rather than queued.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::task::TaskTracker;

use crate::entry::CacheEntry;
use crate::error::CacheError;
use crate::fetcher::Fetcher;
use crate::store::Store;
use crate::utils::now_ms;

/// Exclusive claim on the refresh slot. Releases the slot when dropped.
#[derive(Debug)]
pub struct RefreshGuard {
    slot: Arc<AtomicBool>,
}

impl RefreshGuard {
    /// Claim the slot, or return `None` if it is already held.
    ///
    /// Checking and marking happen in one compare-exchange, so two callers can
    /// never both get a guard.
    pub fn try_acquire(slot: &Arc<AtomicBool>) -> Option<Self> {
        slot.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RefreshGuard { slot: slot.clone() })
    }
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        self.slot.store(false, Ordering::Release);
    }
}

/// Fetches upstream data into the store, at most one background refresh at a time.
#[derive(Clone)]
pub struct RefreshCoordinator {
    store: Arc<dyn Store>,
    fetcher: Arc<dyn Fetcher>,
    key: String,
    in_flight: Arc<AtomicBool>,
    tasks: TaskTracker,
}

impl RefreshCoordinator {
    pub fn new(store: Arc<dyn Store>, fetcher: Arc<dyn Fetcher>, key: impl Into<String>) -> Self {
        RefreshCoordinator {
            store,
            fetcher,
            key: key.into(),
            in_flight: Arc::new(AtomicBool::new(false)),
            tasks: TaskTracker::new(),
        }
    }

    /// Whether a background refresh currently holds the slot.
    pub fn is_refreshing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Tracker holding every background refresh spawned by this coordinator.
    ///
    /// The host closes it and waits on it before shutting down so that no
    /// refresh is abandoned halfway.
    pub fn tasks(&self) -> &TaskTracker {
        &self.tasks
    }

    /// Fetch, stamp and store synchronously. The caller waits for the result.
    pub async fn refresh_now(&self) -> Result<CacheEntry, CacheError> {
        refresh(self.store.as_ref(), self.fetcher.as_ref(), &self.key).await
    }

    /// Start a background refresh unless one is already running.
    ///
    /// Returns `true` if this call started the refresh. The caller never waits
    /// for the refresh and never sees its outcome; failures are logged.
    pub fn maybe_refresh_in_background(&self) -> bool {
        // Claimed before spawning so concurrent callers see the slot taken.
        let Some(guard) = RefreshGuard::try_acquire(&self.in_flight) else {
            tracing::debug!(key = %self.key, "refresh already in flight");
            return false;
        };

        let store = self.store.clone();
        let fetcher = self.fetcher.clone();
        let key = self.key.clone();

        self.tasks.spawn(async move {
            let _guard = guard;
            if let Err(err) = refresh(store.as_ref(), fetcher.as_ref(), &key).await {
                tracing::warn!(%key, error = %err, "background refresh failed");
            }
        });

        true
    }
}

async fn refresh(
    store: &dyn Store,
    fetcher: &dyn Fetcher,
    key: &str,
) -> Result<CacheEntry, CacheError> {
    tracing::debug!(%key, "refreshing from upstream");

    let data = fetcher.fetch_fresh_data().await?;
    let entry = CacheEntry::new(data, now_ms());
    store.put(key, entry.clone()).await?;

    tracing::info!(%key, timestamp = entry.timestamp, "stored fresh upstream data");
    Ok(entry)
}
