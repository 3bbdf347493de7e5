//! Refreshable cache slot.
//!
//! Each record family gets one `CacheSlot` with its own refresh cadence and
//! its own rebuild gate, so a slow position-scan rebuild never blocks a
//! summary read. Readers clone an `Arc` under a brief read lock; the rebuild
//! gate collapses concurrent rebuild attempts into a single in-flight fetch
//! cycle (single-flight in place of the classic double-checked-locking
//! idiom, with the expiry re-check kept under the gate).
//!
//! A failed rebuild is logged and swallowed: the slot keeps serving the
//! previous value with its old expiry, so a transient upstream outage shows
//! up as staleness, not as reader errors. The error only reaches the caller
//! when the slot has never held a value at all.

use crate::error::Result;
use chrono::{DateTime, Duration, Utc};
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

struct Published<T> {
    value: Arc<T>,
    expires_at: DateTime<Utc>,
}

pub struct CacheSlot<T> {
    name: &'static str,
    refresh_secs: i64,
    published: RwLock<Option<Published<T>>>,
    rebuild_gate: Mutex<()>,
    consecutive_failures: AtomicU32,
}

impl<T> CacheSlot<T> {
    pub fn new(name: &'static str, refresh_secs: i64) -> Self {
        Self {
            name,
            refresh_secs,
            published: RwLock::new(None),
            rebuild_gate: Mutex::new(()),
            consecutive_failures: AtomicU32::new(0),
        }
    }

    /// Return the published value, rebuilding it first when absent or past
    /// its expiry. All callers racing past an expired value serialize on the
    /// rebuild gate; exactly one runs `rebuild`, the rest re-check and take
    /// the freshly published value.
    pub async fn get_with<F, Fut>(&self, rebuild: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self.fresh().await {
            return Ok(value);
        }

        let _gate = self.rebuild_gate.lock().await;

        // Re-check under the gate: another caller may have rebuilt while we
        // waited for the lock.
        if let Some(value) = self.fresh().await {
            return Ok(value);
        }

        match rebuild().await {
            Ok(new_value) => {
                let value = Arc::new(new_value);
                let expires_at = Utc::now() + Duration::seconds(self.refresh_secs - 1);
                *self.published.write().await = Some(Published {
                    value: Arc::clone(&value),
                    expires_at,
                });
                self.consecutive_failures.store(0, Ordering::Relaxed);
                debug!(slot = self.name, "Rebuilt cache slot");
                Ok(value)
            }
            Err(e) => {
                let failures = self.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1;
                let previous = self
                    .published
                    .read()
                    .await
                    .as_ref()
                    .map(|p| Arc::clone(&p.value));

                match previous {
                    Some(value) => {
                        warn!(
                            slot = self.name,
                            consecutive_failures = failures,
                            error = %e,
                            "Rebuild failed, serving previous value"
                        );
                        Ok(value)
                    }
                    None => {
                        warn!(
                            slot = self.name,
                            consecutive_failures = failures,
                            error = %e,
                            "Rebuild failed with no previous value"
                        );
                        Err(e)
                    }
                }
            }
        }
    }

    /// The published value if it has not expired yet.
    async fn fresh(&self) -> Option<Arc<T>> {
        let published = self.published.read().await;
        published.as_ref().and_then(|p| {
            if Utc::now() > p.expires_at {
                None
            } else {
                Some(Arc::clone(&p.value))
            }
        })
    }

    /// Number of rebuild failures since the last successful rebuild. Readers
    /// are never failed over staleness; operators can watch this instead.
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures.load(Ordering::Relaxed)
    }
}
