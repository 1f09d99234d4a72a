//! Single-flight guard for remote downloads.
//!
//! At most one download may be in its fetch phase at a time, process-wide. A
//! second caller is rejected rather than queued. A holder gets a
//! [`DownloadPermit`] carrying a lease token. Dropping the permit releases the
//! lease, and a lease older than the configured timeout is treated as idle so a
//! wedged holder cannot lock downloads out forever.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy)]
struct Lease {
    token: Uuid,
    acquired_at: Instant,
}

#[derive(Debug)]
struct Inner {
    lease: Mutex<Option<Lease>>,
    lease_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct DownloadGuard {
    inner: Arc<Inner>,
}

impl DownloadGuard {
    pub fn new(lease_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                lease: Mutex::new(None),
                lease_timeout,
            }),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Lease>> {
        self.inner
            .lease
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Idle → Busy. Returns `None` without changing state while a live lease exists.
    pub fn try_acquire(&self) -> Option<DownloadPermit> {
        let mut slot = self.slot();
        let now = Instant::now();

        if let Some(lease) = slot.as_ref() {
            let held_for = now.duration_since(lease.acquired_at);
            if held_for < self.inner.lease_timeout {
                return None;
            }
            warn!(
                "Download lease {} expired after {}s without release; reclaiming",
                lease.token,
                held_for.as_secs()
            );
        }

        let token = Uuid::new_v4();
        *slot = Some(Lease {
            token,
            acquired_at: now,
        });
        debug!("Download lease {token} acquired");

        Some(DownloadPermit {
            guard: self.clone(),
            token,
        })
    }

    /// Busy → Idle, only if `token` still owns the lease. Idempotent.
    pub fn release(&self, token: Uuid) -> bool {
        let mut slot = self.slot();
        match slot.as_ref() {
            Some(lease) if lease.token == token => {
                *slot = None;
                debug!("Download lease {token} released");
                true
            }
            _ => false,
        }
    }

    /// True while a lease is held and has not timed out.
    #[cfg(test)]
    pub fn is_busy(&self) -> bool {
        self.slot().as_ref().is_some_and(|lease| {
            Instant::now().duration_since(lease.acquired_at) < self.inner.lease_timeout
        })
    }
}

/// Proof of holding the download lease. Releases on drop.
#[derive(Debug)]
pub struct DownloadPermit {
    guard: DownloadGuard,
    token: Uuid,
}

impl DownloadPermit {
    pub fn token(&self) -> Uuid {
        self.token
    }
}

impl Drop for DownloadPermit {
    fn drop(&mut self) {
        self.guard.release(self.token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEASE: Duration = Duration::from_secs(300);

    #[test]
    fn test_second_acquire_is_rejected_while_held() {
        let guard = DownloadGuard::new(LEASE);
        let first = guard.try_acquire();
        assert!(first.is_some());
        assert!(guard.is_busy());
        assert!(guard.try_acquire().is_none());
    }

    #[test]
    fn test_drop_releases() {
        let guard = DownloadGuard::new(LEASE);
        {
            let _permit = guard.try_acquire().unwrap();
            assert!(guard.is_busy());
        }
        assert!(!guard.is_busy());
        assert!(guard.try_acquire().is_some());
    }

    #[test]
    fn test_release_is_idempotent() {
        let guard = DownloadGuard::new(LEASE);
        let permit = guard.try_acquire().unwrap();
        let token = permit.token();

        assert!(guard.release(token));
        assert!(!guard.release(token));
        drop(permit);
        assert!(!guard.is_busy());
    }

    #[test]
    fn test_stale_token_cannot_release_new_holder() {
        let guard = DownloadGuard::new(LEASE);
        let stale = guard.try_acquire().unwrap().token();
        let _current = guard.try_acquire().unwrap();

        assert!(!guard.release(stale));
        assert!(guard.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_lease_is_reclaimed() {
        let guard = DownloadGuard::new(LEASE);
        let wedged = guard.try_acquire().unwrap();

        tokio::time::advance(LEASE - Duration::from_secs(1)).await;
        assert!(guard.try_acquire().is_none());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(!guard.is_busy());
        let fresh = guard.try_acquire().unwrap();

        // The wedged holder finishing late must not free the new lease.
        drop(wedged);
        assert!(guard.is_busy());
        drop(fresh);
        assert!(!guard.is_busy());
    }
}
