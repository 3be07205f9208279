//! Shared state coordinating accept loops, workers and shutdown.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Cooperative stop flag observed by accept loops and the HTTP adapter.
#[derive(Debug, Clone, Default)]
pub(crate) struct StopToken {
    stopped: Arc<AtomicBool>,
}

impl StopToken {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn trip(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub(crate) fn is_tripped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Counts running accept loops and connection workers.
///
/// Every participant holds a [`WorkerGuard`]; the count drops when the guard
/// does, including during unwinding.
#[derive(Debug, Clone, Default)]
pub(crate) struct DrainTracker {
    state: Arc<(Mutex<usize>, Condvar)>,
}

impl DrainTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers a participant until the returned guard is dropped.
    pub(crate) fn enter(&self) -> WorkerGuard {
        let (count, _) = &*self.state;
        *count.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        WorkerGuard {
            tracker: self.clone(),
        }
    }

    /// Number of participants currently registered.
    pub(crate) fn active(&self) -> usize {
        let (count, _) = &*self.state;
        *count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks until no participant is registered.
    pub(crate) fn wait_idle(&self) {
        let (count, idle) = &*self.state;
        let mut active = count.lock().unwrap_or_else(PoisonError::into_inner);
        while *active > 0 {
            active = idle.wait(active).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Like [`wait_idle`](Self::wait_idle) but gives up after `timeout`.
    ///
    /// Returns `true` when the tracker drained in time.
    #[cfg(test)]
    pub(crate) fn wait_idle_for(&self, timeout: Duration) -> bool {
        let (count, idle) = &*self.state;
        let guard = count.lock().unwrap_or_else(PoisonError::into_inner);
        let (active, _) = idle
            .wait_timeout_while(guard, timeout, |active| *active > 0)
            .unwrap_or_else(PoisonError::into_inner);
        *active == 0
    }

    fn leave(&self) {
        let (count, idle) = &*self.state;
        let mut active = count.lock().unwrap_or_else(PoisonError::into_inner);
        *active = active.saturating_sub(1);
        if *active == 0 {
            idle.notify_all();
        }
    }
}

/// Registration held by one accept loop or connection worker.
#[derive(Debug)]
pub(crate) struct WorkerGuard {
    tracker: DrainTracker,
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        self.tracker.leave();
    }
}

/// Time of the most recent accepted connection.
///
/// Stored as a millisecond offset from a fixed origin so it can be shared
/// without a lock. Updates are best effort.
#[derive(Debug)]
pub(crate) struct LastActivity {
    origin: Instant,
    offset_ms: AtomicU64,
}

impl LastActivity {
    /// Starts the clock; the daemon counts as active at construction.
    pub(crate) fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_ms: AtomicU64::new(0),
        }
    }

    pub(crate) fn touch(&self) {
        let elapsed = u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.offset_ms.store(elapsed, Ordering::Relaxed);
    }

    /// Time since the last connection, or since construction if none.
    pub(crate) fn idle_for(&self) -> Duration {
        let last = Duration::from_millis(self.offset_ms.load(Ordering::Relaxed));
        self.origin.elapsed().saturating_sub(last)
    }
}

impl Default for LastActivity {
    fn default() -> Self {
        Self::new()
    }
}
