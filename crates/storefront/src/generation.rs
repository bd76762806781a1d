//! Stale-response fencing for overlapping refreshes.
//!
//! Any number of cart refreshes can be in flight at once; only the data
//! belonging to the newest one may be published. Each refresh stamps itself
//! with a generation number when it starts and checks that stamp against
//! the live counter before publishing. A mutation bumps the counter, which
//! retires every refresh started before it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counter shared by everything that refreshes one resource.
#[derive(Debug, Clone, Default)]
pub struct GenerationCounter {
    current: Arc<AtomicU64>,
}

/// Stamp handed to one in-flight refresh.
#[derive(Debug)]
pub struct Generation {
    current: Arc<AtomicU64>,
    stamp: u64,
}

impl GenerationCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a refresh: bump the counter and stamp the caller with the new
    /// value. Older outstanding stamps become stale immediately.
    #[must_use]
    pub fn begin(&self) -> Generation {
        let stamp = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        Generation {
            current: Arc::clone(&self.current),
            stamp,
        }
    }

    /// Retire every outstanding stamp without starting a new refresh. Used
    /// by mutations so that refreshes read before the write cannot publish
    /// over its result.
    pub fn invalidate(&self) {
        self.current.fetch_add(1, Ordering::SeqCst);
    }
}

impl Generation {
    /// Whether this refresh is still the newest one and may publish.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.stamp
    }
}
