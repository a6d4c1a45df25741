//! Synchronization primitives shared by the retrograde build and the
//! search engine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A write-once cancellation flag.
///
/// Once tripped, a latch stays tripped, the thread-based equivalent of
/// a closed channel. Clones share the underlying flag, and workers poll
/// it at their suspension points (queue receive, database I/O, search
/// base cases).
#[derive(Clone, Debug, Default)]
pub struct Latch(Arc<AtomicBool>);

impl Latch {
    /// A fresh, untripped latch.
    #[must_use]
    pub fn new() -> Self {
        Latch(Arc::new(AtomicBool::new(false)))
    }

    /// Has the latch been tripped?
    #[inline]
    #[must_use]
    pub fn is_tripped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Trip the latch. Idempotent; there is no way back.
    #[inline]
    pub fn trip(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// The underlying flag, for APIs that register onto an
    /// `Arc<AtomicBool>` directly (signal handlers).
    #[inline]
    #[must_use]
    pub fn as_arc(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_lifecycle() {
        let latch = Latch::new();
        assert!(!latch.is_tripped());

        latch.trip();
        assert!(latch.is_tripped());

        // Tripping again changes nothing.
        latch.trip();
        assert!(latch.is_tripped());
    }

    #[test]
    fn latch_clones_share_state() {
        let one = Latch::new();
        let two = one.clone();

        one.trip();
        assert!(two.is_tripped());
    }

    #[test]
    fn latch_backs_external_flags() {
        let latch = Latch::new();
        let flag = latch.as_arc();
        flag.store(true, std::sync::atomic::Ordering::Relaxed);
        assert!(latch.is_tripped());
    }
}
