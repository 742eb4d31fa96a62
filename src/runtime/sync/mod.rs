//! Synchronization primitives
//!
//! The standard library and crossbeam cover mutexes and rendezvous channels.
//! What they lack is a wait counter that can be waited on repeatedly and
//! returns immediately at zero, so [`WaitGroup`] is built here on top of a
//! `parking_lot` mutex and condvar.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// A counter that blocks waiters until it drops to zero.
///
/// - `wait` on a zero count returns immediately.
/// - `add` and `done` may be called from any thread.
#[derive(Debug, Default)]
pub struct WaitGroup {
    count: Mutex<usize>,
    zero: Condvar,
}

impl WaitGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `delta` outstanding units.
    pub fn add(
        &self,
        delta: usize,
    ) {
        *self.count.lock() += delta;
    }

    /// Mark one unit done, waking waiters when the count reaches zero.
    ///
    /// # Panics
    ///
    /// Panics if the count is already zero.
    pub fn done(&self) {
        let mut count = self.count.lock();
        assert!(*count > 0, "WaitGroup::done called on a zero counter");
        *count -= 1;
        if *count == 0 {
            self.zero.notify_all();
        }
    }

    /// Outstanding units.
    pub fn count(&self) -> usize {
        *self.count.lock()
    }

    /// Block until the count is zero.
    pub fn wait(&self) {
        let mut count = self.count.lock();
        while *count > 0 {
            self.zero.wait(&mut count);
        }
    }

    /// Block until the count is zero or `timeout` passes.
    ///
    /// Returns `true` if the count reached zero.
    pub fn wait_timeout(
        &self,
        timeout: Duration,
    ) -> bool {
        let deadline = Instant::now() + timeout;
        let mut count = self.count.lock();
        while *count > 0 {
            if self.zero.wait_until(&mut count, deadline).timed_out() {
                return *count == 0;
            }
        }
        true
    }
}
