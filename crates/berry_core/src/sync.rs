//! Sync points: handles for pending GPU/animation work.
//!
//! The frame loop may hand the animation controller a sync point; the
//! controller waits on it right before committing the pose so it never
//! overwrites matrices the previous frame's draw is still reading.

use parking_lot::{Condvar, Mutex};

pub trait SyncPoint {
    /// Block until the work this handle represents has completed.
    fn wait(&self);
}

/// One-shot completion flag that producers `signal` and consumers `wait` on.
#[derive(Debug, Default)]
pub struct Fence {
    done: Mutex<bool>,
    cond: Condvar,
}

impl Fence {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fence that is already complete; waiting on it returns immediately.
    pub fn signaled() -> Self {
        Self {
            done: Mutex::new(true),
            cond: Condvar::new(),
        }
    }

    pub fn signal(&self) {
        *self.done.lock() = true;
        self.cond.notify_all();
    }

    pub fn is_signaled(&self) -> bool {
        *self.done.lock()
    }

    /// Re-arm for the next frame.
    pub fn reset(&self) {
        *self.done.lock() = false;
    }
}

impl SyncPoint for Fence {
    fn wait(&self) {
        let mut done = self.done.lock();
        while !*done {
            self.cond.wait(&mut done);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn signaled_fence_does_not_block() {
        let fence = Fence::signaled();
        fence.wait();
        assert!(fence.is_signaled());
    }

    #[test]
    fn wait_returns_after_signal_from_other_thread() {
        let fence = Arc::new(Fence::new());
        let producer = {
            let fence = Arc::clone(&fence);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(10));
                fence.signal();
            })
        };
        fence.wait();
        assert!(fence.is_signaled());
        producer.join().expect("producer thread panicked");
    }

    #[test]
    fn reset_rearms() {
        let fence = Fence::signaled();
        fence.reset();
        assert!(!fence.is_signaled());
    }
}
