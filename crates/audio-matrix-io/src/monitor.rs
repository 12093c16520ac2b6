//! Host block-size change detection.
//!
//! cpal has no buffer-size callback; the device simply starts delivering
//! larger buffers. The real-time callback reports every buffer it receives to
//! a [`BlockSizeMonitor`] (two atomic operations, no locking), and the control
//! loop polls the monitor and reconfigures the matrix when a buffer exceeded
//! the prepared block size.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Lock-free hand-off of observed host buffer sizes from the audio thread.
#[derive(Debug)]
pub struct BlockSizeMonitor {
    prepared: AtomicUsize,
    pending: AtomicUsize,
}

impl BlockSizeMonitor {
    /// Creates a monitor for a matrix prepared with `block_size`.
    pub fn new(block_size: usize) -> Self {
        Self {
            prepared: AtomicUsize::new(block_size),
            pending: AtomicUsize::new(0),
        }
    }

    /// Block size the matrix is currently prepared for.
    #[inline]
    pub fn prepared(&self) -> usize {
        self.prepared.load(Ordering::Acquire)
    }

    /// Records a host buffer of `frames` frames (audio thread).
    #[inline]
    pub fn observe(&self, frames: usize) {
        if frames > self.prepared() {
            self.pending.fetch_max(frames, Ordering::AcqRel);
        }
    }

    /// Takes the largest buffer size seen since the last poll, if it exceeds
    /// the prepared block size (control thread).
    pub fn poll(&self) -> Option<usize> {
        let pending = self.pending.swap(0, Ordering::AcqRel);
        (pending > self.prepared()).then_some(pending)
    }

    /// Records that the matrix is now prepared for `block_size` (control thread).
    pub fn set_prepared(&self, block_size: usize) {
        self.prepared.store(block_size, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smaller_or_equal_buffers_are_ignored() {
        let monitor = BlockSizeMonitor::new(256);
        monitor.observe(128);
        monitor.observe(256);
        assert_eq!(monitor.poll(), None);
    }

    #[test]
    fn reports_largest_oversized_buffer_once() {
        let monitor = BlockSizeMonitor::new(256);
        monitor.observe(512);
        monitor.observe(1024);
        monitor.observe(300);
        assert_eq!(monitor.poll(), Some(1024));
        assert_eq!(monitor.poll(), None);
    }

    #[test]
    fn stale_request_dropped_after_reconfigure() {
        let monitor = BlockSizeMonitor::new(64);
        monitor.observe(128);
        monitor.set_prepared(256);
        assert_eq!(monitor.prepared(), 256);
        assert_eq!(monitor.poll(), None);
    }
}
