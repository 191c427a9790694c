//! Fixed-capacity metric history.
//!
//! One [`HistoryBuffer`] per metric holds the most recent N samples in
//! insertion (time) order. Pushing past capacity evicts the oldest sample.
//! Readers take a bounded chronological window; shorter-than-requested
//! windows are returned as-is; the renderer handles the shortfall.

use std::collections::VecDeque;

/// Default number of samples retained per metric.
pub const DEFAULT_CAPACITY: usize = 200;

/// Append-only-with-eviction numeric series with ring-buffer semantics.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl HistoryBuffer {
    /// Create a buffer holding at most `capacity` samples (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest when over capacity.
    pub fn push(&mut self, value: f64) {
        self.samples.push_back(value);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Last `min(max_len, len)` samples in chronological order.
    pub fn window(&self, max_len: usize) -> Vec<f64> {
        let take = max_len.min(self.samples.len());
        let start = self.samples.len() - take;
        let mut out = Vec::with_capacity(take);
        out.extend(self.samples.iter().skip(start).copied());
        out
    }

    /// Most recent sample, or 0.0 when empty.
    pub fn latest(&self) -> f64 {
        self.samples.back().copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_of_overfilled_buffer_is_last_n_in_order() {
        let capacity = 8;
        let mut buf = HistoryBuffer::new(capacity);
        for i in 0..capacity + 5 {
            buf.push(i as f64);
        }
        assert_eq!(buf.len(), capacity);
        let window = buf.window(capacity);
        let expected: Vec<f64> = (5..capacity + 5).map(|i| i as f64).collect();
        assert_eq!(window, expected);
    }

    #[test]
    fn window_shorter_than_history_takes_tail() {
        let mut buf = HistoryBuffer::new(10);
        for i in 0..10 {
            buf.push(i as f64);
        }
        assert_eq!(buf.window(3), vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn window_longer_than_history_is_not_padded() {
        let mut buf = HistoryBuffer::new(10);
        buf.push(1.0);
        buf.push(2.0);
        assert_eq!(buf.window(10), vec![1.0, 2.0]);
    }

    #[test]
    fn window_does_not_mutate() {
        let mut buf = HistoryBuffer::new(4);
        buf.push(1.0);
        let _ = buf.window(4);
        let _ = buf.window(1);
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.latest(), 1.0);
    }

    #[test]
    fn latest_on_empty_is_zero() {
        let buf = HistoryBuffer::new(4);
        assert!(buf.is_empty());
        assert_eq!(buf.latest(), 0.0);
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let mut buf = HistoryBuffer::new(0);
        buf.push(1.0);
        buf.push(2.0);
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.latest(), 2.0);
    }
}
