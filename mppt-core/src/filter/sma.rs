//! Simple moving average filter
//!
//! Maintains a running sum alongside the sample window so reads are O(1):
//! when the window is full, the sample about to be evicted is subtracted
//! from the sum before the new one is added.

use crate::buffer::SampleWindow;

use super::SampleFilter;

/// Windowed arithmetic mean over the last `N` samples
#[derive(Debug, Clone)]
pub struct Sma<const N: usize> {
    window: SampleWindow<N>,
    sum: f32,
}

impl<const N: usize> Sma<N> {
    /// New filter with an empty window
    pub const fn new() -> Self {
        Self {
            window: SampleWindow::new(),
            sum: 0.0,
        }
    }
}

impl<const N: usize> Default for Sma<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SampleFilter for Sma<N> {
    fn add_sample(&mut self, sample: f32) {
        if self.window.is_full() {
            // Evict the oldest contribution before it is overwritten.
            if let Some(oldest) = self.window.oldest() {
                self.sum -= oldest;
            }
        }
        self.sum += sample;
        self.window.push(sample);
    }

    fn value(&self) -> f32 {
        if self.window.is_empty() {
            return 0.0;
        }
        self.sum / self.window.len() as f32
    }

    fn clear(&mut self) {
        self.window.clear();
        self.sum = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_reads_zero() {
        let filter = Sma::<4>::new();
        assert_eq!(filter.value(), 0.0);
    }

    #[test]
    fn partial_window_averages_what_it_has() {
        let mut filter = Sma::<4>::new();
        filter.add_sample(2.0);
        filter.add_sample(4.0);
        assert_eq!(filter.value(), 3.0);
    }

    #[test]
    fn full_window_evicts_oldest() {
        let mut filter = Sma::<3>::new();
        filter.add_sample(1.0);
        filter.add_sample(2.0);
        filter.add_sample(3.0);
        assert_eq!(filter.value(), 2.0);

        // 1.0 leaves the window, 7.0 enters: mean of [2, 3, 7]
        filter.add_sample(7.0);
        assert_eq!(filter.value(), 4.0);
    }

    #[test]
    fn clear_restores_initial_state() {
        let mut filter = Sma::<3>::new();
        filter.add_sample(9.0);
        filter.clear();
        assert_eq!(filter.value(), 0.0);

        filter.add_sample(5.0);
        assert_eq!(filter.value(), 5.0);
    }
}
