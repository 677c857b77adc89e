//! Median filter
//!
//! The strongest of the windowed filters against impulse noise: a single
//! wild ADC spike cannot move the median at all, where it drags a mean
//! proportionally. The price is an O(n log n) sort on every read, paid into
//! a stack scratch buffer so the window itself is untouched.

use crate::buffer::SampleWindow;

use super::SampleFilter;

/// Windowed median over the last `N` samples
#[derive(Debug, Clone)]
pub struct Median<const N: usize> {
    window: SampleWindow<N>,
}

impl<const N: usize> Median<N> {
    /// New filter with an empty window
    pub const fn new() -> Self {
        Self {
            window: SampleWindow::new(),
        }
    }
}

impl<const N: usize> Default for Median<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SampleFilter for Median<N> {
    fn add_sample(&mut self, sample: f32) {
        self.window.push(sample);
    }

    fn value(&self) -> f32 {
        let mut scratch = [0.0f32; N];
        let count = self.window.copy_into(&mut scratch);
        if count == 0 {
            return 0.0;
        }

        let valid = &mut scratch[..count];
        valid.sort_unstable_by(f32::total_cmp);

        if count % 2 == 0 {
            // Even count: split the median between the two middle values.
            (valid[count / 2] + valid[count / 2 - 1]) / 2.0
        } else {
            valid[count / 2]
        }
    }

    fn clear(&mut self) {
        self.window.clear();
    }
}
