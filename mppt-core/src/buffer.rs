//! Fixed-Size Circular Window for Sensor Samples
//!
//! ## Overview
//!
//! This module provides the ring buffer that backs the windowed sample
//! filters (simple moving average, median). The window has a fixed capacity
//! chosen at compile time through const generics, so a filter's memory
//! footprint is known exactly and no allocation ever happens on the sample
//! path.
//!
//! ## Design Rationale
//!
//! The converter's sensor channels are sampled at a fixed cadence and only
//! the most recent `N` samples matter; older data carries no information the
//! filters want. A circular buffer gives us:
//!
//! - O(1) insertion (overwrites oldest when full)
//! - O(1) access to the newest and oldest sample
//! - O(n) iteration in chronological order
//! - zero heap allocations
//!
//! `heapless::Vec` was considered and rejected for the same reason the rest
//! of the codebase avoids it here: a full `Vec` rejects the push, while a
//! sample window must silently evict the oldest value.
//!
//! ## Usage Example
//!
//! ```rust
//! use mppt_core::buffer::SampleWindow;
//!
//! let mut window: SampleWindow<4> = SampleWindow::new();
//! window.push(13.2);
//! window.push(13.4);
//!
//! assert_eq!(window.last(), Some(13.4));
//! assert_eq!(window.len(), 2);
//! ```

/// Fixed-capacity circular window of scalar samples
///
/// ## Type Parameter
///
/// - `N`: maximum number of samples retained. Compile-time constant; the
///   modulo arithmetic reduces to a bit mask when `N` is a power of two,
///   but any positive capacity is correct.
///
/// ## Internal Invariants
///
/// - `write_pos < N`
/// - `len <= N`
/// - iteration yields samples oldest to newest
#[derive(Debug, Clone)]
pub struct SampleWindow<const N: usize> {
    /// Sample storage; slots beyond `len` are stale and never read
    data: [f32; N],

    /// Index where the next write will occur, wraps at `N`
    write_pos: usize,

    /// Current number of valid samples, saturates at `N`
    len: usize,
}

impl<const N: usize> SampleWindow<N> {
    /// Creates a new empty window
    ///
    /// Const so windows can live in statics on embedded targets.
    pub const fn new() -> Self {
        Self {
            data: [0.0; N],
            write_pos: 0,
            len: 0,
        }
    }

    /// Adds a sample, evicting the oldest when the window is full
    pub fn push(&mut self, sample: f32) {
        self.data[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % N;

        if self.len < N {
            self.len += 1;
        }
    }

    /// Number of valid samples currently held
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no sample has been added since construction or `clear`
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when the next push will evict the oldest sample
    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Most recently pushed sample
    pub fn last(&self) -> Option<f32> {
        if self.is_empty() {
            return None;
        }

        let idx = if self.write_pos == 0 { N - 1 } else { self.write_pos - 1 };
        Some(self.data[idx])
    }

    /// Oldest sample still in the window
    ///
    /// This is the value the next `push` will evict when the window is full.
    pub fn oldest(&self) -> Option<f32> {
        self.get(0)
    }

    /// Iterate over samples from oldest to newest
    pub fn iter(&self) -> SampleWindowIter<'_, N> {
        SampleWindowIter {
            window: self,
            index: 0,
        }
    }

    /// Drops all samples without touching the storage
    pub fn clear(&mut self) {
        self.write_pos = 0;
        self.len = 0;
    }

    /// Copies the valid window into `out` in chronological order
    ///
    /// Returns the number of samples copied (`self.len()`). The median
    /// filter uses this to sort a scratch copy without disturbing the
    /// window itself.
    pub fn copy_into(&self, out: &mut [f32; N]) -> usize {
        for (i, sample) in self.iter().enumerate() {
            out[i] = sample;
        }
        self.len
    }

    /// Sample by logical index (0 = oldest, `len - 1` = newest)
    ///
    /// When the window is not yet full, logical and physical indices match.
    /// When full, the oldest sample sits at `write_pos`:
    ///
    /// ```text
    /// Physical:  [D, E, A, B, C]   (write_pos = 2)
    /// Logical:   [A, B, C, D, E]
    /// logical[i] = physical[(write_pos + i) % N]
    /// ```
    fn get(&self, index: usize) -> Option<f32> {
        if index >= self.len {
            return None;
        }

        let actual = if self.len < N {
            index
        } else {
            (self.write_pos + index) % N
        };

        Some(self.data[actual])
    }
}

/// Iterator over window contents, oldest first
pub struct SampleWindowIter<'a, const N: usize> {
    window: &'a SampleWindow<N>,
    index: usize,
}

impl<'a, const N: usize> Iterator for SampleWindowIter<'a, N> {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.window.get(self.index)?;
        self.index += 1;
        Some(item)
    }
}

impl<const N: usize> Default for SampleWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}
