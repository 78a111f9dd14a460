//! Moving-Median Filters
//!
//! Order-statistic smoothing primitives for spectral analysis:
//! - `MovingMedian` - across-bin (spectral) median smoother, applied in place
//! - `MovingMedianStack` - one independent temporal median window per bin
//!
//! Both pre-size all working memory at construction; the filtering
//! paths never allocate.

use std::collections::VecDeque;

use sb_core::Sample;

/// Median of a window, taken as the `len/2`-th order statistic
/// (upper median for even-sized windows).
#[inline]
fn window_median(scratch: &mut [Sample]) -> Sample {
    scratch.sort_unstable_by(Sample::total_cmp);
    scratch[scratch.len() / 2]
}

/// Across-bin median smoother with a centered window.
///
/// The window shrinks at the slice edges: the median is computed over
/// the samples that actually fall inside the slice.
pub struct MovingMedian {
    /// Window length (samples)
    window_len: usize,
    /// Unfiltered copy of the input, taken before smoothing
    src: Vec<Sample>,
    /// Sort scratch for one window
    scratch: Vec<Sample>,
}

impl MovingMedian {
    /// Create a smoother for slices of up to `max_len` samples.
    ///
    /// `window_len` must be at least 1; a window of 1 is the identity.
    pub fn new(window_len: usize, max_len: usize) -> Self {
        assert!(window_len >= 1, "median window length must be >= 1");
        Self {
            window_len,
            src: vec![0.0; max_len],
            scratch: Vec::with_capacity(window_len),
        }
    }

    /// Window length in samples
    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// Replace every sample with the median of its centered window.
    ///
    /// `data` must not exceed the `max_len` given at construction.
    pub fn filter_in_place(&mut self, data: &mut [Sample]) {
        let n = data.len();
        debug_assert!(n <= self.src.len());

        self.src[..n].copy_from_slice(data);

        let behind = (self.window_len - 1) / 2;
        let ahead = self.window_len / 2;

        for i in 0..n {
            let lo = i.saturating_sub(behind);
            let hi = (i + ahead + 1).min(n);

            self.scratch.clear();
            self.scratch.extend_from_slice(&self.src[lo..hi]);
            data[i] = window_median(&mut self.scratch);
        }
    }
}

/// Bank of independent temporal median windows, one per bin.
///
/// Each bin tracks the last `window_len` values pushed for it; `get`
/// reports the median of whatever the window currently holds, so the
/// output is well defined while the windows are still warming up.
pub struct MovingMedianStack {
    window_len: usize,
    /// Chronological window per bin, oldest first
    windows: Vec<VecDeque<Sample>>,
    /// Sort scratch shared across bins
    scratch: Vec<Sample>,
}

impl MovingMedianStack {
    /// Create `bin_count` windows of depth `window_len` (both >= 1).
    pub fn new(bin_count: usize, window_len: usize) -> Self {
        assert!(bin_count >= 1, "median stack needs at least one bin");
        assert!(window_len >= 1, "median window length must be >= 1");
        Self {
            window_len,
            windows: (0..bin_count)
                .map(|_| VecDeque::with_capacity(window_len))
                .collect(),
            scratch: Vec::with_capacity(window_len),
        }
    }

    /// Number of bins
    pub fn bin_count(&self) -> usize {
        self.windows.len()
    }

    /// Window depth in frames
    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// Record a new value for `bin`, evicting its oldest value once the
    /// window is full.
    pub fn push(&mut self, bin: usize, value: Sample) {
        let window = &mut self.windows[bin];
        if window.len() == self.window_len {
            window.pop_front();
        }
        window.push_back(value);
    }

    /// Median of the values currently held for `bin` (0.0 if none).
    pub fn get(&mut self, bin: usize) -> Sample {
        let window = &self.windows[bin];
        if window.is_empty() {
            return 0.0;
        }
        self.scratch.clear();
        self.scratch.extend(window.iter().copied());
        window_median(&mut self.scratch)
    }

    /// Discard every bin's window contents.
    pub fn reset_all(&mut self) {
        for window in &mut self.windows {
            window.clear();
        }
    }
}
