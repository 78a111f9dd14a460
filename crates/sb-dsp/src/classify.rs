//! Streaming Bin Classification
//!
//! Labels every bin of a per-frame magnitude spectrum as harmonic,
//! percussive, residual, or silent. Two orthogonal moving-median
//! passes feed a ratio test per bin:
//! - temporal (per-bin, across frames): stable energy marks tonal content
//! - spectral (per-frame, across bins): flat broadband energy marks
//!   transient content
//!
//! The temporal pass reports a value centered `horizontal_filter_lag`
//! frames in the past, so the spectral pass is delayed through a
//! fixed-depth queue before the two are compared.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::Processor;
use crate::median::{MovingMedian, MovingMedianStack};
use sb_core::sample;
use sb_core::{Sample, SbError, SbResult};

/// Numerical guard for the ratio tests
const EPS: Sample = 1.0e-7;

/// Per-bin classification label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Classification {
    /// Temporally stable relative to its spectral neighborhood (tonal)
    Harmonic,
    /// Broadband relative to its temporal history (transient)
    Percussive,
    /// Neither harmonic nor percussive
    #[default]
    Residual,
    /// Raw magnitude below the audibility threshold
    Silent,
}

/// Classifier parameters, fixed for the lifetime of a classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierParams {
    /// Number of frequency bins per frame
    pub bin_count: usize,
    /// Temporal median window depth per bin (frames)
    pub horizontal_filter_length: usize,
    /// Frames by which the spectral pass is delayed to line up with
    /// the temporal pass
    pub horizontal_filter_lag: usize,
    /// Spectral median window width (bins)
    pub vertical_filter_length: usize,
    /// Temporal/spectral ratio above which a bin is harmonic
    pub harmonic_threshold: Sample,
    /// Spectral/temporal ratio above which a bin is percussive
    pub percussive_threshold: Sample,
    /// Absolute magnitude below which a bin is silent
    pub silence_threshold: Sample,
}

impl Default for ClassifierParams {
    /// Defaults for a 2048-point FFT analysis frame
    fn default() -> Self {
        Self {
            bin_count: 1025,
            horizontal_filter_length: 9,
            horizontal_filter_lag: 4,
            vertical_filter_length: 9,
            harmonic_threshold: 2.0,
            percussive_threshold: 2.0,
            silence_threshold: sample::db_to_linear(-120.0),
        }
    }
}

impl ClassifierParams {
    /// Reject zero counts/window lengths and non-positive thresholds.
    ///
    /// A lag of zero is valid and disables the delay queue.
    pub fn validate(&self) -> SbResult<()> {
        if self.bin_count == 0 {
            return Err(SbError::InvalidParam("bin_count must be > 0".into()));
        }
        if self.horizontal_filter_length == 0 {
            return Err(SbError::InvalidParam(
                "horizontal_filter_length must be > 0".into(),
            ));
        }
        if self.vertical_filter_length == 0 {
            return Err(SbError::InvalidParam(
                "vertical_filter_length must be > 0".into(),
            ));
        }
        for (name, value) in [
            ("harmonic_threshold", self.harmonic_threshold),
            ("percussive_threshold", self.percussive_threshold),
            ("silence_threshold", self.silence_threshold),
        ] {
            if !(value > 0.0) {
                return Err(SbError::InvalidParam(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Per-frame tally of classification labels
///
/// Cheap summary for downstream consumers that steer transient
/// handling off the balance of a frame rather than individual bins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameCounts {
    /// Bins labeled harmonic
    pub harmonic: usize,
    /// Bins labeled percussive
    pub percussive: usize,
    /// Bins labeled residual
    pub residual: usize,
    /// Bins labeled silent
    pub silent: usize,
}

impl FrameCounts {
    /// Tally one frame's labels
    pub fn from_labels(labels: &[Classification]) -> Self {
        let mut counts = Self::default();
        for label in labels {
            match label {
                Classification::Harmonic => counts.harmonic += 1,
                Classification::Percussive => counts.percussive += 1,
                Classification::Residual => counts.residual += 1,
                Classification::Silent => counts.silent += 1,
            }
        }
        counts
    }

    /// Total bins tallied
    pub fn total(&self) -> usize {
        self.harmonic + self.percussive + self.residual + self.silent
    }

    /// Bins above the silence threshold
    pub fn audible(&self) -> usize {
        self.total() - self.silent
    }

    /// Fraction of audible bins labeled harmonic (0.0 if none audible)
    pub fn harmonic_fraction(&self) -> f64 {
        match self.audible() {
            0 => 0.0,
            audible => self.harmonic as f64 / audible as f64,
        }
    }

    /// Fraction of audible bins labeled percussive (0.0 if none audible)
    pub fn percussive_fraction(&self) -> f64 {
        match self.audible() {
            0 => 0.0,
            audible => self.percussive as f64 / audible as f64,
        }
    }
}

/// Streaming per-bin classifier
///
/// Feed frames strictly in order via [`classify`](Self::classify);
/// results depend on every prior frame through the temporal windows
/// and the delay queue. One instance per channel; instances share no
/// state. All working memory is sized at construction and the
/// per-frame path never allocates.
pub struct BinClassifier {
    params: ClassifierParams,
    /// Temporal median window per bin
    h_filters: MovingMedianStack,
    /// Across-bin median smoother
    v_filter: MovingMedian,
    /// Temporal-median output for the current frame
    hf: Vec<Sample>,
    /// Spectral-median output, delayed by `horizontal_filter_lag` frames
    vf: Vec<Sample>,
    /// Delayed spectral frames, oldest first; depth stays constant
    vf_queue: VecDeque<Vec<Sample>>,
}

impl BinClassifier {
    /// Create a classifier, validating `params`.
    ///
    /// The delay queue starts filled with zeroed frames, so the first
    /// `horizontal_filter_lag` frames compare against empty spectral
    /// history instead of blocking.
    pub fn new(params: ClassifierParams) -> SbResult<Self> {
        params.validate()?;

        let n = params.bin_count;
        let mut vf_queue = VecDeque::with_capacity(params.horizontal_filter_lag);
        for _ in 0..params.horizontal_filter_lag {
            vf_queue.push_back(vec![0.0; n]);
        }

        log::debug!(
            "BinClassifier: {} bins, horizontal {} (lag {}), vertical {}",
            n,
            params.horizontal_filter_length,
            params.horizontal_filter_lag,
            params.vertical_filter_length
        );

        Ok(Self {
            h_filters: MovingMedianStack::new(n, params.horizontal_filter_length),
            v_filter: MovingMedian::new(params.vertical_filter_length, n),
            hf: vec![0.0; n],
            vf: vec![0.0; n],
            vf_queue,
            params,
        })
    }

    /// Classifier parameters
    pub fn params(&self) -> &ClassifierParams {
        &self.params
    }

    /// Classify one frame.
    ///
    /// `mag` and `classification` must both be exactly `bin_count`
    /// long; that is a caller contract, not a runtime error. Writes
    /// one label per bin, in bin order.
    pub fn classify(&mut self, mag: &[Sample], classification: &mut [Classification]) {
        let n = self.params.bin_count;
        debug_assert_eq!(mag.len(), n);
        debug_assert_eq!(classification.len(), n);

        for (i, &m) in mag.iter().enumerate() {
            self.h_filters.push(i, m);
            self.hf[i] = self.h_filters.get(i);
        }

        self.vf.copy_from_slice(mag);
        self.v_filter.filter_in_place(&mut self.vf);

        if self.params.horizontal_filter_lag > 0 {
            // Exchange the fresh spectral frame for the one computed
            // `horizontal_filter_lag` frames ago. Ownership is swapped
            // through the queue; the buffers are never copied.
            if let Some(mut lagged) = self.vf_queue.pop_front() {
                std::mem::swap(&mut self.vf, &mut lagged);
                self.vf_queue.push_back(lagged);
            }
        }

        for i in 0..n {
            classification[i] = if mag[i] < self.params.silence_threshold {
                // Raw magnitude, not the filtered values.
                Classification::Silent
            } else if self.hf[i] / (self.vf[i] + EPS) > self.params.harmonic_threshold {
                Classification::Harmonic
            } else if self.vf[i] / (self.hf[i] + EPS) > self.params.percussive_threshold {
                Classification::Percussive
            } else {
                Classification::Residual
            };
        }
    }

    /// Clear the temporal filter bank, as if no frames had been seen.
    ///
    /// Deliberately partial: the spectral smoother has no cross-frame
    /// state, and the delay queue keeps its buffered frames across a
    /// reset.
    pub fn reset(&mut self) {
        self.h_filters.reset_all();
    }
}

impl Processor for BinClassifier {
    fn reset(&mut self) {
        BinClassifier::reset(self);
    }

    fn latency(&self) -> usize {
        self.params.horizontal_filter_lag
    }
}
