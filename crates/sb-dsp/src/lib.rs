//! sb-dsp: spectral analysis DSP for SoundBend
//!
//! Streaming analysis primitives consumed by the elastic-audio engine:
//! - `median` - moving-median smoothing filters (temporal and spectral)
//! - `classify` - per-bin harmonic/percussive/residual/silent labeling

pub mod classify;
pub mod median;

pub use classify::{BinClassifier, Classification, ClassifierParams, FrameCounts};
pub use median::{MovingMedian, MovingMedianStack};

/// Trait for all DSP processors
pub trait Processor: Send + Sync {
    /// Reset processor state
    fn reset(&mut self);

    /// Get latency in analysis frames
    fn latency(&self) -> usize {
        0
    }
}
