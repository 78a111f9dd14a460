//! sb-core: shared foundation for SoundBend
//!
//! Core types used across the workspace:
//! - `sample` - Sample type alias and dB/linear conversions
//! - `error` - Workspace error type

pub mod error;
pub mod sample;

pub use error::{SbError, SbResult};
pub use sample::Sample;
