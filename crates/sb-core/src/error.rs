//! Error types for SoundBend

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum SbError {
    #[error("DSP error: {0}")]
    Dsp(String),

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),
}

/// Result type alias
pub type SbResult<T> = Result<T, SbError>;
