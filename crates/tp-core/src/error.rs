//! Core error types

use thiserror::Error;

/// Errors raised when constructing core audio types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Sample rate outside the supported set
    #[error("Unsupported sample rate: {0} Hz (expected 44100 or 48000)")]
    UnsupportedSampleRate(u32),
}

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;
