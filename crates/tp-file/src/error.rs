//! File I/O error types

use thiserror::Error;
use tp_core::CoreError;

#[derive(Error, Debug)]
pub enum FileError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("No audio track found in {0}")]
    NoAudioTrack(String),

    #[error("Unsupported channel layout: {0} channels (expected mono or stereo)")]
    UnsupportedChannelLayout(usize),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type FileResult<T> = Result<T, FileError>;
