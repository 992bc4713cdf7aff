use std::path::{Path, PathBuf};

use thiserror::Error;

use super::sample_buffer::SampleBuffer;

#[derive(Error, Debug)]
pub enum AudioReadError {
    #[error("failed to read audio from {path}: {message}")]
    Read { path: PathBuf, message: String },
    #[error("unsupported audio format in {path}: {detail}")]
    UnsupportedFormat { path: PathBuf, detail: String },
}

/// Domain interface for loading an audio track as mono 16-bit PCM.
pub trait AudioReader: Send {
    fn read_samples(&self, path: &Path) -> Result<SampleBuffer, AudioReadError>;
}
