use thiserror::Error;

use crate::audio::domain::sample_window::SampleWindowError;
use crate::recognition::domain::decoder_config::ConfigError;
use crate::recognition::domain::decoder_session::{SessionError, UtteranceState};
use crate::recognition::domain::speech_decoder::DecoderError;

/// Failures that end an alignment run. None of them are retried.
#[derive(Error, Debug)]
pub enum AlignError {
    #[error("failed to create decoder config: {0}")]
    ConfigInitFailed(#[source] ConfigError),
    #[error("failed to create recognizer: {0}")]
    DecoderInitFailed(#[source] DecoderError),
    #[error("invalid cue range: {start_ms}ms..{end_ms}ms")]
    InvalidCueRange { start_ms: u64, end_ms: u64 },
    #[error("sample window {offset}+{length} exceeds the {available} samples of the audio track")]
    SampleWindowOutOfBounds {
        offset: usize,
        length: usize,
        available: usize,
    },
    #[error("audio is {actual} Hz but the decoder expects {expected} Hz")]
    SampleRateMismatch { expected: u32, actual: u32 },
    #[error("utterance step out of order: expected {expected}, was {actual}")]
    UtteranceOutOfOrder {
        expected: UtteranceState,
        actual: UtteranceState,
    },
    #[error("decoding failed: {0}")]
    Decode(#[source] DecoderError),
    #[error("failed to write report: {0}")]
    Report(#[from] std::io::Error),
}

impl From<ConfigError> for AlignError {
    fn from(e: ConfigError) -> Self {
        AlignError::ConfigInitFailed(e)
    }
}

impl From<SampleWindowError> for AlignError {
    fn from(e: SampleWindowError) -> Self {
        match e {
            SampleWindowError::InvalidCueRange { start_ms, end_ms } => {
                AlignError::InvalidCueRange { start_ms, end_ms }
            }
            SampleWindowError::OutOfBounds {
                offset,
                length,
                available,
            } => AlignError::SampleWindowOutOfBounds {
                offset,
                length,
                available,
            },
        }
    }
}

impl From<SessionError> for AlignError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Init(e) => AlignError::DecoderInitFailed(e),
            SessionError::OutOfOrder { expected, actual } => {
                AlignError::UtteranceOutOfOrder { expected, actual }
            }
            SessionError::Backend(e) => AlignError::Decode(e),
        }
    }
}
