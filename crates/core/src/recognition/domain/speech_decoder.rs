use thiserror::Error;

use super::decode_result::{Hypothesis, WordSegment};
use super::decoder_config::DecoderConfig;

#[derive(Error, Debug)]
pub enum DecoderError {
    #[error("failed to load model: {0}")]
    ModelLoad(String),
    #[error("failed to load grammar: {0}")]
    Grammar(String),
    #[error("decoding failed: {0}")]
    Backend(String),
}

/// Domain interface for an utterance-oriented speech decoder.
///
/// Callers drive one utterance at a time: `start_utterance`, one or more
/// `process_raw` calls, `end_utterance`, then read `hypothesis` and
/// `segments`. Implementations are stateful and not reentrant.
pub trait SpeechDecoder: Send {
    fn init(config: &DecoderConfig) -> Result<Self, DecoderError>
    where
        Self: Sized;

    /// Replace all internal state with a decoder built from `config`.
    fn reinit(&mut self, config: &DecoderConfig) -> Result<(), DecoderError>;

    fn start_utterance(&mut self) -> Result<(), DecoderError>;

    /// Submit samples for the current utterance. This is neither a final
    /// block nor a real-time feed.
    fn process_raw(&mut self, samples: &[i16]) -> Result<(), DecoderError>;

    fn end_utterance(&mut self) -> Result<(), DecoderError>;

    fn hypothesis(&self) -> Option<Hypothesis>;

    /// Recognized words of the last utterance, in time order.
    fn segments(&self) -> Vec<WordSegment>;

    /// Frames per second used by segment frame indices.
    fn frame_rate(&self) -> u32;
}
