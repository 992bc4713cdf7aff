use std::fmt;

use thiserror::Error;

use super::decode_result::DecodeResult;
use super::decoder_config::DecoderConfig;
use super::speech_decoder::{DecoderError, SpeechDecoder};

/// Where a session is in its per-utterance cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtteranceState {
    Idle,
    UtteranceStarted,
    SamplesSubmitted,
    UtteranceEnded,
    HypothesisAvailable,
}

impl fmt::Display for UtteranceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to initialize decoder: {0}")]
    Init(#[source] DecoderError),
    #[error("utterance step out of order: expected {expected}, was {actual}")]
    OutOfOrder {
        expected: UtteranceState,
        actual: UtteranceState,
    },
    #[error(transparent)]
    Backend(DecoderError),
}

/// Exclusive owner of a decoder and its utterance state machine.
///
/// `Idle -> UtteranceStarted -> SamplesSubmitted -> UtteranceEnded ->
/// HypothesisAvailable -> Idle`. Any other transition is rejected.
pub struct DecoderSession {
    decoder: Box<dyn SpeechDecoder>,
    state: UtteranceState,
}

impl fmt::Debug for DecoderSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderSession")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl DecoderSession {
    pub fn new(decoder: Box<dyn SpeechDecoder>) -> Self {
        Self {
            decoder,
            state: UtteranceState::Idle,
        }
    }

    /// Build a decoder of type `D` from `config` and wrap it.
    pub fn open<D: SpeechDecoder + 'static>(config: &DecoderConfig) -> Result<Self, SessionError> {
        log::debug!("Opening decoder with {:?}", config.args());
        let decoder = D::init(config).map_err(SessionError::Init)?;
        Ok(Self::new(Box::new(decoder)))
    }

    pub fn state(&self) -> UtteranceState {
        self.state
    }

    pub fn frame_rate(&self) -> u32 {
        self.decoder.frame_rate()
    }

    /// Replace the decoder's state with one built from `config`.
    ///
    /// Consumes the session; on failure the old decoder is gone with it.
    pub fn reinitialize(mut self, config: &DecoderConfig) -> Result<Self, SessionError> {
        self.expect(UtteranceState::Idle)?;
        log::debug!("Reinitializing decoder with {:?}", config.args());
        self.decoder.reinit(config).map_err(SessionError::Init)?;
        Ok(self)
    }

    pub fn start_utterance(&mut self) -> Result<(), SessionError> {
        self.expect(UtteranceState::Idle)?;
        self.decoder.start_utterance().map_err(SessionError::Backend)?;
        self.state = UtteranceState::UtteranceStarted;
        Ok(())
    }

    pub fn submit_samples(&mut self, samples: &[i16]) -> Result<(), SessionError> {
        self.expect(UtteranceState::UtteranceStarted)?;
        self.decoder
            .process_raw(samples)
            .map_err(SessionError::Backend)?;
        self.state = UtteranceState::SamplesSubmitted;
        Ok(())
    }

    pub fn end_utterance(&mut self) -> Result<(), SessionError> {
        self.expect(UtteranceState::SamplesSubmitted)?;
        self.decoder.end_utterance().map_err(SessionError::Backend)?;
        self.state = UtteranceState::UtteranceEnded;
        Ok(())
    }

    /// Read the hypothesis and word segments, returning the session to
    /// `Idle`. A decoder with no hypothesis yields empty text.
    pub fn take_result(&mut self) -> Result<DecodeResult, SessionError> {
        self.expect(UtteranceState::UtteranceEnded)?;
        self.state = UtteranceState::HypothesisAvailable;

        let (hypothesis, score) = self
            .decoder
            .hypothesis()
            .map(|h| (h.text, h.score))
            .unwrap_or_default();
        let result = DecodeResult {
            hypothesis,
            score,
            frame_rate: self.decoder.frame_rate(),
            segments: self.decoder.segments(),
        };

        self.state = UtteranceState::Idle;
        Ok(result)
    }

    /// Run a full start/submit/end/read cycle over one window of samples.
    pub fn decode_utterance(&mut self, samples: &[i16]) -> Result<DecodeResult, SessionError> {
        self.start_utterance()?;
        self.submit_samples(samples)?;
        self.end_utterance()?;
        self.take_result()
    }

    fn expect(&self, expected: UtteranceState) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::OutOfOrder {
                expected,
                actual: self.state,
            })
        }
    }
}
