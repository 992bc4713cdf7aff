use std::path::PathBuf;
use std::time::Instant;

use crate::audio::domain::sample_buffer::SampleBuffer;
use crate::audio::domain::sample_window::SampleWindow;
use crate::grammar::domain::finite_state_grammar::grammar_path;
use crate::recognition::domain::decoder_config::DecoderConfig;
use crate::recognition::domain::decoder_session::DecoderSession;
use crate::shared::constants::DECODER_SAMPLE_RATE;
use crate::subtitle::domain::subtitle_cue::SubtitleCue;

use super::align_error::AlignError;
use super::alignment_reporter::AlignmentReporter;

/// How each cue is decoded.
#[derive(Debug, Clone)]
pub enum AlignmentMode {
    /// Open decoding with the session's acoustic and language models.
    /// Every cue is decoded, including cues without dialogue.
    LanguageModel,
    /// Forced alignment: before each cue the session is rebuilt from
    /// `base_config` plus the grammar at `<grammar_base><start_ms>.fsg`.
    /// Cues without dialogue are skipped.
    Grammar {
        grammar_base: PathBuf,
        base_config: DecoderConfig,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignmentStats {
    pub aligned: usize,
    pub skipped: usize,
}

pub struct AlignCuesUseCase {
    mode: AlignmentMode,
    reporter: Box<dyn AlignmentReporter>,
}

impl AlignCuesUseCase {
    pub fn new(mode: AlignmentMode, reporter: Box<dyn AlignmentReporter>) -> Self {
        Self { mode, reporter }
    }

    /// Decode every cue in order against its window of `samples`.
    ///
    /// The session is handed back so callers can keep using it. The first
    /// error aborts the run.
    pub fn execute(
        &mut self,
        mut session: DecoderSession,
        cues: &[SubtitleCue],
        samples: &SampleBuffer,
    ) -> Result<(DecoderSession, AlignmentStats), AlignError> {
        if samples.sample_rate() != DECODER_SAMPLE_RATE {
            return Err(AlignError::SampleRateMismatch {
                expected: DECODER_SAMPLE_RATE,
                actual: samples.sample_rate(),
            });
        }

        let mut stats = AlignmentStats::default();
        for cue in cues {
            if let AlignmentMode::Grammar {
                grammar_base,
                base_config,
            } = &self.mode
            {
                if !cue.has_dialogue() {
                    self.reporter.cue_skipped(cue);
                    stats.skipped += 1;
                    continue;
                }

                let cue_config =
                    base_config.with_grammar(grammar_path(grammar_base, cue.start_ms()))?;
                let started = Instant::now();
                session = session.reinitialize(&cue_config)?;
                self.reporter
                    .timing("reinit", started.elapsed().as_secs_f64() * 1000.0);
            }

            let window = SampleWindow::from_time_range(cue.start_ms(), cue.end_ms())?;
            let audio = samples.window(&window)?;

            let started = Instant::now();
            let result = session.decode_utterance(audio)?;
            self.reporter
                .timing("decode", started.elapsed().as_secs_f64() * 1000.0);

            self.reporter.cue_aligned(cue, &result)?;
            stats.aligned += 1;
        }

        self.reporter.summary();
        Ok((session, stats))
    }
}
