use std::path::{Path, PathBuf};

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::grammar::infrastructure::fsg_file_writer::read_grammar;
use crate::recognition::domain::decode_result::{Hypothesis, WordSegment};
use crate::recognition::domain::decoder_config::DecoderConfig;
use crate::recognition::domain::speech_decoder::{DecoderError, SpeechDecoder};
use crate::shared::constants::{DECODER_SAMPLE_RATE, DEFAULT_FRAME_RATE, WHISPER_LANGUAGE};

/// whisper.cpp skips inputs shorter than one second.
const MIN_UTTERANCE_SAMPLES: usize = DECODER_SAMPLE_RATE as usize * 11 / 10;

/// Speech decoder using whisper.cpp via whisper-rs.
///
/// The acoustic model path points at a ggml Whisper model. When a grammar is
/// configured its word chain is passed as the initial prompt, steering the
/// transcription towards the expected dialogue. Token timestamps are in
/// centiseconds, i.e. frames at 100 fps.
pub struct WhisperDecoder {
    context: WhisperContext,
    model_path: PathBuf,
    prompt: Option<String>,
    pending: Vec<f32>,
    hypothesis: Option<Hypothesis>,
    words: Vec<WordSegment>,
}

impl WhisperDecoder {
    fn params(&self) -> FullParams<'_, '_> {
        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 0 });
        params.set_language(Some(WHISPER_LANGUAGE));
        params.set_translate(false);
        params.set_token_timestamps(true);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_n_threads(num_cpus().min(4) as i32);
        if let Some(prompt) = &self.prompt {
            params.set_initial_prompt(prompt);
        }
        params
    }

    fn clear(&mut self) {
        self.pending.clear();
        self.hypothesis = None;
        self.words.clear();
    }
}

impl SpeechDecoder for WhisperDecoder {
    fn init(config: &DecoderConfig) -> Result<Self, DecoderError> {
        whisper_rs::install_logging_hooks();
        warn_unused_inputs(config);

        Ok(Self {
            context: load_context(config.acoustic_model())?,
            model_path: config.acoustic_model().to_path_buf(),
            prompt: grammar_prompt(config)?,
            pending: Vec::new(),
            hypothesis: None,
            words: Vec::new(),
        })
    }

    fn reinit(&mut self, config: &DecoderConfig) -> Result<(), DecoderError> {
        // Grammar-only changes keep the loaded model.
        if config.acoustic_model() != self.model_path {
            self.context = load_context(config.acoustic_model())?;
            self.model_path = config.acoustic_model().to_path_buf();
        }
        self.prompt = grammar_prompt(config)?;
        self.clear();
        Ok(())
    }

    fn start_utterance(&mut self) -> Result<(), DecoderError> {
        self.clear();
        Ok(())
    }

    fn process_raw(&mut self, samples: &[i16]) -> Result<(), DecoderError> {
        self.pending
            .extend(samples.iter().map(|&s| s as f32 / 32768.0));
        Ok(())
    }

    fn end_utterance(&mut self) -> Result<(), DecoderError> {
        if self.pending.len() < MIN_UTTERANCE_SAMPLES {
            self.pending.resize(MIN_UTTERANCE_SAMPLES, 0.0);
        }

        let mut state = self
            .context
            .create_state()
            .map_err(|e| DecoderError::Backend(format!("Failed to create Whisper state: {e}")))?;
        state
            .full(self.params(), &self.pending)
            .map_err(|e| DecoderError::Backend(format!("Whisper inference failed: {e}")))?;

        let mut tokens = Vec::new();
        let num_segments = state.full_n_segments();
        for seg_idx in 0..num_segments {
            let segment = match state.get_segment(seg_idx) {
                Some(s) => s,
                None => continue,
            };
            for tok_idx in 0..segment.n_tokens() {
                let token = match segment.get_token(tok_idx) {
                    Some(t) => t,
                    None => continue,
                };
                let text = match token.to_str() {
                    Ok(t) => t.to_string(),
                    Err(_) => continue,
                };
                let data = token.token_data();
                tokens.push(RawToken {
                    text,
                    start_frame: data.t0 as i32,
                    end_frame: data.t1 as i32,
                    probability: token.token_probability(),
                    log_probability: data.plog,
                });
            }
        }

        let (hypothesis, words) = merge_tokens(&tokens);
        self.hypothesis = Some(hypothesis);
        self.words = words;
        self.pending.clear();
        Ok(())
    }

    fn hypothesis(&self) -> Option<Hypothesis> {
        self.hypothesis.clone()
    }

    fn segments(&self) -> Vec<WordSegment> {
        self.words.clone()
    }

    fn frame_rate(&self) -> u32 {
        DEFAULT_FRAME_RATE
    }
}

/// One whisper token with its centisecond timestamps.
#[derive(Debug, Clone)]
struct RawToken {
    text: String,
    start_frame: i32,
    end_frame: i32,
    probability: f32,
    log_probability: f32,
}

/// Join sub-word tokens into words. A token with a leading space starts a
/// new word; anything else extends the previous one. Special tokens
/// (`[_BEG_]`, `<|endoftext|>`) and tokens with inverted timestamps are
/// dropped.
fn merge_tokens(tokens: &[RawToken]) -> (Hypothesis, Vec<WordSegment>) {
    let mut words: Vec<WordSegment> = Vec::new();
    let mut score = 0.0f64;

    for token in tokens {
        let trimmed = token.text.trim();
        if trimmed.is_empty() || trimmed.starts_with('[') || trimmed.starts_with('<') {
            continue;
        }
        if token.end_frame < token.start_frame {
            continue;
        }
        score += token.log_probability as f64;

        match words.last_mut() {
            Some(word) if !token.text.starts_with(' ') => {
                word.word.push_str(trimmed);
                word.end_frame = word.end_frame.max(token.end_frame);
                word.confidence = word.confidence.min(token.probability);
            }
            _ => words.push(WordSegment {
                word: trimmed.to_string(),
                start_frame: token.start_frame,
                end_frame: token.end_frame,
                confidence: token.probability,
            }),
        }
    }

    let text = words
        .iter()
        .map(|w| w.word.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    (Hypothesis { text, score }, words)
}

fn load_context(model_path: &Path) -> Result<WhisperContext, DecoderError> {
    let path = model_path
        .to_str()
        .ok_or_else(|| DecoderError::ModelLoad("Invalid model path".to_string()))?;
    log::info!("Loading Whisper model from {path}");
    WhisperContext::new_with_params(path, WhisperContextParameters::default())
        .map_err(|e| DecoderError::ModelLoad(format!("Failed to load Whisper model: {e}")))
}

fn grammar_prompt(config: &DecoderConfig) -> Result<Option<String>, DecoderError> {
    let Some(path) = config.grammar() else {
        return Ok(None);
    };
    let grammar = read_grammar(path).map_err(|e| DecoderError::Grammar(e.to_string()))?;
    if grammar.words().is_empty() {
        return Ok(None);
    }
    Ok(Some(grammar.words().join(" ")))
}

fn warn_unused_inputs(config: &DecoderConfig) {
    if let Some(lm) = config.language_model() {
        log::debug!("Whisper ignores language model {}", lm.display());
    }
    if let Some(dict) = config.dictionary() {
        log::debug!("Whisper ignores dictionary {}", dict.display());
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::domain::finite_state_grammar::FiniteStateGrammar;
    use crate::grammar::infrastructure::fsg_file_writer::write_grammar;
    use std::fs;
    use tempfile::TempDir;

    fn token(text: &str, start_frame: i32, end_frame: i32, probability: f32) -> RawToken {
        RawToken {
            text: text.to_string(),
            start_frame,
            end_frame,
            probability,
            log_probability: probability.ln(),
        }
    }

    #[test]
    fn test_merge_joins_sub_word_tokens() {
        let tokens = vec![
            token(" Why", 0, 20, 0.9),
            token(" are", 20, 35, 0.8),
            token(" bor", 40, 60, 0.7),
            token("ing", 60, 80, 0.95),
            token("?", 80, 81, 0.6),
        ];
        let (hypothesis, words) = merge_tokens(&tokens);

        assert_eq!(hypothesis.text, "Why are boring?");
        assert_eq!(words.len(), 3);
        assert_eq!(words[2].word, "boring?");
        assert_eq!(words[2].start_frame, 40);
        assert_eq!(words[2].end_frame, 81);
        assert_eq!(words[2].confidence, 0.6);
    }

    #[test]
    fn test_merge_skips_special_tokens() {
        let tokens = vec![
            token("[_BEG_]", 0, 0, 1.0),
            token(" hello", 0, 30, 0.9),
            token("<|endoftext|>", 30, 30, 1.0),
        ];
        let (hypothesis, words) = merge_tokens(&tokens);
        assert_eq!(hypothesis.text, "hello");
        assert_eq!(words.len(), 1);
    }

    #[test]
    fn test_merge_skips_inverted_timestamps() {
        let tokens = vec![token(" good", 10, 20, 0.9), token(" bad", 30, 25, 0.9)];
        let (_, words) = merge_tokens(&tokens);
        assert_eq!(words.len(), 1);
    }

    #[test]
    fn test_merge_score_sums_log_probabilities() {
        let tokens = vec![token(" a", 0, 1, 0.5), token(" b", 1, 2, 0.5)];
        let (hypothesis, _) = merge_tokens(&tokens);
        assert!((hypothesis.score - 2.0 * (0.5f32.ln() as f64)).abs() < 1e-6);
    }

    #[test]
    fn test_merge_empty() {
        let (hypothesis, words) = merge_tokens(&[]);
        assert_eq!(hypothesis.text, "");
        assert!(words.is_empty());
    }

    #[test]
    fn test_grammar_prompt_from_fsg() {
        let tmp = TempDir::new().unwrap();
        let model = tmp.path().join("model.bin");
        fs::write(&model, b"x").unwrap();
        let fsg = tmp.path().join("1000.fsg");
        write_grammar(&fsg, &FiniteStateGrammar::from_dialogue("1000", "Hello there")).unwrap();

        let config = DecoderConfig::builder(&model).grammar(&fsg).build().unwrap();
        assert_eq!(grammar_prompt(&config).unwrap().as_deref(), Some("hello there"));
    }

    #[test]
    fn test_no_grammar_no_prompt() {
        let tmp = TempDir::new().unwrap();
        let model = tmp.path().join("model.bin");
        fs::write(&model, b"x").unwrap();
        let config = DecoderConfig::builder(&model).build().unwrap();
        assert!(grammar_prompt(&config).unwrap().is_none());
    }

    #[test]
    fn test_init_with_invalid_model_fails() {
        let tmp = TempDir::new().unwrap();
        let model = tmp.path().join("model.bin");
        fs::write(&model, b"not a ggml model").unwrap();
        let config = DecoderConfig::builder(&model).build().unwrap();

        let result = WhisperDecoder::init(&config);
        assert!(matches!(result, Err(DecoderError::ModelLoad(_))));
    }

    #[test]
    #[ignore] // Requires a ggml Whisper model at $WHISPER_MODEL
    fn test_decode_does_not_crash_on_sine_wave() {
        let model = std::env::var("WHISPER_MODEL").expect("WHISPER_MODEL not set");
        let config = DecoderConfig::builder(model).build().unwrap();
        let mut decoder = WhisperDecoder::init(&config).expect("Failed to create decoder");

        let samples: Vec<i16> = (0..DECODER_SAMPLE_RATE as usize * 2)
            .map(|i| {
                let t = i as f64 / DECODER_SAMPLE_RATE as f64;
                ((2.0 * std::f64::consts::PI * 440.0 * t).sin() * 8000.0) as i16
            })
            .collect();

        decoder.start_utterance().unwrap();
        decoder.process_raw(&samples).unwrap();
        decoder.end_utterance().unwrap();
        assert!(decoder.hypothesis().is_some());
    }
}
