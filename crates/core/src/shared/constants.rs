/// Sample rate every decoder backend expects its PCM input at.
pub const DECODER_SAMPLE_RATE: u32 = 16000;

/// Samples per millisecond at [`DECODER_SAMPLE_RATE`].
pub const SAMPLES_PER_MS: u64 = 16;

/// Decoder frames per second (10 ms frames).
pub const DEFAULT_FRAME_RATE: u32 = 100;

/// Prefix used for per-cue grammar files when none is configured.
pub const DEFAULT_GRAMMAR_BASE: &str = "tempFiles/fsg/";

pub const GRAMMAR_EXTENSION: &str = "fsg";

pub const SUBTITLE_EXTENSIONS: &[&str] = &["srt", "vtt"];

pub const WHISPER_LANGUAGE: &str = "en";
