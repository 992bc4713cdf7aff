use std::path::PathBuf;

use thiserror::Error;

use super::subtitle_cue::SubtitleCue;

#[derive(Error, Debug)]
pub enum SubtitleError {
    #[error("failed to read subtitles from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: invalid timestamp '{value}'")]
    InvalidTimestamp { line: usize, value: String },
    #[error("line {line}: expected a timing line, got '{value}'")]
    MissingTiming { line: usize, value: String },
    #[error("missing WEBVTT header")]
    MissingHeader,
    #[error("unsupported subtitle format: {0}")]
    UnsupportedFormat(String),
}

/// Domain interface for turning subtitle file contents into cues.
///
/// Cues are returned in the order they appear in the source; no sorting or
/// overlap checks are applied.
pub trait SubtitleParser: Send {
    fn parse(&self, content: &str) -> Result<Vec<SubtitleCue>, SubtitleError>;
}
