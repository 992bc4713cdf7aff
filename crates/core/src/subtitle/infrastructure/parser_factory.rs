use std::fs;
use std::path::Path;

use crate::subtitle::domain::subtitle_cue::SubtitleCue;
use crate::subtitle::domain::subtitle_parser::{SubtitleError, SubtitleParser};

use super::srt_parser::SrtParser;
use super::vtt_parser::VttParser;

/// Pick a parser from the file extension.
pub fn parser_for_path(path: &Path) -> Result<Box<dyn SubtitleParser>, SubtitleError> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "srt" => Ok(Box::new(SrtParser)),
        "vtt" => Ok(Box::new(VttParser)),
        _ => Err(SubtitleError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Read and parse a subtitle file.
pub fn read_subtitles(path: &Path) -> Result<Vec<SubtitleCue>, SubtitleError> {
    let parser = parser_for_path(path)?;
    let content = fs::read_to_string(path).map_err(|source| SubtitleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cues = parser.parse(&content)?;
    log::info!("Parsed {} cues from {}", cues.len(), path.display());
    Ok(cues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case::srt("movie.srt")]
    #[case::upper("MOVIE.SRT")]
    #[case::vtt("movie.vtt")]
    fn test_supported_extensions(#[case] name: &str) {
        assert!(parser_for_path(Path::new(name)).is_ok());
    }

    #[rstest]
    #[case::ass("movie.ass")]
    #[case::none("movie")]
    fn test_unsupported_extensions(#[case] name: &str) {
        assert!(matches!(
            parser_for_path(Path::new(name)),
            Err(SubtitleError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_read_subtitles_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("clip.srt");
        fs::write(&path, "1\n00:00:01,000 --> 00:00:02,500\nHello\n").unwrap();

        let cues = read_subtitles(&path).unwrap();
        assert_eq!(cues, vec![SubtitleCue::new(1000, 2500, "Hello")]);
    }

    #[test]
    fn test_read_subtitles_missing_file() {
        let result = read_subtitles(Path::new("/nonexistent/clip.srt"));
        assert!(matches!(result, Err(SubtitleError::Io { .. })));
    }
}
