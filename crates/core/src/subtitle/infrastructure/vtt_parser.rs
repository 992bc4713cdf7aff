use crate::subtitle::domain::subtitle_cue::SubtitleCue;
use crate::subtitle::domain::subtitle_parser::{SubtitleError, SubtitleParser};

use super::markup::join_dialogue;
use super::srt_parser::{blocks, parse_timing};

/// Parser for WebVTT (`.vtt`) files.
pub struct VttParser;

impl SubtitleParser for VttParser {
    fn parse(&self, content: &str) -> Result<Vec<SubtitleCue>, SubtitleError> {
        let mut blocks = blocks(content).into_iter();

        let header = blocks.next().ok_or(SubtitleError::MissingHeader)?;
        if !header[0].1.starts_with("WEBVTT") {
            return Err(SubtitleError::MissingHeader);
        }

        let mut cues = Vec::new();
        for block in blocks {
            let first = block[0].1;
            if first.starts_with("NOTE") || first.starts_with("STYLE") || first.starts_with("REGION")
            {
                continue;
            }

            // Optional cue identifier before the timing line.
            let timing_pos = block
                .iter()
                .take(2)
                .position(|(_, text)| text.contains("-->"))
                .ok_or_else(|| SubtitleError::MissingTiming {
                    line: block[0].0,
                    value: first.to_string(),
                })?;

            let (line, timing) = block[timing_pos];
            let (start, end) = parse_timing(line, timing, '.', true)?;
            let dialogue = join_dialogue(block[timing_pos + 1..].iter().map(|(_, text)| *text));
            cues.push(SubtitleCue::new(start, end, dialogue));
        }
        Ok(cues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_cues_and_skips_notes() {
        let content = "WEBVTT - sample

NOTE this is a comment

intro
00:19.320 --> 00:21.056 align:start
<v Elon>Why are you boring?

00:00:21.500 --> 00:00:24.000
Because
";
        let cues = VttParser.parse(content).unwrap();
        assert_eq!(
            cues,
            vec![
                SubtitleCue::new(19320, 21056, "Why are you boring?"),
                SubtitleCue::new(21500, 24000, "Because"),
            ]
        );
    }

    #[test]
    fn test_missing_header_fails() {
        let err = VttParser
            .parse("00:01.000 --> 00:02.000\nHi\n")
            .unwrap_err();
        assert!(matches!(err, SubtitleError::MissingHeader));
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(matches!(
            VttParser.parse(""),
            Err(SubtitleError::MissingHeader)
        ));
    }

    #[test]
    fn test_header_only_yields_no_cues() {
        assert!(VttParser.parse("WEBVTT\n").unwrap().is_empty());
    }
}
