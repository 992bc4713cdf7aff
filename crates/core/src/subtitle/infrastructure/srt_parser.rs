use crate::subtitle::domain::subtitle_cue::SubtitleCue;
use crate::subtitle::domain::subtitle_parser::{SubtitleError, SubtitleParser};

use super::markup::join_dialogue;
use super::timestamp::{parse_timestamp, split_timing_line};

/// A blank-line separated block of `(line_number, text)` pairs.
pub(crate) type Block<'a> = Vec<(usize, &'a str)>;

/// Parser for SubRip (`.srt`) files.
pub struct SrtParser;

impl SubtitleParser for SrtParser {
    fn parse(&self, content: &str) -> Result<Vec<SubtitleCue>, SubtitleError> {
        merge_continuations(blocks(content))
            .iter()
            .map(parse_block)
            .collect()
    }
}

/// Fold blocks that carry neither an index nor a timing line into the
/// preceding block; they are dialogue split by a blank line.
fn merge_continuations(blocks: Vec<Block<'_>>) -> Vec<Block<'_>> {
    let mut merged: Vec<Block<'_>> = Vec::with_capacity(blocks.len());
    for block in blocks {
        if is_continuation(&block) && !merged.is_empty() {
            let last = merged.len() - 1;
            merged[last].extend(block);
        } else {
            merged.push(block);
        }
    }
    merged
}

fn is_continuation(block: &Block<'_>) -> bool {
    let has_timing = block.iter().take(2).any(|(_, text)| text.contains("-->"));
    let has_index = block
        .first()
        .is_some_and(|(_, text)| text.trim().bytes().all(|b| b.is_ascii_digit()));
    !has_timing && !has_index
}

fn parse_block(block: &Block<'_>) -> Result<SubtitleCue, SubtitleError> {
    // The numeric index line is optional; some encoders omit it.
    let timing_pos = block
        .iter()
        .take(2)
        .position(|(_, text)| text.contains("-->"))
        .ok_or_else(|| {
            let (line, value) = block[block.len().min(2) - 1];
            SubtitleError::MissingTiming {
                line,
                value: value.to_string(),
            }
        })?;

    let (line, timing) = block[timing_pos];
    let (start, end) = parse_timing(line, timing, ',', false)?;
    let dialogue = join_dialogue(block[timing_pos + 1..].iter().map(|(_, text)| *text));

    Ok(SubtitleCue::new(start, end, dialogue))
}

pub(crate) fn parse_timing(
    line: usize,
    timing: &str,
    separator: char,
    hours_optional: bool,
) -> Result<(u64, u64), SubtitleError> {
    let invalid = |value: &str| SubtitleError::InvalidTimestamp {
        line,
        value: value.to_string(),
    };
    let (start, end) = split_timing_line(timing).ok_or_else(|| invalid(timing))?;
    let start_ms = parse_timestamp(start, separator, hours_optional).ok_or_else(|| invalid(start))?;
    let end_ms = parse_timestamp(end, separator, hours_optional).ok_or_else(|| invalid(end))?;
    Ok((start_ms, end_ms))
}

/// Split file contents into non-empty blocks, tolerating a UTF-8 BOM and
/// CRLF line endings.
pub(crate) fn blocks(content: &str) -> Vec<Block<'_>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let text = raw.trim_end_matches('\r');
        if text.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push((idx + 1, text));
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}
