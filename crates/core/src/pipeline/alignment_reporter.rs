use std::collections::HashMap;
use std::io::{self, Write};
use std::time::Instant;

use crate::recognition::domain::decode_result::DecodeResult;
use crate::subtitle::domain::subtitle_cue::SubtitleCue;

const SEPARATOR: &str = "\n\n-----------------------------------------\n\n";

/// Observer for the per-cue alignment loop.
///
/// Keeps the loop independent of where results go (stdout, a file, a test
/// buffer) and of how timing is summarized.
pub trait AlignmentReporter: Send {
    /// Report the decode result of one cue.
    fn cue_aligned(&mut self, cue: &SubtitleCue, result: &DecodeResult) -> io::Result<()>;

    /// Note a cue the loop did not decode. Default: no-op.
    fn cue_skipped(&mut self, _cue: &SubtitleCue) {}

    /// Record how long a named stage took for one cue.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Reporter that discards everything.
pub struct NullAlignmentReporter;

impl AlignmentReporter for NullAlignmentReporter {
    fn cue_aligned(&mut self, _cue: &SubtitleCue, _result: &DecodeResult) -> io::Result<()> {
        Ok(())
    }

    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
}

/// Writes the human-readable per-cue report to `out` and logs a timing
/// summary at the end of the run.
pub struct TextAlignmentReporter<W: Write + Send> {
    out: W,
    timings: HashMap<String, Vec<f64>>,
    start_time: Instant,
    aligned: usize,
    skipped: usize,
}

impl<W: Write + Send> TextAlignmentReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            timings: HashMap::new(),
            start_time: Instant::now(),
            aligned: 0,
            skipped: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    /// Returns the formatted summary string, or `None` if nothing was
    /// reported.
    pub fn summary_string(&self) -> Option<String> {
        if self.aligned == 0 && self.skipped == 0 {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Alignment summary ({} cues aligned, {} skipped, {:.1}s total):",
            self.aligned,
            self.skipped,
            elapsed_ms / 1000.0
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = total_ms / durations.len().max(1) as f64;
            lines.push(format!(
                "  {stage:8}: avg {avg_ms:7.1}ms  total {total_ms:8.0}ms"
            ));
        }

        Some(lines.join("\n"))
    }
}

impl<W: Write + Send> AlignmentReporter for TextAlignmentReporter<W> {
    fn cue_aligned(&mut self, cue: &SubtitleCue, result: &DecodeResult) -> io::Result<()> {
        self.aligned += 1;
        self.out.write_all(format_cue_report(cue, result).as_bytes())?;
        self.out.flush()
    }

    fn cue_skipped(&mut self, cue: &SubtitleCue) {
        self.skipped += 1;
        log::debug!("Skipped cue at {}ms: no dialogue", cue.start_ms());
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

/// Render one cue's block: times, recognized vs. actual text, then one
/// `word \t start \t end` line per segment with seconds at millisecond
/// precision.
pub fn format_cue_report(cue: &SubtitleCue, result: &DecodeResult) -> String {
    let mut report = String::new();
    report.push_str(SEPARATOR);
    report.push_str(&format!(
        "Start time of dialogue : {}\nEnd time of dialogue   : {}\n\n",
        cue.start_ms(),
        cue.end_ms()
    ));
    report.push_str(&format!(
        "Recognised  : {}\nActual      : {}\n\n",
        result.hypothesis,
        cue.dialogue()
    ));
    for segment in &result.segments {
        report.push_str(&format!(
            "{} \t {:.3} \t {:.3}\n",
            segment.word,
            segment.start_seconds(result.frame_rate),
            segment.end_seconds(result.frame_rate)
        ));
    }
    report.push_str(SEPARATOR);
    report
}
