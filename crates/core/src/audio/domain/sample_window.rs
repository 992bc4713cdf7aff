use thiserror::Error;

use crate::shared::constants::SAMPLES_PER_MS;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SampleWindowError {
    #[error("invalid cue range: {start_ms}ms..{end_ms}ms")]
    InvalidCueRange { start_ms: u64, end_ms: u64 },
    #[error(
        "sample window {offset}+{length} exceeds the {available} samples of the audio track"
    )]
    OutOfBounds {
        offset: usize,
        length: usize,
        available: usize,
    },
}

/// A contiguous run of samples covering one cue's `[start, end)` interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleWindow {
    pub offset: usize,
    pub length: usize,
}

impl SampleWindow {
    /// Maps a millisecond interval onto sample indices at 16 samples/ms.
    ///
    /// The end must lie strictly after the start.
    pub fn from_time_range(start_ms: u64, end_ms: u64) -> Result<Self, SampleWindowError> {
        if end_ms <= start_ms {
            return Err(SampleWindowError::InvalidCueRange { start_ms, end_ms });
        }
        // Saturates so absurd timestamps surface as out-of-bounds windows.
        let to_samples =
            |ms: u64| usize::try_from(ms.saturating_mul(SAMPLES_PER_MS)).unwrap_or(usize::MAX);
        Ok(Self {
            offset: to_samples(start_ms),
            length: to_samples(end_ms - start_ms),
        })
    }

    pub fn end(&self) -> Option<usize> {
        self.offset.checked_add(self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_dialogue_window_offsets() {
        let window = SampleWindow::from_time_range(19320, 21056).unwrap();
        assert_eq!(window.offset, 309120);
        assert_eq!(window.length, 27776);
    }

    #[rstest]
    #[case::from_zero(0, 1, 0, 16)]
    #[case::one_second(1000, 2000, 16000, 16000)]
    #[case::odd_millis(7, 10, 112, 48)]
    fn test_offset_and_length_are_exact_multiples(
        #[case] start_ms: u64,
        #[case] end_ms: u64,
        #[case] offset: usize,
        #[case] length: usize,
    ) {
        let window = SampleWindow::from_time_range(start_ms, end_ms).unwrap();
        assert_eq!(window, SampleWindow { offset, length });
    }

    #[rstest]
    #[case::empty(500, 500)]
    #[case::inverted(2000, 1000)]
    fn test_rejects_non_increasing_range(#[case] start_ms: u64, #[case] end_ms: u64) {
        assert_eq!(
            SampleWindow::from_time_range(start_ms, end_ms),
            Err(SampleWindowError::InvalidCueRange { start_ms, end_ms })
        );
    }

    #[test]
    fn test_end() {
        let window = SampleWindow::from_time_range(1, 3).unwrap();
        assert_eq!(window.end(), Some(48));
    }
}
