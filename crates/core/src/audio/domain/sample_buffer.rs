use super::sample_window::{SampleWindow, SampleWindowError};

/// A whole audio track as mono 16-bit PCM.
#[derive(Clone, Debug)]
pub struct SampleBuffer {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl SampleBuffer {
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Borrow the samples covered by `window`, failing instead of reading
    /// past the end of the track.
    pub fn window(&self, window: &SampleWindow) -> Result<&[i16], SampleWindowError> {
        let out_of_bounds = || SampleWindowError::OutOfBounds {
            offset: window.offset,
            length: window.length,
            available: self.samples.len(),
        };
        let end = window.end().ok_or_else(out_of_bounds)?;
        self.samples.get(window.offset..end).ok_or_else(out_of_bounds)
    }
}
