/// One recognized word and the decoder frames it spans.
#[derive(Clone, Debug, PartialEq)]
pub struct WordSegment {
    pub word: String,
    pub start_frame: i32,
    pub end_frame: i32,
    pub confidence: f32,
}

impl WordSegment {
    pub fn start_seconds(&self, frame_rate: u32) -> f32 {
        self.start_frame as f32 / frame_rate as f32
    }

    pub fn end_seconds(&self, frame_rate: u32) -> f32 {
        self.end_frame as f32 / frame_rate as f32
    }
}

/// Best hypothesis for an utterance and its path score.
#[derive(Clone, Debug, PartialEq)]
pub struct Hypothesis {
    pub text: String,
    pub score: f64,
}

/// Everything read back from the decoder after one utterance.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodeResult {
    pub hypothesis: String,
    pub score: f64,
    pub frame_rate: u32,
    pub segments: Vec<WordSegment>,
}
