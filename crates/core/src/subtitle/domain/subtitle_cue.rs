/// One subtitle entry: a `[start, end)` interval in milliseconds and the
/// dialogue shown during it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubtitleCue {
    start_ms: u64,
    end_ms: u64,
    dialogue: String,
}

impl SubtitleCue {
    pub fn new(start_ms: u64, end_ms: u64, dialogue: impl Into<String>) -> Self {
        Self {
            start_ms,
            end_ms,
            dialogue: dialogue.into(),
        }
    }

    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    pub fn end_ms(&self) -> u64 {
        self.end_ms
    }

    pub fn dialogue(&self) -> &str {
        &self.dialogue
    }

    pub fn has_dialogue(&self) -> bool {
        !self.dialogue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_fields() {
        let cue = SubtitleCue::new(19320, 21056, "Why are you boring?");
        assert_eq!(cue.start_ms(), 19320);
        assert_eq!(cue.end_ms(), 21056);
        assert_eq!(cue.dialogue(), "Why are you boring?");
        assert!(cue.has_dialogue());
    }

    #[test]
    fn test_empty_dialogue() {
        let cue = SubtitleCue::new(19320, 21056, "");
        assert!(!cue.has_dialogue());
    }
}
