use std::fs;
use std::path::{Path, PathBuf};

use crate::grammar::domain::finite_state_grammar::{
    grammar_path, FiniteStateGrammar, GrammarError,
};
use crate::subtitle::domain::subtitle_cue::SubtitleCue;

/// Writes one FSG file per cue with dialogue, named by the cue start time.
pub struct FsgFileWriter {
    base: PathBuf,
}

impl FsgFileWriter {
    pub fn new(base: &Path) -> Self {
        Self {
            base: base.to_path_buf(),
        }
    }

    /// Returns the paths written, in cue order. Cues without dialogue are
    /// skipped, matching the grammar alignment loop.
    pub fn write_all(&self, cues: &[SubtitleCue]) -> Result<Vec<PathBuf>, GrammarError> {
        let mut written = Vec::new();
        for cue in cues.iter().filter(|c| c.has_dialogue()) {
            let grammar =
                FiniteStateGrammar::from_dialogue(cue.start_ms().to_string(), cue.dialogue());
            let path = grammar_path(&self.base, cue.start_ms());
            write_grammar(&path, &grammar)?;
            written.push(path);
        }
        log::info!(
            "Generated {} grammars under {}",
            written.len(),
            self.base.display()
        );
        Ok(written)
    }
}

pub fn write_grammar(path: &Path, grammar: &FiniteStateGrammar) -> Result<(), GrammarError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| GrammarError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, grammar.to_fsg_string()).map_err(|source| GrammarError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_grammar(path: &Path) -> Result<FiniteStateGrammar, GrammarError> {
    let content = fs::read_to_string(path).map_err(|source| GrammarError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    FiniteStateGrammar::parse_fsg(&content)
}
