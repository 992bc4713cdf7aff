use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::GRAMMAR_EXTENSION;

#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("failed to access grammar {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("grammar line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// A linear word-chain grammar: state `i` moves to `i + 1` on `words[i]`.
///
/// Serialized in the Sphinx FSG text format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FiniteStateGrammar {
    name: String,
    words: Vec<String>,
}

impl FiniteStateGrammar {
    pub fn new(name: impl Into<String>, words: Vec<String>) -> Self {
        Self {
            name: name.into(),
            words,
        }
    }

    pub fn from_dialogue(name: impl Into<String>, dialogue: &str) -> Self {
        Self::new(name, normalize_words(dialogue))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn num_states(&self) -> usize {
        self.words.len() + 1
    }

    pub fn to_fsg_string(&self) -> String {
        let final_state = self.words.len();
        let mut out = format!(
            "FSG_BEGIN {}\nNUM_STATES {}\nSTART_STATE 0\nFINAL_STATE {final_state}\n",
            self.name,
            self.num_states()
        );
        for (i, word) in self.words.iter().enumerate() {
            out.push_str(&format!("TRANSITION {i} {} 1.0 {word}\n", i + 1));
        }
        out.push_str("FSG_END\n");
        out
    }

    /// Parse an FSG file, keeping the words of its transitions ordered by
    /// source state. Epsilon transitions (no word) are ignored.
    pub fn parse_fsg(content: &str) -> Result<Self, GrammarError> {
        let mut name = None;
        let mut transitions: Vec<(usize, String)> = Vec::new();

        for (idx, raw) in content.lines().enumerate() {
            let line = idx + 1;
            let fields: Vec<&str> = raw.split_whitespace().collect();
            match fields.as_slice() {
                ["FSG_BEGIN", rest @ ..] => name = Some(rest.join(" ")),
                ["TRANSITION", from, _to, _prob, word, ..] => {
                    let from = from.parse::<usize>().map_err(|e| GrammarError::Parse {
                        line,
                        message: format!("bad source state '{from}': {e}"),
                    })?;
                    transitions.push((from, word.to_string()));
                }
                _ => {}
            }
        }

        let name = name.ok_or_else(|| GrammarError::Parse {
            line: 1,
            message: "missing FSG_BEGIN".to_string(),
        })?;
        transitions.sort_by_key(|(from, _)| *from);
        Ok(Self::new(
            name,
            transitions.into_iter().map(|(_, w)| w).collect(),
        ))
    }
}

/// Lowercase the dialogue and keep only word characters and intra-word
/// apostrophes.
pub fn normalize_words(dialogue: &str) -> Vec<String> {
    dialogue
        .split_whitespace()
        .map(|token| {
            let cleaned: String = token
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == '\'')
                .collect::<String>()
                .to_lowercase();
            cleaned.trim_matches('\'').to_string()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

/// `<base><start_ms>.fsg`, concatenated rather than joined so `base` may end
/// in a file-name prefix.
pub fn grammar_path(base: &Path, start_ms: u64) -> PathBuf {
    let mut path = OsString::from(base.as_os_str());
    path.push(format!("{start_ms}.{GRAMMAR_EXTENSION}"));
    PathBuf::from(path)
}
