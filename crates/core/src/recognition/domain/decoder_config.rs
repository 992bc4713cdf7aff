use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{role} not found at: {path}")]
    MissingFile { role: &'static str, path: PathBuf },
    #[error("log directory does not exist: {0}")]
    MissingLogDir(PathBuf),
}

/// Cepstral mean normalization is always computed over the whole utterance.
const CMN_MODE: &str = "batch";

/// Validated settings handed to a [`SpeechDecoder`] backend.
///
/// Every referenced input file is checked to exist when the config is
/// built.
///
/// [`SpeechDecoder`]: super::speech_decoder::SpeechDecoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    acoustic_model: PathBuf,
    language_model: Option<PathBuf>,
    dictionary: Option<PathBuf>,
    log_file: Option<PathBuf>,
    grammar: Option<PathBuf>,
}

impl DecoderConfig {
    pub fn builder(acoustic_model: impl Into<PathBuf>) -> DecoderConfigBuilder {
        DecoderConfigBuilder {
            acoustic_model: acoustic_model.into(),
            language_model: None,
            dictionary: None,
            log_file: None,
            grammar: None,
        }
    }

    pub fn acoustic_model(&self) -> &Path {
        &self.acoustic_model
    }

    pub fn language_model(&self) -> Option<&Path> {
        self.language_model.as_deref()
    }

    pub fn dictionary(&self) -> Option<&Path> {
        self.dictionary.as_deref()
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    pub fn grammar(&self) -> Option<&Path> {
        self.grammar.as_deref()
    }

    /// Derive a per-cue config that shares everything but the grammar.
    pub fn with_grammar(&self, grammar: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        DecoderConfigBuilder {
            acoustic_model: self.acoustic_model.clone(),
            language_model: self.language_model.clone(),
            dictionary: self.dictionary.clone(),
            log_file: self.log_file.clone(),
            grammar: Some(grammar.into()),
        }
        .build()
    }

    /// Render as recognizer command-line flags, for logging.
    pub fn args(&self) -> Vec<(&'static str, String)> {
        let mut args = vec![("-hmm", self.acoustic_model.display().to_string())];
        if let Some(lm) = &self.language_model {
            args.push(("-lm", lm.display().to_string()));
        }
        if let Some(dict) = &self.dictionary {
            args.push(("-dict", dict.display().to_string()));
        }
        args.push(("-cmn", CMN_MODE.to_string()));
        if let Some(log) = &self.log_file {
            args.push(("-logfn", log.display().to_string()));
        }
        if let Some(fsg) = &self.grammar {
            args.push(("-fsg", fsg.display().to_string()));
        }
        args
    }
}

pub struct DecoderConfigBuilder {
    acoustic_model: PathBuf,
    language_model: Option<PathBuf>,
    dictionary: Option<PathBuf>,
    log_file: Option<PathBuf>,
    grammar: Option<PathBuf>,
}

impl DecoderConfigBuilder {
    pub fn language_model(mut self, path: impl Into<PathBuf>) -> Self {
        self.language_model = Some(path.into());
        self
    }

    pub fn dictionary(mut self, path: impl Into<PathBuf>) -> Self {
        self.dictionary = Some(path.into());
        self
    }

    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn grammar(mut self, path: impl Into<PathBuf>) -> Self {
        self.grammar = Some(path.into());
        self
    }

    pub fn build(self) -> Result<DecoderConfig, ConfigError> {
        require_file("acoustic model", &self.acoustic_model)?;
        if let Some(lm) = &self.language_model {
            require_file("language model", lm)?;
        }
        if let Some(dict) = &self.dictionary {
            require_file("dictionary", dict)?;
        }
        if let Some(fsg) = &self.grammar {
            require_file("grammar", fsg)?;
        }
        if let Some(log) = &self.log_file {
            if let Some(dir) = log.parent().filter(|p| !p.as_os_str().is_empty()) {
                if !dir.is_dir() {
                    return Err(ConfigError::MissingLogDir(dir.to_path_buf()));
                }
            }
        }

        Ok(DecoderConfig {
            acoustic_model: self.acoustic_model,
            language_model: self.language_model,
            dictionary: self.dictionary,
            log_file: self.log_file,
            grammar: self.grammar,
        })
    }
}

fn require_file(role: &'static str, path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        Ok(())
    } else {
        Err(ConfigError::MissingFile {
            role,
            path: path.to_path_buf(),
        })
    }
}
