use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Open decoding with the language model.
    Lm,
    /// Forced alignment with one grammar per cue.
    Fsg,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Lm => write!(f, "lm"),
            Mode::Fsg => write!(f, "fsg"),
        }
    }
}

/// Defaults read from a JSON settings file. Command-line flags win.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub model: Option<PathBuf>,
    pub language_model: Option<PathBuf>,
    pub dictionary: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub grammar_prefix: Option<PathBuf>,
    pub mode: Option<Mode>,
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("subalign").join("settings.json"))
    }

    /// Load from the user config directory, falling back to defaults when
    /// the file is absent or unreadable.
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| fs::read_to_string(path).ok())
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    /// Load from an explicit path; unlike [`Settings::load`], any failure is
    /// an error.
    pub fn load_from(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let json = fs::read_to_string(path)
            .map_err(|e| format!("Cannot read settings {}: {e}", path.display()))?;
        let settings = serde_json::from_str(&json)
            .map_err(|e| format!("Invalid settings {}: {e}", path.display()))?;
        Ok(settings)
    }
}
