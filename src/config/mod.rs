use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, ensure, Context, Result};
use serde::Deserialize;

const DEFAULT_GUESS_VARIANTS: usize = 4;

/// Phonetizer settings read from an optional JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhonetizerConfig {
    pub dictionary: Option<PathBuf>,
    pub mapping: Option<PathBuf>,
    pub allow_unknown_guess: bool,
    pub delimiter: String,
    pub guess_variants: usize,
}

impl Default for PhonetizerConfig {
    fn default() -> Self {
        Self {
            dictionary: None,
            mapping: None,
            allow_unknown_guess: true,
            delimiter: " ".to_string(),
            guess_variants: DEFAULT_GUESS_VARIANTS,
        }
    }
}

impl PhonetizerConfig {
    /// Loads a config file; relative resource paths resolve against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {:?}", path))?;
        let mut config: Self = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse config file {:?}", path))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.dictionary = config.dictionary.map(|p| resolve(base, p));
        config.mapping = config.mapping.map(|p| resolve(base, p));
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.delimiter_char()?;
        if let Some(dictionary) = &self.dictionary {
            ensure!(
                dictionary.is_file(),
                "dictionary {:?} is not a readable file",
                dictionary
            );
        }
        if let Some(mapping) = &self.mapping {
            ensure!(
                mapping.is_file(),
                "mapping table {:?} is not a readable file",
                mapping
            );
        }
        Ok(())
    }

    pub fn delimiter_char(&self) -> Result<char> {
        let mut chars = self.delimiter.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(ch),
            _ => Err(anyhow!(
                "delimiter must be exactly one character, got {:?}",
                self.delimiter
            )),
        }
    }

    pub fn dictionary_path(&self) -> Result<&Path> {
        self.dictionary
            .as_deref()
            .ok_or_else(|| anyhow!("no pronunciation dictionary given (use --dict or a config file)"))
    }
}

fn resolve(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
