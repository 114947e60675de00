use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::config::PhonetizerConfig;

#[derive(Parser, Debug)]
#[command(
    name = "dictphon",
    version,
    about = "Dictionary-based phonetization of tokenized utterances"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Phonetize one utterance per input line.
    Phonetize(PhonetizeArgs),
    /// Map phone strings through a mapping table, one per input line.
    Map(MapArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PhonetizeArgs {
    /// Pronunciation dictionary (overrides the config file).
    #[arg(long = "dict", value_name = "FILE")]
    pub dictionary: Option<PathBuf>,
    /// Phone mapping table (overrides the config file).
    #[arg(long = "map", value_name = "FILE")]
    pub mapping: Option<PathBuf>,
    /// JSON config file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Do not guess pronunciations of unknown words.
    #[arg(long = "no-guess")]
    pub no_guess: bool,
    /// Token delimiter inside each utterance.
    #[arg(long, value_name = "CHAR")]
    pub delimiter: Option<String>,
    /// Print per-token results as JSON instead of a phonetized line.
    #[arg(long)]
    pub tokens: bool,
    /// Input file; standard input when omitted.
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,
}

impl PhonetizeArgs {
    /// Merges the config file (if any) with command-line overrides.
    pub fn resolve_config(&self) -> Result<PhonetizerConfig> {
        let mut config = match &self.config {
            Some(path) => PhonetizerConfig::load(path)?,
            None => PhonetizerConfig::default(),
        };
        if let Some(dictionary) = &self.dictionary {
            config.dictionary = Some(dictionary.clone());
        }
        if let Some(mapping) = &self.mapping {
            config.mapping = Some(mapping.clone());
        }
        if let Some(delimiter) = &self.delimiter {
            config.delimiter = delimiter.clone();
        }
        if self.no_guess {
            config.allow_unknown_guess = false;
        }
        config.validate()?;
        config.dictionary_path()?;
        Ok(config)
    }
}

#[derive(Args, Debug, Clone)]
pub struct MapArgs {
    /// Phone mapping table.
    #[arg(long = "map", value_name = "FILE")]
    pub mapping: PathBuf,
    /// Keep phones that have no mapping instead of dropping them.
    #[arg(long = "keep-unmapped")]
    pub keep_unmapped: bool,
    /// Characters separating phones in the input.
    #[arg(long, default_value = " -|")]
    pub separators: String,
    /// Input file; standard input when omitted.
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,
}

impl MapArgs {
    pub fn separator_chars(&self) -> Vec<char> {
        self.separators.chars().collect()
    }
}
