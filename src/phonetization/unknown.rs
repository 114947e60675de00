use std::error::Error;
use std::fmt::{Display, Formatter};

use super::dag::compose;
use super::dictionary::{Lookup, PronunciationDictionary};

const DEFAULT_GUESS_VARIANTS: usize = 4;

/// Why an unknown-word strategy could not produce a phonetization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessError {
    EmptyEntry,
    /// No dictionary entry covers the text starting at this character offset.
    Uncovered { entry: String, offset: usize },
    Other(String),
}

impl Display for GuessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyEntry => write!(f, "cannot guess the pronunciation of an empty entry"),
            Self::Uncovered { entry, offset } => {
                write!(f, "no dictionary entry covers \"{entry}\" at character {offset}")
            }
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

impl Error for GuessError {}

/// Strategy consulted for words missing from the dictionary.
pub trait UnknownGuesser {
    fn guess(&self, entry: &str) -> Result<String, GuessError>;
}

impl<F> UnknownGuesser for F
where
    F: Fn(&str) -> Result<String, GuessError>,
{
    fn guess(&self, entry: &str) -> Result<String, GuessError> {
        self(entry)
    }
}

/// Guesses by analogy: the entry is cut left to right into the longest
/// substrings the dictionary knows, and their pronunciations are composed.
#[derive(Debug, Clone, Copy)]
pub struct SubstringGuesser<'dict> {
    dictionary: &'dict PronunciationDictionary,
    max_variants: usize,
}

impl<'dict> SubstringGuesser<'dict> {
    pub fn new(dictionary: &'dict PronunciationDictionary) -> Self {
        Self {
            dictionary,
            max_variants: DEFAULT_GUESS_VARIANTS,
        }
    }

    /// Caps the variants produced per guess (`0` = unlimited).
    pub fn with_max_variants(mut self, max_variants: usize) -> Self {
        self.max_variants = max_variants;
        self
    }

    fn longest_piece(&self, chars: &[(usize, char)], text: &str) -> Option<(usize, &'dict str)> {
        let limit = self.dictionary.max_entry_chars().min(chars.len());
        (1..=limit).rev().find_map(|len| {
            let start = chars[0].0;
            let end = chars.get(len).map_or(text.len(), |(byte, _)| *byte);
            match self.dictionary.lookup(&text[start..end]) {
                Lookup::Found(pron) => Some((len, pron)),
                Lookup::NotFound => None,
            }
        })
    }
}

impl UnknownGuesser for SubstringGuesser<'_> {
    fn guess(&self, entry: &str) -> Result<String, GuessError> {
        let entry = entry.trim();
        if entry.is_empty() {
            return Err(GuessError::EmptyEntry);
        }
        let chars: Vec<(usize, char)> = entry.char_indices().collect();
        let mut pieces = Vec::new();
        let mut offset = 0;
        while offset < chars.len() {
            let (len, pron) = self
                .longest_piece(&chars[offset..], entry)
                .ok_or_else(|| GuessError::Uncovered {
                    entry: entry.to_string(),
                    offset,
                })?;
            pieces.push(pron);
            offset += len;
        }
        let guessed = compose(&pieces.join(" "), self.max_variants);
        if guessed.is_empty() {
            return Err(GuessError::Other(format!("empty guess for \"{entry}\"")));
        }
        Ok(guessed)
    }
}
