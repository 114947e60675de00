use tracing::{debug, trace};

use super::dag::compose;
use super::dictionary::{Lookup, PronunciationDictionary, UNKNOWN_STAMP};
use super::mapping::MappingTable;
use super::unknown::UnknownGuesser;
use super::{
    PhonStatus, PhonToken, PhonetizationError, Result, PHONE_SEPARATOR, SILENT_PHONE,
    VARIANT_SEPARATOR,
};

/// Variant cap applied when recomposing a decomposed compound word.
pub const COMPOUND_VARIANTS: usize = 4;

const COMPOUND_SEPARATORS: [char; 3] = ['-', '\'', '_'];
const SILENT_PREFIXES: [&str; 2] = ["gpd_", "gpf_"];
const IPU_MARKER: &str = "ipu_";

type BoxedGuesser<'a> = Box<dyn UnknownGuesser + Send + Sync + 'a>;

/// Dictionary-based phonetizer.
///
/// Phones are separated by `-`, pronunciation variants by `|`. The
/// dictionary, mapping table and guesser are fixed at construction.
pub struct Phonetizer<'a> {
    dictionary: &'a PronunciationDictionary,
    mapping: Option<&'a MappingTable>,
    guesser: Option<BoxedGuesser<'a>>,
}

pub struct PhonetizerBuilder<'a> {
    dictionary: &'a PronunciationDictionary,
    mapping: Option<&'a MappingTable>,
    guesser: Option<BoxedGuesser<'a>>,
}

impl<'a> PhonetizerBuilder<'a> {
    pub fn mapping(mut self, mapping: &'a MappingTable) -> Self {
        self.mapping = Some(mapping);
        self
    }

    pub fn guesser(mut self, guesser: impl UnknownGuesser + Send + Sync + 'a) -> Self {
        self.guesser = Some(Box::new(guesser));
        self
    }

    pub fn build(self) -> Phonetizer<'a> {
        Phonetizer {
            dictionary: self.dictionary,
            mapping: self.mapping.filter(|table| !table.is_empty()),
            guesser: self.guesser,
        }
    }
}

/// Token counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhonSummary {
    pub ok: usize,
    pub warning: usize,
    pub error: usize,
}

impl PhonSummary {
    pub fn total(&self) -> usize {
        self.ok + self.warning + self.error
    }
}

impl<'a> Phonetizer<'a> {
    pub fn builder(dictionary: &'a PronunciationDictionary) -> PhonetizerBuilder<'a> {
        PhonetizerBuilder {
            dictionary,
            mapping: None,
            guesser: None,
        }
    }

    /// Phonetizes through the dictionary alone, no fallback.
    ///
    /// Returns an empty string for empty or silent tokens and the unknown
    /// stamp when the entry is missing.
    pub fn phonetize_entry(&self, entry: &str) -> String {
        self.lookup_entry(entry).unwrap_or_else(|| UNKNOWN_STAMP.to_string())
    }

    /// `None` when the entry is missing from the dictionary.
    fn lookup_entry(&self, entry: &str) -> Option<String> {
        let mut entry = entry.trim();
        if entry.len() >= 2 && entry.starts_with('<') && entry.ends_with('>') {
            entry = &entry[1..entry.len() - 1];
        }
        if entry.is_empty() || is_silent_marker(entry) {
            return Some(String::new());
        }

        match self.dictionary.lookup(entry) {
            Lookup::Found(pron) => Some(self.map_phonetization(pron)),
            Lookup::NotFound => None,
        }
    }

    /// Phonetizes each token, falling back on compound decomposition and,
    /// when `allow_unknown_guess` is set, on the unknown-word strategy.
    pub fn phonetize_tokens<I, S>(&self, tokens: I, allow_unknown_guess: bool) -> Vec<PhonToken>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tokens
            .into_iter()
            .map(|token| self.phonetize_token(token.as_ref(), allow_unknown_guess))
            .collect()
    }

    fn phonetize_token(&self, token: &str, allow_unknown_guess: bool) -> PhonToken {
        let entry = token.trim();

        // Already phonemic: kept verbatim, inner separators untouched.
        if entry.starts_with('/') && entry.ends_with('/') {
            return PhonToken::new(token, entry.trim_matches('/'), PhonStatus::Ok);
        }

        if let Some(phon) = self.lookup_entry(entry) {
            return PhonToken::new(token, phon, PhonStatus::Ok);
        }

        if let Some(phon) = self.phonetize_compound(entry) {
            debug!(token = entry, phon = %phon, "phonetized by compound decomposition");
            return PhonToken::new(token, phon, PhonStatus::Warning);
        }

        if allow_unknown_guess {
            if let Some(guesser) = &self.guesser {
                match guesser.guess(entry) {
                    Ok(phon) => {
                        debug!(token = entry, phon = %phon, "phonetized by unknown-word guess");
                        return PhonToken::new(token, phon, PhonStatus::Warning);
                    }
                    Err(err) => debug!(token = entry, error = %err, "unknown-word guess failed"),
                }
            }
        }

        PhonToken::new(token, UNKNOWN_STAMP, PhonStatus::Error)
    }

    fn phonetize_compound(&self, entry: &str) -> Option<String> {
        if !entry.contains(&COMPOUND_SEPARATORS[..]) {
            return None;
        }
        let mut parts = Vec::new();
        for fragment in entry.split(&COMPOUND_SEPARATORS[..]) {
            let Some(phon) = self.lookup_entry(fragment) else {
                trace!(token = entry, fragment, "compound fragment missing");
                return None;
            };
            parts.push(phon);
        }
        Some(compose(&parts.join(" "), COMPOUND_VARIANTS).trim().to_string())
    }

    /// Phonetizes a delimited utterance and returns the delimited phonetizations.
    pub fn phonetize(
        &self,
        utterance: &str,
        allow_unknown_guess: bool,
        delimiter: &str,
    ) -> Result<String> {
        let mut chars = delimiter.chars();
        let delimiter = match (chars.next(), chars.next()) {
            (Some(ch), None) => ch,
            _ => {
                return Err(PhonetizationError::invalid_argument(format!(
                    "delimiter must be a single character, got {delimiter:?}"
                )))
            }
        };

        let tokens = self.phonetize_tokens(utterance.split(delimiter), allow_unknown_guess);
        Ok(Self::assemble(&tokens, delimiter))
    }

    /// Joins the phonetizations of `tokens`. Surrounding whitespace and
    /// trailing delimiters are trimmed; a leading empty field is kept so
    /// fields stay aligned with the input tokens.
    pub fn assemble(tokens: &[PhonToken], delimiter: char) -> String {
        let phonetized: Vec<&str> = tokens.iter().map(|token| token.phon.as_str()).collect();
        phonetized
            .join(delimiter.to_string().as_str())
            .trim_end_matches(|ch: char| ch.is_whitespace() || ch == delimiter)
            .trim_start()
            .to_string()
    }

    /// Applies the mapping table to every variant of a phonetization.
    pub fn map_phonetization(&self, phon: &str) -> String {
        let Some(table) = self.mapping else {
            return phon.to_string();
        };
        phon.split(VARIANT_SEPARATOR)
            .map(|variant| map_variant(table, variant))
            .collect::<Vec<_>>()
            .join(VARIANT_SEPARATOR.to_string().as_str())
    }

    pub fn summarize(tokens: &[PhonToken]) -> PhonSummary {
        tokens
            .iter()
            .fold(PhonSummary::default(), |mut summary, token| {
                match token.status {
                    PhonStatus::Ok => summary.ok += 1,
                    PhonStatus::Warning => summary.warning += 1,
                    PhonStatus::Error => summary.error += 1,
                }
                summary
            })
    }
}

fn is_silent_marker(entry: &str) -> bool {
    SILENT_PREFIXES.iter().any(|prefix| entry.starts_with(prefix)) || entry.contains(IPU_MARKER)
}

/// Maps one variant: every chunk that is a table key gains its substitute
/// as an alternative, then all combinations are expanded.
fn map_variant(table: &MappingTable, variant: &str) -> String {
    let phones: Vec<&str> = variant
        .split(PHONE_SEPARATOR)
        .filter(|phone| *phone != SILENT_PHONE)
        .collect();

    let annotated: Vec<String> = split_longest(table, &phones)
        .into_iter()
        .map(|chunk| {
            let substitute = table
                .map_entry(&chunk)
                .filter(|mapped| *mapped != chunk)
                .map(str::to_string);
            match substitute {
                Some(mapped) => format!("{chunk}{VARIANT_SEPARATOR}{mapped}"),
                None => chunk,
            }
        })
        .collect();

    compose(&annotated.join(" "), 0).trim().to_string()
}

/// Cuts `phones` into the longest mappable chunks, left to right.
fn split_longest(table: &MappingTable, phones: &[&str]) -> Vec<String> {
    if phones.len() == 1 {
        return vec![phones[0].to_string()];
    }
    let separator = PHONE_SEPARATOR.to_string();
    let mut chunks = Vec::new();
    let mut idx = 0;
    while idx < phones.len() {
        let len = table.longest_match(&phones[idx..]).unwrap_or(1);
        chunks.push(phones[idx..idx + len].join(separator.as_str()));
        idx += len;
    }
    chunks
}
