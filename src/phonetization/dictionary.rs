use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::info;

use super::{PhonetizationError, Result, PHONE_SEPARATOR, VARIANT_SEPARATOR};

/// Marker written in place of a phonetization when none is known.
pub const UNKNOWN_STAMP: &str = "UNK";

/// Result of a dictionary lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'dict> {
    /// Pipe-joined variants, phones hyphen-joined inside each variant.
    Found(&'dict str),
    NotFound,
}

impl<'dict> Lookup<'dict> {
    pub fn found(self) -> Option<&'dict str> {
        match self {
            Lookup::Found(variants) => Some(variants),
            Lookup::NotFound => None,
        }
    }
}

/// Immutable collection of pronunciations keyed by stripped orthographic entries.
#[derive(Debug, Clone, Default)]
pub struct PronunciationDictionary {
    entries: HashMap<String, String>,
    max_entry_chars: usize,
}

impl PronunciationDictionary {
    /// Parses a line-oriented lexicon.
    ///
    /// Each line reads `entry [output] phone phone ...`; the bracketed output
    /// column is optional and `entry(2)` folds into `entry`. Lines starting with
    /// `;` or `#` are comments.
    pub fn from_lexicon(data: &str) -> Result<Self> {
        let mut grouped: HashMap<String, Vec<String>> = HashMap::new();

        for (idx, line) in data.lines().enumerate() {
            let line_number = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
                continue;
            }

            let mut parts = trimmed.split_whitespace().peekable();
            let raw_entry = parts.next().ok_or_else(|| {
                PhonetizationError::lexicon(line_number, format!("missing entry column: {trimmed}"))
            })?;
            if parts
                .peek()
                .is_some_and(|column| column.starts_with('[') && column.ends_with(']'))
            {
                parts.next();
            }

            let entry = trim_variant(raw_entry);
            if entry.is_empty() {
                return Err(PhonetizationError::lexicon(
                    line_number,
                    format!("empty entry in {raw_entry}"),
                ));
            }

            let phones: Vec<&str> = parts.collect();
            if phones.is_empty() {
                return Err(PhonetizationError::lexicon(
                    line_number,
                    format!("missing phone sequence for {raw_entry}"),
                ));
            }

            push_variant(
                grouped.entry(entry.to_string()).or_default(),
                phones.join(PHONE_SEPARATOR.to_string().as_str()),
            );
        }

        if grouped.is_empty() {
            return Err(PhonetizationError::lexicon(0, "lexicon contained no entries"));
        }

        Ok(Self::from_grouped(grouped))
    }

    /// Builds a dictionary from `(entry, "a-b|c-d")` pairs.
    pub fn from_pronunciations<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
        for (idx, (entry, pron)) in pairs.into_iter().enumerate() {
            let entry = entry.as_ref().trim();
            if entry.is_empty() {
                return Err(PhonetizationError::lexicon(idx + 1, "empty entry"));
            }
            let variants = grouped.entry(entry.to_string()).or_default();
            for variant in pron.as_ref().split(VARIANT_SEPARATOR) {
                let variant = variant.trim();
                if !variant.is_empty() {
                    push_variant(variants, variant.to_string());
                }
            }
            if variants.is_empty() {
                return Err(PhonetizationError::lexicon(
                    idx + 1,
                    format!("no pronunciation variant for {entry}"),
                ));
            }
        }
        Ok(Self::from_grouped(grouped))
    }

    /// Reads and parses a lexicon file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|err| {
            PhonetizationError::io(format!("failed to read lexicon {}: {err}", path.display()))
        })?;
        let dictionary = Self::from_lexicon(&data)?;
        info!(
            path = %path.display(),
            entries = dictionary.len(),
            "pronunciation dictionary loaded"
        );
        Ok(dictionary)
    }

    fn from_grouped(grouped: HashMap<String, Vec<String>>) -> Self {
        let max_entry_chars = grouped
            .keys()
            .map(|entry| entry.chars().count())
            .max()
            .unwrap_or(0);
        let entries = grouped
            .into_iter()
            .map(|(entry, variants)| {
                let joined = variants.join(VARIANT_SEPARATOR.to_string().as_str());
                (entry, joined)
            })
            .collect();
        Self {
            entries,
            max_entry_chars,
        }
    }

    /// Looks up an entry after stripping surrounding whitespace.
    pub fn lookup(&self, entry: &str) -> Lookup<'_> {
        match self.entries.get(entry.trim()) {
            Some(variants) => Lookup::Found(variants),
            None => Lookup::NotFound,
        }
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.entries.contains_key(entry.trim())
    }

    /// Iterates over the variants of an entry, if present.
    pub fn variants<'dict>(&'dict self, entry: &str) -> impl Iterator<Item = &'dict str> {
        self.lookup(entry)
            .found()
            .into_iter()
            .flat_map(|variants| variants.split(VARIANT_SEPARATOR))
    }

    pub fn unknown_stamp(&self) -> &'static str {
        UNKNOWN_STAMP
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Length in characters of the longest entry.
    pub fn max_entry_chars(&self) -> usize {
        self.max_entry_chars
    }
}

fn push_variant(variants: &mut Vec<String>, variant: String) {
    if !variants.contains(&variant) {
        variants.push(variant);
    }
}

fn trim_variant(raw_entry: &str) -> &str {
    match raw_entry.split_once('(') {
        Some((base, rest)) if rest.ends_with(')') => base,
        _ => raw_entry,
    }
}

#[cfg(test)]
mod tests {
    use super::{Lookup, PronunciationDictionary, UNKNOWN_STAMP};

    const LEXICON: &str = "\
; comment line
bonjour [bonjour] b o~ Z u R
bonjour(2) [bonjour] b o~ Z u
chat S a
chat(2) S a
";

    #[test]
    fn parses_output_column_and_variants() {
        let dictionary = PronunciationDictionary::from_lexicon(LEXICON).unwrap();
        assert_eq!(dictionary.len(), 2);
        assert_eq!(dictionary.lookup("bonjour"), Lookup::Found("b-o~-Z-u-R|b-o~-Z-u"));
        assert_eq!(dictionary.lookup("  chat "), Lookup::Found("S-a"));
    }

    #[test]
    fn miss_is_not_found() {
        let dictionary = PronunciationDictionary::from_lexicon(LEXICON).unwrap();
        assert_eq!(dictionary.lookup("chien"), Lookup::NotFound);
        assert_eq!(dictionary.lookup("Chat"), Lookup::NotFound);
        assert!(dictionary.contains(" chat"));
        assert!(!dictionary.contains("chien"));
        assert_eq!(dictionary.unknown_stamp(), UNKNOWN_STAMP);
    }

    #[test]
    fn rejects_entry_without_phones() {
        let err = PronunciationDictionary::from_lexicon("chat S a\nchien\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "unexpected error: {err}");
    }

    #[test]
    fn rejects_empty_lexicon() {
        assert!(PronunciationDictionary::from_lexicon("; nothing\n\n").is_err());
    }

    #[test]
    fn builds_from_pairs_and_tracks_longest_entry() {
        let dictionary =
            PronunciationDictionary::from_pronunciations([("good", "g-u-d"), ("bye", "b-ay|b-a")])
                .unwrap();
        assert_eq!(dictionary.max_entry_chars(), 4);
        let variants: Vec<&str> = dictionary.variants("bye").collect();
        assert_eq!(variants, vec!["b-ay", "b-a"]);
        assert!(PronunciationDictionary::from_pronunciations([("x", "|")]).is_err());
    }
}
