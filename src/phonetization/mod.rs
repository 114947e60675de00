pub mod dag;
pub mod dictionary;
pub mod mapping;
pub mod phonetizer;
pub mod unknown;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::Serialize;

pub use dictionary::{Lookup, PronunciationDictionary, UNKNOWN_STAMP};
pub use mapping::MappingTable;
pub use phonetizer::{PhonSummary, Phonetizer, PhonetizerBuilder};
pub use unknown::{GuessError, SubstringGuesser, UnknownGuesser};

/// Separates phones inside one pronunciation variant.
pub const PHONE_SEPARATOR: char = '-';
/// Separates alternative pronunciation variants.
pub const VARIANT_SEPARATOR: char = '|';
/// Marks a silent phone inside a variant.
pub const SILENT_PHONE: &str = "_";

/// Convenient alias for results returned by phonetization modules.
pub type Result<T> = std::result::Result<T, PhonetizationError>;

/// Failures raised while building resources or validating arguments.
///
/// A word missing from the dictionary is not an error; it is reported
/// through [`PhonStatus::Error`] on the resulting token.
#[derive(Debug, Clone)]
pub enum PhonetizationError {
    InvalidArgument(Arc<str>),
    Lexicon { line: usize, message: Arc<str> },
    Mapping { line: usize, message: Arc<str> },
    Io(Arc<str>),
}

impl PhonetizationError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(Arc::from(message.into()))
    }

    pub fn lexicon(line: usize, message: impl Into<String>) -> Self {
        Self::Lexicon {
            line,
            message: Arc::from(message.into()),
        }
    }

    pub fn mapping(line: usize, message: impl Into<String>) -> Self {
        Self::Mapping {
            line,
            message: Arc::from(message.into()),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(Arc::from(message.into()))
    }
}

impl Display for PhonetizationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::Lexicon { line, message } => write!(f, "lexicon line {line}: {message}"),
            Self::Mapping { line, message } => write!(f, "mapping line {line}: {message}"),
            Self::Io(message) => write!(f, "{message}"),
        }
    }
}

impl Error for PhonetizationError {}

impl From<std::io::Error> for PhonetizationError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

/// Outcome attached to each phonetized token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PhonStatus {
    /// Direct dictionary hit (or an intentionally silent token).
    Ok,
    /// Resolved through compound decomposition or the unknown-word strategy.
    Warning,
    /// No pronunciation found; the phonetization is the unknown stamp.
    Error,
}

/// Phonetization of one input token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhonToken {
    pub token: String,
    pub phon: String,
    pub status: PhonStatus,
}

impl PhonToken {
    pub fn new(token: impl Into<String>, phon: impl Into<String>, status: PhonStatus) -> Self {
        Self {
            token: token.into(),
            phon: phon.into(),
            status,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.status == PhonStatus::Error
    }
}

#[cfg(test)]
mod tests {
    use super::{PhonStatus, PhonToken, PhonetizationError};

    #[test]
    fn errors_render_line_numbers() {
        let err = PhonetizationError::lexicon(7, "missing phones for \"abc\"");
        assert_eq!(err.to_string(), "lexicon line 7: missing phones for \"abc\"");
        let err = PhonetizationError::invalid_argument("delimiter must be a character");
        assert!(err.to_string().starts_with("invalid argument"));
    }

    #[test]
    fn token_serializes_status_in_lowercase() {
        let token = PhonToken::new("hello", "h-E-l-o", PhonStatus::Warning);
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(
            json,
            r#"{"token":"hello","phon":"h-E-l-o","status":"warning"}"#
        );
    }
}
