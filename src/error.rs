//! Error and warning types for RAW case parsing.
//!
//! Fatal problems are [`ParseError`]s and abort the parse. Problems the
//! parser can recover from are [`ParseWarning`]s: they are logged as they
//! happen and collected on the resulting [`Case`](crate::Case).

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grammar::Section;

/// Result type alias using [`ParseError`].
pub type Result<T> = std::result::Result<T, ParseError>;

#[derive(Error, Debug)]
pub enum ParseError {
    /// The case file could not be read
    #[error("failed to read case file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Header plus the two identification records are mandatory
    #[error("case has {found} lines but at least {required} are required")]
    TooFewLines { found: usize, required: usize },

    #[error(
        "on line {line} in the \"{section}\" section, at least {min} values were expected but only {found} were found"
    )]
    TooFewFields {
        line: usize,
        section: Section,
        min: usize,
        found: usize,
    },

    /// Change-data files (IC = 1) are not supported
    #[error(
        "on line {line} in the \"{section}\" section, ic value of '{value}' given, only a value of 0 is supported"
    )]
    UnsupportedChangeCode {
        line: usize,
        section: Section,
        value: String,
    },

    #[error("on line {line} in the \"{section}\" section, {source}")]
    Field {
        line: usize,
        section: Section,
        #[source]
        source: FieldError,
    },

    /// A record needed more physical lines than the input has
    #[error("input ended at line {line} while reading the \"{section}\" section")]
    UnexpectedEnd { line: usize, section: Section },

    #[error("invalid grammar: {message}")]
    Grammar { message: String },

    #[error("malformed grammar file: {0}")]
    GrammarJson(#[from] serde_json::Error),
}

/// Failure to decode a single field of a record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("required field '{field}' is missing")]
    Missing { field: &'static str },

    #[error("field '{field}' value '{value}' is not a valid {expected}")]
    Invalid {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl FieldError {
    pub(crate) fn at(self, line: usize, section: Section) -> ParseError {
        ParseError::Field {
            line,
            section,
            source: self,
        }
    }
}

/// Non-fatal anomaly found while parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseWarning {
    /// Fields beyond the section maximum were dropped
    ExtraFields {
        line: usize,
        section: Section,
        max: usize,
        found: usize,
    },
    MissingRevision,
    InvalidRevision { value: String },
    UnsupportedRevision { revision: i64 },
    /// Generic network element lines are skipped, not parsed
    SkippedGneLines { count: usize },
    /// Input ended where a section terminator was expected
    MissingTerminus { section: Section },
    /// Content after the last section
    UnparsedLines { first_line: usize, lines: Vec<String> },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::ExtraFields {
                line,
                section,
                max,
                found,
            } => write!(
                f,
                "on line {} in the \"{}\" section, at most {} values were expected but {} were found, extra values will be ignored",
                line, section, max, found
            ),
            ParseWarning::MissingRevision => {
                write!(f, "no revision given in the header, assuming revision 33")
            }
            ParseWarning::InvalidRevision { value } => {
                write!(f, "assuming revision 33, given revision value '{}'", value)
            }
            ParseWarning::UnsupportedRevision { revision } => write!(
                f,
                "revision {} given but only revision 33 is supported, parser may not function correctly",
                revision
            ),
            ParseWarning::SkippedGneLines { count } => {
                write!(f, "skipped {} lines of GNE data", count)
            }
            ParseWarning::MissingTerminus { section } => write!(
                f,
                "input ended before the \"{}\" section was terminated, treating it as end of data",
                section
            ),
            ParseWarning::UnparsedLines { first_line, lines } => write!(
                f,
                "{} un-parsed lines starting at line {}",
                lines.len(),
                first_line
            ),
        }
    }
}
