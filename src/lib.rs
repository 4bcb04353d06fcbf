//! Reader for PSS/E revision 33 RAW power-flow cases.
//!
//! A case is parsed section by section into a [`Case`] of typed records.
//! Field-count constraints come from a [`Grammar`]; the revision 33 layout
//! is the default and can be overridden from JSON.
//!
//! ```
//! let text = "0, 100.0, 33, 0, 1, 60.0 / demo\nrecord one\nrecord two\nQ\n";
//! let case = pssraw::parse_case_str(text).unwrap();
//! assert_eq!(case.case_name, "demo");
//! assert!(case.buses.is_empty());
//! ```

pub mod case;
pub mod error;
pub mod grammar;
pub mod parse;
pub mod records;
pub mod server;
pub mod table;
pub mod tokenize;

use std::path::Path;

pub use case::Case;
pub use error::{FieldError, ParseError, ParseWarning, Result};
pub use grammar::{FieldRange, Grammar, Section};
pub use parse::CaseParser;
pub use table::{FieldValue, Table, Tabular};

/// Parse a case file with the revision 33 grammar.
pub fn parse_case_file(path: impl AsRef<Path>) -> Result<Case> {
    CaseParser::new(&Grammar::v33()).parse_file(path)
}

/// Parse case text with the revision 33 grammar.
pub fn parse_case_str(text: &str) -> Result<Case> {
    CaseParser::new(&Grammar::v33()).parse_str(text)
}
