//! Splitting of one RAW line into fields and a trailing comment.

use crate::error::{ParseError, ParseWarning, Result};
use crate::grammar::{FieldRange, Section};

/// Where a line sits and how many fields it may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRequirements {
    /// 1-based physical line number
    pub line: usize,
    pub section: Section,
    pub range: FieldRange,
}

impl LineRequirements {
    pub fn new(line: usize, section: Section, range: FieldRange) -> Self {
        Self {
            line,
            section,
            range,
        }
    }
}

/// Fields of one line, raw text preserved (quotes and padding included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedLine {
    pub fields: Vec<String>,
    pub comment: Option<String>,
}

impl TokenizedLine {
    /// First field with surrounding whitespace removed; used for sentinel checks.
    pub fn first_field(&self) -> &str {
        self.fields.first().map(|f| f.trim()).unwrap_or("")
    }

    /// Check the field count against `requirements`.
    ///
    /// Too few fields is fatal. Too many are truncated to the maximum and
    /// reported through the returned warning.
    pub fn enforce(&mut self, requirements: &LineRequirements) -> Result<Option<ParseWarning>> {
        let found = self.fields.len();
        let FieldRange { min, max } = requirements.range;
        if found < min {
            return Err(ParseError::TooFewFields {
                line: requirements.line,
                section: requirements.section,
                min,
                found,
            });
        }
        if found > max {
            self.fields.truncate(max);
            return Ok(Some(ParseWarning::ExtraFields {
                line: requirements.line,
                section: requirements.section,
                max,
                found,
            }));
        }
        Ok(None)
    }
}

/// Tokenize `line` without any field-count validation.
pub fn split_line(line: &str) -> TokenizedLine {
    let line = line.trim();
    let (data, comment) = match find_unquoted(line, '/') {
        Some(at) => (&line[..at], Some(line[at + 1..].trim().to_string())),
        None => (line, None),
    };

    let mut fields = Vec::new();
    let mut rest = data;
    while let Some(at) = find_unquoted(rest, ',') {
        fields.push(rest[..at].to_string());
        rest = &rest[at + 1..];
    }
    fields.push(rest.to_string());

    TokenizedLine { fields, comment }
}

/// Tokenize `line`, validating against `requirements` when given.
pub fn tokenize(
    line: &str,
    requirements: Option<&LineRequirements>,
) -> Result<(TokenizedLine, Option<ParseWarning>)> {
    let mut tokens = split_line(line);
    let warning = match requirements {
        Some(requirements) => tokens.enforce(requirements)?,
        None => None,
    };
    Ok((tokens, warning))
}

/// Byte offset of the first `target` outside single or double quotes.
fn find_unquoted(text: &str, target: char) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (at, c) in text.char_indices() {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == target => return Some(at),
            None => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bus_requirements(line: usize) -> LineRequirements {
        LineRequirements::new(line, Section::Bus, FieldRange::new(9, 13))
    }

    #[test]
    fn splits_fields_and_comment() {
        let tokens = split_line("  1,'BUS1', 138.0 / first bus  ");
        assert_eq!(tokens.fields, vec!["1", "'BUS1'", " 138.0 "]);
        assert_eq!(tokens.comment.as_deref(), Some("first bus"));
    }

    #[test]
    fn line_without_comment() {
        let tokens = split_line("1,2,3");
        assert_eq!(tokens.fields.len(), 3);
        assert!(tokens.comment.is_none());
    }

    #[test]
    fn quoted_commas_and_slashes_stay_in_field() {
        let tokens = split_line(r#"1,"ABC, DEF / GHI",'X/Y, Z' / comment, here"#);
        assert_eq!(tokens.fields, vec!["1", r#""ABC, DEF / GHI""#, "'X/Y, Z' "]);
        assert_eq!(tokens.comment.as_deref(), Some("comment, here"));
    }

    #[test]
    fn apostrophe_inside_double_quotes_is_literal() {
        let tokens = split_line(r#"7,"O'HARE, NORTH",1"#);
        assert_eq!(tokens.fields, vec!["7", r#""O'HARE, NORTH""#, "1"]);
    }

    #[test]
    fn terminator_line_first_field() {
        let tokens = split_line("0 / END OF BUS DATA, BEGIN LOAD DATA");
        assert_eq!(tokens.first_field(), "0");
        assert_eq!(tokens.fields.len(), 1);
        assert_eq!(split_line("Q").first_field(), "Q");
    }

    #[test]
    fn empty_line_is_one_empty_field() {
        let tokens = split_line("   ");
        assert_eq!(tokens.fields, vec![String::new()]);
        assert_eq!(tokens.first_field(), "");
    }

    #[test]
    fn too_few_fields_is_fatal() {
        let err = tokenize("1,'A',138.0,1,1,1,1,1.0", Some(&bus_requirements(4))).unwrap_err();
        match err {
            ParseError::TooFewFields {
                line,
                section,
                min,
                found,
            } => {
                assert_eq!((line, section, min, found), (4, Section::Bus, 9, 8));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn extra_fields_are_truncated_with_warning() {
        let line = "1,'A',138.0,1,1,1,1,1.0,0.0,1.1,0.9,1.1,0.9,99";
        let (tokens, warning) = tokenize(line, Some(&bus_requirements(5))).unwrap();
        assert_eq!(tokens.fields.len(), 13);
        assert_eq!(tokens.fields.last().map(String::as_str), Some("0.9"));
        assert_eq!(
            warning,
            Some(ParseWarning::ExtraFields {
                line: 5,
                section: Section::Bus,
                max: 13,
                found: 14,
            })
        );
    }

    #[test]
    fn no_requirements_no_validation() {
        let (tokens, warning) = tokenize("1", None).unwrap();
        assert_eq!(tokens.fields, vec!["1"]);
        assert!(warning.is_none());
    }
}
