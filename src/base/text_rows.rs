use super::MapperError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Defines how the fields of a text row are separated
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Delimiter {
    /// Any run of spaces or tabs
    Whitespace,

    /// A single character such as a comma; fields are trimmed
    Char(char),
}

impl Delimiter {
    /// Converts a separator string (e.g. `" "` or `","`) into a delimiter
    ///
    /// An empty or blank separator means [Delimiter::Whitespace].
    pub fn from_sep(sep: &str) -> Result<Self, MapperError> {
        if sep.trim().is_empty() {
            return Ok(Delimiter::Whitespace);
        }
        let mut chars = sep.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Delimiter::Char(c)),
            _ => Err(MapperError::InvalidConfig(format!(
                "separator must be a single character; found `{}`",
                sep
            ))),
        }
    }

    /// Splits a line into fields
    pub fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        match self {
            Delimiter::Whitespace => line.split_whitespace().collect(),
            Delimiter::Char(c) => line.split(*c).map(str::trim).collect(),
        }
    }

    /// Returns the separator used when writing files
    pub fn as_sep(&self) -> String {
        match self {
            Delimiter::Whitespace => " ".to_string(),
            Delimiter::Char(c) => c.to_string(),
        }
    }
}

/// Holds the fields of a non-comment line
#[derive(Clone, Debug, PartialEq)]
pub struct TextRow {
    /// Line number in the file (1-based)
    pub line: usize,

    /// Fields after splitting with the delimiter
    pub fields: Vec<String>,
}

/// Reads the non-comment, non-blank rows of a delimited text file
///
/// Everything from `comment` to the end of the line is discarded.
pub fn read_text_rows(path: &Path, delimiter: Delimiter, comment: char) -> Result<Vec<TextRow>, MapperError> {
    let content = fs::read_to_string(path).map_err(|source| MapperError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(split_text_rows(&content, delimiter, comment))
}

/// Splits the content of a delimited text file into rows
pub(crate) fn split_text_rows(content: &str, delimiter: Delimiter, comment: char) -> Vec<TextRow> {
    content
        .lines()
        .enumerate()
        .filter_map(|(i, raw)| {
            let line = match raw.find(comment) {
                Some(p) => &raw[..p],
                None => raw,
            };
            if line.trim().is_empty() {
                return None;
            }
            Some(TextRow {
                line: i + 1,
                fields: delimiter.split(line).into_iter().map(String::from).collect(),
            })
        })
        .collect()
}

/// Parses a numeric field, reporting the line and column on failure
pub(crate) fn parse_number(path: &Path, line: usize, column: usize, text: &str) -> Result<f64, MapperError> {
    text.parse::<f64>().map_err(|_| MapperError::Malformed {
        path: path.to_path_buf(),
        line,
        reason: format!("column {}: cannot parse `{}` as a number", column, text),
    })
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
