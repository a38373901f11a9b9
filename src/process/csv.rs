//! Delimiter-aware CSV to table parsing.
//!
//! A single pattern is scanned left to right. Every match carries the token
//! that preceded the field (a delimiter, a line break, or the start of the
//! input) followed by either a quoted or an unquoted field. Line breaks open
//! a new row; delimiters append to the current one.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::trace;

/// Rows of cells, in source order. Rows are not required to be the same width.
pub type Table = Vec<Vec<String>>;

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("delimiter {0:?} collides with quoting or line breaks")]
    InvalidDelimiter(char),

    #[error("failed to build field pattern: {0}")]
    Pattern(#[from] regex::Error),
}

static COMMA: Lazy<CsvParser> = Lazy::new(|| {
    CsvParser::new(',').expect("comma field pattern should be valid")
});

/// Parse comma separated text into a [`Table`].
///
/// Never fails: text that does not pair its quotes produces odd but
/// well-formed output.
pub fn parse_csv(text: &str) -> Table {
    COMMA.parse(text)
}

#[derive(Debug, Clone)]
pub struct CsvParser {
    delimiter: char,
    pattern: Regex,
}

impl CsvParser {
    pub fn new(delimiter: char) -> Result<Self, CsvError> {
        if matches!(delimiter, '"' | '\r' | '\n') {
            return Err(CsvError::InvalidDelimiter(delimiter));
        }
        let d = regex::escape(&delimiter.to_string());
        let pattern = Regex::new(&format!(
            r#"({d}|\r?\n|\r|^)(?:"([^"]*(?:""[^"]*)*)"|([^"{d}\r\n]*))"#
        ))?;
        Ok(Self { delimiter, pattern })
    }

    pub fn parse(&self, text: &str) -> Table {
        // seed row; the first match is appended to it
        let mut rows: Table = vec![Vec::new()];

        for (idx, caps) in self.pattern.captures_iter(text).enumerate() {
            let sep = caps.get(1).map_or("", |m| m.as_str());

            // the first match always starts at offset 0; a separator there
            // wins over `^` and hides the empty field in front of it
            if idx == 0 && !sep.is_empty() {
                rows[0].push(String::new());
            }
            if !sep.is_empty() && !self.is_delimiter(sep) {
                rows.push(Vec::new());
            }

            let field = match (caps.get(2), caps.get(3)) {
                (Some(quoted), _) => quoted.as_str().replace("\"\"", "\""),
                (None, Some(plain)) => plain.as_str().to_string(),
                (None, None) => String::new(),
            };
            if let Some(row) = rows.last_mut() {
                row.push(field);
            }
        }

        trace!(rows = rows.len(), "parsed delimited text");
        rows
    }

    fn is_delimiter(&self, sep: &str) -> bool {
        sep.len() == self.delimiter.len_utf8() && sep.starts_with(self.delimiter)
    }
}
