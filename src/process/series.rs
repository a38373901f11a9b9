//! Header plus single-column numeric output.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub header: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseValueError {
    #[error("no output to parse")]
    Empty,

    #[error("line {line}: {value:?} is not a number")]
    InvalidNumber { line: usize, value: String },
}

/// Split `text` on newlines, treat the first line as the header and parse
/// every following non-blank line as an `f64`.
///
/// Line numbers in errors are 1-based and count the header.
pub fn parse_series(text: &str) -> Result<Series, ParseValueError> {
    if text.trim().is_empty() {
        return Err(ParseValueError::Empty);
    }

    let mut lines = text.split('\n').map(|l| l.replace('\r', ""));
    let header = lines.next().unwrap_or_default();

    let mut values = Vec::new();
    for (idx, line) in lines.enumerate() {
        let value = line.trim();
        if value.is_empty() {
            continue;
        }
        let parsed = value
            .parse::<f64>()
            .map_err(|_| ParseValueError::InvalidNumber {
                line: idx + 2,
                value: value.to_string(),
            })?;
        values.push(parsed);
    }

    Ok(Series { header, values })
}
