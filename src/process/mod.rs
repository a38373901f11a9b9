//! Turning captured scraper output into something the page can show.

pub mod csv;
pub mod series;

use serde::Serialize;
use tracing::{debug, warn};

pub use csv::{parse_csv, CsvParser, Table};
pub use series::{parse_series, ParseValueError, Series};

/// How the scraper was asked to format its output, and therefore how we read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Delimited text with a header row.
    Csv,
    /// A header line followed by one number per line.
    Values,
    /// Anything else; forwarded untouched.
    Text,
}

impl OutputFormat {
    pub fn as_str(&self) -> &str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Values => "values",
            OutputFormat::Text => "text",
        }
    }
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "csv" => OutputFormat::Csv,
            "values" | "list" | "raw" => OutputFormat::Values,
            _ => OutputFormat::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ScrapedData {
    Table(Table),
    Series(Series),
    Text(String),
}

/// First row of a CSV result.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TableHeader {
    pub symbol: String,
    pub title_data: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedOutput {
    pub data: ScrapedData,
    pub header: Option<TableHeader>,
    /// Set when the output could not be read the way its format promised.
    pub warning: Option<String>,
}

/// Split off the first row as the header. Trailing blank rows, left behind by
/// the scraper's closing newlines, are dropped from the body.
pub fn split_header(mut table: Table) -> (TableHeader, Table) {
    let header = if table.is_empty() {
        TableHeader::default()
    } else {
        let mut cells = table.remove(0).into_iter();
        TableHeader {
            symbol: cells.next().unwrap_or_default(),
            title_data: cells.collect(),
        }
    };

    while table
        .last()
        .is_some_and(|row| row.iter().all(|cell| cell.is_empty()))
    {
        table.pop();
    }

    (header, table)
}

pub fn parse_output(raw: &str, format: OutputFormat) -> ParsedOutput {
    let parsed = match format {
        OutputFormat::Csv => {
            let (header, rows) = split_header(parse_csv(raw));
            ParsedOutput {
                data: ScrapedData::Table(rows),
                header: Some(header),
                warning: None,
            }
        }
        OutputFormat::Values => match parse_series(raw) {
            Ok(series) => ParsedOutput {
                data: ScrapedData::Series(series),
                header: None,
                warning: None,
            },
            Err(e) => {
                warn!("output is not a value series: {}", e);
                ParsedOutput {
                    data: ScrapedData::Text(raw.to_string()),
                    header: None,
                    warning: Some(e.to_string()),
                }
            }
        },
        OutputFormat::Text => ParsedOutput {
            data: ScrapedData::Text(raw.to_string()),
            header: None,
            warning: None,
        },
    };

    debug!(format = format.as_str(), data = ?parsed.data, "parsed scraper output");
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_query_value() {
        assert_eq!(OutputFormat::from("csv"), OutputFormat::Csv);
        assert_eq!(OutputFormat::from(" CSV "), OutputFormat::Csv);
        assert_eq!(OutputFormat::from("values"), OutputFormat::Values);
        assert_eq!(OutputFormat::from("raw"), OutputFormat::Values);
        assert_eq!(OutputFormat::from("json"), OutputFormat::Text);
        assert_eq!(OutputFormat::from(""), OutputFormat::Text);
    }

    #[test]
    fn test_csv_output_splits_header() {
        let raw = ",Total Revenue\n0,274515000\n1,260174000\n\n";
        let parsed = parse_output(raw, OutputFormat::Csv);

        let header = parsed.header.unwrap();
        assert_eq!(header.symbol, "");
        assert_eq!(header.title_data, vec!["Total Revenue".to_string()]);
        assert_eq!(
            parsed.data,
            ScrapedData::Table(vec![
                vec!["0".to_string(), "274515000".to_string()],
                vec!["1".to_string(), "260174000".to_string()],
            ])
        );
        assert!(parsed.warning.is_none());
    }

    #[test]
    fn test_split_header_keeps_inner_blank_rows() {
        let table = vec![
            vec!["AAPL".to_string(), "2020".to_string()],
            vec!["".to_string()],
            vec!["x".to_string(), "1".to_string()],
            vec!["".to_string()],
        ];
        let (header, rows) = split_header(table);
        assert_eq!(header.symbol, "AAPL");
        assert_eq!(header.title_data, vec!["2020".to_string()]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["".to_string()]);
    }

    #[test]
    fn test_split_header_of_empty_table() {
        let (header, rows) = split_header(Vec::new());
        assert_eq!(header, TableHeader::default());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_values_output() {
        let parsed = parse_output("Total Revenue\n1\n2.5\n", OutputFormat::Values);
        assert_eq!(
            parsed.data,
            ScrapedData::Series(Series {
                header: "Total Revenue".to_string(),
                values: vec![1.0, 2.5],
            })
        );
        assert!(parsed.header.is_none());
    }

    #[test]
    fn test_bad_values_fall_back_to_text() {
        let raw = "Not a valid stock symbol\nNone\n";
        let parsed = parse_output(raw, OutputFormat::Values);
        assert_eq!(parsed.data, ScrapedData::Text(raw.to_string()));
        assert!(parsed.warning.unwrap().contains("\"None\""));
    }

    #[test]
    fn test_text_output_is_verbatim() {
        let raw = "  anything, \"at\" all\r\n";
        let parsed = parse_output(raw, OutputFormat::Text);
        assert_eq!(parsed.data, ScrapedData::Text(raw.to_string()));
    }
}
