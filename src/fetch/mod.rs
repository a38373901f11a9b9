//! Where scraped text comes from.

pub mod command;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::process::OutputFormat;

pub use command::CommandSource;

/// The three values a scrape is asked for. Missing fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    pub symbol: String,
    pub statistic: String,
    pub format: String,
}

impl Query {
    pub fn new(
        symbol: impl Into<String>,
        statistic: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            statistic: statistic.into(),
            format: format.into(),
        }
    }

    /// Positional arguments, in the order the scraper expects them.
    pub fn args(&self) -> [&str; 3] {
        [&self.symbol, &self.statistic, &self.format]
    }

    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from(self.format.as_str())
    }
}

/// Anything that can produce tabular text for a [`Query`].
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self, query: &Query) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_order() {
        let q = Query::new("AAPL", "Total Revenue", "csv");
        assert_eq!(q.args(), ["AAPL", "Total Revenue", "csv"]);
        assert_eq!(q.output_format(), OutputFormat::Csv);
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let q: Query = serde_json::from_str(r#"{"symbol":"MSFT"}"#).unwrap();
        assert_eq!(q, Query::new("MSFT", "", ""));
        assert_eq!(q.output_format(), OutputFormat::Text);
    }
}
