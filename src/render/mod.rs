//! Server-side HTML for the index and result pages.

use serde::Serialize;

use crate::fetch::Query;
use crate::process::{OutputFormat, ParsedOutput, ScrapedData, Series, Table};

/// Everything the page needs. `None` fields are left off the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderContext {
    pub scraped_data: Option<ScrapedData>,
    pub symbol: Option<String>,
    pub title_data: Option<Vec<String>>,
    pub query: Option<Query>,
    pub error: Option<String>,
}

impl RenderContext {
    pub fn from_output(query: Query, output: ParsedOutput) -> Self {
        let (symbol, title_data) = match output.header {
            Some(h) => (Some(h.symbol), Some(h.title_data)),
            None => (None, None),
        };
        Self {
            scraped_data: Some(output.data),
            symbol,
            title_data,
            query: Some(query),
            error: output.warning,
        }
    }
}

const FORMATS: [OutputFormat; 3] = [OutputFormat::Csv, OutputFormat::Values, OutputFormat::Text];

pub fn render_page(ctx: &RenderContext) -> String {
    let query = ctx.query.clone().unwrap_or_default();

    let mut page = String::from(
        "<!DOCTYPE html>\n\
<html lang=\"en\">\n\
<head>\n\
<meta charset=\"utf-8\">\n\
<title>Financial Analytics Scraper</title>\n\
<link rel=\"stylesheet\" href=\"/css/style.css\">\n\
</head>\n\
<body>\n\
<h1>Financial Analytics Scraper</h1>\n",
    );

    page.push_str(&render_form(&query));

    if let Some(error) = &ctx.error {
        page.push_str(&format!(
            "<p class=\"error\">{}</p>\n",
            escape_html(error)
        ));
    }

    match &ctx.scraped_data {
        Some(ScrapedData::Table(rows)) => {
            let symbol = ctx.symbol.as_deref().unwrap_or_default();
            let titles = ctx.title_data.as_deref().unwrap_or_default();
            page.push_str(&render_table(symbol, titles, rows));
        }
        Some(ScrapedData::Series(series)) => page.push_str(&render_series(series)),
        Some(ScrapedData::Text(text)) => {
            page.push_str(&format!(
                "<pre class=\"raw\">{}</pre>\n",
                escape_html(text)
            ));
        }
        None => {}
    }

    page.push_str("</body>\n</html>\n");
    page
}

fn render_form(query: &Query) -> String {
    let selected = query.output_format();
    let mut form = format!(
        "<form method=\"post\" action=\"/get-data\">\n\
<label>Symbol <input name=\"symbol\" value=\"{}\"></label>\n\
<label>Statistic <input name=\"statistic\" value=\"{}\"></label>\n\
<label>Format <select name=\"format\">\n",
        escape_html(&query.symbol),
        escape_html(&query.statistic),
    );
    for format in FORMATS {
        let mark = if format == selected { " selected" } else { "" };
        form.push_str(&format!(
            "<option value=\"{0}\"{1}>{0}</option>\n",
            format.as_str(),
            mark
        ));
    }
    form.push_str("</select></label>\n<button type=\"submit\">Scrape</button>\n</form>\n");
    form
}

fn render_table(symbol: &str, titles: &[String], rows: &Table) -> String {
    let mut html = String::from("<table class=\"scraped\">\n<thead><tr>");
    html.push_str(&format!("<th>{}</th>", escape_html(symbol)));
    for title in titles {
        html.push_str(&format!("<th>{}</th>", escape_html(title)));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", escape_html(cell)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

fn render_series(series: &Series) -> String {
    let mut html = format!("<h2>{}</h2>\n<ol class=\"values\">\n", escape_html(&series.header));
    for value in &series.values {
        html.push_str(&format!("<li>{}</li>\n", value));
    }
    html.push_str("</ol>\n");
    html
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
