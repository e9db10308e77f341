//! Standalone HTML document export.
//!
//! Wraps the on-screen HTML fragment in a complete page with print styling
//! so the file can be opened in a browser or sent straight to a printer.

use chrono::{DateTime, Utc};
use handlebars::Handlebars;
use serde_json::json;

use crate::error::ExportError;
use crate::format::html::render_fragment;
use crate::format::ReportDocument;

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{title}}</title>
<style>
@page {
    size: A4;
    margin: 2.5cm 2cm;
}
body {
    font-family: "Times New Roman", Georgia, serif;
    font-size: 12pt;
    line-height: 1.6;
    color: #1a1a1a;
    max-width: 17cm;
    margin: 0 auto;
    padding: 2rem 1rem;
}
.report-title {
    font-family: Arial, sans-serif;
    font-size: 16pt;
    font-weight: bold;
    text-align: center;
    margin-bottom: 0.25rem;
}
.report-date {
    text-align: center;
    font-size: 10pt;
    color: #555;
    margin-bottom: 2rem;
}
h1 {
    font-family: Arial, sans-serif;
    font-size: 13pt;
    font-weight: bold;
    border-bottom: 1px solid #1a1a1a;
    padding-bottom: 0.2rem;
    margin-top: 1.5rem;
}
p {
    font-size: 11pt;
    text-align: justify;
    text-indent: 1.5rem;
    margin: 0.5rem 0;
}
h1 + p {
    text-indent: 0;
}
li {
    font-size: 11pt;
    margin: 0.25rem 0;
}
</style>
</head>
<body>
<div class="report-title">{{title}}</div>
<div class="report-date">Generated on {{date}}</div>
{{{content}}}
</body>
</html>
"#;

/// Render a complete printable HTML page for the document.
pub fn render_standalone(
    topic: &str,
    document: &ReportDocument,
    generated_at: DateTime<Utc>,
) -> Result<String, ExportError> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(false);

    handlebars
        .render_template(
            TEMPLATE,
            &json!({
                "title": topic,
                "date": generated_at.format("%B %-d, %Y").to_string(),
                "content": render_fragment(document),
            }),
        )
        .map_err(|e| ExportError::Template {
            message: format!("Failed to render HTML document: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_report;
    use chrono::TimeZone;

    #[test]
    fn test_standalone_document_contains_title_and_date() {
        let document = format_report("Introduction\n\nHello world.");
        let generated = Utc.with_ymd_and_hms(2026, 3, 7, 12, 0, 0).unwrap();
        let html = render_standalone("Quantum Batteries", &document, generated).unwrap();

        assert!(html.contains("<title>Quantum Batteries</title>"));
        assert!(html.contains("Generated on March 7, 2026"));
        assert!(html.contains("<h1>1. Introduction</h1>"));
        assert!(html.contains("<p>Hello world.</p>"));
    }

    #[test]
    fn test_fragment_markup_is_not_escaped() {
        let document = format_report("**bold** text");
        let html = render_standalone("T", &document, Utc::now()).unwrap();
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_title_is_escaped() {
        let document = ReportDocument::default();
        let html = render_standalone("<script>", &document, Utc::now()).unwrap();
        assert!(!html.contains("<title><script></title>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
