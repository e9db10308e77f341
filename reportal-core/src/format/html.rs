//! HTML rendering of a structured document.
//!
//! Produces the fragment used for on-screen display; the export renderers
//! wrap the same fragment, so numbering and content are identical in every
//! view.

use crate::format::document::{Block, ReportDocument, Run};

/// Render a document as an HTML fragment (`h1`/`p`/`ul` markup).
pub fn render_fragment(document: &ReportDocument) -> String {
    let mut out = String::new();
    for block in &document.blocks {
        match block {
            Block::Heading { number, text } => {
                out.push_str("<h1>");
                out.push_str(&format!("{number}. {}", escape(text)));
                out.push_str("</h1>\n");
            }
            Block::Paragraph { runs } => {
                out.push_str("<p>");
                render_runs(&mut out, runs);
                out.push_str("</p>\n");
            }
            Block::List { items } => {
                out.push_str("<ul>\n");
                for item in items {
                    out.push_str("<li>");
                    render_runs(&mut out, item);
                    out.push_str("</li>\n");
                }
                out.push_str("</ul>\n");
            }
        }
    }
    out
}

fn render_runs(out: &mut String, runs: &[Run]) {
    for run in runs {
        if run.bold {
            out.push_str("<strong>");
        }
        if run.italic {
            out.push_str("<em>");
        }
        out.push_str(&escape(&run.text));
        if run.italic {
            out.push_str("</em>");
        }
        if run.bold {
            out.push_str("</strong>");
        }
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_report;

    #[test]
    fn test_numbered_headings_in_fragment() {
        let document = format_report("Introduction\n\nHello.\n\nConclusion\n\nBye.");
        let html = render_fragment(&document);
        assert!(html.contains("<h1>1. Introduction</h1>"));
        assert!(html.contains("<h1>2. Conclusion</h1>"));
        assert!(html.contains("<p>Hello.</p>"));
    }

    #[test]
    fn test_emphasis_markup() {
        let document = format_report("**bold** and *italic*");
        let html = render_fragment(&document);
        assert_eq!(
            html,
            "<p><strong>bold</strong> and <em>italic</em></p>\n"
        );
    }

    #[test]
    fn test_list_markup() {
        let document = format_report("- a\n- b\nc");
        let html = render_fragment(&document);
        assert_eq!(
            html,
            "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n<p>c</p>\n"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let document = format_report("a < b & c > d");
        let html = render_fragment(&document);
        assert_eq!(html, "<p>a &lt; b &amp; c &gt; d</p>\n");
    }
}
