//! Terminal rendering of a structured report document.
//!
//! Converts the formatted document into ANSI-styled text: bold underlined
//! numbered headings, emphasis inside paragraphs, and bullet lists.

use reportal_core::{Block, ReportDocument, Run};

/// ANSI escape codes for terminal formatting.
mod ansi {
    pub const BOLD_ON: &str = "\x1b[1m";
    pub const BOLD_OFF: &str = "\x1b[22m";
    pub const ITALIC_ON: &str = "\x1b[3m";
    pub const ITALIC_OFF: &str = "\x1b[23m";
    pub const UNDERLINE_ON: &str = "\x1b[4m";
    pub const RESET: &str = "\x1b[0m";
}

/// Render a document as ANSI-formatted text for the terminal.
pub fn render_ansi(document: &ReportDocument) -> String {
    let mut out = String::new();
    for block in &document.blocks {
        match block {
            Block::Heading { number, text } => {
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(ansi::BOLD_ON);
                out.push_str(ansi::UNDERLINE_ON);
                out.push_str(&format!("{number}. {text}"));
                out.push_str(ansi::RESET);
                out.push_str("\n\n");
            }
            Block::Paragraph { runs } => {
                render_runs(&mut out, runs);
                out.push_str("\n\n");
            }
            Block::List { items } => {
                for item in items {
                    out.push_str("  \u{2022} ");
                    render_runs(&mut out, item);
                    out.push('\n');
                }
                out.push('\n');
            }
        }
    }
    out.trim_end().to_string()
}

fn render_runs(out: &mut String, runs: &[Run]) {
    for run in runs {
        if run.bold {
            out.push_str(ansi::BOLD_ON);
        }
        if run.italic {
            out.push_str(ansi::ITALIC_ON);
        }
        out.push_str(&run.text);
        if run.italic {
            out.push_str(ansi::ITALIC_OFF);
        }
        if run.bold {
            out.push_str(ansi::BOLD_OFF);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reportal_core::format_report;

    #[test]
    fn test_heading_is_bold_underlined_and_numbered() {
        let document = format_report("Introduction\n\nBody.");
        let text = render_ansi(&document);
        assert!(text.contains("\x1b[1m\x1b[4m1. Introduction\x1b[0m"));
        assert!(text.contains("Body."));
    }

    #[test]
    fn test_emphasis_escapes() {
        let document = format_report("**bold** and *italic*");
        let text = render_ansi(&document);
        assert_eq!(
            text,
            "\x1b[1mbold\x1b[22m and \x1b[3mitalic\x1b[23m"
        );
    }

    #[test]
    fn test_bullets_are_indented() {
        let document = format_report("- one\n- two");
        let text = render_ansi(&document);
        assert_eq!(text, "  \u{2022} one\n  \u{2022} two");
    }

    #[test]
    fn test_empty_document_renders_empty() {
        assert_eq!(render_ansi(&ReportDocument::default()), "");
    }
}
