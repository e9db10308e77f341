//! Local PDF renderer, used when the backend cannot deliver one.

use chrono::{DateTime, Utc};
use genpdf::elements::{Break, Paragraph};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::{Style, StyledString};
use genpdf::{Document, SimplePageDecorator};

use crate::error::ExportError;
use crate::format::{Block, ReportDocument, Run};

const BODY_SIZE: u8 = 11;

/// Render the document to PDF bytes.
pub fn render_pdf(
    topic: &str,
    document: &ReportDocument,
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, ExportError> {
    let font_family = load_font_family()?;

    let mut doc = Document::new(font_family);
    doc.set_title(topic);

    let mut decorator = SimplePageDecorator::new();
    decorator.set_margins(30);
    doc.set_page_decorator(decorator);

    doc.push(Paragraph::new(StyledString::new(
        topic.to_string(),
        Style::new().bold().with_font_size(18),
    )));
    doc.push(Paragraph::new(StyledString::new(
        format!("Generated on {}", generated_at.format("%B %-d, %Y")),
        Style::new().italic().with_font_size(9),
    )));
    doc.push(Break::new(1));

    for block in &document.blocks {
        match block {
            Block::Heading { number, text } => {
                doc.push(Break::new(0.5));
                doc.push(Paragraph::new(StyledString::new(
                    format!("{number}. {text}"),
                    Style::new().bold().with_font_size(13),
                )));
                doc.push(Break::new(0.5));
            }
            Block::Paragraph { runs } => {
                doc.push(paragraph_from_runs(runs, None));
                doc.push(Break::new(0.5));
            }
            Block::List { items } => {
                for item in items {
                    doc.push(paragraph_from_runs(item, Some("\u{2022} ")));
                }
                doc.push(Break::new(0.5));
            }
        }
    }

    let mut buffer = Vec::new();
    doc.render(&mut buffer).map_err(|e| ExportError::Pdf {
        message: format!("Failed to render PDF: {e}"),
    })?;
    Ok(buffer)
}

fn paragraph_from_runs(runs: &[Run], prefix: Option<&str>) -> Paragraph {
    let mut paragraph = Paragraph::default();
    if let Some(prefix) = prefix {
        paragraph.push(StyledString::new(
            prefix.to_string(),
            Style::new().with_font_size(BODY_SIZE),
        ));
    }
    for run in runs {
        let mut style = Style::new().with_font_size(BODY_SIZE);
        if run.bold {
            style = style.bold();
        }
        if run.italic {
            style = style.italic();
        }
        // A genpdf paragraph is a single text flow; fold line breaks into
        // spaces.
        paragraph.push(StyledString::new(run.text.replace('\n', " "), style));
    }
    paragraph
}

// Try several system locations for a usable TTF family.
fn load_font_family() -> Result<FontFamily<FontData>, ExportError> {
    const CANDIDATES: [(&str, &str); 4] = [
        ("", "LiberationSans"),
        ("/usr/share/fonts/truetype/liberation", "LiberationSans"),
        ("/System/Library/Fonts", "Helvetica"),
        ("/Library/Fonts", "Arial"),
    ];
    for (dir, name) in CANDIDATES {
        if let Ok(family) = genpdf::fonts::from_files(dir, name, None) {
            return Ok(family);
        }
    }
    Err(ExportError::Pdf {
        message: "No suitable font found on this system".into(),
    })
}

// Note: an actual render test requires fonts available on the system and is
// platform-dependent; the structural mapping is covered via the exporter
// tests against the server path.
