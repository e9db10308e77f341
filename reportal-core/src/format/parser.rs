//! Best-effort parser for semi-structured report text.
//!
//! The backend prompts its model for five fixed section headings, but the
//! text that comes back is loose: ad-hoc `#` markers, headings run inline
//! with body text, blank-line separation that is only mostly there. This
//! parser normalizes all of that and assigns its own sequential section
//! numbers; any input it cannot classify becomes plain paragraphs.

use crate::format::document::{Block, ReportDocument, Run};
use crate::format::inline::parse_runs;

/// Canonical section titles, in recognition order. Matching is exact on
/// case and text.
pub const SECTION_TITLES: [&str; 5] = [
    "Executive Summary",
    "Introduction",
    "Key Findings",
    "Conclusion",
    "Thesis",
];

/// Transform raw report text into a structured document.
///
/// Pure and infallible: empty or whitespace-only input yields an empty
/// document, never an error. A section title appearing more than once
/// increments the heading counter each time.
pub fn format_report(raw: &str) -> ReportDocument {
    if raw.trim().is_empty() {
        return ReportDocument::default();
    }

    // The input may carry its own markdown heading markers; discard them in
    // favor of our numbering.
    let cleaned: String = raw.chars().filter(|&c| c != '#').collect();
    let isolated = isolate_section_titles(&cleaned);

    let mut blocks = Vec::new();
    let mut counter = 1u32;

    for block_text in split_blocks(&isolated) {
        let trimmed = block_text.trim();
        if trimmed.is_empty() {
            continue;
        }

        // Exact title: a heading on its own.
        if let Some(title) = SECTION_TITLES.iter().find(|t| **t == trimmed) {
            blocks.push(Block::Heading {
                number: counter,
                text: (*title).to_string(),
            });
            counter += 1;
            continue;
        }

        // Title glued to its content: split the heading off, the remainder
        // is body.
        if let Some(title) = SECTION_TITLES.iter().find(|t| trimmed.starts_with(**t)) {
            blocks.push(Block::Heading {
                number: counter,
                text: (*title).to_string(),
            });
            counter += 1;
            let remainder = trimmed[title.len()..].trim();
            if !remainder.is_empty() {
                push_body(&mut blocks, remainder);
            }
            continue;
        }

        push_body(&mut blocks, trimmed);
    }

    ReportDocument { blocks }
}

/// Force canonical titles embedded in running text onto their own block by
/// inserting blank-line separators around them. A title already preceded or
/// followed by a newline is left alone.
fn isolate_section_titles(text: &str) -> String {
    let mut out = text.to_string();
    for title in SECTION_TITLES {
        let mut search_from = 0;
        while let Some(pos) = out[search_from..].find(title) {
            let start = search_from + pos;
            let end = start + title.len();
            let preceded_by_newline = start > 0 && out.as_bytes()[start - 1] == b'\n';
            let followed_by_newline = end < out.len() && out.as_bytes()[end] == b'\n';
            if preceded_by_newline || followed_by_newline {
                search_from = end;
                continue;
            }
            let replacement = format!("\n\n{title}\n\n");
            out.replace_range(start..end, &replacement);
            search_from = start + replacement.len();
        }
    }
    out
}

/// Split text into blocks on blank-line boundaries. A line containing only
/// whitespace separates blocks; runs of blank lines collapse.
fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// Classify a block's lines into paragraphs and bullet lists.
///
/// Consecutive bullet lines merge into one list; a non-bullet line closes
/// any open list and accumulates into the current paragraph.
fn push_body(blocks: &mut Vec<Block>, text: &str) {
    let mut paragraph_lines: Vec<&str> = Vec::new();
    let mut items: Vec<Vec<Run>> = Vec::new();

    for line in text.lines() {
        if let Some(item_text) = bullet_item(line) {
            flush_paragraph(blocks, &mut paragraph_lines);
            items.push(parse_runs(item_text));
        } else {
            flush_list(blocks, &mut items);
            paragraph_lines.push(line);
        }
    }

    flush_paragraph(blocks, &mut paragraph_lines);
    flush_list(blocks, &mut items);
}

fn flush_paragraph(blocks: &mut Vec<Block>, lines: &mut Vec<&str>) {
    if lines.is_empty() {
        return;
    }
    let joined = lines.join("\n");
    lines.clear();
    let runs = parse_runs(&joined);
    if !runs.is_empty() {
        blocks.push(Block::Paragraph { runs });
    }
}

fn flush_list(blocks: &mut Vec<Block>, items: &mut Vec<Vec<Run>>) {
    if items.is_empty() {
        return;
    }
    blocks.push(Block::List {
        items: std::mem::take(items),
    });
}

/// A bullet line starts with `-`, `*`, or `+` followed by whitespace.
/// Returns the item text with the marker and leading whitespace stripped.
fn bullet_item(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    for marker in ['-', '*', '+'] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            if rest.starts_with(' ') || rest.starts_with('\t') {
                return Some(rest.trim_start());
            }
        }
    }
    None
}
