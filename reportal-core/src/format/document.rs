//! Structured document types produced by the formatter.
//!
//! A [`ReportDocument`] is derived and disposable: it is rebuilt from the
//! raw report text on every render and never mutated in place.

use serde::{Deserialize, Serialize};

/// A contiguous span of text with uniform emphasis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            italic: false,
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: true,
        }
    }
}

/// One unit of the structured document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A numbered section heading. Numbers are assigned sequentially from 1
    /// in document order, one per recognized section title.
    Heading { number: u32, text: String },
    /// A paragraph of inline runs.
    Paragraph { runs: Vec<Run> },
    /// A bullet list; each item is its own run sequence.
    List { items: Vec<Vec<Run>> },
}

/// An ordered sequence of blocks.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportDocument {
    pub blocks: Vec<Block>,
}

impl ReportDocument {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterate headings as `(number, text)` pairs in document order.
    pub fn headings(&self) -> impl Iterator<Item = (u32, &str)> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Heading { number, text } => Some((*number, text.as_str())),
            _ => None,
        })
    }
}
