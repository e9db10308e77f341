//! Report formatter — raw report text to a structured numbered document.
//!
//! The backend emits loosely structured text: five known section titles,
//! `**bold**` / `*italic*` emphasis, and `- ` bullet lists. This module
//! turns that into a [`ReportDocument`] consumed identically by the
//! on-screen renderer and every export renderer, so section numbering can
//! never diverge between views. The transform is heuristic and infallible:
//! text it cannot classify degrades to plain paragraphs.

pub mod document;
pub mod html;
mod inline;
mod parser;

pub use document::{Block, ReportDocument, Run};
pub use parser::{SECTION_TITLES, format_report};
