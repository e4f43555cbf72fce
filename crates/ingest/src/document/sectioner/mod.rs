//! Sentence-aligned document sectioning.
//!
//! Splits raw document text into bounded, overlapping sections for search
//! indexing. Each cut prefers a sentence end (`.`, `!`, `?`) within a short
//! lookahead, then a word break, then a hard length cut. The start of every
//! section after the first is pulled back to the preceding boundary so that
//! consecutive sections overlap by roughly `section_overlap` chars.

mod boundary;
mod sections;
mod types;

pub use boundary::{snap_backward_boundary, snap_forward_boundary, CharText};
pub use sections::{split_text, Sectioner, Sections};
pub use types::{Section, SectionConfig, SectionError};
