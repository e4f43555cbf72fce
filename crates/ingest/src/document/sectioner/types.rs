//! Section configuration and output types.

use thiserror::Error;

// ── Configuration ───────────────────────────────────────────────────────────

/// Boundary constants for the sectioner, fixed per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionConfig {
    /// Target section length in characters (default: 1000).
    pub max_section_length: usize,
    /// How far past the target length to look for a sentence end (default: 100).
    pub sentence_search_limit: usize,
    /// Characters re-included between consecutive sections (default: 100).
    pub section_overlap: usize,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            max_section_length: 1000,
            sentence_search_limit: 100,
            section_overlap: 100,
        }
    }
}

impl SectionConfig {
    /// Reject constants that would stall or degenerate the section loop.
    pub fn validate(&self) -> Result<(), SectionError> {
        let named = [
            ("max_section_length", self.max_section_length),
            ("sentence_search_limit", self.sentence_search_limit),
            ("section_overlap", self.section_overlap),
        ];
        if let Some((name, _)) = named.iter().find(|(_, v)| *v == 0) {
            return Err(SectionError::InvalidConfig(format!("{name} must be positive")));
        }
        if self.section_overlap >= self.max_section_length {
            return Err(SectionError::InvalidConfig(format!(
                "section_overlap ({}) must be smaller than max_section_length ({})",
                self.section_overlap, self.max_section_length
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SectionError {
    #[error("invalid section configuration: {0}")]
    InvalidConfig(String),
}

// ── Section output ──────────────────────────────────────────────────────────

/// A contiguous slice of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    /// 0-based position in the section sequence.
    pub index: usize,
    /// Start character offset (inclusive).
    pub start: usize,
    /// End character offset (exclusive).
    pub end: usize,
    /// The section text, borrowed from the document.
    pub text: &'a str,
}

impl Section<'_> {
    /// Length in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
