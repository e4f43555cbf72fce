//! The section loop: a lazy iterator driving the two boundary searches.

use std::iter::FusedIterator;

use super::boundary::{snap_backward_boundary, snap_forward_boundary, CharText};
use super::types::{Section, SectionConfig, SectionError};

/// Splits documents into overlapping, sentence-aligned sections.
#[derive(Debug, Clone, Copy)]
pub struct Sectioner {
    config: SectionConfig,
}

impl Sectioner {
    pub fn new(config: SectionConfig) -> Result<Self, SectionError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Lazily section `text`. Calling again restarts from the beginning.
    pub fn sections<'a>(&self, text: &'a str) -> Sections<'a> {
        Sections::new(text, self.config)
    }
}

/// Section `text` with the given boundary constants.
pub fn split_text<'a>(text: &'a str, config: &SectionConfig) -> Result<Sections<'a>, SectionError> {
    Ok(Sectioner::new(*config)?.sections(text))
}

/// Iterator over the sections of one document. Holds the document view and
/// two cursors, nothing else.
#[derive(Debug, Clone)]
pub struct Sections<'a> {
    text: CharText<'a>,
    config: SectionConfig,
    start: usize,
    end: usize,
    index: usize,
    finished: bool,
}

impl<'a> Sections<'a> {
    fn new(text: &'a str, config: SectionConfig) -> Self {
        let text = CharText::new(text);
        let end = text.len();
        Self {
            text,
            config,
            start: 0,
            end,
            index: 0,
            finished: false,
        }
    }

    fn emit(&mut self, start: usize, end: usize) -> Section<'a> {
        let section = Section {
            index: self.index,
            start,
            end,
            text: self.text.slice(start, end),
        };
        self.index += 1;
        section
    }
}

impl<'a> Iterator for Sections<'a> {
    type Item = Section<'a>;

    fn next(&mut self) -> Option<Section<'a>> {
        if self.finished {
            return None;
        }

        let SectionConfig {
            max_section_length: max_len,
            sentence_search_limit: search_limit,
            section_overlap: overlap,
        } = self.config;
        let length = self.text.len();

        if self.start + overlap < length {
            let end = snap_forward_boundary(&self.text, self.start.saturating_add(max_len), search_limit);
            let floor = end.saturating_sub(max_len.saturating_add(search_limit.saturating_mul(2)));
            let start = snap_backward_boundary(&self.text, self.start, floor);

            // end > cursor + overlap, so the next cursor always moves forward.
            self.end = end;
            self.start = end - overlap;
            return Some(self.emit(start, end));
        }

        self.finished = true;
        if self.index == 0 {
            // Too short for the main loop: the whole document, unless it is empty.
            return (length > 0).then(|| self.emit(0, length));
        }
        (self.start + overlap < self.end).then(|| self.emit(self.start, self.end))
    }
}

impl FusedIterator for Sections<'_> {}
