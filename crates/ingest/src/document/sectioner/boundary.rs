//! Boundary classification and the two boundary searches used by the section loop.

/// Characters that end a sentence.
pub(crate) const SENTENCE_ENDINGS: &[u8] = b".!?";

/// Characters a section may be cut after when no sentence end is in reach.
pub(crate) const WORD_BREAKS: &[u8] = b",;: ()[]{}\t\n";

/// Character-indexed view of a document.
///
/// Positions are counted in chars, slicing returns borrowed `&str`. Pure ASCII
/// documents skip the offset table since byte and char positions coincide.
#[derive(Debug, Clone)]
pub struct CharText<'a> {
    text: &'a str,
    /// Byte offset of every char, plus a final entry for `text.len()`.
    offsets: Option<Vec<usize>>,
}

impl<'a> CharText<'a> {
    pub fn new(text: &'a str) -> Self {
        let offsets = if text.is_ascii() {
            None
        } else {
            Some(
                text.char_indices()
                    .map(|(i, _)| i)
                    .chain(std::iter::once(text.len()))
                    .collect(),
            )
        };
        Self { text, offsets }
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        match &self.offsets {
            None => self.text.len(),
            Some(offsets) => offsets.len() - 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn byte_offset(&self, pos: usize) -> Option<usize> {
        match &self.offsets {
            None => (pos <= self.text.len()).then_some(pos),
            Some(offsets) => offsets.get(pos).copied(),
        }
    }

    /// Leading byte of the char at `pos`. Both boundary sets are ASCII, so a
    /// multi-byte char (lead byte >= 0x80) never matches either of them.
    fn lead_byte(&self, pos: usize) -> Option<u8> {
        self.byte_offset(pos)
            .and_then(|b| self.text.as_bytes().get(b).copied())
    }

    pub fn is_sentence_end(&self, pos: usize) -> bool {
        self.lead_byte(pos)
            .is_some_and(|b| SENTENCE_ENDINGS.contains(&b))
    }

    pub fn is_word_break(&self, pos: usize) -> bool {
        self.lead_byte(pos).is_some_and(|b| WORD_BREAKS.contains(&b))
    }

    /// Chars `[start, end)`, clamped to the document.
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        let len = self.len();
        let (start, end) = (start.min(len), end.min(len));
        let from = self.byte_offset(start).unwrap_or(self.text.len());
        let to = self.byte_offset(end.max(start)).unwrap_or(self.text.len());
        &self.text[from..to]
    }
}

/// Find the exclusive end of a section whose nominal cut point is `nominal_end`.
///
/// Scans forward at most `search_limit` chars for a sentence end. Without one,
/// falls back to the last word break seen, and without that to a hard cut at the
/// end of the scan. The boundary char itself is included in the section. A
/// nominal cut at or past the end of the document yields the document length.
pub fn snap_forward_boundary(text: &CharText<'_>, nominal_end: usize, search_limit: usize) -> usize {
    let length = text.len();
    if nominal_end >= length {
        return length;
    }

    let mut end = nominal_end;
    let mut last_word_break = None;
    while end < length && end - nominal_end < search_limit && !text.is_sentence_end(end) {
        if text.is_word_break(end) {
            last_word_break = Some(end);
        }
        end += 1;
    }

    if end < length && !text.is_sentence_end(end) {
        if let Some(brk) = last_word_break.filter(|&p| p > 0) {
            end = brk;
        }
    }

    if end < length {
        end += 1;
    }
    end
}

/// Move a section start back to the char after the nearest preceding boundary.
///
/// Walks back from `start` while above `floor`, stopping at a sentence end. When
/// none is found, snaps to the furthest-back word break seen. The returned start
/// skips the boundary char itself unless it is the beginning of the document.
pub fn snap_backward_boundary(text: &CharText<'_>, start: usize, floor: usize) -> usize {
    let mut start = start;
    let mut last_word_break = None;
    while start > 0 && start > floor && !text.is_sentence_end(start) {
        if text.is_word_break(start) {
            last_word_break = Some(start);
        }
        start -= 1;
    }

    if !text.is_sentence_end(start) {
        if let Some(brk) = last_word_break.filter(|&p| p > 0) {
            start = brk;
        }
    }

    if start > 0 {
        start += 1;
    }
    start
}
