//! Wrapping sections into index records.

use docqa_core::SectionRecord;

use super::sectioner::Sections;

/// Lazily turn the sections of `filename` into index records.
pub fn create_records<'a>(
    filename: &'a str,
    sections: Sections<'a>,
    category: &'a str,
) -> impl Iterator<Item = SectionRecord> + 'a {
    sections.map(move |s| SectionRecord::new(filename, s.index, s.text, category))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::sectioner::{SectionConfig, Sectioner};

    #[test]
    fn records_carry_stable_ids_and_metadata() {
        let sectioner = Sectioner::new(SectionConfig {
            max_section_length: 30,
            sentence_search_limit: 10,
            section_overlap: 8,
        })
        .unwrap();
        let text = "The cell is small. It divides often! Does it grow? Yes, it grows (slowly) over time.";
        let records: Vec<_> =
            create_records("docs/cells 101.txt", sectioner.sections(text), "biology").collect();

        assert_eq!(records.len(), 3);
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["docs_cells_101_txt-0", "docs_cells_101_txt-1", "docs_cells_101_txt-2"]
        );
        assert_eq!(records[0].content, "The cell is small. It divides often!");
        for r in &records {
            assert_eq!(r.category, "biology");
            assert_eq!(r.sourcepage, "cells 101.txt");
            assert_eq!(r.sourcefile, "docs/cells 101.txt");
        }
    }

    #[test]
    fn empty_document_has_no_records() {
        let sectioner = Sectioner::new(SectionConfig::default()).unwrap();
        assert_eq!(create_records("a.txt", sectioner.sections(""), "").count(), 0);
    }
}
