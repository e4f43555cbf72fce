use std::path::Path;

use serde::{Deserialize, Serialize};

/// One indexed section as stored in the search index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub id: String,
    pub content: String,
    pub category: String,
    /// Blob name of the original document.
    pub sourcepage: String,
    /// File name as it was handed to the indexer.
    pub sourcefile: String,
}

impl SectionRecord {
    /// Build the record for section `index` of `filename`.
    pub fn new(filename: &str, index: usize, content: impl Into<String>, category: &str) -> Self {
        Self {
            id: sanitize_key(&format!("{filename}-{index}")),
            content: content.into(),
            category: category.to_string(),
            sourcepage: blob_name_from_file(filename),
            sourcefile: filename.to_string(),
        }
    }
}

/// Replace every character outside `[0-9a-zA-Z_-]` with `_`.
///
/// Search index keys only accept that alphabet.
pub fn sanitize_key(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Blob name for a source file: its base name.
pub fn blob_name_from_file(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string())
}
