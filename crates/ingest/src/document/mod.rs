pub mod records;
pub mod sectioner;
mod txt;

use std::path::PathBuf;

use crate::error::IngestError;

/// Extension picked up when a directory is given as input.
pub const TEXT_EXTENSION: &str = "txt";

/// A source file's full text, read once and never mutated.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// File name as given by the caller.
    pub filename: String,
    pub text: String,
}

impl SourceDocument {
    pub fn from_bytes(filename: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            filename: filename.into(),
            text: txt::decode_text(bytes),
        }
    }
}

/// Expand `--remove` arguments into the file names to drop from the index.
///
/// Existing directories contribute their `*.txt` files like
/// [`discover_documents`]. Anything else is taken as a file name as given,
/// whether or not it still exists on disk.
pub fn removal_targets(paths: &[PathBuf]) -> Result<Vec<String>, IngestError> {
    let mut names = Vec::new();
    for path in paths {
        if path.is_dir() {
            let files = discover_documents(std::slice::from_ref(path))?;
            names.extend(files.iter().map(|f| f.to_string_lossy().into_owned()));
        } else {
            names.push(path.to_string_lossy().into_owned());
        }
    }
    Ok(names)
}

/// Expand input paths into the files to process.
///
/// Files are taken as-is; directories contribute their `*.txt` entries
/// (non-recursive), sorted by name.
pub fn discover_documents(paths: &[PathBuf]) -> Result<Vec<PathBuf>, IngestError> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.is_dir() {
            return Err(IngestError::MissingInput(path.display().to_string()));
        }
        let mut found: Vec<PathBuf> = walkdir::WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == TEXT_EXTENSION))
            .collect();
        found.sort();
        files.extend(found);
    }
    Ok(files)
}
