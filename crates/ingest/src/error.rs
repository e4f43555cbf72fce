use thiserror::Error;

use docqa_search::SearchError;
use docqa_storage::StorageError;

use crate::document::sectioner::SectionError;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("input not found: {0}")]
    MissingInput(String),

    #[error(transparent)]
    Section(#[from] SectionError),

    #[error("search index error: {0}")]
    Search(#[from] SearchError),

    #[error("blob storage error: {0}")]
    Storage(#[from] StorageError),
}
