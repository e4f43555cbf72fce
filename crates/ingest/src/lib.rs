//! Document ingestion: sectioning source text and pushing the sections into
//! the search index.

pub mod batch;
pub mod document;
pub mod error;
pub mod pipeline;

pub use error::IngestError;
pub use pipeline::{FileReport, IngestSettings, Indexer};
