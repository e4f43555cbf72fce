//! Search index collaborator: the `SearchIndex` seam and its Azure AI Search
//! implementation.

pub mod client;
pub mod error;
pub mod schema;
pub mod types;

pub use client::AzureSearchClient;
pub use error::SearchError;
pub use types::{
    field_eq_filter, source_file_filter, IndexingResult, SearchHit, SearchIndex, SearchPage, SearchRequest,
};
