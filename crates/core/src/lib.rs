pub mod config;
pub mod document;
pub mod error;

pub use config::{BlobConfig, Config, IngestConfig, LlmConfig, SearchConfig};
pub use document::*;
pub use error::*;
