//! Indexing pipeline: store the original, section the text, push records to
//! the search index, and remove them again on request.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{info, warn};

use docqa_core::{blob_name_from_file, IngestConfig, SectionRecord};
use docqa_search::{source_file_filter, SearchError, SearchIndex, SearchRequest};
use docqa_storage::BlobStore;

use crate::batch::{BatchReport, BatchSink, BatchSubmitter, RetryPolicy};
use crate::document::records::create_records;
use crate::document::sectioner::{SectionConfig, Sectioner};
use crate::document::SourceDocument;
use crate::error::IngestError;

/// Page size used when looking up documents to delete.
pub const REMOVE_PAGE_SIZE: usize = 1000;

// ── Settings ────────────────────────────────────────────────────────

/// Per-run knobs of the pipeline.
#[derive(Debug, Clone)]
pub struct IngestSettings {
    /// Category stamped on every record.
    pub category: String,
    /// Records per index upload.
    pub batch_size: usize,
    /// Pause between delete rounds, so search results catch up with deletions.
    pub delete_pause: Duration,
    pub section: SectionConfig,
    pub retry: RetryPolicy,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            category: String::new(),
            batch_size: 1000,
            delete_pause: Duration::from_secs(2),
            section: SectionConfig::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl IngestSettings {
    pub fn from_config(config: &IngestConfig) -> Self {
        Self {
            category: config.category.clone(),
            batch_size: config.batch_size,
            delete_pause: Duration::from_secs(config.delete_pause_secs),
            section: SectionConfig {
                max_section_length: config.max_section_length,
                sentence_search_limit: config.sentence_search_limit,
                section_overlap: config.section_overlap,
            },
            retry: RetryPolicy::default(),
        }
    }
}

// ── Index sink ──────────────────────────────────────────────────────

/// Uploads record batches to a search index.
pub struct IndexSink {
    index: Arc<dyn SearchIndex>,
}

impl IndexSink {
    pub fn new(index: Arc<dyn SearchIndex>) -> Self {
        Self { index }
    }
}

#[async_trait]
impl BatchSink<SectionRecord> for IndexSink {
    type Error = SearchError;

    async fn submit(&self, batch: &[SectionRecord]) -> Result<BatchReport, SearchError> {
        let results = self.index.upload_documents(batch).await?;
        let succeeded = results.iter().filter(|r| r.succeeded).count();
        for failed in results.iter().filter(|r| !r.succeeded) {
            warn!(
                key = %failed.key,
                status = failed.status_code,
                error = failed.error_message.as_deref().unwrap_or("unknown"),
                "section was not indexed"
            );
        }
        info!("\tIndexed {} sections, {} succeeded", batch.len(), succeeded);
        Ok(BatchReport {
            submitted: batch.len(),
            succeeded,
        })
    }

    fn is_transient(&self, error: &SearchError) -> bool {
        error.is_transient()
    }
}

// ── Indexer ─────────────────────────────────────────────────────────

/// Outcome of indexing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub filename: String,
    pub sections: usize,
    pub succeeded: usize,
}

/// Drives documents through blob upload, sectioning and indexing.
pub struct Indexer {
    index: Arc<dyn SearchIndex>,
    blobs: Option<Arc<dyn BlobStore>>,
    sectioner: Sectioner,
    settings: IngestSettings,
}

impl Indexer {
    /// Build an indexer without blob storage. Fails on invalid section constants.
    pub fn new(index: Arc<dyn SearchIndex>, settings: IngestSettings) -> Result<Self, IngestError> {
        let sectioner = Sectioner::new(settings.section)?;
        Ok(Self {
            index,
            blobs: None,
            sectioner,
            settings,
        })
    }

    /// Also keep a copy of every original file in `blobs`.
    pub fn with_blobs(mut self, blobs: Arc<dyn BlobStore>) -> Self {
        self.blobs = Some(blobs);
        self
    }

    /// Create the search index if missing.
    pub async fn ensure_index(&self) -> Result<bool, IngestError> {
        let index = self.index.as_ref();
        let created = self
            .settings
            .retry
            .run(|| index.ensure_index(), SearchError::is_transient)
            .await?;
        if created {
            info!("Created search index {}", index.index_name());
        } else {
            info!("Search index {} already exists", index.index_name());
        }
        Ok(created)
    }

    /// Upload, section and index one file.
    pub async fn process_file(&self, path: &Path) -> Result<FileReport, IngestError> {
        let filename = path.to_string_lossy().into_owned();
        info!("Processing '{}'", filename);

        let bytes = Bytes::from(tokio::fs::read(path).await?);
        if let Some(blobs) = &self.blobs {
            blobs.upload(&blob_name_from_file(&filename), bytes.clone()).await?;
        }

        let document = SourceDocument::from_bytes(filename, &bytes);
        self.index_document(&document).await
    }

    /// Section an already-read document and index its records.
    pub async fn index_document(&self, document: &SourceDocument) -> Result<FileReport, IngestError> {
        let sink = Arc::new(IndexSink::new(self.index.clone()));
        let mut batcher =
            BatchSubmitter::new(sink, self.settings.batch_size).with_retry(self.settings.retry);

        let records = create_records(
            &document.filename,
            self.sectioner.sections(&document.text),
            &self.settings.category,
        );
        let mut sections = 0;
        for record in records {
            sections += 1;
            batcher.add(record).await?;
        }
        batcher.flush().await?;

        let totals = batcher.totals();
        if totals.failed() > 0 {
            warn!(
                file = %document.filename,
                failed = totals.failed(),
                "some sections were not indexed"
            );
        }
        Ok(FileReport {
            filename: document.filename.clone(),
            sections,
            succeeded: totals.succeeded,
        })
    }

    /// Delete the sections of `filename` from the index, or every section when
    /// `None`. Returns how many were deleted.
    pub async fn remove_from_index(&self, filename: Option<&str>) -> Result<usize, IngestError> {
        let index = self.index.as_ref();
        let retry = self.settings.retry;
        info!(
            "Removing sections from '{}' from search index '{}'",
            filename.unwrap_or("<all>"),
            index.index_name()
        );

        let mut request = SearchRequest::new("", REMOVE_PAGE_SIZE).with_total_count();
        if let Some(name) = filename {
            request = request.with_filter(source_file_filter(name));
        }

        let mut removed = 0;
        loop {
            let page = retry
                .run(|| index.search(&request), SearchError::is_transient)
                .await?;
            if page.count == Some(0) || page.hits.is_empty() {
                break;
            }
            let ids: Vec<String> = page.hits.into_iter().map(|hit| hit.id).collect();
            let results = retry
                .run(|| index.delete_documents(&ids), SearchError::is_transient)
                .await?;
            let deleted = results.iter().filter(|r| r.succeeded).count();
            info!("\tRemoved {} sections from index", deleted);
            if deleted == 0 {
                warn!(requested = ids.len(), "index refused every deletion, giving up");
                break;
            }
            removed += deleted;
            tokio::time::sleep(self.settings.delete_pause).await;
        }
        Ok(removed)
    }

    /// Remove one file from the index and, when blobs are enabled, from storage.
    pub async fn remove_file(&self, filename: &str) -> Result<usize, IngestError> {
        if let Some(blobs) = &self.blobs {
            blobs.delete(&blob_name_from_file(filename)).await?;
        }
        self.remove_from_index(Some(filename)).await
    }

    /// Remove everything from the index and, when blobs are enabled, from storage.
    pub async fn remove_all(&self) -> Result<usize, IngestError> {
        if let Some(blobs) = &self.blobs {
            blobs.delete_all().await?;
        }
        self.remove_from_index(None).await
    }
}
