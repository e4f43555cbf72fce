use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use docqa_core::SectionRecord;

use crate::error::SearchError;

/// A query against the index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    /// Full-text query; empty matches every document.
    pub text: String,
    /// OData filter expression.
    pub filter: Option<String>,
    pub top: usize,
    /// Ask the service for the total match count.
    pub include_total_count: bool,
}

impl SearchRequest {
    pub fn new(text: impl Into<String>, top: usize) -> Self {
        Self {
            text: text.into(),
            top,
            ..Default::default()
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_total_count(mut self) -> Self {
        self.include_total_count = true;
        self
    }
}

/// One matching document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sourcepage: String,
    #[serde(default)]
    pub sourcefile: String,
    #[serde(rename = "@search.score", default)]
    pub score: f64,
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchPage {
    #[serde(rename = "@odata.count")]
    pub count: Option<u64>,
    #[serde(rename = "value", default)]
    pub hits: Vec<SearchHit>,
}

/// Per-document outcome of an upload or delete.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IndexingResult {
    pub key: String,
    #[serde(rename = "status")]
    pub succeeded: bool,
    #[serde(rename = "errorMessage", default)]
    pub error_message: Option<String>,
    #[serde(rename = "statusCode", default)]
    pub status_code: u16,
}

/// The search index operations the pipeline and the answering side rely on.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    fn index_name(&self) -> &str;

    /// Create the index if it does not exist yet. Returns `true` when created.
    async fn ensure_index(&self) -> Result<bool, SearchError>;

    async fn upload_documents(
        &self,
        documents: &[SectionRecord],
    ) -> Result<Vec<IndexingResult>, SearchError>;

    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, SearchError>;

    async fn delete_documents(&self, ids: &[String]) -> Result<Vec<IndexingResult>, SearchError>;
}

/// OData equality filter on a string field. Single quotes in the literal are doubled.
pub fn field_eq_filter(field: &str, value: &str) -> String {
    format!("{} eq '{}'", field, value.replace('\'', "''"))
}

/// OData filter selecting every section of one source file.
pub fn source_file_filter(sourcefile: &str) -> String {
    field_eq_filter("sourcefile", sourcefile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_escapes_single_quotes() {
        assert_eq!(source_file_filter("a.txt"), "sourcefile eq 'a.txt'");
        assert_eq!(source_file_filter("it's.txt"), "sourcefile eq 'it''s.txt'");
    }

    #[test]
    fn field_filter_escapes_any_field_value() {
        assert_eq!(field_eq_filter("category", "bio"), "category eq 'bio'");
        assert_eq!(
            field_eq_filter("category", "o'neil's notes"),
            "category eq 'o''neil''s notes'"
        );
    }

    #[test]
    fn parse_search_page() {
        let page: SearchPage = serde_json::from_value(json!({
            "@odata.count": 2,
            "value": [
                { "@search.score": 1.5, "id": "a_txt-0", "content": "Cells.", "sourcepage": "a.txt", "sourcefile": "a.txt", "category": "bio" },
                { "@search.score": 0.5, "id": "a_txt-1" }
            ]
        }))
        .unwrap();
        assert_eq!(page.count, Some(2));
        assert_eq!(page.hits.len(), 2);
        assert_eq!(page.hits[0].sourcepage, "a.txt");
        assert_eq!(page.hits[1].content, "");
        assert!((page.hits[0].score - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_indexing_results() {
        let results: Vec<IndexingResult> = serde_json::from_value(json!([
            { "key": "a", "status": true, "errorMessage": null, "statusCode": 201 },
            { "key": "b", "status": false, "errorMessage": "too large", "statusCode": 400 }
        ]))
        .unwrap();
        assert!(results[0].succeeded);
        assert_eq!(results[1].error_message.as_deref(), Some("too large"));
        assert_eq!(results[1].status_code, 400);
    }

    #[test]
    fn request_builder() {
        let req = SearchRequest::new("", 1000)
            .with_filter(source_file_filter("a.txt"))
            .with_total_count();
        assert_eq!(req.top, 1000);
        assert!(req.include_total_count);
        assert_eq!(req.filter.as_deref(), Some("sourcefile eq 'a.txt'"));
    }
}
