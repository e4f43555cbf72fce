use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use docqa_core::config::SearchConfig;
use docqa_core::SectionRecord;

use crate::error::SearchError;
use crate::schema::index_definition;
use crate::types::{IndexingResult, SearchIndex, SearchPage, SearchRequest};

pub const API_VERSION: &str = "2023-11-01";

/// Azure AI Search over its REST API.
pub struct AzureSearchClient {
    client: Client,
    endpoint: String,
    index: String,
    api_key: String,
}

impl AzureSearchClient {
    pub fn new(endpoint: String, index: String, api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_else(|_| Client::new()),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            index,
            api_key,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        let endpoint = config.require_endpoint()?;
        let api_key = config.require_api_key()?.to_string();
        Ok(Self::new(endpoint, config.index.clone(), api_key))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}?api-version={}", self.endpoint, path, API_VERSION)
    }

    fn docs_url(&self, op: &str) -> String {
        self.url(&format!("indexes/{}/docs/{}", self.index, op))
    }

    async fn post(&self, url: &str, body: &Value) -> Result<Response, SearchError> {
        debug!("Search request to {}", url);
        let response = self
            .client
            .post(url)
            .header("api-key", &self.api_key)
            .json(body)
            .send()
            .await?;
        check_status(response).await
    }

    async fn list_index_names(&self) -> Result<Vec<String>, SearchError> {
        #[derive(Deserialize)]
        struct IndexName {
            name: String,
        }
        #[derive(Deserialize)]
        struct IndexList {
            value: Vec<IndexName>,
        }

        let url = format!("{}&$select=name", self.url("indexes"));
        let response = self
            .client
            .get(&url)
            .header("api-key", &self.api_key)
            .send()
            .await?;
        let list: IndexList = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;
        Ok(list.value.into_iter().map(|i| i.name).collect())
    }

    async fn index_batch(&self, body: Value) -> Result<Vec<IndexingResult>, SearchError> {
        #[derive(Deserialize)]
        struct BatchResponse {
            value: Vec<IndexingResult>,
        }

        let response = self.post(&self.docs_url("index"), &body).await?;
        let parsed: BatchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;
        Ok(parsed.value)
    }
}

/// Pass through 2xx responses (207 included: per-document failures are
/// reported in the body), turn everything else into a `SearchError`.
async fn check_status(response: Response) -> Result<Response, SearchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SearchError::from_status(status.as_u16(), body))
}

fn upload_body(documents: &[SectionRecord]) -> Result<Value, SearchError> {
    let value = documents
        .iter()
        .map(|doc| {
            let mut v = serde_json::to_value(doc).map_err(|e| SearchError::Parse(e.to_string()))?;
            v["@search.action"] = json!("upload");
            Ok(v)
        })
        .collect::<Result<Vec<_>, SearchError>>()?;
    Ok(json!({ "value": value }))
}

fn delete_body(ids: &[String]) -> Value {
    let value: Vec<Value> = ids
        .iter()
        .map(|id| json!({ "@search.action": "delete", "id": id }))
        .collect();
    json!({ "value": value })
}

fn search_body(request: &SearchRequest) -> Value {
    let text = if request.text.trim().is_empty() { "*" } else { request.text.as_str() };
    let mut body = json!({
        "search": text,
        "top": request.top,
        "count": request.include_total_count,
    });
    if let Some(filter) = &request.filter {
        body["filter"] = json!(filter);
    }
    body
}

#[async_trait]
impl SearchIndex for AzureSearchClient {
    fn index_name(&self) -> &str {
        &self.index
    }

    async fn ensure_index(&self) -> Result<bool, SearchError> {
        if self.list_index_names().await?.iter().any(|n| n == &self.index) {
            return Ok(false);
        }
        debug!("Creating {} search index", self.index);
        self.post(&self.url("indexes"), &index_definition(&self.index))
            .await?;
        Ok(true)
    }

    async fn upload_documents(
        &self,
        documents: &[SectionRecord],
    ) -> Result<Vec<IndexingResult>, SearchError> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }
        self.index_batch(upload_body(documents)?).await
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, SearchError> {
        let response = self.post(&self.docs_url("search"), &search_body(request)).await?;
        response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))
    }

    async fn delete_documents(&self, ids: &[String]) -> Result<Vec<IndexingResult>, SearchError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.index_batch(delete_body(ids)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_core::DocQaError;

    fn client() -> AzureSearchClient {
        AzureSearchClient::new(
            "https://acme.search.windows.net/".into(),
            "gptkbindex".into(),
            "secret".into(),
        )
    }

    #[test]
    fn urls_carry_api_version() {
        let c = client();
        assert_eq!(
            c.docs_url("index"),
            "https://acme.search.windows.net/indexes/gptkbindex/docs/index?api-version=2023-11-01"
        );
        assert_eq!(
            c.url("indexes"),
            "https://acme.search.windows.net/indexes?api-version=2023-11-01"
        );
    }

    #[test]
    fn upload_body_tags_each_document() {
        let docs = vec![
            SectionRecord::new("a.txt", 0, "one", "c"),
            SectionRecord::new("a.txt", 1, "two", "c"),
        ];
        let body = upload_body(&docs).unwrap();
        let value = body["value"].as_array().unwrap();
        assert_eq!(value.len(), 2);
        assert_eq!(value[0]["@search.action"], "upload");
        assert_eq!(value[1]["id"], "a_txt-1");
        assert_eq!(value[1]["content"], "two");
    }

    #[test]
    fn delete_body_only_sends_keys() {
        let body = delete_body(&["a_txt-0".to_string()]);
        assert_eq!(
            body,
            json!({ "value": [{ "@search.action": "delete", "id": "a_txt-0" }] })
        );
    }

    #[test]
    fn empty_search_text_matches_everything() {
        let body = search_body(&SearchRequest::new("", 1000).with_total_count());
        assert_eq!(body["search"], "*");
        assert_eq!(body["top"], 1000);
        assert_eq!(body["count"], true);
        assert!(body.get("filter").is_none());

        let body = search_body(&SearchRequest::new("mitosis", 3).with_filter("sourcefile eq 'a.txt'"));
        assert_eq!(body["search"], "mitosis");
        assert_eq!(body["filter"], "sourcefile eq 'a.txt'");
    }

    #[test]
    fn from_config_requires_endpoint_and_key() {
        let config = SearchConfig {
            service: None,
            endpoint: None,
            index: "idx".into(),
            api_key: Some("k".into()),
        };
        let err = AzureSearchClient::from_config(&config).err().unwrap();
        assert!(matches!(err, SearchError::NotConfigured(DocQaError::NotConfigured(_))));

        let config = SearchConfig {
            service: Some("acme".into()),
            ..config
        };
        let c = AzureSearchClient::from_config(&config).unwrap();
        assert_eq!(c.index_name(), "idx");
    }
}
