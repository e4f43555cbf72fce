//! Question answering over the search index.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use docqa_search::{SearchError, SearchIndex, SearchRequest};

use crate::prompt::{create_prompt, format_context, SYSTEM_PROMPT};
use crate::provider::{CompletionOptions, LlmError, LlmProvider, Message};

/// Number of sections retrieved per question unless overridden.
pub const DEFAULT_TOP: usize = 3;

/// Retrieves sections for a question and asks the LLM to answer from them.
pub struct Answerer {
    index: Arc<dyn SearchIndex>,
    provider: Box<dyn LlmProvider>,
    options: CompletionOptions,
    top: usize,
    filter: Option<String>,
}

impl Answerer {
    pub fn new(index: Arc<dyn SearchIndex>, provider: Box<dyn LlmProvider>) -> Self {
        Self {
            index,
            provider,
            options: CompletionOptions::default(),
            top: DEFAULT_TOP,
            filter: None,
        }
    }

    pub fn with_top(mut self, top: usize) -> Self {
        self.top = top.max(1);
        self
    }

    /// Restrict retrieval with an OData filter.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn ask(&self, question: &str) -> Result<Answer, AnswerError> {
        let mut request = SearchRequest::new(question, self.top);
        if let Some(filter) = &self.filter {
            request = request.with_filter(filter.clone());
        }
        let page = self.index.search(&request).await?;
        info!("Retrieved {} sections for question", page.hits.len());

        let context = format_context(&page.hits);
        let messages = [
            Message::system(SYSTEM_PROMPT),
            Message::user(create_prompt(&context, question)),
        ];
        let text = self.provider.complete(&messages, &self.options).await?;
        debug!("LLM response: {}", text);

        let mut sources: Vec<String> = Vec::new();
        for hit in page.hits {
            if !sources.contains(&hit.sourcepage) {
                sources.push(hit.sourcepage);
            }
        }
        Ok(Answer { text, sources })
    }
}

/// An answer and the source pages it was grounded on, in retrieval order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    #[error("search error: {0}")]
    Search(#[from] SearchError),
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use docqa_core::SectionRecord;
    use docqa_search::{IndexingResult, SearchHit, SearchPage};

    struct FakeIndex {
        hits: Vec<SearchHit>,
        requests: Mutex<Vec<SearchRequest>>,
    }

    #[async_trait]
    impl SearchIndex for FakeIndex {
        fn index_name(&self) -> &str {
            "fake"
        }

        async fn ensure_index(&self) -> Result<bool, SearchError> {
            Ok(false)
        }

        async fn upload_documents(
            &self,
            _documents: &[SectionRecord],
        ) -> Result<Vec<IndexingResult>, SearchError> {
            Ok(Vec::new())
        }

        async fn search(&self, request: &SearchRequest) -> Result<SearchPage, SearchError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(SearchPage {
                count: None,
                hits: self.hits.iter().take(request.top).cloned().collect(),
            })
        }

        async fn delete_documents(
            &self,
            _ids: &[String],
        ) -> Result<Vec<IndexingResult>, SearchError> {
            Ok(Vec::new())
        }
    }

    /// Records the conversation and replies with a fixed answer.
    struct FakeProvider {
        reply: Result<String, u16>,
        seen: Arc<Mutex<Vec<Message>>>,
    }

    #[async_trait]
    impl LlmProvider for FakeProvider {
        async fn complete(
            &self,
            messages: &[Message],
            _options: &CompletionOptions,
        ) -> Result<String, LlmError> {
            self.seen.lock().unwrap().extend_from_slice(messages);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::ApiError {
                    status: *status,
                    body: "rate limited".into(),
                }),
            }
        }
    }

    fn hit(sourcepage: &str, content: &str) -> SearchHit {
        SearchHit {
            id: format!("{sourcepage}-0"),
            content: content.to_string(),
            category: String::new(),
            sourcepage: sourcepage.to_string(),
            sourcefile: sourcepage.to_string(),
            score: 1.0,
        }
    }

    fn answerer(hits: Vec<SearchHit>, reply: Result<String, u16>) -> (Answerer, Arc<FakeIndex>, Arc<Mutex<Vec<Message>>>) {
        let index = Arc::new(FakeIndex {
            hits,
            requests: Mutex::new(Vec::new()),
        });
        let seen = Arc::new(Mutex::new(Vec::new()));
        let provider = FakeProvider {
            reply,
            seen: seen.clone(),
        };
        (Answerer::new(index.clone(), Box::new(provider)), index, seen)
    }

    #[tokio::test]
    async fn answer_is_grounded_on_retrieved_sections() {
        let hits = vec![
            hit("cells.txt", "Cells divide often."),
            hit("tissue.txt", "Tissues are groups of cells."),
            hit("cells.txt", "Cells are small."),
        ];
        let (answerer, index, seen) = answerer(hits, Ok("Yes [cells.txt].".into()));

        let answer = answerer.ask("Do cells divide?").await.unwrap();
        assert_eq!(answer.text, "Yes [cells.txt].");
        assert_eq!(answer.sources, vec!["cells.txt", "tissue.txt"]);

        let requests = index.requests.lock().unwrap();
        assert_eq!(requests[0].text, "Do cells divide?");
        assert_eq!(requests[0].top, DEFAULT_TOP);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].content, SYSTEM_PROMPT);
        assert_eq!(
            seen[1].content,
            "cells.txt: Cells divide often.\n\
             tissue.txt: Tissues are groups of cells.\n\
             cells.txt: Cells are small.\n\nDo cells divide?\n"
        );
    }

    #[tokio::test]
    async fn top_and_filter_shape_the_search() {
        let hits = vec![hit("a.txt", "A."), hit("b.txt", "B.")];
        let (answerer, index, _) = answerer(hits, Ok("ok".into()));
        let answerer = answerer.with_top(1).with_filter("category eq 'bio'");

        let answer = answerer.ask("q").await.unwrap();
        assert_eq!(answer.sources, vec!["a.txt"]);
        let requests = index.requests.lock().unwrap();
        assert_eq!(requests[0].top, 1);
        assert_eq!(requests[0].filter.as_deref(), Some("category eq 'bio'"));
    }

    #[tokio::test]
    async fn provider_failure_surfaces_as_llm_error() {
        let (answerer, _, _) = answerer(vec![hit("a.txt", "A.")], Err(429));
        let err = answerer.ask("q").await.unwrap_err();
        assert!(matches!(err, AnswerError::Llm(LlmError::ApiError { status: 429, .. })));
    }
}
