use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search API error: {status}: {body}")]
    Api { status: u16, body: String },

    #[error("search API rejected credentials ({status})")]
    Unauthorized { status: u16 },

    #[error("failed to parse search response: {0}")]
    Parse(String),

    #[error("not configured: {0}")]
    NotConfigured(#[from] docqa_core::DocQaError),
}

impl SearchError {
    /// Map a non-success HTTP status to an error.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => SearchError::Unauthorized { status },
            _ => SearchError::Api { status, body },
        }
    }

    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            SearchError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            SearchError::Api { status, .. } => *status == 429 || *status >= 500,
            SearchError::Unauthorized { .. }
            | SearchError::Parse(_)
            | SearchError::NotConfigured(_) => false,
        }
    }
}
