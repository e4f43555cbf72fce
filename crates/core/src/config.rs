use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::DocQaError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Key lookup used to build a [`Config`]. The process environment in production,
/// a map in tests.
type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn env_lookup(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Read a profiled key: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_opt(get: Lookup<'_>, profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = get(&prefixed).filter(|s| !s.is_empty()) {
            return Some(v);
        }
    }
    get(key).filter(|s| !s.is_empty())
}

fn profiled_or(get: Lookup<'_>, profile: &str, key: &str, default: &str) -> String {
    profiled_opt(get, profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_usize(get: Lookup<'_>, profile: &str, key: &str, default: usize) -> usize {
    profiled_opt(get, profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_u64(get: Lookup<'_>, profile: &str, key: &str, default: u64) -> u64 {
    profiled_opt(get, profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_bool(get: Lookup<'_>, profile: &str, key: &str) -> bool {
    matches!(
        profiled_opt(get, profile, key).as_deref().map(str::to_lowercase).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

// ── Top-level config ──────────────────────────────────────────

/// Everything the pipeline and the answering side need, resolved once at startup
/// and handed to each client constructor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub search: SearchConfig,
    pub blob: BlobConfig,
    pub llm: LlmConfig,
    pub ingest: IngestConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `DOCQA_PROFILE`. When set (e.g. `PROD`), every key
    /// is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        Self::from_lookup(&env_lookup)
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup(get: Lookup<'_>) -> Self {
        let profile = get("DOCQA_PROFILE").unwrap_or_default().to_uppercase();
        let p = profile.as_str();
        Self {
            profile: profile.clone(),
            search: SearchConfig::from_lookup(get, p),
            blob: BlobConfig::from_lookup(get, p),
            llm: LlmConfig::from_lookup(get, p),
            ingest: IngestConfig::from_lookup(get, p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  search:  service={}, index={}, key={}",
            self.search.service.as_deref().unwrap_or("(none)"),
            self.search.index,
            redact(&self.search.api_key)
        );
        tracing::info!(
            "  blob:    account={}, container={}, local_dir={}",
            self.blob.account.as_deref().unwrap_or("(none)"),
            self.blob.container,
            self.blob.local_dir.display()
        );
        tracing::info!(
            "  llm:     provider={}, deployment={}",
            self.llm.provider,
            self.llm.azure_deployment.as_deref().unwrap_or("(none)")
        );
        tracing::info!(
            "  ingest:  docs_dir={}, category={}, batch_size={}",
            self.ingest.docs_dir.display(),
            self.ingest.category,
            self.ingest.batch_size
        );
    }
}

fn redact(secret: &Option<String>) -> &'static str {
    if secret.is_some() { "set" } else { "(none)" }
}

// ── Search index ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search service name; the endpoint is `https://{service}.search.windows.net`.
    pub service: Option<String>,
    /// Full endpoint override (emulators, private links).
    pub endpoint: Option<String>,
    pub index: String,
    pub api_key: Option<String>,
}

impl SearchConfig {
    fn from_lookup(get: Lookup<'_>, p: &str) -> Self {
        Self {
            service: profiled_opt(get, p, "SEARCH_SERVICE"),
            endpoint: profiled_opt(get, p, "SEARCH_ENDPOINT"),
            index: profiled_or(get, p, "SEARCH_INDEX", "gptkbindex"),
            api_key: profiled_opt(get, p, "SEARCH_KEY"),
        }
    }

    /// Resolved service endpoint, without a trailing slash.
    pub fn endpoint_url(&self) -> Option<String> {
        if let Some(endpoint) = &self.endpoint {
            return Some(endpoint.trim_end_matches('/').to_string());
        }
        self.service
            .as_ref()
            .map(|s| format!("https://{}.search.windows.net", s))
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint_url().is_some() && self.api_key.is_some()
    }

    pub fn require_endpoint(&self) -> Result<String, DocQaError> {
        self.endpoint_url().ok_or_else(|| {
            DocQaError::NotConfigured("SEARCH_SERVICE or SEARCH_ENDPOINT not set".into())
        })
    }

    pub fn require_api_key(&self) -> Result<&str, DocQaError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| DocQaError::NotConfigured("SEARCH_KEY not set".into()))
    }
}

// ── Blob storage ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobConfig {
    pub account: Option<String>,
    pub access_key: Option<String>,
    pub container: String,
    /// Directory used as the blob container when no storage account is configured.
    pub local_dir: PathBuf,
}

impl BlobConfig {
    fn from_lookup(get: Lookup<'_>, p: &str) -> Self {
        Self {
            account: profiled_opt(get, p, "STORAGE_ACCOUNT"),
            access_key: profiled_opt(get, p, "STORAGE_KEY"),
            container: profiled_or(get, p, "STORAGE_CONTAINER", "chat"),
            local_dir: PathBuf::from(profiled_or(get, p, "BLOB_LOCAL_DIR", "data/blobs")),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.account.is_some() && self.access_key.is_some()
    }
}

// ── LLM (Azure OpenAI / OpenAI) ──────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "azure" or "openai"
    pub provider: String,
    pub azure_endpoint: Option<String>,
    pub azure_api_key: Option<String>,
    pub azure_deployment: Option<String>,
    pub azure_api_version: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
}

impl LlmConfig {
    fn from_lookup(get: Lookup<'_>, p: &str) -> Self {
        Self {
            provider: profiled_or(get, p, "LLM_PROVIDER", "azure"),
            azure_endpoint: profiled_opt(get, p, "AZURE_OPENAI_ENDPOINT"),
            azure_api_key: profiled_opt(get, p, "AZURE_OPENAI_KEY"),
            azure_deployment: profiled_opt(get, p, "AZURE_OPENAI_DEPLOYMENT"),
            azure_api_version: profiled_or(get, p, "AZURE_OPENAI_API_VERSION", "2023-05-15"),
            openai_api_key: profiled_opt(get, p, "OPENAI_API_KEY"),
            openai_model: profiled_or(get, p, "OPENAI_MODEL", "gpt-4"),
            openai_base_url: profiled_opt(get, p, "OPENAI_BASE_URL"),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "azure" => {
                self.azure_endpoint.is_some()
                    && self.azure_api_key.is_some()
                    && self.azure_deployment.is_some()
            }
            "openai" => self.openai_api_key.is_some(),
            _ => false,
        }
    }
}

// ── Ingestion ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    pub docs_dir: PathBuf,
    pub category: String,
    pub verbose: bool,
    /// Documents per index upload request.
    pub batch_size: usize,
    /// Pause between delete rounds while draining a file from the index.
    pub delete_pause_secs: u64,
    pub max_section_length: usize,
    pub sentence_search_limit: usize,
    pub section_overlap: usize,
}

impl IngestConfig {
    fn from_lookup(get: Lookup<'_>, p: &str) -> Self {
        Self {
            docs_dir: PathBuf::from(profiled_or(get, p, "DOCS_DIR", "docs_text_new")),
            category: profiled_or(get, p, "CATEGORY", ""),
            verbose: profiled_bool(get, p, "VERBOSE"),
            batch_size: profiled_usize(get, p, "INDEX_BATCH_SIZE", 1000),
            delete_pause_secs: profiled_u64(get, p, "DELETE_PAUSE_SECS", 2),
            max_section_length: profiled_usize(get, p, "MAX_SECTION_LENGTH", 1000),
            sentence_search_limit: profiled_usize(get, p, "SENTENCE_SEARCH_LIMIT", 100),
            section_overlap: profiled_usize(get, p, "SECTION_OVERLAP", 100),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self::from_lookup(&|_| None, "")
    }
}
