use std::fmt;

use serde::{Deserialize, Serialize};
use zerthia_search::SearchDepth;

/// A secret value that never appears in `Debug` or `Display` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,
    #[serde(default)]
    pub documents: DocumentsConfig,
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(skip)]
    pub secrets: ResolvedSecrets,
}

#[derive(Debug, Default)]
pub struct ResolvedSecrets {
    pub llm_api_key: Option<Secret>,
    pub embeddings_api_key: Option<Secret>,
    pub tavily_api_key: Option<Secret>,
}

fn default_agent_name() -> String {
    "Zerthia".into()
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AgentConfig {
    #[serde(default = "default_agent_name")]
    pub name: String,
    /// Replaces the built-in greeting shown at session start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            greeting: None,
        }
    }
}

/// LLM provider backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Ollama,
    OpenAi,
}

impl ProviderKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAi => "openai",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_llm_base_url() -> String {
    "https://api.groq.com/openai/v1".into()
}

fn default_llm_model() -> String {
    "deepseek-r1-distill-qwen-32b".into()
}

fn default_max_tokens() -> u32 {
    4096
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAi,
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_embeddings_base_url() -> String {
    "http://localhost:11434".into()
}

fn default_embedding_model() -> String {
    "all-minilm".into()
}

/// Embedding backend, configured separately because chat-only hosts
/// (e.g. Groq) expose no embeddings endpoint.
#[derive(Debug, Deserialize, Serialize)]
pub struct EmbeddingsConfig {
    pub provider: ProviderKind,
    #[serde(default = "default_embeddings_base_url")]
    pub base_url: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Ollama,
            base_url: default_embeddings_base_url(),
            model: default_embedding_model(),
        }
    }
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_top_k() -> usize {
    4
}

fn default_preview_chars() -> usize {
    1000
}

fn default_max_file_size() -> u64 {
    zerthia_documents::DEFAULT_MAX_FILE_SIZE
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DocumentsConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_preview_chars")]
    pub fallback_preview_chars: usize,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            top_k: default_top_k(),
            fallback_preview_chars: default_preview_chars(),
            max_file_size: default_max_file_size(),
        }
    }
}

fn default_small_corpus_threshold() -> usize {
    3
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RouterConfig {
    /// With this many uploaded documents or fewer, every query consults them.
    #[serde(default = "default_small_corpus_threshold")]
    pub small_corpus_threshold: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            small_corpus_threshold: default_small_corpus_threshold(),
        }
    }
}

fn default_search_enabled() -> bool {
    true
}

fn default_search_base_url() -> String {
    zerthia_search::tavily::DEFAULT_BASE_URL.into()
}

fn default_max_results() -> usize {
    5
}

fn default_search_timeout() -> u64 {
    30
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_enabled")]
    pub enabled: bool,
    #[serde(default = "default_search_base_url")]
    pub base_url: String,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default)]
    pub depth: SearchDepth,
    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: default_search_enabled(),
            base_url: default_search_base_url(),
            max_results: default_max_results(),
            depth: SearchDepth::default(),
            timeout_secs: default_search_timeout(),
        }
    }
}
