use super::{Config, Secret};

/// First non-empty value among `keys`, in order.
fn first_var(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| std::env::var(key).ok())
        .map(|v| v.trim().to_owned())
        .find(|v| !v.is_empty())
}

impl Config {
    pub(crate) fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_core();
        self.apply_env_overrides_documents();
        self.apply_env_overrides_search();
        self.resolve_secrets();
    }

    fn apply_env_overrides_core(&mut self) {
        if let Ok(v) = std::env::var("ZERTHIA_AGENT_NAME") {
            self.agent.name = v;
        }
        if let Ok(v) = std::env::var("ZERTHIA_LLM_PROVIDER") {
            if let Ok(kind) = serde_json::from_value(serde_json::Value::String(v.clone())) {
                self.llm.provider = kind;
            } else {
                tracing::warn!("ignoring invalid ZERTHIA_LLM_PROVIDER value: {v}");
            }
        }
        if let Ok(v) = std::env::var("ZERTHIA_LLM_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Ok(v) = std::env::var("ZERTHIA_LLM_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = std::env::var("ZERTHIA_LLM_MAX_TOKENS")
            && let Ok(n) = v.parse::<u32>()
        {
            self.llm.max_tokens = n;
        }
        if let Ok(v) = std::env::var("ZERTHIA_EMBEDDINGS_PROVIDER") {
            if let Ok(kind) = serde_json::from_value(serde_json::Value::String(v.clone())) {
                self.embeddings.provider = kind;
            } else {
                tracing::warn!("ignoring invalid ZERTHIA_EMBEDDINGS_PROVIDER value: {v}");
            }
        }
        if let Ok(v) = std::env::var("ZERTHIA_EMBEDDINGS_BASE_URL") {
            self.embeddings.base_url = v;
        }
        if let Ok(v) = std::env::var("ZERTHIA_EMBEDDINGS_MODEL") {
            self.embeddings.model = v;
        }
    }

    fn apply_env_overrides_documents(&mut self) {
        if let Ok(v) = std::env::var("ZERTHIA_DOCUMENTS_CHUNK_SIZE")
            && let Ok(n) = v.parse::<usize>()
        {
            self.documents.chunk_size = n;
        }
        if let Ok(v) = std::env::var("ZERTHIA_DOCUMENTS_CHUNK_OVERLAP")
            && let Ok(n) = v.parse::<usize>()
        {
            self.documents.chunk_overlap = n;
        }
        if let Ok(v) = std::env::var("ZERTHIA_DOCUMENTS_TOP_K")
            && let Ok(n) = v.parse::<usize>()
        {
            self.documents.top_k = n;
        }
        if let Ok(v) = std::env::var("ZERTHIA_DOCUMENTS_MAX_FILE_SIZE")
            && let Ok(bytes) = v.parse::<u64>()
        {
            self.documents.max_file_size = bytes;
        }
        if let Ok(v) = std::env::var("ZERTHIA_ROUTER_SMALL_CORPUS_THRESHOLD")
            && let Ok(n) = v.parse::<usize>()
        {
            self.router.small_corpus_threshold = n;
        }
    }

    fn apply_env_overrides_search(&mut self) {
        if let Ok(v) = std::env::var("ZERTHIA_SEARCH_ENABLED")
            && let Ok(enabled) = v.parse::<bool>()
        {
            self.search.enabled = enabled;
        }
        if let Ok(v) = std::env::var("ZERTHIA_SEARCH_BASE_URL") {
            self.search.base_url = v;
        }
        if let Ok(v) = std::env::var("ZERTHIA_SEARCH_MAX_RESULTS")
            && let Ok(n) = v.parse::<usize>()
        {
            self.search.max_results = n;
        }
        if let Ok(v) = std::env::var("ZERTHIA_SEARCH_DEPTH") {
            if let Ok(depth) = serde_json::from_value(serde_json::Value::String(v.clone())) {
                self.search.depth = depth;
            } else {
                tracing::warn!("ignoring invalid ZERTHIA_SEARCH_DEPTH value: {v}");
            }
        }
        if let Ok(v) = std::env::var("ZERTHIA_SEARCH_TIMEOUT")
            && let Ok(secs) = v.parse::<u64>()
        {
            self.search.timeout_secs = secs;
        }
    }

    fn resolve_secrets(&mut self) {
        self.secrets.llm_api_key =
            first_var(&["ZERTHIA_LLM_API_KEY", "GROQ_API_KEY", "OPENAI_API_KEY"]).map(Secret::new);
        self.secrets.embeddings_api_key =
            first_var(&["ZERTHIA_EMBEDDINGS_API_KEY", "OPENAI_API_KEY"]).map(Secret::new);
        self.secrets.tavily_api_key =
            first_var(&["ZERTHIA_TAVILY_API_KEY", "TAVILY_API_KEY"]).map(Secret::new);
    }
}
