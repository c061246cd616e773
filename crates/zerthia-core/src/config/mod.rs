mod env;
mod types;


pub use types::*;

use std::path::Path;

use anyhow::{Context, bail};

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.fall_back_to_local_embeddings();
        Ok(config)
    }

    /// Switch remote embeddings without a key to the default local Ollama backend,
    /// so a missing key degrades document search instead of refusing to start.
    fn fall_back_to_local_embeddings(&mut self) {
        if self.embeddings.provider == ProviderKind::OpenAi
            && self.secrets.embeddings_api_key.is_none()
        {
            let local = EmbeddingsConfig::default();
            tracing::warn!(
                model = %self.embeddings.model,
                fallback = %local.model,
                "embeddings.provider = \"openai\" has no ZERTHIA_EMBEDDINGS_API_KEY, using local Ollama embeddings"
            );
            self.embeddings = local;
        }
    }

    /// Reject settings the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> anyhow::Result<()> {
        let docs = &self.documents;
        if docs.chunk_size == 0 {
            bail!("documents.chunk_size must be greater than 0");
        }
        if docs.chunk_overlap >= docs.chunk_size {
            bail!(
                "documents.chunk_overlap ({}) must be smaller than documents.chunk_size ({})",
                docs.chunk_overlap,
                docs.chunk_size
            );
        }
        if docs.top_k == 0 {
            bail!("documents.top_k must be greater than 0");
        }
        if self.search.max_results == 0 {
            bail!("search.max_results must be greater than 0");
        }
        if self.llm.provider == ProviderKind::OpenAi && self.secrets.llm_api_key.is_none() {
            bail!("llm.provider = \"openai\" requires ZERTHIA_LLM_API_KEY (or GROQ_API_KEY)");
        }
        Ok(())
    }
}
