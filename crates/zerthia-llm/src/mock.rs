//! Test-only mock LLM provider.

use std::sync::{Arc, Mutex};

use crate::provider::{LlmProvider, Message};

/// Embedding function used when `keyword_embeddings` is set: one dimension per
/// keyword, 1.0 when the lowercased text contains it.
fn keyword_vector(keywords: &[String], text: &str) -> Vec<f32> {
    let lower = text.to_lowercase();
    let mut v: Vec<f32> = keywords
        .iter()
        .map(|k| if lower.contains(k.as_str()) { 1.0 } else { 0.0 })
        .collect();
    // bias term keeps every vector non-zero
    v.push(0.1);
    v
}

#[derive(Debug, Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<String>>>,
    /// Every message list passed to `chat`, in call order.
    pub recorded: Arc<Mutex<Vec<Vec<Message>>>>,
    pub default_response: String,
    pub embedding: Vec<f32>,
    pub keyword_embeddings: Option<Vec<String>>,
    pub supports_embeddings: bool,
    pub fail_chat: bool,
    pub fail_embed: bool,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            recorded: Arc::new(Mutex::new(Vec::new())),
            default_response: "mock response".into(),
            embedding: vec![0.0; 384],
            keyword_embeddings: None,
            supports_embeddings: true,
            fail_chat: false,
            fail_embed: false,
        }
    }
}

impl MockProvider {
    #[must_use]
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_chat: true,
            ..Self::default()
        }
    }

    /// Embed by keyword presence so similarity search ranks deterministically.
    #[must_use]
    pub fn with_keyword_embeddings(mut self, keywords: &[&str]) -> Self {
        self.keyword_embeddings = Some(keywords.iter().map(|k| k.to_lowercase()).collect());
        self
    }

    /// Return `embedding` for every input.
    #[must_use]
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }

    #[must_use]
    pub fn with_failing_embeddings(mut self) -> Self {
        self.fail_embed = true;
        self
    }

    /// Message lists received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.recorded.lock().unwrap().clone()
    }
}

impl LlmProvider for MockProvider {
    async fn chat(&self, messages: &[Message]) -> Result<String, crate::LlmError> {
        self.recorded.lock().unwrap().push(messages.to_vec());
        if self.fail_chat {
            return Err(crate::LlmError::Other("mock LLM error".into()));
        }
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(self.default_response.clone())
        } else {
            Ok(responses.remove(0))
        }
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, crate::LlmError> {
        if !self.supports_embeddings {
            return Err(crate::LlmError::EmbedUnsupported { provider: "mock" });
        }
        if self.fail_embed {
            return Err(crate::LlmError::Other("mock embedding error".into()));
        }
        Ok(match &self.keyword_embeddings {
            Some(keywords) => keyword_vector(keywords, text),
            None => self.embedding.clone(),
        })
    }

    fn supports_embeddings(&self) -> bool {
        self.supports_embeddings
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "mock"
    }
}
