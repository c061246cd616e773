mod error;

pub use error::AgentError;

use zerthia_documents::{DocumentEvidence, DocumentRetriever};
use zerthia_llm::{LlmProvider, Message};
use zerthia_search::{SearchOutcome, WebSearchClient};

use crate::context::{
    document_instructions, evidence_messages, search_instructions, transcript_messages,
};
use crate::router::{QueryRouter, RouteDecision};
use crate::session::Session;

/// Where the evidence for a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    DocumentSearch,
    WebSearch,
    BaseKnowledge,
}

impl Strategy {
    /// Reasoning note appended to responses that carry none of their own.
    #[must_use]
    pub fn annotation(self) -> &'static str {
        match self {
            Self::DocumentSearch => {
                "\n\n<think>Document search was performed and used to generate this response.</think>"
            }
            Self::WebSearch => {
                "\n\n<think>Web search was performed and used to generate this response.</think>"
            }
            Self::BaseKnowledge => {
                "\n\n<think>No external search was performed. Response generated from base knowledge.</think>"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub strategy: Strategy,
    pub decision: RouteDecision,
    /// Final response text, as appended to the transcript.
    pub response: String,
    /// Why web search was skipped over after being requested.
    pub web_failure: Option<String>,
}

pub struct Assistant<P: LlmProvider> {
    provider: P,
    router: QueryRouter,
    retriever: DocumentRetriever,
    search: WebSearchClient,
    persona: String,
}

impl<P: LlmProvider> Assistant<P> {
    #[must_use]
    pub fn new(provider: P, persona: impl Into<String>) -> Self {
        Self {
            provider,
            router: QueryRouter::default(),
            retriever: DocumentRetriever::default(),
            search: WebSearchClient::disabled(),
            persona: persona.into(),
        }
    }

    #[must_use]
    pub fn with_router(mut self, router: QueryRouter) -> Self {
        self.router = router;
        self
    }

    #[must_use]
    pub fn with_retriever(mut self, retriever: DocumentRetriever) -> Self {
        self.retriever = retriever;
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: WebSearchClient) -> Self {
        self.search = search;
        self
    }

    /// Answer the session's pending query, if any.
    ///
    /// Documents are consulted first whenever the session has any, then web
    /// search when the router asks for it, then the model alone with the full
    /// transcript. The processing flag is cleared on every path.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Llm`] if generation fails; the transcript is left
    /// unchanged in that case.
    pub async fn process_turn(
        &self,
        session: &mut Session,
    ) -> Result<Option<TurnOutcome>, AgentError> {
        let result = self.respond(session).await;
        session.finish_processing();
        result
    }

    async fn respond(&self, session: &mut Session) -> Result<Option<TurnOutcome>, AgentError> {
        let Some(query) = session.active_query().map(str::to_owned) else {
            return Ok(None);
        };

        let decision =
            self.router
                .route(&query, session.has_documents(), session.document_count());

        let mut prepared: Option<(Strategy, Vec<Message>)> = None;
        let mut web_failure = None;

        if session.has_documents() {
            match self
                .retriever
                .query(session.index(), session.store(), &query)
                .await
            {
                DocumentEvidence::Found(evidence) => {
                    prepared = Some((
                        Strategy::DocumentSearch,
                        evidence_messages(&self.persona, document_instructions(&evidence), &query),
                    ));
                }
                other => tracing::debug!("document search gave no evidence: {other}"),
            }
        }

        if prepared.is_none() && decision.use_web {
            match self.search.search(&query).await {
                SearchOutcome::Found(evidence) => {
                    prepared = Some((
                        Strategy::WebSearch,
                        evidence_messages(&self.persona, search_instructions(&evidence), &query),
                    ));
                }
                SearchOutcome::Empty => {
                    tracing::info!("web search returned no results, answering from base knowledge");
                    web_failure = Some("no results found".to_owned());
                }
                SearchOutcome::Failed(reason) => {
                    tracing::warn!("web search unavailable, answering from base knowledge: {reason}");
                    web_failure = Some(reason);
                }
            }
        }

        let (strategy, messages) = prepared.unwrap_or_else(|| {
            (
                Strategy::BaseKnowledge,
                transcript_messages(&self.persona, session.transcript()),
            )
        });

        let mut response = self.provider.chat(&messages).await?;
        if !response.contains("<think>") {
            response.push_str(strategy.annotation());
        }
        tracing::debug!(
            ?strategy,
            provider = self.provider.name(),
            "response generated"
        );

        session.record_response(response.clone());
        Ok(Some(TurnOutcome {
            strategy,
            decision,
            response,
            web_failure,
        }))
    }
}
