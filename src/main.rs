mod repl;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use zerthia_core::config::{Config, ProviderKind};
use zerthia_core::context::{DEFAULT_GREETING, persona_prompt};
use zerthia_core::{Assistant, QueryRouter, Session};
use zerthia_documents::{
    DocumentRetriever, InMemoryVectorIndex, IngestionPipeline, SplitterConfig, TextSplitter,
};
use zerthia_llm::any::AnyProvider;
use zerthia_llm::ollama::OllamaProvider;
use zerthia_llm::openai::OpenAiProvider;
use zerthia_search::{TavilyProvider, WebSearchClient};

#[derive(Parser)]
#[command(
    name = "zerthia",
    version,
    about = "Conversational assistant that answers from uploaded documents, web search, or the model itself"
)]
struct Cli {
    /// Path to configuration file (TOML). Missing files fall back to defaults.
    #[arg(long, default_value = "config/default.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_subscriber();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    config.validate()?;

    let provider = create_chat_provider(&config)?;
    let embedder = create_embedding_provider(&config)?;
    if let AnyProvider::Ollama(ollama) = &embedder
        && let Err(e) = ollama.health_check().await
    {
        tracing::warn!("embedding backend unavailable, document uploads will fail: {e}");
    }

    let persona = persona_prompt(&config.agent.name, chrono::Local::now().date_naive());
    let assistant = Assistant::new(provider, persona)
        .with_router(QueryRouter::new(config.router.small_corpus_threshold))
        .with_retriever(DocumentRetriever::new(
            config.documents.top_k,
            config.documents.fallback_preview_chars,
        ))
        .with_search(create_search_client(&config)?);

    let pipeline = create_pipeline(&config);
    let greeting = config
        .agent
        .greeting
        .clone()
        .unwrap_or_else(|| DEFAULT_GREETING.to_owned());
    let session = Session::new(
        Box::new(InMemoryVectorIndex::new(embedder.embed_fn())),
        greeting,
    );

    tracing::info!(
        chat = config.llm.provider.as_str(),
        model = %config.llm.model,
        embeddings = config.embeddings.provider.as_str(),
        web_search = config.search.enabled,
        "zerthia ready"
    );
    repl::run(&config.agent.name, &assistant, &pipeline, session).await
}

fn init_subscriber() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn create_chat_provider(config: &Config) -> anyhow::Result<AnyProvider> {
    let llm = &config.llm;
    match llm.provider {
        ProviderKind::Ollama => Ok(AnyProvider::Ollama(OllamaProvider::new(
            &llm.base_url,
            llm.model.clone(),
            config.embeddings.model.clone(),
        ))),
        ProviderKind::OpenAi => {
            let api_key = config
                .secrets
                .llm_api_key
                .as_ref()
                .context("ZERTHIA_LLM_API_KEY not found")?;
            Ok(AnyProvider::OpenAi(OpenAiProvider::new(
                api_key.expose().to_owned(),
                llm.base_url.clone(),
                llm.model.clone(),
                llm.max_tokens,
                None,
            )))
        }
    }
}

fn create_embedding_provider(config: &Config) -> anyhow::Result<AnyProvider> {
    let embeddings = &config.embeddings;
    match embeddings.provider {
        ProviderKind::Ollama => Ok(AnyProvider::Ollama(OllamaProvider::new(
            &embeddings.base_url,
            embeddings.model.clone(),
            embeddings.model.clone(),
        ))),
        ProviderKind::OpenAi => {
            let api_key = config
                .secrets
                .embeddings_api_key
                .as_ref()
                .context("ZERTHIA_EMBEDDINGS_API_KEY not found")?;
            Ok(AnyProvider::OpenAi(OpenAiProvider::new(
                api_key.expose().to_owned(),
                embeddings.base_url.clone(),
                embeddings.model.clone(),
                config.llm.max_tokens,
                Some(embeddings.model.clone()),
            )))
        }
    }
}

fn create_search_client(config: &Config) -> anyhow::Result<WebSearchClient> {
    let search = &config.search;
    if !search.enabled {
        tracing::info!("web search disabled by config");
        return Ok(WebSearchClient::disabled());
    }
    let Some(api_key) = config.secrets.tavily_api_key.as_ref() else {
        tracing::warn!("ZERTHIA_TAVILY_API_KEY not set, web search disabled");
        return Ok(WebSearchClient::disabled());
    };

    let provider = TavilyProvider::new(
        api_key.expose(),
        Duration::from_secs(search.timeout_secs),
    )
    .context("failed to build web search client")?
    .with_base_url(search.base_url.clone());

    Ok(WebSearchClient::new(Box::new(provider))
        .with_depth(search.depth)
        .with_max_results(search.max_results))
}

fn create_pipeline(config: &Config) -> IngestionPipeline {
    let docs = &config.documents;
    let splitter = TextSplitter::new(SplitterConfig {
        chunk_size: docs.chunk_size,
        chunk_overlap: docs.chunk_overlap,
        sentence_aware: true,
    });
    IngestionPipeline::new(splitter).with_max_file_size(docs.max_file_size)
}
