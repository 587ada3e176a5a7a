use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::chat::{ConversationController, SessionStore};
use crate::core::config::Settings;
use crate::index::{AzureSearchIndex, SegmentIndex};
use crate::ingest::chunker::ChunkerConfig;
use crate::ingest::DocumentIngestor;
use crate::llm::{AzureOpenAiProvider, LlmProvider, ResponseClassifier};
use crate::rag::{KnowledgeAnswerer, KnowledgeRetriever};
use crate::speech::SpeechTranscriber;
use crate::websearch::{TavilyClient, WebAnswerer};

/// Global application state shared across all routes.
///
/// Holds the conversation controller (which owns the session store) and the
/// optional speech transcriber; every hosted collaborator lives behind the
/// controller's seams.
pub struct AppState {
    pub settings: Settings,
    pub controller: ConversationController,
    pub transcriber: Option<SpeechTranscriber>,
}

impl AppState {
    /// Wire up every collaborator client and run startup ingestion.
    ///
    /// Ingestion only populates a freshly created index; an existing index is
    /// left untouched so restarts do not duplicate chunks.
    pub async fn initialize(settings: Settings) -> anyhow::Result<Arc<Self>> {
        let timeout = Duration::from_secs(settings.request_timeout_secs);

        let provider: Arc<dyn LlmProvider> = Arc::new(
            AzureOpenAiProvider::new(
                settings.openai_endpoint.clone(),
                settings.openai_api_key.clone(),
                settings.openai_api_version.clone(),
                timeout,
            )
            .context("chat completion client")?,
        );

        let index: Arc<dyn SegmentIndex> = Arc::new(
            AzureSearchIndex::new(
                settings.search_endpoint.clone(),
                settings.search_api_key.clone(),
                settings.search_index_name.clone(),
                settings.search_api_version.clone(),
                timeout,
            )
            .context("search index client")?,
        );

        let ingestor = DocumentIngestor::new(index.clone(), ChunkerConfig::default());
        match ingestor.run_if_index_absent(&settings.data_dir).await {
            Ok(report) if report.documents > 0 => {
                tracing::info!(
                    "ingested {} documents ({} segments, {} skipped)",
                    report.documents,
                    report.segments,
                    report.skipped
                );
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!("startup ingestion failed: {}", err);
            }
        }

        let web_search = Arc::new(
            TavilyClient::new(settings.tavily_api_key.clone(), timeout)
                .context("web search client")?,
        );

        let sessions = Arc::new(SessionStore::new());
        let controller = ConversationController::new(
            sessions,
            KnowledgeAnswerer::new(
                KnowledgeRetriever::new(index),
                provider.clone(),
                settings.chat_deployment.clone(),
            ),
            ResponseClassifier::new(provider.clone(), settings.chat_deployment.clone()),
            WebAnswerer::new(web_search, provider, settings.web_deployment.clone()),
        );

        let transcriber = match (&settings.speech_key, &settings.speech_region) {
            (Some(key), Some(region)) => Some(
                SpeechTranscriber::new(key.clone(), region.clone(), timeout)
                    .context("speech client")?,
            ),
            _ => {
                tracing::info!("speech credentials not set, voice input disabled");
                None
            }
        };

        Ok(Arc::new(AppState {
            settings,
            controller,
            transcriber,
        }))
    }
}
