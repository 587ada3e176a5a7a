//! Web fallback answerer.
//!
//! Issues a Tavily web search and has the completion service summarize or
//! expand the first result's content, depending on verbosity.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::chat::Verbosity;
use crate::core::errors::ApiError;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};

/// Literal replies for the empty-result conditions.
pub const NO_WEB_RESULTS_REPLY: &str = "No results found from web search.";
pub const EMPTY_CONTENT_REPLY: &str = "The search result did not return valid content.";

const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";
const MAX_RESULTS: usize = 5;

/// One web search result; only `content` feeds the summarizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<WebResult>,
}

/// Seam over the hosted web-search service.
#[async_trait]
pub trait WebSearchApi: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<WebResult>, ApiError>;
}

#[derive(Clone)]
pub struct TavilyClient {
    api_key: String,
    client: Client,
}

impl TavilyClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::internal)?;
        Ok(Self { api_key, client })
    }
}

#[async_trait]
impl WebSearchApi for TavilyClient {
    async fn search(&self, query: &str) -> Result<Vec<WebResult>, ApiError> {
        let body = json!({
            "api_key": self.api_key,
            "query": query,
            "search_depth": "basic",
            "max_results": MAX_RESULTS,
            "include_answer": true,
        });

        let res = self
            .client
            .post(TAVILY_SEARCH_URL)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::upstream)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Upstream(format!(
                "web search failed ({}): {}",
                status, text
            )));
        }

        let payload: TavilyResponse = res
            .json()
            .await
            .map_err(|e| ApiError::Upstream(format!("web search response: {}", e)))?;

        Ok(payload.results)
    }
}

pub struct WebAnswerer {
    search: Arc<dyn WebSearchApi>,
    provider: Arc<dyn LlmProvider>,
    deployment: String,
}

impl WebAnswerer {
    pub fn new(
        search: Arc<dyn WebSearchApi>,
        provider: Arc<dyn LlmProvider>,
        deployment: String,
    ) -> Self {
        Self {
            search,
            provider,
            deployment,
        }
    }

    /// Search the web and reformat the top result. Failures degrade to a
    /// user-visible string embedding the error.
    pub async fn answer(&self, query: &str, verbosity: Verbosity) -> String {
        match self.try_answer(query, verbosity).await {
            Ok(text) => text,
            Err(err) => format!("Error: {}", err),
        }
    }

    async fn try_answer(&self, query: &str, verbosity: Verbosity) -> Result<String, ApiError> {
        tracing::debug!(%query, mode = verbosity.as_str(), "web fallback");

        let results = self.search.search(query).await?;
        let Some(first) = results.into_iter().next() else {
            return Ok(NO_WEB_RESULTS_REPLY.to_string());
        };
        if first.content.is_empty() {
            return Ok(EMPTY_CONTENT_REPLY.to_string());
        }

        let prompt = match verbosity {
            Verbosity::Concise => format!(
                "Summarize the following content in a concise 2-3 sentence answer:\n\n{}",
                first.content
            ),
            Verbosity::Detailed => format!(
                "Expand and elaborate the following content in more detail, aiming for clarity and completeness:\n\n{}",
                first.content
            ),
        };

        let request = ChatRequest::new(vec![
            ChatMessage::system("You are a helpful assistant that reformats web search content."),
            ChatMessage::user(prompt),
        ])
        .with_temperature(0.7);

        self.provider.chat(request, &self.deployment).await
    }
}
