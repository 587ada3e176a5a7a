//! Environment-driven service configuration.
//!
//! Every external collaborator (search index, chat completion, web search,
//! speech-to-text) is addressed through values loaded here once at startup.
//! A `.env` file is honored for local development.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Settings {
    /// Bind address for the HTTP server.
    pub host: String,
    pub port: u16,

    /// Hosted search index (Azure AI Search).
    pub search_endpoint: String,
    pub search_api_key: String,
    pub search_index_name: String,
    pub search_api_version: String,

    /// Hosted chat completion / embedding service (Azure OpenAI).
    pub openai_endpoint: String,
    pub openai_api_key: String,
    pub openai_api_version: String,
    /// Deployment used for knowledge-base synthesis and classification.
    pub chat_deployment: String,
    /// Deployment used for web-result summarization.
    pub web_deployment: String,

    /// Hosted web search (Tavily).
    pub tavily_api_key: String,

    /// Hosted speech-to-text. Voice input is disabled when unset.
    pub speech_key: Option<String>,
    pub speech_region: Option<String>,

    /// Directory of source policy documents to ingest.
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,

    /// Per-request timeout applied to every collaborator call.
    pub request_timeout_secs: u64,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            host: env_string("HOST", "127.0.0.1"),
            port: env_parse("PORT", 8080),
            search_endpoint: env_required("AZURE_SEARCH_ENDPOINT")?,
            search_api_key: env_required("AZURE_SEARCH_KEY")?,
            search_index_name: env_string("AZURE_SEARCH_INDEX", "policy-chunks"),
            search_api_version: env_string("AZURE_SEARCH_API_VERSION", "2024-07-01"),
            openai_endpoint: env_required("AZURE_OPENAI_ENDPOINT")?,
            openai_api_key: env_required("AZURE_OPENAI_API_KEY")?,
            openai_api_version: env_string("AZURE_OPENAI_API_VERSION", "2024-02-15-preview"),
            chat_deployment: env_string("AZURE_OPENAI_DEPLOYMENT_NAME", "gpt-4o"),
            web_deployment: env_string("AZURE_OPENAI_WEB_DEPLOYMENT_NAME", "gpt-35-turbo"),
            tavily_api_key: env_required("TAVILY_API_KEY")?,
            speech_key: env::var("AZURE_SPEECH_KEY").ok().filter(|v| !v.is_empty()),
            speech_region: env::var("AZURE_REGION").ok().filter(|v| !v.is_empty()),
            data_dir: PathBuf::from(env_string("DATA_DIR", "data")),
            log_dir: PathBuf::from(env_string("LOG_DIR", "logs")),
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", 30),
        })
    }
}

fn env_required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("{name} is not set"))
}

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<T>().ok())
        .unwrap_or(default)
}
