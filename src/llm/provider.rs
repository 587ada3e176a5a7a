use async_trait::async_trait;

use crate::core::errors::ApiError;
use super::types::ChatRequest;

/// Seam over the hosted chat-completion / embedding service.
///
/// Every call is attempted exactly once; retry policy belongs to the caller
/// (and the system deliberately has none).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// provider name (e.g. "azure-openai")
    fn name(&self) -> &str;

    /// chat completion against a named deployment (non-streaming)
    async fn chat(&self, request: ChatRequest, deployment: &str) -> Result<String, ApiError>;

    /// generate embeddings against a named deployment
    async fn embed(&self, inputs: &[String], deployment: &str)
        -> Result<Vec<Vec<f32>>, ApiError>;
}
