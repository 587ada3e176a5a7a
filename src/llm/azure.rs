//! Azure OpenAI provider.
//!
//! Speaks the deployment-addressed flavor of the OpenAI wire format:
//! `{endpoint}/openai/deployments/{deployment}/...?api-version=...` with an
//! `api-key` header.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::ApiError;
use super::provider::LlmProvider;
use super::types::ChatRequest;

#[derive(Clone)]
pub struct AzureOpenAiProvider {
    endpoint: String,
    api_key: String,
    api_version: String,
    client: Client,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

impl AzureOpenAiProvider {
    pub fn new(
        endpoint: String,
        api_key: String,
        api_version: String,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::internal)?;
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            api_version,
            client,
        })
    }

    fn deployment_url(&self, deployment: &str, operation: &str) -> String {
        format!(
            "{}/openai/deployments/{}/{}?api-version={}",
            self.endpoint, deployment, operation, self.api_version
        )
    }
}

#[async_trait]
impl LlmProvider for AzureOpenAiProvider {
    fn name(&self) -> &str {
        "azure-openai"
    }

    async fn chat(&self, request: ChatRequest, deployment: &str) -> Result<String, ApiError> {
        let url = self.deployment_url(deployment, "chat/completions");

        let mut body = json!({
            "messages": request.messages,
        });
        if let Some(obj) = body.as_object_mut() {
            if let Some(t) = request.temperature {
                obj.insert("temperature".to_string(), json!(t));
            }
            if let Some(t) = request.max_tokens {
                obj.insert("max_tokens".to_string(), json!(t));
            }
        }

        let res = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::upstream)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Upstream(format!(
                "chat completion failed ({}): {}",
                status, text
            )));
        }

        let payload: ChatCompletionResponse = res.json().await.map_err(|e| {
            ApiError::MalformedModelOutput(format!("chat completion response: {}", e))
        })?;

        let content = payload
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                ApiError::MalformedModelOutput("chat completion had no choices".to_string())
            })?;

        Ok(content.trim().to_string())
    }

    async fn embed(
        &self,
        inputs: &[String],
        deployment: &str,
    ) -> Result<Vec<Vec<f32>>, ApiError> {
        let url = self.deployment_url(deployment, "embeddings");

        let res = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .json(&json!({ "input": inputs }))
            .send()
            .await
            .map_err(ApiError::upstream)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Upstream(format!(
                "embedding request failed ({}): {}",
                status, text
            )));
        }

        let payload: EmbeddingResponse = res
            .json()
            .await
            .map_err(|e| ApiError::MalformedModelOutput(format!("embedding response: {}", e)))?;

        Ok(payload.data.into_iter().map(|d| d.embedding).collect())
    }
}
