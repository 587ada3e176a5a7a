//! Azure AI Search REST client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::errors::ApiError;
use super::types::{IndexedSegment, SegmentHit};
use super::SegmentIndex;

/// Dimensionality of the declared vector field (text-embedding-3-large).
const VECTOR_DIMENSIONS: u32 = 3072;

#[derive(Clone)]
pub struct AzureSearchIndex {
    endpoint: String,
    api_key: String,
    index_name: String,
    api_version: String,
    client: Client,
}

#[derive(Deserialize)]
struct SearchResponse {
    value: Vec<SearchDocument>,
}

#[derive(Deserialize)]
struct SearchDocument {
    #[serde(rename = "@search.score", default)]
    score: f64,
    #[serde(default)]
    content: String,
    #[serde(default)]
    source: Option<String>,
}

impl AzureSearchIndex {
    pub fn new(
        endpoint: String,
        api_key: String,
        index_name: String,
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
            index_name,
            api_version,
            client,
        })
    }

    fn index_url(&self, suffix: &str) -> String {
        format!(
            "{}/indexes/{}{}?api-version={}",
            self.endpoint, self.index_name, suffix, self.api_version
        )
    }

    /// Fixed schema: string key, searchable content, source name, and a
    /// declared vector field served by the service's HNSW profile.
    fn index_definition(&self) -> Value {
        json!({
            "name": self.index_name,
            "fields": [
                { "name": "id", "type": "Edm.String", "key": true, "filterable": true },
                { "name": "content", "type": "Edm.String", "searchable": true, "analyzer": "en.lucene" },
                { "name": "source", "type": "Edm.String", "filterable": true },
                {
                    "name": "content_vector",
                    "type": "Collection(Edm.Single)",
                    "searchable": true,
                    "dimensions": VECTOR_DIMENSIONS,
                    "vectorSearchProfile": "default-profile"
                }
            ],
            "vectorSearch": {
                "algorithms": [ { "name": "default-hnsw", "kind": "hnsw" } ],
                "profiles": [ { "name": "default-profile", "algorithm": "default-hnsw" } ]
            }
        })
    }
}

#[async_trait]
impl SegmentIndex for AzureSearchIndex {
    async fn ensure_index(&self) -> Result<bool, ApiError> {
        let res = self
            .client
            .get(self.index_url(""))
            .header("api-key", &self.api_key)
            .send()
            .await
            .map_err(ApiError::upstream)?;

        match res.status() {
            status if status.is_success() => {
                tracing::info!("search index '{}' already exists", self.index_name);
                return Ok(false);
            }
            StatusCode::NOT_FOUND => {}
            status => {
                let text = res.text().await.unwrap_or_default();
                return Err(ApiError::Upstream(format!(
                    "index lookup failed ({}): {}",
                    status, text
                )));
            }
        }

        let res = self
            .client
            .put(self.index_url(""))
            .header("api-key", &self.api_key)
            .json(&self.index_definition())
            .send()
            .await
            .map_err(ApiError::upstream)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Upstream(format!(
                "index creation failed ({}): {}",
                status, text
            )));
        }

        tracing::info!("created search index '{}' with vector field", self.index_name);
        Ok(true)
    }

    async fn upload(&self, segments: Vec<IndexedSegment>) -> Result<usize, ApiError> {
        if segments.is_empty() {
            return Ok(0);
        }
        let count = segments.len();

        let actions: Vec<Value> = segments
            .into_iter()
            .map(|segment| {
                json!({
                    "@search.action": "upload",
                    "id": segment.id,
                    "content": segment.content,
                    "source": segment.source,
                })
            })
            .collect();

        let res = self
            .client
            .post(self.index_url("/docs/search.index"))
            .header("api-key", &self.api_key)
            .json(&json!({ "value": actions }))
            .send()
            .await
            .map_err(ApiError::upstream)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Upstream(format!(
                "segment upload failed ({}): {}",
                status, text
            )));
        }

        Ok(count)
    }

    async fn search(&self, query: &str, top: usize) -> Result<Vec<SegmentHit>, ApiError> {
        let res = self
            .client
            .post(self.index_url("/docs/search"))
            .header("api-key", &self.api_key)
            .json(&json!({ "search": query, "top": top }))
            .send()
            .await
            .map_err(ApiError::upstream)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Upstream(format!(
                "index query failed ({}): {}",
                status, text
            )));
        }

        let payload: SearchResponse = res
            .json()
            .await
            .map_err(|e| ApiError::Upstream(format!("index query response: {}", e)))?;

        Ok(payload
            .value
            .into_iter()
            .map(|doc| SegmentHit {
                content: doc.content,
                source: doc.source.unwrap_or_else(|| "Unnamed Policy".to_string()),
                score: doc.score,
            })
            .collect())
    }
}
