//! Knowledge retriever.
//!
//! Asks the hosted index for the top-k segments matching a query and labels
//! each by a keyword heuristic. The ranking itself is opaque to us.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::errors::ApiError;
use crate::index::SegmentIndex;

/// Number of segments requested per query.
pub const TOP_K: usize = 5;

const ELIGIBILITY_MARKERS: &[&str] = &[
    "who can avail",
    "eligibility",
    "available for",
    "age between",
    "coverage",
];

const PREMIUM_MARKERS: &[&str] = &["premium", "monthly premium"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkLabel {
    Eligibility,
    Premium,
    General,
}

/// Ephemeral per-query retrieval result.
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    pub content: String,
    pub label: ChunkLabel,
    /// Originating policy document name.
    pub policy: String,
}

pub struct KnowledgeRetriever {
    index: Arc<dyn SegmentIndex>,
}

impl KnowledgeRetriever {
    pub fn new(index: Arc<dyn SegmentIndex>) -> Self {
        Self { index }
    }

    /// Top-k relevant chunks in the order the external ranking returned them.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedChunk>, ApiError> {
        let hits = self.index.search(query, TOP_K).await?;

        Ok(hits
            .into_iter()
            .map(|hit| RetrievedChunk {
                label: label_chunk_type(&hit.content),
                content: hit.content,
                policy: hit.source,
            })
            .collect())
    }
}

/// Label a chunk by its likely content. Eligibility markers are checked
/// before premium markers; first matching rule wins.
pub fn label_chunk_type(text: &str) -> ChunkLabel {
    let text = text.to_lowercase();
    if ELIGIBILITY_MARKERS.iter().any(|m| text.contains(m)) {
        ChunkLabel::Eligibility
    } else if PREMIUM_MARKERS.iter().any(|m| text.contains(m)) {
        ChunkLabel::Premium
    } else {
        ChunkLabel::General
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{IndexedSegment, InMemoryIndex};

    #[test]
    fn test_eligibility_label() {
        assert_eq!(
            label_chunk_type("Who can avail this plan: adults only."),
            ChunkLabel::Eligibility
        );
        assert_eq!(
            label_chunk_type("Available for age between 18 and 65."),
            ChunkLabel::Eligibility
        );
    }

    #[test]
    fn test_premium_label() {
        assert_eq!(
            label_chunk_type("The monthly premium is $40."),
            ChunkLabel::Premium
        );
    }

    #[test]
    fn test_eligibility_wins_over_premium() {
        // Contains both marker sets; eligibility is checked first.
        assert_eq!(
            label_chunk_type("Eligibility depends on the premium tier."),
            ChunkLabel::Eligibility
        );
    }

    #[test]
    fn test_general_label() {
        assert_eq!(
            label_chunk_type("Claims are settled within 30 days."),
            ChunkLabel::General
        );
    }

    #[tokio::test]
    async fn test_retrieve_labels_and_names_policies() {
        let index = std::sync::Arc::new(InMemoryIndex::new());
        index
            .upload(vec![IndexedSegment {
                id: "a".into(),
                content: "Coverage available for age between 18 and 65.".into(),
                source: "MediShield.txt".into(),
            }])
            .await
            .unwrap();

        let retriever = KnowledgeRetriever::new(index);
        let chunks = retriever.retrieve("what age coverage").await.unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].label, ChunkLabel::Eligibility);
        assert_eq!(chunks[0].policy, "MediShield.txt");
    }
}
