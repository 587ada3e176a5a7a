//! In-memory `SegmentIndex` backend.
//!
//! Stands in for the hosted service in tests and offline development. Scoring
//! is a term-overlap count, which is enough to order results for the
//! round-trip properties the tests exercise.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::errors::ApiError;
use super::types::{IndexedSegment, SegmentHit};
use super::SegmentIndex;

#[derive(Default)]
pub struct InMemoryIndex {
    inner: RwLock<InnerIndex>,
}

#[derive(Default)]
struct InnerIndex {
    created: bool,
    segments: Vec<IndexedSegment>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn segment_count(&self) -> usize {
        self.inner.read().await.segments.len()
    }
}

#[async_trait]
impl SegmentIndex for InMemoryIndex {
    async fn ensure_index(&self) -> Result<bool, ApiError> {
        let mut inner = self.inner.write().await;
        if inner.created {
            return Ok(false);
        }
        inner.created = true;
        Ok(true)
    }

    async fn upload(&self, segments: Vec<IndexedSegment>) -> Result<usize, ApiError> {
        let mut inner = self.inner.write().await;
        let count = segments.len();
        inner.segments.extend(segments);
        Ok(count)
    }

    async fn search(&self, query: &str, top: usize) -> Result<Vec<SegmentHit>, ApiError> {
        let inner = self.inner.read().await;
        let terms: Vec<String> = query
            .to_lowercase()
            .split_whitespace()
            .map(|t| t.to_string())
            .collect();

        let mut hits: Vec<SegmentHit> = inner
            .segments
            .iter()
            .filter_map(|segment| {
                let content = segment.content.to_lowercase();
                let score = terms.iter().filter(|t| content.contains(*t)).count() as f64;
                if score > 0.0 {
                    Some(SegmentHit {
                        content: segment.content.clone(),
                        source: segment.source.clone(),
                        score,
                    })
                } else {
                    None
                }
            })
            .collect();

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(top);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_index_is_create_if_absent() {
        let index = InMemoryIndex::new();
        assert!(index.ensure_index().await.unwrap());
        assert!(!index.ensure_index().await.unwrap());
    }

    #[tokio::test]
    async fn test_search_orders_by_overlap() {
        let index = InMemoryIndex::new();
        index
            .upload(vec![
                IndexedSegment {
                    id: "a".into(),
                    content: "premium payments are monthly".into(),
                    source: "PolicyA.txt".into(),
                },
                IndexedSegment {
                    id: "b".into(),
                    content: "monthly premium for senior coverage".into(),
                    source: "PolicyB.txt".into(),
                },
            ])
            .await
            .unwrap();

        let hits = index.search("monthly premium coverage", 5).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].source, "PolicyB.txt");
    }
}
