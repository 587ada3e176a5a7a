//! Answer synthesizer.
//!
//! Builds a context string from retrieved chunks (preferring
//! eligibility-labeled ones when the query asks about eligibility) and asks
//! the completion service to answer only from that context.

use std::sync::Arc;

use crate::chat::Verbosity;
use crate::core::errors::ApiError;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};

use super::prompts::synthesis_prompt;
use super::retriever::{ChunkLabel, KnowledgeRetriever, RetrievedChunk};

/// Literal reply when retrieval comes back empty.
pub const NO_KNOWLEDGE_REPLY: &str = "I don't know based on the knowledge base.";

/// Maximum chunks folded into the context string.
const MAX_CONTEXT_CHUNKS: usize = 5;

const ELIGIBILITY_QUERY_TERMS: &[&str] = &["age", "eligible", "avail", "child", "adult", "senior"];

pub struct KnowledgeAnswerer {
    retriever: KnowledgeRetriever,
    provider: Arc<dyn LlmProvider>,
    deployment: String,
}

impl KnowledgeAnswerer {
    pub fn new(
        retriever: KnowledgeRetriever,
        provider: Arc<dyn LlmProvider>,
        deployment: String,
    ) -> Self {
        Self {
            retriever,
            provider,
            deployment,
        }
    }

    /// Answer a query from the knowledge base. Failures degrade to a
    /// user-visible string embedding the error; the session always continues.
    pub async fn answer(&self, query: &str, verbosity: Verbosity) -> String {
        match self.try_answer(query, verbosity).await {
            Ok(text) => text,
            Err(err) => format!("Error during RAG answering: {}", err),
        }
    }

    async fn try_answer(&self, query: &str, verbosity: Verbosity) -> Result<String, ApiError> {
        let chunks = self.retriever.retrieve(query).await?;
        if chunks.is_empty() {
            return Ok(NO_KNOWLEDGE_REPLY.to_string());
        }

        let chosen = select_chunks(query, &chunks);
        let context = build_context(&chosen);
        let prompt = synthesis_prompt(verbosity, &context, query);

        let request = ChatRequest::new(vec![
            ChatMessage::system("You are a helpful assistant."),
            ChatMessage::user(prompt),
        ])
        .with_temperature(0.7);

        self.provider.chat(request, &self.deployment).await
    }
}

/// Prefer eligibility-labeled chunks for eligibility-flavored queries,
/// falling back to the full set when none carry that label.
pub fn select_chunks(query: &str, chunks: &[RetrievedChunk]) -> Vec<RetrievedChunk> {
    let query = query.to_lowercase();
    let wants_eligibility = ELIGIBILITY_QUERY_TERMS.iter().any(|t| query.contains(t));
    if !wants_eligibility {
        return chunks.to_vec();
    }

    let eligibility: Vec<RetrievedChunk> = chunks
        .iter()
        .filter(|c| c.label == ChunkLabel::Eligibility)
        .cloned()
        .collect();

    if eligibility.is_empty() {
        chunks.to_vec()
    } else {
        eligibility
    }
}

/// Concatenate up to five chosen chunks as "Policy/Content" blocks.
pub fn build_context(chunks: &[RetrievedChunk]) -> String {
    let mut context = String::new();
    for chunk in chunks.iter().take(MAX_CONTEXT_CHUNKS) {
        context.push_str(&format!(
            "Policy: {}\nContent: {}\n\n",
            chunk.policy, chunk.content
        ));
    }
    context
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(label: ChunkLabel, policy: &str, content: &str) -> RetrievedChunk {
        RetrievedChunk {
            content: content.to_string(),
            label,
            policy: policy.to_string(),
        }
    }

    #[test]
    fn test_eligibility_query_filters_to_eligibility_chunks() {
        let chunks = vec![
            chunk(ChunkLabel::General, "A", "claims process"),
            chunk(ChunkLabel::Eligibility, "B", "age between 18 and 65"),
            chunk(ChunkLabel::Premium, "C", "monthly premium $40"),
        ];

        let chosen = select_chunks("What is the minimum age for Policy B?", &chunks);
        assert_eq!(chosen.len(), 1);
        assert!(chosen.iter().all(|c| c.label == ChunkLabel::Eligibility));
    }

    #[test]
    fn test_eligibility_query_without_labeled_chunks_uses_full_set() {
        let chunks = vec![
            chunk(ChunkLabel::General, "A", "claims process"),
            chunk(ChunkLabel::Premium, "C", "monthly premium $40"),
        ];

        let chosen = select_chunks("What is the minimum age for Policy X?", &chunks);
        assert_eq!(chosen.len(), 2);
    }

    #[test]
    fn test_plain_query_keeps_all_chunks() {
        let chunks = vec![
            chunk(ChunkLabel::Eligibility, "B", "age between 18 and 65"),
            chunk(ChunkLabel::General, "A", "claims process"),
        ];

        let chosen = select_chunks("How are claims settled?", &chunks);
        assert_eq!(chosen.len(), 2);
    }

    #[test]
    fn test_context_names_every_policy() {
        let chunks = vec![
            chunk(ChunkLabel::General, "MediShield.txt", "claims process"),
            chunk(ChunkLabel::Premium, "SilverCare.txt", "monthly premium $40"),
        ];

        let context = build_context(&chunks);
        assert!(context.contains("Policy: MediShield.txt\nContent: claims process"));
        assert!(context.contains("Policy: SilverCare.txt\nContent: monthly premium $40"));
    }

    #[test]
    fn test_context_caps_at_five_chunks() {
        let chunks: Vec<RetrievedChunk> = (0..8)
            .map(|i| chunk(ChunkLabel::General, &format!("P{}", i), "text"))
            .collect();

        let context = build_context(&chunks);
        assert!(context.contains("Policy: P4"));
        assert!(!context.contains("Policy: P5"));
    }
}
