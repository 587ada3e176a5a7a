pub mod answerer;
pub mod prompts;
pub mod retriever;

pub use answerer::KnowledgeAnswerer;
pub use retriever::{ChunkLabel, KnowledgeRetriever, RetrievedChunk};
