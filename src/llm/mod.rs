pub mod azure;
pub mod classifier;
pub mod provider;
pub mod types;

pub use azure::AzureOpenAiProvider;
pub use classifier::{ResponseClass, ResponseClassifier, Verdict};
pub use provider::LlmProvider;
pub use types::{ChatMessage, ChatRequest};
