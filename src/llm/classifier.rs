//! Response classifier.
//!
//! Asks the completion service to judge a synthesized answer (positive or
//! negative) and the query's topical relevance (yes or no). The model's JSON
//! is treated as an untrusted external format: code fences are stripped and
//! the payload is parsed defensively. Any failure yields the safe default
//! verdict `{positive, no}`, which suppresses the web-fallback path.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::errors::ApiError;
use super::provider::LlmProvider;
use super::types::{ChatMessage, ChatRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseClass {
    Positive,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relevance {
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub response_class: ResponseClass,
    pub is_relevant: Relevance,
}

impl Verdict {
    /// Fail-closed default: favors the knowledge-base answer over an
    /// unnecessary web call.
    pub fn safe_default() -> Self {
        Self {
            response_class: ResponseClass::Positive,
            is_relevant: Relevance::No,
        }
    }

    pub fn should_fall_back(&self) -> bool {
        self.response_class == ResponseClass::Negative && self.is_relevant == Relevance::Yes
    }
}

pub struct ResponseClassifier {
    provider: Arc<dyn LlmProvider>,
    deployment: String,
}

impl ResponseClassifier {
    pub fn new(provider: Arc<dyn LlmProvider>, deployment: String) -> Self {
        Self {
            provider,
            deployment,
        }
    }

    /// Classify a synthesized answer against the original query.
    ///
    /// Never propagates an error: upstream failure and malformed output both
    /// degrade to the safe default verdict.
    pub async fn classify(&self, bot_response: &str, user_query: &str) -> Verdict {
        match self.try_classify(bot_response, user_query).await {
            Ok(verdict) => {
                tracing::debug!(?verdict, "classification result");
                verdict
            }
            Err(err) => {
                tracing::warn!("classification failed, using safe default: {}", err);
                Verdict::safe_default()
            }
        }
    }

    async fn try_classify(
        &self,
        bot_response: &str,
        user_query: &str,
    ) -> Result<Verdict, ApiError> {
        let prompt = classification_prompt(bot_response, user_query);
        let request = ChatRequest::new(vec![
            ChatMessage::system(
                "You are a helpful assistant trained to classify responses and queries.",
            ),
            ChatMessage::user(prompt),
        ])
        .with_temperature(0.0);

        let content = self.provider.chat(request, &self.deployment).await?;
        parse_verdict(&content)
    }
}

/// Parse the model's verdict, tolerating code-fence wrapping.
pub fn parse_verdict(content: &str) -> Result<Verdict, ApiError> {
    let cleaned = strip_code_fences(content);
    serde_json::from_str::<Verdict>(&cleaned)
        .map_err(|e| ApiError::MalformedModelOutput(format!("classifier verdict: {}", e)))
}

fn strip_code_fences(content: &str) -> String {
    content
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

fn classification_prompt(bot_response: &str, user_query: &str) -> String {
    format!(
        r#"You are a strict classifier.

Given the chatbot's response and the user's original query, perform the following:

1. Classify the bot response as either:
   - "positive": The response is helpful, informative, complete, and contains no uncertain, incomplete, or negative language.
   - "negative": The response is vague with negative intent, says "I don't know", "not found", "no information", or anything indicating lack of knowledge, inability to help, or misalignment with the query.

   Examples of negative indicators include:
   - "I do not know"
   - "This information is not available"
   - "I am not sure"
   - "Not found in the knowledge base"
   - "not explicitly mentioned"
   - "Cannot answer"
   - "The context provided does not include any information"

2. Classify whether the user query is related to banking or insurance.
   - Return "yes" if the query is about banking, finance, loans, accounts, cards, claims, insurance, premiums, policies, etc.
   - Return "no" if it's unrelated.

Only respond with a compact JSON object. Do not use markdown, code blocks, or explanations.

Required format:
{{
    "response_class": "...",
    "is_relevant": "..."
}}

Bot Response:
"""{bot_response}"""

User Query:
"""{user_query}"""
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_verdict() {
        let verdict =
            parse_verdict(r#"{"response_class": "negative", "is_relevant": "yes"}"#).unwrap();
        assert_eq!(verdict.response_class, ResponseClass::Negative);
        assert_eq!(verdict.is_relevant, Relevance::Yes);
        assert!(verdict.should_fall_back());
    }

    #[test]
    fn test_parse_fenced_verdict() {
        let content = "```json\n{\"response_class\": \"positive\", \"is_relevant\": \"no\"}\n```";
        let verdict = parse_verdict(content).unwrap();
        assert_eq!(verdict.response_class, ResponseClass::Positive);
        assert!(!verdict.should_fall_back());
    }

    #[test]
    fn test_malformed_verdict_is_named_error() {
        let err = parse_verdict("the answer looks fine to me").unwrap_err();
        assert!(matches!(err, ApiError::MalformedModelOutput(_)));
    }

    #[test]
    fn test_unknown_class_rejected() {
        let err =
            parse_verdict(r#"{"response_class": "mixed", "is_relevant": "yes"}"#).unwrap_err();
        assert!(matches!(err, ApiError::MalformedModelOutput(_)));
    }

    #[test]
    fn test_safe_default_suppresses_fallback() {
        assert!(!Verdict::safe_default().should_fall_back());
    }

    #[test]
    fn test_positive_and_relevant_keeps_kb_answer() {
        let verdict = Verdict {
            response_class: ResponseClass::Positive,
            is_relevant: Relevance::Yes,
        };
        assert!(!verdict.should_fall_back());
    }
}
