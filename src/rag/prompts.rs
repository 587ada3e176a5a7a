//! Prompt templates for knowledge-base synthesis.

use crate::chat::Verbosity;

const CONCISE_TEMPLATE: &str = "\
You are a helpful AI assistant. Always include the policy names. Using only the following context, answer the user's question briefly and clearly.

Context:
{context}

Question: {question}
Answer (concise):";

const DETAILED_TEMPLATE: &str = "\
You are a helpful AI assistant. Always include the policy names. Using only the following context, answer the user's question in a detailed and informative manner.

Context:
{context}

Question: {question}
Answer (detailed):";

pub fn synthesis_prompt(verbosity: Verbosity, context: &str, question: &str) -> String {
    let template = match verbosity {
        Verbosity::Concise => CONCISE_TEMPLATE,
        Verbosity::Detailed => DETAILED_TEMPLATE,
    };
    template
        .replace("{context}", context)
        .replace("{question}", question)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_differ_by_verbosity() {
        let concise = synthesis_prompt(Verbosity::Concise, "ctx", "q");
        let detailed = synthesis_prompt(Verbosity::Detailed, "ctx", "q");
        assert!(concise.contains("Answer (concise):"));
        assert!(detailed.contains("Answer (detailed):"));
        assert!(concise.contains("ctx"));
        assert!(detailed.contains("Question: q"));
    }
}
