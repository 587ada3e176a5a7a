//! Conversation controller.
//!
//! Sequences the collaborators for one incoming message: acknowledgment
//! guard, mode fork, knowledge-base synthesis, verdict classification, and
//! the web fallback. Every turn appends exactly one user entry and exactly
//! one bot entry to the session transcript.

use std::sync::Arc;

use crate::core::errors::ApiError;
use crate::llm::ResponseClassifier;
use crate::rag::KnowledgeAnswerer;
use crate::websearch::WebAnswerer;

use super::acknowledgment::is_acknowledgment;
use super::transcript::{ChatMode, SessionStore, SourceLabel, TranscriptEntry, Verbosity};

pub const CANNED_ACK_REPLY: &str =
    "Welcome! \u{1F60A} I'm your assistant. Feel free to ask your question.";
pub const GENERAL_EMPTY_REPLY: &str = "Sorry, couldn't find information on the web.";
pub const INSURANCE_EMPTY_REPLY: &str =
    "Sorry, couldn't find anything in policy documents or web.";

pub struct ConversationController {
    sessions: Arc<SessionStore>,
    knowledge: KnowledgeAnswerer,
    classifier: ResponseClassifier,
    web: WebAnswerer,
}

impl ConversationController {
    pub fn new(
        sessions: Arc<SessionStore>,
        knowledge: KnowledgeAnswerer,
        classifier: ResponseClassifier,
        web: WebAnswerer,
    ) -> Self {
        Self {
            sessions,
            knowledge,
            classifier,
            web,
        }
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Run one turn. Returns the appended bot entry.
    pub async fn handle_message(
        &self,
        session_id: &str,
        text: &str,
        verbosity: Verbosity,
    ) -> Result<TranscriptEntry, ApiError> {
        if text.trim().is_empty() {
            return Err(ApiError::BadRequest("empty message".to_string()));
        }

        let mode = self.sessions.mode(session_id).await?;
        self.sessions
            .append_user(session_id, text, verbosity)
            .await?;

        let (reply, source) = self.compose_reply(mode, text, verbosity).await;

        tracing::info!(
            mode = mode.as_str(),
            source = ?source,
            "composed reply"
        );

        self.sessions
            .append_bot(session_id, reply, verbosity, source)
            .await
    }

    async fn compose_reply(
        &self,
        mode: ChatMode,
        text: &str,
        verbosity: Verbosity,
    ) -> (String, SourceLabel) {
        if is_acknowledgment(text) {
            return (CANNED_ACK_REPLY.to_string(), SourceLabel::System);
        }

        match mode {
            ChatMode::General => {
                let reply = self.web.answer(text, verbosity).await;
                (
                    non_empty_or(reply, GENERAL_EMPTY_REPLY),
                    SourceLabel::WebSearch,
                )
            }
            ChatMode::Insurance => {
                let kb_reply = self.knowledge.answer(text, verbosity).await;
                let verdict = self.classifier.classify(&kb_reply, text).await;

                if verdict.should_fall_back() {
                    let reply = self.web.answer(text, verbosity).await;
                    (
                        non_empty_or(reply, INSURANCE_EMPTY_REPLY),
                        SourceLabel::WebSearch,
                    )
                } else {
                    (kb_reply, SourceLabel::KnowledgeBase)
                }
            }
        }
    }
}

fn non_empty_or(reply: String, fallback: &str) -> String {
    if reply.trim().is_empty() {
        fallback.to_string()
    } else {
        reply
    }
}
