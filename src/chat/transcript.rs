//! Session and transcript model.
//!
//! One session owns one append-only transcript for the lifetime of an
//! interactive session; nothing is persisted across sessions.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::errors::ApiError;

/// Chat mode fork: insurance questions go through the knowledge base, general
/// questions go straight to web search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    #[default]
    Insurance,
    General,
}

impl ChatMode {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "general" => ChatMode::General,
            _ => ChatMode::Insurance,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatMode::Insurance => "insurance",
            ChatMode::General => "general",
        }
    }
}

/// Concise vs detailed response template selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    #[default]
    Concise,
    Detailed,
}

impl Verbosity {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "detailed" => Verbosity::Detailed,
            _ => Verbosity::Concise,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Concise => "concise",
            Verbosity::Detailed => "detailed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
    System,
}

/// Which collaborator produced a bot entry's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceLabel {
    #[serde(rename = "User Input")]
    UserInput,
    #[serde(rename = "Knowledge Base")]
    KnowledgeBase,
    #[serde(rename = "Web Search")]
    WebSearch,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub text: String,
    pub verbosity: Verbosity,
    /// Every bot entry carries exactly one source label.
    pub source: SourceLabel,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: String,
    pub mode: ChatMode,
    pub created_at: DateTime<Utc>,
    pub transcript: Vec<TranscriptEntry>,
}

/// In-process session store. Created on session start, discarded on session
/// end; the only writer for a session is the handler serving its message.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, mode: ChatMode) -> Session {
        let session = Session {
            id: Uuid::new_v4().to_string(),
            mode,
            created_at: Utc::now(),
            transcript: Vec::new(),
        };
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        session
    }

    pub async fn get(&self, session_id: &str) -> Result<Session, ApiError> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("session {}", session_id)))
    }

    pub async fn mode(&self, session_id: &str) -> Result<ChatMode, ApiError> {
        Ok(self.get(session_id).await?.mode)
    }

    pub async fn set_mode(&self, session_id: &str, mode: ChatMode) -> Result<(), ApiError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| ApiError::NotFound(format!("session {}", session_id)))?;
        session.mode = mode;
        Ok(())
    }

    pub async fn remove(&self, session_id: &str) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }

    pub async fn append_user(
        &self,
        session_id: &str,
        text: &str,
        verbosity: Verbosity,
    ) -> Result<TranscriptEntry, ApiError> {
        self.append(
            session_id,
            TranscriptEntry {
                role: Role::User,
                text: text.to_string(),
                verbosity,
                source: SourceLabel::UserInput,
                timestamp: Utc::now(),
            },
        )
        .await
    }

    pub async fn append_bot(
        &self,
        session_id: &str,
        text: String,
        verbosity: Verbosity,
        source: SourceLabel,
    ) -> Result<TranscriptEntry, ApiError> {
        self.append(
            session_id,
            TranscriptEntry {
                role: Role::Bot,
                text,
                verbosity,
                source,
                timestamp: Utc::now(),
            },
        )
        .await
    }

    async fn append(
        &self,
        session_id: &str,
        entry: TranscriptEntry,
    ) -> Result<TranscriptEntry, ApiError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| ApiError::NotFound(format!("session {}", session_id)))?;
        session.transcript.push(entry.clone());
        Ok(entry)
    }
}
