pub mod acknowledgment;
pub mod controller;
pub mod transcript;

pub use controller::ConversationController;
pub use transcript::{ChatMode, Role, Session, SessionStore, SourceLabel, TranscriptEntry, Verbosity};
