pub mod chat;
pub mod health;
pub mod page;
pub mod sessions;
pub mod transcribe;
