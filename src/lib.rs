pub mod chat;
pub mod core;
pub mod index;
pub mod ingest;
pub mod llm;
pub mod rag;
pub mod server;
pub mod speech;
pub mod state;
pub mod websearch;
