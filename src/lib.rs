//! Core of a single-page chat client for a locally running Ollama server.
//!
//! The GUI lives in the binary; everything it drives (the conversation log, streaming assembly of
//! model replies, model discovery and PDF export) lives here so it can be exercised without a window.

pub mod assembler;
pub mod backend;
pub mod config;
pub mod conversation;
pub mod error;
pub mod export;
pub mod markdown;
pub mod models;
pub mod normalize;
pub mod ollama;
pub mod session;
pub mod timefmt;

pub use assembler::{respond, stream_reply, Reply};
pub use backend::{Backend, ChunkStream, ModelRegistry};
pub use config::Config;
pub use conversation::{Conversation, Message, Role};
pub use error::{ChatError, ExportError};
pub use export::{export_pdf, ExportedPdf, PDF_FILE_NAME, PDF_MIME_TYPE};
pub use session::{PendingTurn, Session};
