use thiserror::Error;

/* ================= CHAT ERRORS ================= */

/// Everything that can end a turn or a model listing early.
///
/// The `Display` text is what the user sees after the `Error: ` prefix of a failed turn.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("could not reach Ollama: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Ollama API returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("{0}")]
    Backend(String),
    #[error("malformed response from Ollama: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("command failed: {0}")]
    Command(String),
    #[error("no model selected")]
    NoModel,
}

/* ================= EXPORT ERRORS ================= */

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to render PDF: {0}")]
    Render(String),
}
