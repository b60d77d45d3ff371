use async_trait::async_trait;
use futures_util::stream::BoxStream;

use crate::error::ChatError;

/// Text fragments of one streamed completion, in delivery order.
pub type ChunkStream = BoxStream<'static, Result<String, ChatError>>;

/// The inference service a turn is run against.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Estimated number of tokens `text` occupies for `model`.
    async fn count_tokens(&self, model: &str, text: &str) -> Result<usize, ChatError>;

    /// Opens a streaming completion of `prompt`.
    async fn stream(&self, model: &str, prompt: &str) -> Result<ChunkStream, ChatError>;
}

/// Source of installed model identifiers.
#[async_trait]
pub trait ModelRegistry: Send + Sync {
    async fn list_models(&self) -> Result<Vec<String>, ChatError>;

    /// Short name used in log lines.
    fn name(&self) -> &'static str;
}
