use std::time::{Duration, Instant};

use futures_util::StreamExt;
use tracing::{info, warn};

use crate::backend::Backend;
use crate::conversation::Message;
use crate::error::ChatError;
use crate::normalize::strip_thinking;
use crate::timefmt::format_duration;

/// A completed model reply with the metadata measured around its stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    /// Concatenation of every chunk in delivery order, reasoning markup included.
    pub text: String,
    /// Token estimate of the prompt.
    pub token_count: usize,
    pub elapsed: Duration,
}

impl Reply {
    pub fn footer(&self) -> String {
        format!(
            "Token Count: {} | Response Time: {}",
            self.token_count,
            format_duration(self.elapsed)
        )
    }

    /// The text stored in the conversation: reasoning stripped, then a rule and the footer.
    pub fn content(&self) -> String {
        format!("{}\n\n---\n{}", strip_thinking(&self.text), self.footer())
    }
}

/// Streams one completion, handing the growing buffer to `on_update` after every chunk.
///
/// The buffer only ever grows; chunks are appended exactly as delivered. Any failure, before or
/// during the stream, discards what was gathered.
pub async fn stream_reply<B, F>(
    backend: &B,
    model: &str,
    prompt: &str,
    mut on_update: F,
) -> Result<Reply, ChatError>
where
    B: Backend + ?Sized,
    F: FnMut(&str),
{
    let token_count = backend.count_tokens(model, prompt).await?;
    let start = Instant::now();

    let mut chunks = backend.stream(model, prompt).await?;
    let mut buffer = String::new();
    while let Some(chunk) = chunks.next().await {
        buffer.push_str(&chunk?);
        on_update(&buffer);
    }

    Ok(Reply {
        text: buffer,
        token_count,
        elapsed: start.elapsed(),
    })
}

/// Runs one turn and always yields the assistant message to store: the annotated reply, or
/// `Error: ...` when the backend failed.
pub async fn respond<B, F>(backend: &B, model: &str, prompt: &str, on_update: F) -> Message
where
    B: Backend + ?Sized,
    F: FnMut(&str),
{
    match stream_reply(backend, model, prompt, on_update).await {
        Ok(reply) => {
            info!(
                model,
                token_count = reply.token_count,
                elapsed_ms = reply.elapsed.as_millis() as u64,
                chars = reply.text.len(),
                "turn finished"
            );
            Message::assistant(reply.content())
        }
        Err(err) => {
            warn!(model, error = %err, "turn failed");
            Message::assistant(format!("Error: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_strips_reasoning_and_appends_footer() {
        let reply = Reply {
            text: "<think>hmm</think>\nThe answer is 4.".to_string(),
            token_count: 6,
            elapsed: Duration::from_millis(125_700),
        };
        assert_eq!(reply.footer(), "Token Count: 6 | Response Time: 2m 5s");
        assert_eq!(
            reply.content(),
            "The answer is 4.\n\n---\nToken Count: 6 | Response Time: 2m 5s"
        );
    }

    #[test]
    fn short_reply_uses_seconds_form() {
        let reply = Reply {
            text: "ok".to_string(),
            token_count: 1,
            elapsed: Duration::from_secs_f64(45.9),
        };
        assert!(reply.content().ends_with("Token Count: 1 | Response Time: Time: 45s"));
    }
}
