use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{future, stream, Stream, StreamExt};
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::backend::{Backend, ChunkStream, ModelRegistry};
use crate::config::Config;
use crate::error::ChatError;

/* ================= OLLAMA API STRUCTURES ================= */

#[derive(Serialize, Debug)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize, Debug)]
struct GenerateChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

/* ================= HTTP CLIENT ================= */

/// Talks to a running Ollama server over its REST API.
#[derive(Clone, Debug)]
pub struct OllamaClient {
    http: Client,
    config: Config,
}

impl OllamaClient {
    pub fn new(config: Config) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.ollama_host, path)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ChatError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "failed to read error body".to_string());
    Err(ChatError::Status { status, body })
}

#[async_trait]
impl Backend for OllamaClient {
    async fn count_tokens(&self, _model: &str, text: &str) -> Result<usize, ChatError> {
        Ok(estimate_tokens(text))
    }

    async fn stream(&self, model: &str, prompt: &str) -> Result<ChunkStream, ChatError> {
        let request = GenerateRequest {
            model,
            prompt,
            stream: true,
        };
        debug!(model, url = %self.url("/api/generate"), "opening generate stream");
        let response = self
            .http
            .post(self.url("/api/generate"))
            .json(&request)
            .timeout(self.config.generate_timeout)
            .send()
            .await?;
        let response = check_status(response).await?;

        Ok(decode_stream(response.bytes_stream()))
    }
}

/// Turns the raw body of a generate call into the text fragments it carries.
///
/// Records are reassembled across chunk boundaries; a trailing record without its newline is
/// still decoded once the body ends. `done` records carry no text and yield nothing.
pub fn decode_stream<S, B, E>(body: S) -> ChunkStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<ChatError> + Send + 'static,
{
    body.map(Some)
        .chain(stream::iter([None]))
        .scan(NdjsonLines::default(), |lines, item| {
            let decoded: Vec<Result<String, ChatError>> = match item {
                Some(Ok(bytes)) => lines
                    .push(bytes.as_ref())
                    .into_iter()
                    .map(decode_line)
                    .collect(),
                Some(Err(err)) => vec![Err(err.into())],
                None => lines.finish().into_iter().map(decode_line).collect(),
            };
            future::ready(Some(stream::iter(decoded)))
        })
        .flatten()
        .filter(|chunk| future::ready(!matches!(chunk, Ok(text) if text.is_empty())))
        .boxed()
}

#[async_trait]
impl ModelRegistry for OllamaClient {
    async fn list_models(&self) -> Result<Vec<String>, ChatError> {
        let response = self
            .http
            .get(self.url("/api/tags"))
            .timeout(self.config.list_timeout)
            .send()
            .await?;
        let json = check_status(response).await?.json::<Value>().await?;
        Ok(parse_tags(&json))
    }

    fn name(&self) -> &'static str {
        "api"
    }
}

fn decode_line(line: String) -> Result<String, ChatError> {
    let chunk: GenerateChunk = serde_json::from_str(&line)?;
    if let Some(error) = chunk.error {
        return Err(ChatError::Backend(error));
    }
    if chunk.done {
        debug!("generate stream reported done");
    }
    Ok(chunk.response)
}

/// Reassembles newline-delimited JSON records that arrive split across HTTP chunks.
#[derive(Debug, Default)]
pub struct NdjsonLines {
    pending: Vec<u8>,
}

impl NdjsonLines {
    /// Feeds raw bytes in and returns every line completed by them, blank lines skipped.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);
        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim();
            if !line.is_empty() {
                lines.push(line.to_string());
            }
        }
        lines
    }

    /// Whatever is left once the body has ended, if it is more than whitespace.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.pending);
        let rest = String::from_utf8_lossy(&rest);
        let rest = rest.trim();
        (!rest.is_empty()).then(|| rest.to_string())
    }
}

/// Extracts model names from an `/api/tags` response.
///
/// Newer servers answer `{"models":[{"name":..,"model":..}]}`; older ones a plain array of
/// names or objects. Duplicates are dropped keeping the first occurrence.
pub fn parse_tags(json: &Value) -> Vec<String> {
    let entries = json
        .get("models")
        .and_then(Value::as_array)
        .or_else(|| json.as_array());
    let mut names: Vec<String> = entries
        .into_iter()
        .flatten()
        .filter_map(|item| {
            item.as_str()
                .or_else(|| item.get("name").and_then(Value::as_str))
                .or_else(|| item.get("model").and_then(Value::as_str))
                .map(str::to_string)
        })
        .collect();

    let mut seen = std::collections::HashSet::new();
    names.retain(|n| seen.insert(n.clone()));
    names
}

/* ================= CLI REGISTRY ================= */

/// Lists models by running `ollama list`, for machines where the API is not reachable
/// but the CLI is on `PATH`.
#[derive(Clone, Debug)]
pub struct OllamaCli {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl Default for OllamaCli {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl OllamaCli {
    pub fn new(config: &Config) -> Self {
        Self {
            program: "ollama".to_string(),
            args: vec!["list".to_string()],
            timeout: config.list_timeout,
        }
    }

    /// Runs `program` with `args` instead of `ollama list`; its stdout must use the same table.
    pub fn with_command<I, A>(mut self, program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.program = program.into();
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl ModelRegistry for OllamaCli {
    async fn list_models(&self) -> Result<Vec<String>, ChatError> {
        let run = Command::new(&self.program)
            .args(&self.args)
            .kill_on_drop(true)
            .output();
        let output = match tokio::time::timeout(self.timeout, run).await {
            Ok(output) => output?,
            Err(_) => {
                warn!(command = %self.command_line(), timeout_ms = self.timeout.as_millis() as u64, "model listing command timed out");
                return Err(ChatError::Command(format!(
                    "`{}` timed out after {:?}",
                    self.command_line(),
                    self.timeout
                )));
            }
        };
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(command = %self.command_line(), status = %output.status, "model listing command failed");
            return Err(ChatError::Command(format!(
                "`{}` exited with {}: {}",
                self.command_line(),
                output.status,
                stderr.trim()
            )));
        }
        Ok(parse_list_output(&String::from_utf8_lossy(&output.stdout)))
    }

    fn name(&self) -> &'static str {
        "cli"
    }
}

/// Parses the table printed by `ollama list`: first column of each row, header skipped.
pub fn parse_list_output(stdout: &str) -> Vec<String> {
    stdout
        .trim()
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.contains("NAME"))
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/* ================= TOKEN ESTIMATE ================= */

static PRE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r" ?\p{L}+| ?\p{N}+| ?[^\s\p{L}\p{N}]+|\s+").expect("pre-token pattern compiles")
});

/// Estimates a token count by splitting text the way byte-pair tokenizers pre-split it.
///
/// Ollama has no tokenizer endpoint; every piece counts as one token, which undercounts long
/// rare words and is close enough for display.
pub fn estimate_tokens(text: &str) -> usize {
    PRE_TOKEN.find_iter(text).count()
}
