use std::time::Duration;

/// Default address of a local Ollama server.
pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";

/// Runtime settings. Nothing here is persisted; every launch starts from the environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the Ollama server, without a trailing slash.
    pub ollama_host: String,
    /// Upper bound for a whole streamed generation.
    pub generate_timeout: Duration,
    /// Upper bound for the model listing request.
    pub list_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ollama_host: DEFAULT_OLLAMA_HOST.to_string(),
            generate_timeout: Duration::from_secs(300),
            list_timeout: Duration::from_secs(15),
        }
    }
}

impl Config {
    /// Reads `OLLAMA_HOST`, the same variable the Ollama CLI honours.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(host) = std::env::var("OLLAMA_HOST") {
            if let Some(host) = normalize_host(&host) {
                config.ollama_host = host;
            }
        }
        config
    }

    pub fn with_host(mut self, host: &str) -> Self {
        if let Some(host) = normalize_host(host) {
            self.ollama_host = host;
        }
        self
    }
}

// `OLLAMA_HOST` is commonly written as a bare `host:port`.
fn normalize_host(raw: &str) -> Option<String> {
    let raw = raw.trim().trim_end_matches('/');
    if raw.is_empty() {
        return None;
    }
    if raw.starts_with("http://") || raw.starts_with("https://") {
        Some(raw.to_string())
    } else {
        Some(format!("http://{raw}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_localhost() {
        assert_eq!(Config::default().ollama_host, "http://localhost:11434");
    }

    #[test]
    fn host_normalization() {
        assert_eq!(
            normalize_host("127.0.0.1:11434").as_deref(),
            Some("http://127.0.0.1:11434")
        );
        assert_eq!(
            normalize_host("https://gpu-box:11434/").as_deref(),
            Some("https://gpu-box:11434")
        );
        assert_eq!(normalize_host("   "), None);
    }

    #[test]
    fn empty_override_keeps_default() {
        let config = Config::default().with_host("");
        assert_eq!(config.ollama_host, DEFAULT_OLLAMA_HOST);
    }
}
