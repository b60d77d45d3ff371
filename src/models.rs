use tracing::{info, warn};

use crate::backend::ModelRegistry;

/// True for identifiers of embedding models, which cannot chat.
pub fn is_embedding_model(id: &str) -> bool {
    id.to_lowercase().contains("embed")
}

/// Installed chat models, asking each registry in turn until one answers.
///
/// A failing registry is logged and skipped; when none answers the list is empty and the
/// caller is expected to tell the user no models are available.
pub async fn installed_models(registries: &[&dyn ModelRegistry]) -> Vec<String> {
    for registry in registries {
        match registry.list_models().await {
            Ok(mut models) => {
                models.retain(|id| !is_embedding_model(id));
                info!(source = registry.name(), count = models.len(), "listed installed models");
                return models;
            }
            Err(err) => {
                warn!(source = registry.name(), error = %err, "error fetching models");
            }
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChatError;
    use async_trait::async_trait;

    struct Fixed(Result<Vec<&'static str>, &'static str>);

    #[async_trait]
    impl ModelRegistry for Fixed {
        async fn list_models(&self) -> Result<Vec<String>, ChatError> {
            match &self.0 {
                Ok(ids) => Ok(ids.iter().map(|s| s.to_string()).collect()),
                Err(msg) => Err(ChatError::Command(msg.to_string())),
            }
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn embedding_models_are_hidden() {
        let registry = Fixed(Ok(vec!["llama3", "nomic-EMBED-text", "mxbai-embed-large", "qwen3"]));
        assert_eq!(installed_models(&[&registry]).await, vec!["llama3", "qwen3"]);
    }

    #[tokio::test]
    async fn falls_through_to_next_registry() {
        let down = Fixed(Err("connection refused"));
        let cli = Fixed(Ok(vec!["mistral"]));
        assert_eq!(installed_models(&[&down, &cli]).await, vec!["mistral"]);
    }

    #[tokio::test]
    async fn total_failure_is_empty() {
        let down = Fixed(Err("connection refused"));
        assert!(installed_models(&[&down, &down]).await.is_empty());
        assert!(installed_models(&[]).await.is_empty());
    }
}
