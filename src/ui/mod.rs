mod chat;
mod message;
mod sidebar;

use dioxus::prelude::*;
use ollama_chat::models::installed_models;
use ollama_chat::ollama::{OllamaCli, OllamaClient};
use ollama_chat::{Config, Session};
use tracing::info;

use chat::ChatWindow;
use sidebar::Sidebar;

const MAIN_CSS: Asset = asset!("/assets/main.css");

/* ================= APP ================= */

#[component]
pub fn App() -> Element {
    let config = use_hook(Config::from_env);
    let client = use_signal({
        let config = config.clone();
        move || OllamaClient::new(config)
    });
    let cli = use_signal(|| OllamaCli::new(&config));
    let mut session = use_signal(Session::new);
    // None until the first listing finishes
    let mut models = use_signal(|| Option::<Vec<String>>::None);
    // bumped by the sidebar to list models again
    let listing = use_signal(|| 0u32);
    // Some(buffer) while a reply is streaming
    let live = use_signal(|| Option::<String>::None);

    // (re)list installed models; runs at launch and on every refresh request
    use_effect(move || {
        let attempt = listing();
        spawn(async move {
            let api = client();
            let cli = cli();
            let found = installed_models(&[&api, &cli]).await;
            session.write().adopt_models(&found);
            info!(
                session = %session.peek().id(),
                attempt,
                count = found.len(),
                "listed installed models"
            );
            models.set(Some(found));
        });
    });

    let no_models = models().map(|m| m.is_empty()).unwrap_or(false);

    rsx! {
        document::Title { "Chat with Ollama" }
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        div { class: "app-container",
            Sidebar { session, models, listing, live }
            div { class: "main-column",
                if no_models {
                    div { class: "error-banner",
                        "No installed Ollama models found. Please install one using `ollama pull <model_name>`."
                    }
                }
                ChatWindow { session, live, client }
            }
        }
    }
}
