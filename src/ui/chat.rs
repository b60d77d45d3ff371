use dioxus::prelude::*;
use ollama_chat::ollama::OllamaClient;
use ollama_chat::{Role, Session};
use tracing::debug;

use super::message::MessageBubble;

/* ================= CHAT WINDOW ================= */

#[component]
pub fn ChatWindow(
    mut session: Signal<Session>,
    mut live: Signal<Option<String>>,
    client: Signal<OllamaClient>,
) -> Element {
    let mut input_text = use_signal(String::new);

    let history: Vec<(Role, String)> = session
        .read()
        .log
        .iter()
        .map(|m| (m.role(), m.content().to_string()))
        .collect();
    let busy = live.read().is_some();
    let live_bubble = match live() {
        Some(buffer) => rsx! {
            MessageBubble { role: Role::Assistant, content: buffer, streaming: true }
        },
        None => rsx! {},
    };

    let model_display = session
        .read()
        .selected_model()
        .map(str::to_string)
        .unwrap_or_else(|| "No model selected".to_string());

    // one turn at a time: the input stays disabled until the reply has been stored
    let mut send = move || {
        let prompt = input_text();
        if prompt.trim().is_empty() || live.peek().is_some() {
            return;
        }
        input_text.set(String::new());

        let Some(turn) = session.write().begin_turn(&prompt) else {
            return;
        };
        live.set(Some(String::new()));

        spawn(async move {
            let backend = client();
            debug!(model = turn.model(), "starting turn");
            let reply = turn
                .reply(&backend, |buffer| {
                    live.set(Some(buffer.to_string()));
                })
                .await;
            session.write().finish_turn(reply);
            live.set(None);
        });
    };

    rsx! {
        div { class: "chat-window",

            div { class: "chat-header",
                h2 { "🗨️ Chat with Ollama" }
                p { class: "model-indicator", "Model: {model_display}" }
            }

            div { class: "chat-messages",
                {history.into_iter().enumerate().map(|(i, (role, content))| {
                    rsx! {
                        MessageBubble { key: "{i}", role, content, streaming: false }
                    }
                })}

                {live_bubble}
            }

            div { class: "chat-input-area",
                textarea {
                    class: "chat-input",
                    placeholder: "Ask Me!",
                    value: "{input_text}",
                    disabled: busy,
                    oninput: move |e| input_text.set(e.value()),
                    onkeydown: move |e: KeyboardEvent| {
                        if e.key() == Key::Enter && !e.modifiers().contains(Modifiers::SHIFT) {
                            e.prevent_default();
                            send();
                        }
                    },
                }

                button {
                    class: "send-button big",
                    disabled: busy || input_text().trim().is_empty(),
                    onclick: move |_| send(),
                    "➤ Send"
                }
            }
        }
    }
}
