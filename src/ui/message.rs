use dioxus::prelude::*;
use ollama_chat::markdown::to_html;
use ollama_chat::normalize::{split_thinking, Thinking};
use ollama_chat::Role;

/* ================= MESSAGE ================= */

#[component]
pub fn MessageBubble(role: Role, content: String, streaming: bool) -> Element {
    let class_name = match (role, streaming) {
        (Role::User, _) => "message user-message",
        (Role::Assistant, false) => "message assistant-message",
        (Role::Assistant, true) => "message assistant-message streaming",
    };

    // only model output carries reasoning markup
    let parts = match role {
        Role::Assistant => split_thinking(&content),
        Role::User => Thinking {
            before: &content,
            thinking: None,
            after: "",
        },
    };
    let before_html = to_html(parts.before);
    let after_html = to_html(parts.after);
    let has_before = !parts.before.trim().is_empty();
    let has_after = !parts.after.trim().is_empty();
    let has_thinking = parts.thinking.is_some();
    let thinking = parts.thinking.unwrap_or_default().to_string();
    let waiting = streaming && content.is_empty();

    rsx! {
        div { class: "{class_name}",
            if waiting {
                p { class: "dim-text", "Thinking..." }
                div { class: "loading-dots" }
            }
            if has_before {
                div { class: "markdown", dangerous_inner_html: "{before_html}" }
            }
            if has_thinking {
                div { class: "think-bubble",
                    p { class: "think-label", "🤔 Thinking..." }
                    div { class: "think-content dim-text", "{thinking}" }
                }
            }
            if has_after {
                div { class: "markdown", dangerous_inner_html: "{after_html}" }
            }
        }
    }
}
