use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::assembler::respond;
use crate::backend::Backend;
use crate::conversation::{Conversation, Message};
use crate::error::ChatError;

/// State of one interactive session: the chosen model and the conversation held for it.
///
/// Lives only as long as the window that owns it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    id: Uuid,
    selected_model: Option<String>,
    pub log: Conversation,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            selected_model: None,
            log: Conversation::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn selected_model(&self) -> Option<&str> {
        self.selected_model.as_deref()
    }

    /// Switches to `model`. Returns true when the model actually changed, in which case the
    /// conversation was cleared.
    pub fn select_model(&mut self, model: &str) -> bool {
        if self.selected_model.as_deref() == Some(model) {
            return false;
        }
        info!(session = %self.id, model, "model selected; clearing conversation");
        self.selected_model = Some(model.to_string());
        self.log.clear();
        true
    }

    /// Reconciles the selection with a freshly listed set of models.
    ///
    /// A model that is still installed stays selected; otherwise the first listed model is
    /// chosen (clearing the log). An empty listing leaves everything as it was. Returns whether
    /// the selection changed.
    pub fn adopt_models(&mut self, available: &[String]) -> bool {
        if let Some(current) = &self.selected_model {
            if available.iter().any(|m| m == current) {
                return false;
            }
        }
        match available.first() {
            Some(first) => {
                let first = first.clone();
                self.select_model(&first)
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        info!(session = %self.id, "conversation cleared");
        self.log.clear();
    }

    /// Records the user's prompt and hands back the turn that will answer it.
    ///
    /// Without a selected model an error message is appended straight away and `None` returned.
    pub fn begin_turn(&mut self, prompt: &str) -> Option<PendingTurn> {
        self.log.push(Message::user(prompt));
        match &self.selected_model {
            Some(model) => Some(PendingTurn {
                session: self.id,
                model: model.clone(),
                prompt: prompt.to_string(),
            }),
            None => {
                self.log
                    .push(Message::assistant(format!("Error: {}", ChatError::NoModel)));
                None
            }
        }
    }

    /// Stores the assistant message a [`PendingTurn`] produced.
    pub fn finish_turn(&mut self, reply: Message) {
        self.log.push(reply);
    }

    /// Runs a full turn: user message in, streamed reply (or error) out.
    pub async fn run_turn<B, F>(&mut self, backend: &B, prompt: &str, on_update: F)
    where
        B: Backend + ?Sized,
        F: FnMut(&str),
    {
        let Some(turn) = self.begin_turn(prompt) else {
            return;
        };
        let reply = turn.reply(backend, on_update).await;
        self.finish_turn(reply);
    }
}

/// A prompt already in the log, waiting for its reply.
///
/// Holds no borrow of the [`Session`], so the reply can stream while the session is read for
/// rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingTurn {
    session: Uuid,
    model: String,
    prompt: String,
}

impl PendingTurn {
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Streams the reply inside a `turn` span tagged with the session and model.
    pub async fn reply<B, F>(self, backend: &B, on_update: F) -> Message
    where
        B: Backend + ?Sized,
        F: FnMut(&str),
    {
        let span = info_span!("turn", session = %self.session, model = %self.model);
        respond(backend, &self.model, &self.prompt, on_update)
            .instrument(span)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Role;

    #[test]
    fn first_selection_and_changes() {
        let mut session = Session::new();
        assert!(session.select_model("llama3"));
        session.log.append(Role::User, "hi");
        assert!(!session.select_model("llama3"));
        assert_eq!(session.log.len(), 1);
        assert!(session.select_model("qwen3"));
        assert!(session.log.is_empty());
        assert_eq!(session.selected_model(), Some("qwen3"));
    }

    #[test]
    fn adopting_models_after_a_failed_listing() {
        let mut session = Session::new();
        // backend down at launch
        assert!(!session.adopt_models(&[]));
        assert_eq!(session.selected_model(), None);

        // backend came up, view refreshed
        let listed = vec!["llama3".to_string(), "qwen3".to_string()];
        assert!(session.adopt_models(&listed));
        assert_eq!(session.selected_model(), Some("llama3"));
    }

    #[test]
    fn adopting_models_keeps_installed_selection() {
        let mut session = Session::new();
        session.select_model("qwen3");
        session.log.append(Role::User, "hi");
        let listed = vec!["llama3".to_string(), "qwen3".to_string()];
        assert!(!session.adopt_models(&listed));
        assert_eq!(session.selected_model(), Some("qwen3"));
        assert_eq!(session.log.len(), 1);

        // selection uninstalled meanwhile
        assert!(session.adopt_models(&["mistral".to_string()]));
        assert_eq!(session.selected_model(), Some("mistral"));
        assert!(session.log.is_empty());

        // a failed relisting keeps what we had
        assert!(!session.adopt_models(&[]));
        assert_eq!(session.selected_model(), Some("mistral"));
    }

    #[test]
    fn clear_keeps_model() {
        let mut session = Session::new();
        session.select_model("llama3");
        session.log.append(Role::User, "hi");
        session.clear();
        assert!(session.log.is_empty());
        assert_eq!(session.selected_model(), Some("llama3"));
    }

    #[test]
    fn prompt_without_model_is_answered_with_error() {
        let mut session = Session::new();
        assert_eq!(session.begin_turn("hello"), None);
        let roles: Vec<Role> = session.log.iter().map(Message::role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);
        assert_eq!(
            session.log.last().map(Message::content),
            Some("Error: no model selected")
        );
    }

    #[test]
    fn begun_turn_carries_model_and_prompt() {
        let mut session = Session::new();
        session.select_model("llama3");
        let turn = session.begin_turn("hello").unwrap();
        assert_eq!(turn.model(), "llama3");
        assert_eq!(turn.prompt(), "hello");
        assert_eq!(session.log.iter().collect::<Vec<_>>(), vec![&Message::user("hello")]);

        session.finish_turn(Message::assistant("hi there"));
        assert_eq!(session.log.len(), 2);
    }

    #[test]
    fn sessions_are_distinct() {
        assert_ne!(Session::new().id(), Session::new().id());
    }
}
