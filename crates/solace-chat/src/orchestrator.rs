//! Chat orchestrator: one user message in, one assistant reply out.
//!
//! Appends the user turn, replays the session to the model, applies the
//! reply policy and appends the assistant turn. Each turn is stamped when
//! it is appended.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use solace_core::time::now_timestamp;
use solace_core::types::{Role, SessionId, Turn};
use solace_storage::SessionStore;

use crate::error::ChatError;
use crate::model::ChatModel;
use crate::policy::ReplyPolicy;
use crate::prompt::PromptAssembler;

/// Receipt attached to assistant messages in responses and history.
pub const READ_RECEIPT: &str = "Read";

/// Result of one chat exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatExchange {
    pub reply: String,
    /// Timestamp of the stored assistant turn.
    pub timestamp: String,
    pub used_fallback: bool,
}

/// Who a history entry is shown as coming from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A turn reshaped for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub sender: Sender,
    pub message: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_receipt: Option<String>,
}

impl From<Turn> for HistoryEntry {
    fn from(turn: Turn) -> Self {
        match turn.role {
            Role::User => HistoryEntry {
                sender: Sender::User,
                message: turn.content,
                timestamp: turn.timestamp,
                read_receipt: None,
            },
            Role::Assistant => HistoryEntry {
                sender: Sender::Bot,
                message: turn.content,
                timestamp: turn.timestamp,
                read_receipt: Some(READ_RECEIPT.to_string()),
            },
        }
    }
}

/// Coordinates the session store, prompt assembly and the model.
pub struct ChatOrchestrator {
    exchange: Arc<Exchange>,
    max_message_chars: Option<usize>,
}

/// The part of a chat request that runs detached from the caller.
struct Exchange {
    sessions: Arc<dyn SessionStore>,
    model: Arc<dyn ChatModel>,
    assembler: PromptAssembler,
    policy: ReplyPolicy,
}

impl ChatOrchestrator {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        model: Arc<dyn ChatModel>,
        assembler: PromptAssembler,
    ) -> Self {
        Self {
            exchange: Arc::new(Exchange {
                sessions,
                model,
                assembler,
                policy: ReplyPolicy::default(),
            }),
            max_message_chars: None,
        }
    }

    pub fn with_max_message_chars(mut self, limit: Option<usize>) -> Self {
        self.max_message_chars = limit;
        self
    }

    /// Handle one user message in `session_id`.
    ///
    /// Only validation and storage failures are errors; a failed model call
    /// still produces a (fallback) reply, which is stored like any other.
    /// Once validated, the exchange runs on its own task, so dropping the
    /// returned future never leaves a user turn without its reply.
    pub async fn handle_message(
        &self,
        session_id: &SessionId,
        message: &str,
    ) -> Result<ChatExchange, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if let Some(limit) = self.max_message_chars {
            if message.chars().count() > limit {
                return Err(ChatError::MessageTooLong(limit));
            }
        }

        let exchange = Arc::clone(&self.exchange);
        let session_id = session_id.clone();
        let message = message.to_string();
        tokio::spawn(async move { exchange.run(&session_id, &message).await })
            .await
            .map_err(|e| ChatError::Interrupted(e.to_string()))?
    }

    /// The session's turns in display form, oldest first.
    pub fn history(&self, session_id: &SessionId) -> Result<Vec<HistoryEntry>, ChatError> {
        let turns = self.exchange.sessions.turns(session_id)?;
        Ok(turns.into_iter().map(HistoryEntry::from).collect())
    }
}

impl Exchange {
    async fn run(&self, session_id: &SessionId, message: &str) -> Result<ChatExchange, ChatError> {
        self.sessions
            .append_turn(session_id, Role::User, message, &now_timestamp())?;

        let turns = self.sessions.turns(session_id)?;
        let prompt = self.assembler.assemble(&turns)?;
        debug!(
            session = %session_id,
            turns = turns.len(),
            history = prompt.history.len(),
            "Prompt assembled"
        );

        let reply = self.policy.resolve(self.model.generate(&prompt).await);

        let timestamp = now_timestamp();
        self.sessions
            .append_turn(session_id, Role::Assistant, &reply.text, &timestamp)?;

        info!(
            session = %session_id,
            model = self.model.model_id(),
            fallback = reply.used_fallback,
            "Chat reply stored"
        );

        Ok(ChatExchange {
            reply: reply.text,
            timestamp,
            used_fallback: reply.used_fallback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::policy::FALLBACK_REPLY;
    use crate::prompt::ChatPrompt;
    use async_trait::async_trait;
    use solace_storage::InMemorySessionStore;
    use std::sync::Mutex;

    /// Records every prompt and answers from a script.
    struct ScriptedModel {
        replies: Mutex<Vec<Result<String, ProviderError>>>,
        seen: Mutex<Vec<ChatPrompt>>,
    }

    impl ScriptedModel {
        fn new(replies: Vec<Result<String, ProviderError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn prompts(&self) -> Vec<ChatPrompt> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn generate(&self, prompt: &ChatPrompt) -> Result<String, ProviderError> {
            self.seen.lock().unwrap().push(prompt.clone());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok("default reply".to_string()))
        }

        fn model_id(&self) -> &str {
            "scripted"
        }
    }

    fn setup(
        replies: Vec<Result<String, ProviderError>>,
    ) -> (ChatOrchestrator, Arc<ScriptedModel>, Arc<InMemorySessionStore>) {
        let store = Arc::new(InMemorySessionStore::new());
        let model = Arc::new(ScriptedModel::new(replies));
        let orchestrator = ChatOrchestrator::new(
            store.clone(),
            model.clone(),
            PromptAssembler::default(),
        );
        (orchestrator, model, store)
    }

    #[tokio::test]
    async fn test_first_message_sends_single_prompt() {
        let (chat, model, store) = setup(vec![Ok("  You're not alone 💛  ".to_string())]);
        let session = SessionId::new("s1");

        let exchange = chat.handle_message(&session, "I feel anxious").await.unwrap();
        assert_eq!(exchange.reply, "You're not alone 💛");
        assert!(!exchange.used_fallback);

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].history.is_empty());
        assert_eq!(prompts[0].prompt, "I feel anxious");

        let turns = store.turns(&session).unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].content, "I feel anxious");
        assert_eq!(turns[1].role, Role::Assistant);
        assert_eq!(turns[1].content, "You're not alone 💛");
        assert_eq!(turns[1].timestamp, exchange.timestamp);
    }

    #[tokio::test]
    async fn test_second_message_replays_history() {
        let (chat, model, _store) = setup(vec![Ok("one".to_string()), Ok("two".to_string())]);
        let session = SessionId::new("s1");

        chat.handle_message(&session, "first").await.unwrap();
        chat.handle_message(&session, "second").await.unwrap();

        let prompts = model.prompts();
        let history: Vec<_> = prompts[1]
            .history
            .iter()
            .map(|m| (m.role, m.text.as_str()))
            .collect();
        assert_eq!(
            history,
            vec![
                (crate::prompt::ProviderRole::User, "first"),
                (crate::prompt::ProviderRole::Model, "one"),
            ]
        );
        assert_eq!(prompts[1].prompt, "second");
    }

    #[tokio::test]
    async fn test_provider_failure_stores_fallback() {
        let (chat, _model, store) = setup(vec![Err(ProviderError::timeout("deadline"))]);
        let session = SessionId::new("s1");

        let exchange = chat.handle_message(&session, "hello").await.unwrap();
        assert_eq!(exchange.reply, FALLBACK_REPLY);
        assert!(exchange.used_fallback);

        let turns = store.turns(&session).unwrap();
        assert_eq!(turns[1].content, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_empty_message_rejected_without_side_effects() {
        let (chat, model, store) = setup(vec![]);
        let session = SessionId::new("s1");

        for message in ["", "   ", "\n\t"] {
            let err = chat.handle_message(&session, message).await.unwrap_err();
            assert!(matches!(err, ChatError::EmptyMessage));
        }
        assert!(model.prompts().is_empty());
        assert!(store.turns(&session).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_message_is_trimmed_before_storing() {
        let (chat, _model, store) = setup(vec![]);
        let session = SessionId::new("s1");
        chat.handle_message(&session, "  hi  ").await.unwrap();
        assert_eq!(store.turns(&session).unwrap()[0].content, "hi");
    }

    #[tokio::test]
    async fn test_message_length_limit() {
        let (chat, _model, _store) = setup(vec![]);
        let chat = chat.with_max_message_chars(Some(5));
        let session = SessionId::new("s1");

        let err = chat.handle_message(&session, "abcdef").await.unwrap_err();
        assert!(matches!(err, ChatError::MessageTooLong(5)));
        assert!(chat.handle_message(&session, "abcde").await.is_ok());
    }

    #[tokio::test]
    async fn test_sessions_do_not_share_history() {
        let (chat, model, _store) = setup(vec![]);
        chat.handle_message(&SessionId::new("a"), "in a").await.unwrap();
        chat.handle_message(&SessionId::new("b"), "in b").await.unwrap();

        let prompts = model.prompts();
        assert!(prompts[1].history.is_empty());
    }

    #[tokio::test]
    async fn test_history_reshapes_turns() {
        let (chat, _model, _store) = setup(vec![Ok("hello back".to_string())]);
        let session = SessionId::new("s1");
        chat.handle_message(&session, "hello").await.unwrap();

        let history = chat.history(&session).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].sender, Sender::User);
        assert_eq!(history[0].message, "hello");
        assert!(history[0].read_receipt.is_none());
        assert_eq!(history[1].sender, Sender::Bot);
        assert_eq!(history[1].message, "hello back");
        assert_eq!(history[1].read_receipt.as_deref(), Some("Read"));

        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(json[0]["sender"], "user");
        assert!(json[0].get("read_receipt").is_none());
        assert_eq!(json[1]["sender"], "bot");
    }

    /// Answers after a fixed delay.
    struct SlowModel {
        delay: std::time::Duration,
    }

    #[async_trait]
    impl ChatModel for SlowModel {
        async fn generate(&self, prompt: &ChatPrompt) -> Result<String, ProviderError> {
            tokio::time::sleep(self.delay).await;
            Ok(format!("re: {}", prompt.prompt))
        }

        fn model_id(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_dropped_request_still_stores_reply() {
        let store = Arc::new(InMemorySessionStore::new());
        let chat = ChatOrchestrator::new(
            store.clone(),
            Arc::new(SlowModel {
                delay: std::time::Duration::from_millis(300),
            }),
            PromptAssembler::default(),
        );
        let session = SessionId::new("s1");

        let abandoned = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            chat.handle_message(&session, "first"),
        )
        .await;
        assert!(abandoned.is_err());

        tokio::time::sleep(std::time::Duration::from_millis(600)).await;
        let roles: Vec<_> = store.turns(&session).unwrap().iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);

        let exchange = chat.handle_message(&session, "second").await.unwrap();
        assert_eq!(exchange.reply, "re: second");

        let turns = store.turns(&session).unwrap();
        let stored: Vec<_> = turns.iter().map(|t| (t.role, t.content.as_str())).collect();
        assert_eq!(
            stored,
            vec![
                (Role::User, "first"),
                (Role::Assistant, "re: first"),
                (Role::User, "second"),
                (Role::Assistant, "re: second"),
            ]
        );
    }

    #[test]
    fn test_history_of_unknown_session_is_empty() {
        let (chat, _model, _store) = setup(vec![]);
        assert!(chat.history(&SessionId::new("nobody")).unwrap().is_empty());
    }
}
