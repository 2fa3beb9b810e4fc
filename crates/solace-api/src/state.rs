//! Application state shared across all route handlers.
//!
//! AppState holds the stores and services behind their traits. It is passed
//! to handlers via axum's State extractor.

use std::sync::Arc;

use solace_chat::{ChatModel, ChatOrchestrator, GenerationParams, PromptAssembler};
use solace_core::config::SolaceConfig;
use solace_core::types::SessionId;
use solace_speech::TranscriptionService;
use solace_storage::{InMemorySessionStore, InMemoryUserStore, SessionStore, UserStore};

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SolaceConfig>,
    pub users: Arc<dyn UserStore>,
    pub chat: Arc<ChatOrchestrator>,
    pub transcriber: Arc<dyn TranscriptionService>,
}

impl AppState {
    pub fn new(
        config: SolaceConfig,
        users: Arc<dyn UserStore>,
        chat: ChatOrchestrator,
        transcriber: Arc<dyn TranscriptionService>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            users,
            chat: Arc::new(chat),
            transcriber,
        }
    }

    /// Wire fresh in-memory stores around the given model and transcriber.
    pub fn in_memory(
        config: SolaceConfig,
        model: Arc<dyn ChatModel>,
        transcriber: Arc<dyn TranscriptionService>,
    ) -> Self {
        let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        let assembler = PromptAssembler::new(GenerationParams::from(&config.llm))
            .with_context_turns(config.chat.context_turns);
        let chat = ChatOrchestrator::new(sessions, model, assembler)
            .with_max_message_chars(config.chat.max_message_chars);

        Self::new(config, Arc::new(InMemoryUserStore::new()), chat, transcriber)
    }

    /// The requested session, or the configured default when absent or blank.
    pub fn session_or_default(&self, requested: Option<&str>) -> SessionId {
        match requested.map(str::trim) {
            Some(id) if !id.is_empty() => SessionId::new(id),
            _ => SessionId::new(self.config.chat.default_session.as_str()),
        }
    }
}
