//! Conversational core for Solace.
//!
//! Turns a session's history into a prompt for the hosted language model,
//! calls the model through the `ChatModel` seam, and applies the reply
//! policy that keeps provider failures out of the chat.

pub mod error;
pub mod gemini;
pub mod model;
pub mod orchestrator;
pub mod persona;
pub mod policy;
pub mod prompt;

pub use error::{ChatError, ProviderError, ProviderErrorKind};
pub use gemini::GeminiClient;
pub use model::ChatModel;
pub use orchestrator::{ChatExchange, ChatOrchestrator, HistoryEntry, Sender};
pub use persona::PERSONA_PROMPT;
pub use policy::{Reply, ReplyPolicy, FALLBACK_REPLY};
pub use prompt::{ChatPrompt, GenerationParams, PromptAssembler, ProviderMessage, ProviderRole};
