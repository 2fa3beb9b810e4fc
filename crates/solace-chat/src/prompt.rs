//! Prompt assembly.
//!
//! A session's turns become a provider-shaped request: every turn but the
//! last is replayed as prior history, and the last turn's content is the
//! new prompt sent against that history and the persona instruction.

use serde::Serialize;

use solace_core::config::LlmConfig;
use solace_core::types::{Role, Turn};

use crate::error::ChatError;
use crate::persona::PERSONA_PROMPT;

/// Sampling parameters forwarded to the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            top_p: 0.9,
            max_output_tokens: 250,
        }
    }
}

impl From<&LlmConfig> for GenerationParams {
    fn from(config: &LlmConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

/// Role names as the provider expects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderRole {
    User,
    /// Turns authored by the model.
    Model,
}

impl From<Role> for ProviderRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => ProviderRole::User,
            Role::Assistant => ProviderRole::Model,
        }
    }
}

/// One prior-history message in provider form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderMessage {
    pub role: ProviderRole,
    pub text: String,
}

/// Everything a `ChatModel` needs for one completion.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPrompt {
    pub system_instruction: String,
    pub history: Vec<ProviderMessage>,
    /// Content of the newest turn, sent as the user's next message.
    pub prompt: String,
    pub params: GenerationParams,
}

/// Builds `ChatPrompt`s from session turns.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    system_instruction: String,
    params: GenerationParams,
    /// Maximum prior turns replayed. `None` replays the whole session.
    context_turns: Option<usize>,
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self::new(GenerationParams::default())
    }
}

impl PromptAssembler {
    pub fn new(params: GenerationParams) -> Self {
        Self {
            system_instruction: PERSONA_PROMPT.to_string(),
            params,
            context_turns: None,
        }
    }

    pub fn with_context_turns(mut self, context_turns: Option<usize>) -> Self {
        self.context_turns = context_turns;
        self
    }

    /// Assemble a prompt from the full ordered turn sequence.
    ///
    /// Fails with `EmptyConversation` when `turns` is empty.
    pub fn assemble(&self, turns: &[Turn]) -> Result<ChatPrompt, ChatError> {
        let (newest, prior) = turns.split_last().ok_or(ChatError::EmptyConversation)?;

        let start = match self.context_turns {
            Some(limit) => prior.len().saturating_sub(limit),
            None => 0,
        };

        let history = prior[start..]
            .iter()
            .map(|turn| ProviderMessage {
                role: turn.role.into(),
                text: turn.content.clone(),
            })
            .collect();

        Ok(ChatPrompt {
            system_instruction: self.system_instruction.clone(),
            history,
            prompt: newest.content.clone(),
            params: self.params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(role: Role, content: &str) -> Turn {
        Turn::new(role, content, "2024-01-01 00:00:00")
    }

    #[test]
    fn test_single_turn_has_empty_history() {
        let assembler = PromptAssembler::default();
        let prompt = assembler.assemble(&[turn(Role::User, "hello")]).unwrap();

        assert!(prompt.history.is_empty());
        assert_eq!(prompt.prompt, "hello");
        assert_eq!(prompt.system_instruction, PERSONA_PROMPT);
    }

    #[test]
    fn test_empty_sequence_rejected() {
        let assembler = PromptAssembler::default();
        assert!(matches!(
            assembler.assemble(&[]),
            Err(ChatError::EmptyConversation)
        ));
    }

    #[test]
    fn test_prior_turns_map_roles() {
        let assembler = PromptAssembler::default();
        let turns = vec![
            turn(Role::User, "I feel anxious"),
            turn(Role::Assistant, "I'm here with you"),
            turn(Role::User, "thanks"),
        ];
        let prompt = assembler.assemble(&turns).unwrap();

        assert_eq!(
            prompt.history,
            vec![
                ProviderMessage {
                    role: ProviderRole::User,
                    text: "I feel anxious".to_string()
                },
                ProviderMessage {
                    role: ProviderRole::Model,
                    text: "I'm here with you".to_string()
                },
            ]
        );
        assert_eq!(prompt.prompt, "thanks");
    }

    #[test]
    fn test_context_window_keeps_most_recent() {
        let assembler = PromptAssembler::default().with_context_turns(Some(2));
        let turns = vec![
            turn(Role::User, "a"),
            turn(Role::Assistant, "b"),
            turn(Role::User, "c"),
            turn(Role::Assistant, "d"),
            turn(Role::User, "e"),
        ];
        let prompt = assembler.assemble(&turns).unwrap();
        let texts: Vec<_> = prompt.history.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["c", "d"]);
        assert_eq!(prompt.prompt, "e");
    }

    #[test]
    fn test_context_window_zero_sends_prompt_only() {
        let assembler = PromptAssembler::default().with_context_turns(Some(0));
        let turns = vec![turn(Role::User, "a"), turn(Role::User, "b")];
        let prompt = assembler.assemble(&turns).unwrap();
        assert!(prompt.history.is_empty());
        assert_eq!(prompt.prompt, "b");
    }

    #[test]
    fn test_params_from_config() {
        let config = LlmConfig {
            temperature: 0.3,
            top_p: 0.5,
            ..LlmConfig::default()
        };
        let params = GenerationParams::from(&config);
        assert!((params.temperature - 0.3).abs() < f32::EPSILON);
        assert!((params.top_p - 0.5).abs() < f32::EPSILON);
        assert_eq!(params.max_output_tokens, 250);
    }

    #[test]
    fn test_provider_role_serialization() {
        assert_eq!(
            serde_json::to_string(&ProviderRole::Model).unwrap(),
            "\"model\""
        );
        assert_eq!(serde_json::to_string(&ProviderRole::User).unwrap(), "\"user\"");
    }
}
