//! Reply policy: provider failures never reach the user as errors.
//!
//! The model call returns a typed result; this layer logs any failure with
//! its cause and substitutes a fixed, friendly reply.

use tracing::error;

use crate::error::ProviderError;

/// Text shown to the user whenever the model call fails.
pub const FALLBACK_REPLY: &str = "Oops! Something went wrong. Try again later.";

/// The assistant text to show, and whether it came from the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub used_fallback: bool,
}

/// Maps model results to user-facing replies.
#[derive(Debug, Clone)]
pub struct ReplyPolicy {
    fallback: String,
}

impl Default for ReplyPolicy {
    fn default() -> Self {
        Self {
            fallback: FALLBACK_REPLY.to_string(),
        }
    }
}

impl ReplyPolicy {
    pub fn resolve(&self, result: Result<String, ProviderError>) -> Reply {
        match result {
            Ok(text) => Reply {
                text: text.trim().to_string(),
                used_fallback: false,
            },
            Err(err) => {
                error!(kind = ?err.kind, error = %err, "LLM call failed, replying with fallback");
                Reply {
                    text: self.fallback.clone(),
                    used_fallback: true,
                }
            }
        }
    }
}
