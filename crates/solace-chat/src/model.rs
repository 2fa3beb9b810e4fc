//! The language model seam.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::prompt::ChatPrompt;

/// A hosted model that can continue a conversation.
///
/// Implementations return the raw reply text; trimming and the fallback
/// policy are applied by the caller.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn generate(&self, prompt: &ChatPrompt) -> Result<String, ProviderError>;

    fn model_id(&self) -> &str;
}
