use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::types::message::Message;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: Option<i32>,
    pub output_tokens: Option<i32>,
    pub total_tokens: Option<i32>,
}

impl Usage {
    pub fn new(
        input_tokens: Option<i32>,
        output_tokens: Option<i32>,
        total_tokens: Option<i32>,
    ) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens,
        }
    }
}

/// Base trait for language model providers.
///
/// Calls block until the provider answers. Implementations report an
/// oversized prompt as [`super::utils::ContextLengthExceeded`] inside the
/// returned error so callers can tell it apart from other failures.
pub trait Provider: Send + Sync {
    /// Create a provider instance from environment variables
    fn from_env() -> Result<Self>
    where
        Self: Sized;

    /// Generate the next assistant message for the system prompt and message sequence
    fn complete(
        &self,
        system: &str,
        messages: &[Message],
        max_tokens: Option<i32>,
    ) -> Result<(Message, Usage)>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_usage_creation() {
        let usage = Usage::new(Some(10), Some(20), Some(30));
        assert_eq!(usage.input_tokens, Some(10));
        assert_eq!(usage.output_tokens, Some(20));
        assert_eq!(usage.total_tokens, Some(30));
    }

    #[test]
    fn test_usage_serialization() -> Result<()> {
        let usage = Usage::new(Some(10), None, Some(30));
        let json_value = serde_json::to_value(&usage)?;
        assert_eq!(json_value["input_tokens"], json!(10));
        assert_eq!(json_value["output_tokens"], json!(null));
        assert_eq!(json_value["total_tokens"], json!(30));
        Ok(())
    }
}
