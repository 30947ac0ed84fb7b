use anyhow::{anyhow, Result};
use serde_json::{json, Value};

use super::types::message::{Message, Role};

/// Convert internal Message format to OpenAI's API message specification
pub fn messages_to_openai_spec(messages: &[Message]) -> Vec<Value> {
    messages
        .iter()
        .map(|message| {
            json!({
                "role": message.role(),
                "content": message.text(),
            })
        })
        .collect()
}

/// Convert OpenAI's API response to internal Message format, keeping the top choice
pub fn openai_response_to_message(response: &Value) -> Result<Message> {
    let choice = response
        .get("choices")
        .and_then(|choices| choices.get(0))
        .ok_or_else(|| anyhow!("OpenAI response contained no choices"))?;

    let text = choice["message"]
        .get("content")
        .and_then(|content| content.as_str())
        .unwrap_or_default();

    Ok(Message::new(Role::Assistant, text))
}

/// The prompt sent to the model exceeded its context window.
#[derive(Debug, thiserror::Error)]
#[error("Input message too long. Message: {0}")]
pub struct ContextLengthExceeded(pub String);

pub fn check_openai_context_length_error(error: &Value) -> Option<ContextLengthExceeded> {
    let code = error.get("code")?.as_str()?;
    if code == "context_length_exceeded" || code == "string_above_max_length" {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error")
            .to_string();
        Some(ContextLengthExceeded(message))
    } else {
        None
    }
}
