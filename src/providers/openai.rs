use anyhow::{anyhow, Result};
use reqwest::blocking::Client; // blocking API: each turn waits for the model before continuing
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

use super::{
    base::{Provider, Usage},
    configs::base::ProviderConfig,
    configs::openai::OpenAiProviderConfig,
    types::message::Message,
    utils::{check_openai_context_length_error, messages_to_openai_spec, openai_response_to_message},
};

pub struct OpenAiProvider {
    client: Client,
    config: OpenAiProviderConfig,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn get_usage(data: &Value) -> Usage {
        let Some(usage) = data.get("usage") else {
            return Usage::default();
        };

        let input_tokens = usage
            .get("prompt_tokens")
            .and_then(|v| v.as_i64())
            .map(|v| v as i32);

        let output_tokens = usage
            .get("completion_tokens")
            .and_then(|v| v.as_i64())
            .map(|v| v as i32);

        let total_tokens = usage
            .get("total_tokens")
            .and_then(|v| v.as_i64())
            .map(|v| v as i32)
            .or_else(|| match (input_tokens, output_tokens) {
                (Some(input), Some(output)) => Some(input + output),
                _ => None,
            });

        Usage::new(input_tokens, output_tokens, total_tokens)
    }

    fn post(&self, payload: Value) -> Result<Value> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.host.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&payload)
            .send()?;

        match response.status() {
            StatusCode::OK => Ok(response.json()?),
            StatusCode::BAD_REQUEST => {
                // Oversized prompts come back as 400 with a structured error body
                let body: Value = response.json().unwrap_or(Value::Null);
                if let Some(err) = body.get("error").and_then(check_openai_context_length_error) {
                    return Err(err.into());
                }
                Err(anyhow!("Request failed: 400 Bad Request\nBody: {}", body))
            }
            status if status == StatusCode::TOO_MANY_REQUESTS || status.as_u16() >= 500 => {
                Err(anyhow!("Server error: {}", status))
            }
            status => Err(anyhow!("Request failed: {}", status)),
        }
    }
}

impl Provider for OpenAiProvider {
    fn from_env() -> Result<Self> {
        let config = OpenAiProviderConfig::from_env()?;
        Self::new(config)
    }

    fn complete(
        &self,
        system: &str,
        messages: &[Message],
        max_tokens: Option<i32>,
    ) -> Result<(Message, Usage)> {
        // system message first
        let mut messages_array = messages_to_openai_spec(&[Message::system(system)]);
        messages_array.extend(messages_to_openai_spec(messages));

        let mut payload = json!({
            "model": self.config.model,
            "messages": messages_array
        });

        if let Some(tokens) = max_tokens.or(self.config.max_tokens) {
            payload["max_tokens"] = json!(tokens);
        }

        let response = self.post(payload)?;

        // Raise specific error if context length is exceeded
        if let Some(error) = response.get("error") {
            if let Some(err) = check_openai_context_length_error(error) {
                return Err(err.into());
            }
            return Err(anyhow!("OpenAI API error: {}", error));
        }

        let message = openai_response_to_message(&response)?;
        let usage = Self::get_usage(&response);

        Ok((message, usage))
    }
}
