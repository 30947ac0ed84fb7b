use anyhow::Result;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::base::{Provider, Usage};
use super::types::message::Message;

/// A mock provider that returns pre-configured responses for testing and
/// records every message sequence it was asked to complete.
#[derive(Clone, Default)]
pub struct MockProvider {
    responses: Arc<Mutex<VecDeque<Result<String>>>>,
    calls: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl MockProvider {
    pub fn new(responses: Vec<&str>) -> Self {
        Self::with_results(responses.into_iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn with_results(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap().clone()
    }
}

impl Provider for MockProvider {
    fn from_env() -> Result<Self> {
        Ok(Self::default())
    }

    fn complete(
        &self,
        _system: &str,
        messages: &[Message],
        _max_tokens: Option<i32>,
    ) -> Result<(Message, Usage)> {
        self.calls.lock().unwrap().push(messages.to_vec());
        // Empty response once the script runs out
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()));
        next.map(|text| (Message::assistant(&text), Usage::default()))
    }
}
