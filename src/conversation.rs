use std::collections::VecDeque;

use crate::providers::types::message::{Message, Role};

pub const DEFAULT_MAX_HISTORY: usize = 10;

/// Bounded chat history fed to the model as context.
///
/// Append-only: once `max_history` is exceeded the oldest message is evicted.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    messages: VecDeque<Message>,
    max_history: usize,
}

impl ConversationHistory {
    pub fn new(max_history: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(max_history + 1),
            max_history,
        }
    }

    pub fn add_message(&mut self, role: Role, content: &str) {
        self.messages.push_back(Message::new(role, content));
        while self.messages.len() > self.max_history {
            self.messages.pop_front();
        }
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn to_vec(&self) -> Vec<Message> {
        self.messages.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}
