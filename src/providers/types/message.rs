use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::objectid::create_object_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A single chat turn. Messages are never edited after construction, so the
/// fields are only reachable through accessors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    id: String,
    created: DateTime<Utc>,
    content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            id: create_object_id("msg"),
            created: Utc::now(),
            content: content.into(),
        }
    }

    pub fn user(text: &str) -> Self {
        Self::new(Role::User, text)
    }

    pub fn assistant(text: &str) -> Self {
        Self::new(Role::Assistant, text)
    }

    pub fn system(text: &str) -> Self {
        Self::new(Role::System, text)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn text(&self) -> &str {
        &self.content
    }
}
