use thiserror::Error;

use crate::classifier::Domain;

/// Everything that can go wrong while turning one utterance into a reply.
///
/// None of these end the session; the dispatcher renders each one as a chat
/// message. A user declining to send an email is an outcome, not an error.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    #[error("The AI model is unavailable: {0}")]
    ModelUnavailable(String),

    #[error("The content is too long for the AI model to process. Please try with fewer emails or shorter content.")]
    ContentTooLarge { detail: String },

    #[error("Model output is not a valid analysis: {0}")]
    MalformedAnalysis(String),

    #[error("Could not determine the {domain} action")]
    UnclassifiedIntent { domain: Domain },

    #[error("Invalid value for `{entity}`: {reason}")]
    InvalidParameter { entity: String, reason: String },

    #[error("Backend failure while {operation}: {message}")]
    BackendFailure {
        operation: &'static str,
        message: String,
    },
}

impl AgentError {
    pub fn backend(operation: &'static str, err: impl std::fmt::Display) -> Self {
        Self::BackendFailure {
            operation,
            message: err.to_string(),
        }
    }

    pub fn invalid(entity: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            entity: entity.to_string(),
            reason: reason.into(),
        }
    }
}

pub type AgentResult<T> = Result<T, AgentError>;
