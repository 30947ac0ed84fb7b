use anyhow::{anyhow, Result};
use std::path::PathBuf;
use tracing::Level;

use crate::conversation::DEFAULT_MAX_HISTORY;
use crate::providers::configs::base::ProviderConfig;

pub const DEFAULT_LOG_FILE: &str = "calendar_agent.log";

/// Process-level settings that are not tied to a remote service.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub log_level: Level,
    pub log_file: PathBuf,
    pub max_history: usize,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            max_history: DEFAULT_MAX_HISTORY,
        }
    }
}

impl AgentSettings {
    pub fn with_log_level(mut self, level: Option<Level>) -> Self {
        if let Some(level) = level {
            self.log_level = level;
        }
        self
    }
}

impl ProviderConfig for AgentSettings {
    fn from_env() -> Result<Self> {
        let log_level = Self::get_env_parsed("LOG_LEVEL", Level::INFO)?;
        let log_file = Self::get_env("LOG_FILE", false, Some(DEFAULT_LOG_FILE.to_string()))?
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
        let max_history = Self::get_env_parsed("MAX_HISTORY", DEFAULT_MAX_HISTORY)?;
        if max_history == 0 {
            return Err(anyhow!("MAX_HISTORY must be at least 1"));
        }

        Ok(Self {
            log_level,
            log_file,
            max_history,
        })
    }
}
