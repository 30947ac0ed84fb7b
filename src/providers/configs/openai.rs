use super::base::ProviderConfig;
use anyhow::Result;

pub const OPENAI_HOST: &str = "https://api.openai.com/";
pub const OPENAI_MODEL: &str = "gpt-4o";
pub const DEFAULT_MAX_TOKENS: i32 = 1000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct OpenAiProviderConfig {
    pub api_key: String,
    pub host: String,
    pub model: String,
    pub max_tokens: Option<i32>,
    /// Overall bound on a single completion request, in seconds
    pub timeout_secs: u64,
}

impl OpenAiProviderConfig {
    pub fn new(api_key: String, host: String) -> Self {
        Self {
            api_key,
            host,
            model: OPENAI_MODEL.to_string(),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl ProviderConfig for OpenAiProviderConfig {
    fn from_env() -> Result<Self> {
        Self::from_env_with_key(None)
    }
}

impl OpenAiProviderConfig {
    /// Like `from_env`, but an explicit key wins over `OPENAI_API_KEY`.
    pub fn from_env_with_key(api_key: Option<String>) -> Result<Self> {
        let api_key = match api_key {
            Some(key) => key,
            None => Self::get_env("OPENAI_API_KEY", true, None)?
                .ok_or_else(|| anyhow::anyhow!("OpenAI API key should be present"))?,
        };

        let host = Self::get_env("OPENAI_API_HOST", false, Some(OPENAI_HOST.to_string()))?
            .unwrap_or_else(|| OPENAI_HOST.to_string());

        let model = Self::get_env("MODEL_NAME", false, Some(OPENAI_MODEL.to_string()))?
            .unwrap_or_else(|| OPENAI_MODEL.to_string());

        let max_tokens = Self::get_env_parsed("MAX_TOKENS", DEFAULT_MAX_TOKENS)?;
        let timeout_secs = Self::get_env_parsed("COMMAND_TIMEOUT", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            api_key,
            host,
            model,
            max_tokens: Some(max_tokens),
            timeout_secs,
        })
    }
}
