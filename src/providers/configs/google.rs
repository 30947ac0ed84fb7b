use super::base::ProviderConfig;
use anyhow::Result;

pub const GMAIL_HOST: &str = "https://gmail.googleapis.com/";
pub const CALENDAR_HOST: &str = "https://www.googleapis.com/";

/// Connection settings for the Gmail and Calendar REST APIs. The access token
/// is obtained out of band; this crate does not run an OAuth flow.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub access_token: String,
    pub gmail_host: String,
    pub calendar_host: String,
    pub timeout_secs: u64,
}

impl GoogleConfig {
    pub fn new(access_token: String) -> Self {
        Self {
            access_token,
            gmail_host: GMAIL_HOST.to_string(),
            calendar_host: CALENDAR_HOST.to_string(),
            timeout_secs: super::openai::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ProviderConfig for GoogleConfig {
    fn from_env() -> Result<Self> {
        let access_token = Self::get_env("GOOGLE_ACCESS_TOKEN", true, None)?
            .ok_or_else(|| anyhow::anyhow!("Google access token should be present"))?;

        let gmail_host = Self::get_env("GMAIL_API_HOST", false, None)?
            .unwrap_or_else(|| GMAIL_HOST.to_string());
        let calendar_host = Self::get_env("CALENDAR_API_HOST", false, None)?
            .unwrap_or_else(|| CALENDAR_HOST.to_string());
        let timeout_secs =
            Self::get_env_parsed("COMMAND_TIMEOUT", super::openai::DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            access_token,
            gmail_host,
            calendar_host,
            timeout_secs,
        })
    }
}
