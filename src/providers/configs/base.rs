use anyhow::{anyhow, Context, Result};
use std::env;
use std::str::FromStr;

pub trait ProviderConfig {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self>
    where
        Self: Sized;

    /// Helper function to get environment variables with error handling
    fn get_env(key: &str, required: bool, default: Option<String>) -> Result<Option<String>> {
        match env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) if !required => Ok(default),
            Err(env::VarError::NotPresent) => Err(anyhow!(
                "Environment variable '{}' is required but not set.",
                key
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Optional variable parsed into `T`, falling back to `default` when unset
    fn get_env_parsed<T>(key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match Self::get_env(key, false, None)? {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Environment variable '{}' has an invalid value: {}", key, raw)),
            None => Ok(default),
        }
    }
}
