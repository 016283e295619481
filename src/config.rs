use crate::error::ConfigError;

pub const URL_VAR: &str = "SUPABASE_URL";
pub const KEY_VAR: &str = "SUPABASE_KEY";
pub const LOG_FILTER_VAR: &str = "FINO_FEED_LOG";
pub const DEFAULT_LOG_FILTER: &str = "fino_feed=info";

/// Connection parameters for the remote store, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store_url: String,
    pub store_key: String,
}

impl Config {
    /// Command-line values win over the process environment.
    pub fn from_env(url: Option<String>, key: Option<String>) -> Result<Self, ConfigError> {
        Self::from_lookup(url, key, |name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(
        url: Option<String>,
        key: Option<String>,
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_url = required(URL_VAR, url.or_else(|| lookup(URL_VAR)))?;
        let store_key = required(KEY_VAR, key.or_else(|| lookup(KEY_VAR)))?;

        if !(store_url.starts_with("http://") || store_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(store_url));
        }

        Ok(Self {
            store_url: store_url.trim_end_matches('/').to_string(),
            store_key,
        })
    }
}

fn required(name: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    let value = value.ok_or(ConfigError::Missing(name))?;
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::Blank(name));
    }
    Ok(value.to_string())
}
