use crate::typing::DEFAULT_TYPING_DELAY;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Runtime settings shared by both front-ends.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    /// Base URL the endpoint paths are joined onto.
    pub api_base: String,
    pub typing_delay: Duration,
    pub request_timeout: Duration,
    /// Root of the client-side profile store. `None` uses the platform data dir.
    pub storage_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            typing_delay: DEFAULT_TYPING_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            storage_dir: None,
        }
    }
}

impl ClientConfig {
    /// Reads `CHEF_API_BASE`, `CHEF_TYPING_DELAY_MS`, `CHEF_REQUEST_TIMEOUT_SECS` and
    /// `CHEF_STORAGE_DIR`, falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(base) = env::var("CHEF_API_BASE") {
            let base = base.trim();
            if !base.is_empty() {
                config.api_base = base.trim_end_matches('/').to_string();
            }
        }

        if let Ok(raw) = env::var("CHEF_TYPING_DELAY_MS") {
            let ms: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("CHEF_TYPING_DELAY_MS is not a number: {raw}"))?;
            config.typing_delay = Duration::from_millis(ms);
        }

        if let Ok(raw) = env::var("CHEF_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("CHEF_REQUEST_TIMEOUT_SECS is not a number: {raw}"))?;
            config.request_timeout = Duration::from_secs(secs);
        }

        config.storage_dir = env::var_os("CHEF_STORAGE_DIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);

        Ok(config)
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }
}

/// Applies `KEY=VALUE` lines from a bundled config file to the environment.
/// Variables that are already set are left alone.
pub fn apply_bundled_config(contents: &str) {
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim();
            if env::var(key).is_err() {
                // SAFETY: called at startup before any threads are spawned
                unsafe {
                    env::set_var(key, value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_paths() {
        let config = ClientConfig::default().with_api_base("http://chef.local:8080/");
        assert_eq!(config.endpoint("/chat"), "http://chef.local:8080/chat");
        assert_eq!(config.endpoint("menu-data"), "http://chef.local:8080/menu-data");
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.typing_delay, Duration::from_millis(50));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.storage_dir.is_none());
    }
}
