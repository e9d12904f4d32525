use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 20;

const ENV_BASE_URL: &str = "CHANSYNC_BASE_URL";
const ENV_API_TOKEN: &str = "CHANSYNC_API_TOKEN";
const ENV_TIMEOUT_SECS: &str = "CHANSYNC_TIMEOUT_SECS";

const CONFIG_FILE_NAME: &str = "chansync.toml";

/// Runtime configuration for the sync clients.
///
/// Resolution order, later wins: built-in defaults, `chansync.toml`
/// (working directory, then the user config directory), `CHANSYNC_*`
/// environment variables, explicit CLI overrides.
#[derive(Debug, Clone)]
pub struct Config {
    /// Dashboard backend base URL, no trailing slash required.
    pub base_url: String,
    /// DRF-style token sent as `Authorization: Token <value>`.
    pub api_token: Option<String>,
    pub timeout: Duration,
}

/// Values a caller (the CLI) wants to force regardless of file/env.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub api_token: Option<String>,
}

/// On-disk shape of `chansync.toml`. All keys optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub api_token: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Resolve configuration from file, environment, and overrides.
    pub fn load(overrides: ConfigOverrides) -> Result<Self> {
        let file = match Self::find_config_file() {
            Some(path) => ConfigFile::load(&path)?,
            None => ConfigFile::default(),
        };
        Self::resolve(file, overrides)
    }

    /// Same as [`Config::load`] but with an explicit file path, so the
    /// lookup rules stay out of tests.
    pub fn load_from(path: &Path, overrides: ConfigOverrides) -> Result<Self> {
        Self::resolve(ConfigFile::load(path)?, overrides)
    }

    fn resolve(file: ConfigFile, overrides: ConfigOverrides) -> Result<Self> {
        let mut config = Config::default();

        if let Some(base_url) = file.base_url {
            config.base_url = base_url;
        }
        if let Some(token) = file.api_token {
            config.api_token = Some(token);
        }
        if let Some(secs) = file.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(base_url) = non_empty_env(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        if let Some(token) = non_empty_env(ENV_API_TOKEN) {
            config.api_token = Some(token);
        }
        if let Some(raw) = non_empty_env(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw
                .parse()
                .with_context(|| format!("{ENV_TIMEOUT_SECS} must be an integer, got {raw:?}"))?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(base_url) = overrides.base_url {
            config.base_url = base_url;
        }
        if let Some(token) = overrides.api_token {
            config.api_token = Some(token);
        }

        config.base_url = config.base_url.trim_end_matches('/').to_string();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(anyhow!("base_url must not be empty"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(anyhow!(
                "base_url must start with http:// or https://, got {:?}",
                self.base_url
            ));
        }
        if self.timeout.is_zero() {
            return Err(anyhow!("timeout must be greater than zero"));
        }
        if let Some(token) = &self.api_token {
            if token.trim().is_empty() {
                return Err(anyhow!("api_token is set but empty"));
            }
        }
        Ok(())
    }

    /// `chansync.toml` in the working directory wins over the user
    /// config directory.
    fn find_config_file() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return Some(local);
        }
        let user = dirs::config_dir()?.join("chansync").join(CONFIG_FILE_NAME);
        user.exists().then_some(user)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
