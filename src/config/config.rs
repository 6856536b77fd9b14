use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{env, fs};
use thiserror::Error;

pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

const CONFIG_DIR: &str = "prompt-history";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{path}: cannot read config file: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path}: invalid config file: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub fallback_model: Option<String>,
    pub api_version: String,
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub prompt_preview_len: usize,
    pub response_preview_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            fallback_model: Some("gemini-2.5-flash-lite".to_string()),
            api_version: "v1beta".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            request_timeout_secs: 60,
            prompt_preview_len: 50,
            response_preview_len: 80,
        }
    }
}

impl Config {
    /// Defaults, then the config file if there is one, then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = env::var_os("PROMPT_HISTORY_CONFIG").map(PathBuf::from);
        let mut config = Self::from_sources(explicit.as_deref(), Self::default_path().as_deref())?;
        config.apply_env(|name| env::var(name).ok());

        Ok(config)
    }

    /// An explicit path must be readable. The default path is optional.
    pub fn from_sources(explicit: Option<&Path>, default: Option<&Path>) -> Result<Self, ConfigError> {
        match (explicit, default) {
            (Some(path), _) => Self::from_file(path),
            (None, Some(path)) if path.is_file() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loaded config from {}", path.display());

        Ok(config)
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.model = model;
        }
        if let Some(model) = lookup("GEMINI_FALLBACK_MODEL") {
            self.fallback_model = if model.trim().is_empty() {
                None
            } else {
                Some(model)
            };
        }
        if let Some(version) = lookup("GEMINI_API_VERSION") {
            self.api_version = version;
        }
        if let Some(url) = lookup("GEMINI_BASE_URL") {
            self.base_url = url;
        }
    }

    /// The API key, unless it is unset, blank or still the placeholder.
    pub fn usable_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }
}
