//! Configuration management for Chatline
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//!
//! Precedence, lowest to highest: built-in defaults, YAML file, environment
//! (including a `.env` file loaded by the binary), command-line flags.

use crate::error::{ChatlineError, Result};
use crate::profile::{Profile, ProfileCatalog, TextDirection};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding `endpoint.url`
pub const ENV_API_URL: &str = "API_URL";
/// Environment variable overriding `endpoint.timeout_seconds`
pub const ENV_TIMEOUT: &str = "CHATLINE_TIMEOUT_SECONDS";
/// Environment variable overriding `endpoint.connect_timeout_seconds`
pub const ENV_CONNECT_TIMEOUT: &str = "CHATLINE_CONNECT_TIMEOUT_SECONDS";

/// Main configuration structure for Chatline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend endpoint settings
    #[serde(default)]
    pub endpoint: EndpointConfig,

    /// Selectable profiles, in display order. The first is the default.
    #[serde(default = "default_profiles")]
    pub profiles: Vec<ProfileConfig>,

    /// Interactive chat settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Backend endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// URL every turn is posted to
    #[serde(default)]
    pub url: String,

    /// Upper bound for a whole turn, including the streamed reply (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Upper bound for establishing the connection (seconds)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

fn default_timeout() -> u64 {
    120
}

fn default_connect_timeout() -> u64 {
    10
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl EndpointConfig {
    /// Parse the configured URL
    ///
    /// # Errors
    ///
    /// Returns [`ChatlineError::Config`] if the URL is empty, malformed, or
    /// not http(s).
    pub fn parsed_url(&self) -> Result<url::Url> {
        let raw = self.url.trim();
        if raw.is_empty() {
            return Err(ChatlineError::Config(format!(
                "Endpoint URL is not set (configure endpoint.url or {})",
                ENV_API_URL
            ))
            .into());
        }

        let parsed = url::Url::parse(raw).map_err(|e| {
            ChatlineError::Config(format!("Invalid endpoint URL '{}': {}", raw, e))
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(ChatlineError::Config(format!(
                "Unsupported endpoint scheme: {}. Must be http or https",
                other
            ))
            .into()),
        }
    }
}

/// One selectable profile as written in the config file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileConfig {
    /// Name shown to the user and used for lookup
    pub name: String,

    /// Backend identifier written literally in the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_id: Option<String>,

    /// Environment variable holding the backend identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_id_env: Option<String>,

    /// Text direction of this profile
    #[serde(default)]
    pub direction: TextDirection,

    /// Input hint; a direction-specific default is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl ProfileConfig {
    fn from_env_var(name: &str, env: &str, direction: TextDirection) -> Self {
        Self {
            name: name.to_string(),
            backend_id: None,
            backend_id_env: Some(env.to_string()),
            direction,
            placeholder: None,
        }
    }

    /// Build the runtime profile
    ///
    /// # Errors
    ///
    /// Returns [`ChatlineError::Config`] if no backend identifier resolved.
    pub fn to_profile(&self) -> Result<Profile> {
        let backend_id = self
            .backend_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                let hint = match &self.backend_id_env {
                    Some(var) => format!(" (set {})", var),
                    None => " (set backend_id or backend_id_env)".to_string(),
                };
                ChatlineError::Config(format!(
                    "Missing backend identifier for profile '{}'{}",
                    self.name, hint
                ))
            })?;

        let profile = Profile::new(self.name.clone(), backend_id, self.direction);
        Ok(match &self.placeholder {
            Some(text) => profile.with_placeholder(text.clone()),
            None => profile,
        })
    }
}

/// The two profiles the front-end ships with
fn default_profiles() -> Vec<ProfileConfig> {
    vec![
        ProfileConfig::from_env_var("English", "Unique_ID_Eng", TextDirection::Ltr),
        ProfileConfig::from_env_var("Arabic", "Unique_ID_Arabic", TextDirection::Rtl),
    ]
}

/// Interactive chat configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Profile active when a session starts; the first profile if unset
    #[serde(default)]
    pub default_profile: Option<String>,

    /// Fixed display width; the terminal width is used if unset
    #[serde(default)]
    pub render_width: Option<usize>,
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error: defaults are used instead.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file {} not found, using defaults", path);
            Self::default_config()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn default_config() -> Self {
        Self {
            endpoint: EndpointConfig::default(),
            profiles: default_profiles(),
            chat: ChatConfig::default(),
        }
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        tracing::debug!("Loaded configuration from {}", path);
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply environment overrides using `lookup` to read variables
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            tracing::debug!("Env override: {}", ENV_API_URL);
            self.endpoint.url = url;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT) {
            match raw.parse::<u64>() {
                Ok(v) => {
                    self.endpoint.timeout_seconds = v;
                    tracing::debug!(timeout_seconds = v, "Env override: {}", ENV_TIMEOUT);
                }
                Err(_) => tracing::warn!("Invalid value for {}: {}", ENV_TIMEOUT, raw),
            }
        }

        if let Some(raw) = lookup(ENV_CONNECT_TIMEOUT) {
            match raw.parse::<u64>() {
                Ok(v) => {
                    self.endpoint.connect_timeout_seconds = v;
                    tracing::debug!(
                        connect_timeout_seconds = v,
                        "Env override: {}",
                        ENV_CONNECT_TIMEOUT
                    );
                }
                Err(_) => tracing::warn!("Invalid value for {}: {}", ENV_CONNECT_TIMEOUT, raw),
            }
        }

        for profile in &mut self.profiles {
            let Some(var) = profile.backend_id_env.as_deref() else {
                continue;
            };
            if let Some(id) = lookup(var).filter(|v| !v.trim().is_empty()) {
                tracing::debug!(profile = %profile.name, "Backend id resolved from {}", var);
                profile.backend_id = Some(id);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }
        if let Some(endpoint) = &cli.endpoint {
            tracing::debug!("CLI override: endpoint");
            self.endpoint.url = endpoint.clone();
        }
        if let Some(profile) = &cli.profile {
            tracing::debug!("CLI override: profile {}", profile);
            self.chat.default_profile = Some(profile.clone());
        }
    }

    /// Build the profile catalog from the configured profiles
    ///
    /// # Errors
    ///
    /// Returns [`ChatlineError::Config`] if a profile has no backend
    /// identifier, names repeat, or the list is empty.
    pub fn catalog(&self) -> Result<ProfileCatalog> {
        let profiles = self
            .profiles
            .iter()
            .map(ProfileConfig::to_profile)
            .collect::<Result<Vec<_>>>()?;
        ProfileCatalog::new(profiles)
    }

    /// Validate the configuration
    ///
    /// Ensures the endpoint is usable and every profile resolves, so a
    /// malformed request is never sent.
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        self.endpoint.parsed_url()?;

        if self.endpoint.timeout_seconds == 0 {
            return Err(ChatlineError::Config(
                "endpoint.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.endpoint.connect_timeout_seconds == 0 {
            return Err(ChatlineError::Config(
                "endpoint.connect_timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        let catalog = self.catalog()?;

        if let Some(name) = &self.chat.default_profile {
            catalog.require(name)?;
        }

        if self.chat.render_width == Some(0) {
            return Err(ChatlineError::Config(
                "chat.render_width must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
