//! Configuration for the mistly CLI.
//!
//! TOML profiles under the platform config directory, plus the
//! credential chain that turns a profile into API tokens: environment
//! variable, then system keyring, then plaintext config. Because one
//! account often spans several Mist organizations under different
//! tokens, every step may yield multiple tokens (comma-separated in
//! env/keyring values, a list in the config file).

use std::collections::HashMap;
use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable consulted for API tokens when a profile does
/// not name its own.
pub const TOKEN_ENV: &str = "MIST_API_TOKEN";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API token configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("unknown profile '{profile}'")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named cloud profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// The profile to use: an explicit name, or the configured default.
    ///
    /// An explicitly named profile must exist; the implicit default
    /// falls back to an empty profile so a token-only setup (env var,
    /// no config file) still works.
    pub fn select_profile(&self, name: Option<&str>) -> Result<(String, Profile), ConfigError> {
        match name {
            Some(name) => self
                .profiles
                .get(name)
                .cloned()
                .map(|p| (name.to_owned(), p))
                .ok_or_else(|| ConfigError::UnknownProfile {
                    profile: name.to_owned(),
                }),
            None => {
                let name = self.default_profile.as_deref().unwrap_or("default");
                let profile = self.profiles.get(name).cloned().unwrap_or_default();
                Ok((name.to_owned(), profile))
            }
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named cloud profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// API host for the org's Mist region (e.g. "api.eu.mist.com").
    #[serde(default = "default_host")]
    pub host: String,

    /// API tokens in plaintext (prefer keyring or env var).
    #[serde(default)]
    pub api_tokens: Vec<String>,

    /// Environment variable holding tokens, comma-separated.
    pub api_token_env: Option<String>,

    /// Override timeout in seconds.
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            host: default_host(),
            api_tokens: Vec::new(),
            api_token_env: None,
            timeout: None,
        }
    }
}

fn default_host() -> String {
    "api.mist.com".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "mistly", "mistly").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("mistly");
    p
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("MISTLY_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Split a comma-separated token value into individual secrets.
pub fn split_tokens(value: &str) -> Vec<SecretString> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(SecretString::from)
        .collect()
}

/// Resolve API tokens from the credential chain (no CLI flag step).
///
/// Order: the profile's `api_token_env` variable, then `MIST_API_TOKEN`,
/// then the system keyring entry `mistly/<profile>/api-token`, then
/// plaintext `api_tokens` from the config file. The first step that
/// yields at least one token wins.
pub fn resolve_tokens(
    profile: &Profile,
    profile_name: &str,
) -> Result<Vec<SecretString>, ConfigError> {
    for env_name in profile
        .api_token_env
        .as_deref()
        .into_iter()
        .chain([TOKEN_ENV])
    {
        if let Ok(val) = std::env::var(env_name) {
            let tokens = split_tokens(&val);
            if !tokens.is_empty() {
                return Ok(tokens);
            }
        }
    }

    if let Ok(entry) = keyring::Entry::new("mistly", &format!("{profile_name}/api-token")) {
        if let Ok(secret) = entry.get_password() {
            let tokens = split_tokens(&secret);
            if !tokens.is_empty() {
                return Ok(tokens);
            }
        }
    }

    if !profile.api_tokens.is_empty() {
        return Ok(profile
            .api_tokens
            .iter()
            .cloned()
            .map(SecretString::from)
            .collect());
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store tokens (comma-joined) in the system keyring for a profile.
pub fn store_tokens_in_keyring(profile_name: &str, tokens: &str) -> Result<(), ConfigError> {
    keyring::Entry::new("mistly", &format!("{profile_name}/api-token"))
        .and_then(|entry| entry.set_password(tokens))
        .map_err(|err| ConfigError::Validation {
            field: "keyring".into(),
            reason: err.to_string(),
        })
}
