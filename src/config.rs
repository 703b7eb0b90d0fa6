//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`CAPMATE_API_KEY`, `CAPMATE_BASE_URL`,
//!    `CAPMATE_API_TIMEOUT_SECS`)
//! 2. TOML file specified via an explicit path
//! 3. ./capmate.toml in the current directory
//! 4. $XDG_CONFIG_HOME/capmate/capmate.toml (or ~/.config/capmate/capmate.toml)
//! 5. Built-in defaults

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default service endpoint; compatible services can be selected by
/// overriding `api.base_url`.
pub const DEFAULT_BASE_URL: &str = "https://api.anti-captcha.com";

const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
const DEFAULT_INITIAL_WAIT_SECS: u64 = 5;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
const DEFAULT_MAX_POLLS: u32 = 30;

// ---------------------------------------------------------------------------
// Data model
// ---------------------------------------------------------------------------

/// Top-level runtime configuration for the solver.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub api: ApiConfig,
    pub network: NetworkConfig,
    pub polling: PollingConfig,
}

impl Config {
    /// Built-in defaults with the given account credential.
    pub fn with_client_key(client_key: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                client_key: client_key.into(),
                ..ApiConfig::default()
            },
            ..Self::default()
        }
    }
}

/// Service connection settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL both endpoints hang off of.
    pub base_url: String,
    /// Account credential sent inside every request body.
    pub client_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client_key: String::new(),
        }
    }
}

/// HTTP transport tunables.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Per-request timeout in seconds.
    pub api_timeout_secs: u64,
}

impl NetworkConfig {
    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            api_timeout_secs: DEFAULT_API_TIMEOUT_SECS,
        }
    }
}

/// Result-polling tunables.
///
/// Tests construct this directly with zeroed delays; values arriving from a
/// config file or the environment are clamped at load so a stray `0` cannot
/// turn the poll loop into a busy spin against the service.
#[derive(Debug, Clone)]
pub struct PollingConfig {
    /// Delay before the first result poll. Task builders may override this
    /// per solve with their family's documented minimum solve time.
    pub initial_wait_secs: u64,
    /// Delay between consecutive polls while the task is still processing.
    pub poll_interval_secs: u64,
    /// Poll attempts before the solve gives up and hands back the last
    /// processing response.
    pub max_polls: u32,
}

impl PollingConfig {
    pub fn initial_wait(&self) -> Duration {
        Duration::from_secs(self.initial_wait_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            initial_wait_secs: DEFAULT_INITIAL_WAIT_SECS,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }
}

// ---------------------------------------------------------------------------
// File schema
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    api: FileApi,
    #[serde(default)]
    network: FileNetwork,
    #[serde(default)]
    polling: FilePolling,
}

#[derive(Debug, Default, Deserialize)]
struct FileApi {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    client_key: Option<String>,
    /// Name of an environment variable holding the credential.
    #[serde(default)]
    client_key_env: Option<String>,
    /// Path of a file holding the credential.
    #[serde(default)]
    client_key_file: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileNetwork {
    #[serde(default)]
    api_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct FilePolling {
    #[serde(default)]
    initial_wait_secs: Option<u64>,
    #[serde(default)]
    poll_interval_secs: Option<u64>,
    #[serde(default)]
    max_polls: Option<u32>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path; when `None` the standard
/// locations are searched and missing files fall through to defaults.
pub fn load_config(path_override: Option<&str>) -> Result<Config, ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )
}

fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<Config, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let config_text = read_config_text(path_override, &read_file, &config_root)?;
    let parsed: FileConfig = toml::from_str(&config_text)?;
    let mut config = resolve_file_config(parsed, &read_file, &env_lookup)?;
    apply_env_overrides(&mut config, &env_lookup)?;
    clamp_tunables(&mut config);
    Ok(config)
}

fn read_config_text<FRead, FRoot>(
    path_override: Option<&str>,
    read_file: &FRead,
    config_root: &FRoot,
) -> Result<String, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FRoot: Fn() -> Option<PathBuf>,
{
    if let Some(p) = path_override {
        return Ok(read_file(Path::new(p))?);
    }
    if let Ok(text) = read_file(Path::new("capmate.toml")) {
        return Ok(text);
    }
    if let Some(dir) = config_root() {
        let global = dir.join("capmate").join("capmate.toml");
        if let Ok(text) = read_file(&global) {
            return Ok(text);
        }
    }
    Ok(String::new())
}

fn resolve_file_config<FRead, FEnv>(
    parsed: FileConfig,
    read_file: &FRead,
    env_lookup: &FEnv,
) -> Result<Config, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
{
    let client_key = resolve_client_key(&parsed.api, read_file, env_lookup)?;
    let base_url = parsed
        .api
        .base_url
        .as_deref()
        .and_then(normalized)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let defaults = Config::default();
    Ok(Config {
        api: ApiConfig {
            base_url,
            client_key,
        },
        network: NetworkConfig {
            api_timeout_secs: parsed
                .network
                .api_timeout_secs
                .unwrap_or(defaults.network.api_timeout_secs),
        },
        polling: PollingConfig {
            initial_wait_secs: parsed
                .polling
                .initial_wait_secs
                .unwrap_or(defaults.polling.initial_wait_secs),
            poll_interval_secs: parsed
                .polling
                .poll_interval_secs
                .unwrap_or(defaults.polling.poll_interval_secs),
            max_polls: parsed.polling.max_polls.unwrap_or(defaults.polling.max_polls),
        },
    })
}

fn resolve_client_key<FRead, FEnv>(
    api: &FileApi,
    read_file: &FRead,
    env_lookup: &FEnv,
) -> Result<String, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
{
    let mut configured = Vec::new();
    if api.client_key.as_deref().and_then(normalized).is_some() {
        configured.push("client_key");
    }
    if api.client_key_env.as_deref().and_then(normalized).is_some() {
        configured.push("client_key_env");
    }
    if api.client_key_file.as_deref().and_then(normalized).is_some() {
        configured.push("client_key_file");
    }
    if configured.len() > 1 {
        return Err(ConfigError::Invalid(format!(
            "only one of api.client_key, api.client_key_env, and api.client_key_file may be set (found: {})",
            configured.join(", ")
        )));
    }

    if let Some(env_name) = api.client_key_env.as_deref().and_then(normalized) {
        return Ok(env_lookup(&env_name).unwrap_or_default().trim().to_string());
    }
    if let Some(path) = api.client_key_file.as_deref().and_then(normalized) {
        let text = read_file(Path::new(&path)).map_err(|e| {
            ConfigError::Invalid(format!("failed to read api.client_key_file `{path}`: {e}"))
        })?;
        return Ok(text.trim_end().to_string());
    }
    Ok(api
        .client_key
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string())
}

fn apply_env_overrides<FEnv>(config: &mut Config, env_lookup: &FEnv) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(key) = env_lookup("CAPMATE_API_KEY") {
        config.api.client_key = key.trim().to_string();
    }
    if let Some(url) = env_lookup("CAPMATE_BASE_URL") {
        config.api.base_url = url;
    }
    if let Some(timeout) = env_lookup("CAPMATE_API_TIMEOUT_SECS") {
        let parsed = timeout.parse::<u64>().map_err(|_| {
            ConfigError::Invalid(format!(
                "invalid CAPMATE_API_TIMEOUT_SECS value `{timeout}`: expected positive integer seconds"
            ))
        })?;
        config.network.api_timeout_secs = parsed;
    }
    Ok(())
}

fn clamp_tunables(config: &mut Config) {
    config.network.api_timeout_secs = config.network.api_timeout_secs.max(1);
    config.polling.initial_wait_secs = config.polling.initial_wait_secs.max(1);
    config.polling.poll_interval_secs = config.polling.poll_interval_secs.max(1);
    config.polling.max_polls = config.polling.max_polls.max(1);
}

fn normalized(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Default per-user config path (`~/.config/capmate/capmate.toml`).
pub fn default_global_config_path() -> Option<PathBuf> {
    config_root_dir().map(|dir| dir.join("capmate").join("capmate.toml"))
}

fn config_root_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .or_else(dirs::config_dir)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
