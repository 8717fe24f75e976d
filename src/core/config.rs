//! Service configuration.
//!
//! Loaded once from `publiccommons.toml` at startup and handed to the
//! components that need it. Nothing here is mutated after [`AppConfig::load`].

use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::core::errors::{AppError, AppResult};

pub const CONFIG_ENV: &str = "PUBLICCOMMONS_CONFIG";
pub const CONFIG_FILE_NAME: &str = "publiccommons.toml";

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:7789";
const DEFAULT_MAX_CONTENT_LENGTH: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub nckvs: KvsConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KvsConfig {
    pub base_url: String,
    pub login_name: String,
    pub login_pass: String,
    #[serde(default)]
    pub app_servername: String,
    #[serde(default)]
    pub app_username: String,
    #[serde(default)]
    pub timezone: String,
    #[serde(default = "default_datatypename")]
    pub datatypename: String,
    #[serde(default = "default_datatypeversion")]
    pub datatypeversion: i64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_datatypename() -> String {
    "commonstest1".to_string()
}

fn default_datatypeversion() -> i64 {
    1
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_max_content_length")]
    pub max_content_length: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            max_content_length: default_max_content_length(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> AppResult<SocketAddr> {
        self.listen_addr
            .parse()
            .map_err(|err| AppError::Config(format!("listen_addr {}: {err}", self.listen_addr)))
    }
}

fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

fn default_max_content_length() -> usize {
    DEFAULT_MAX_CONTENT_LENGTH
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub level: Option<String>,
}

impl AppConfig {
    pub fn from_toml(raw: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(raw)?;
        if config.nckvs.base_url.trim().is_empty() {
            return Err(AppError::Config("nckvs.base_url cannot be empty".to_string()));
        }
        Ok(config)
    }

    pub fn from_path(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("cannot read {}: {err}", path.display())))?;
        Self::from_toml(&raw)
    }

    /// Loads the first config file found by [`search_config`].
    pub fn load() -> AppResult<(Self, PathBuf)> {
        let path = search_config().ok_or_else(|| {
            AppError::Config(format!(
                "no {CONFIG_FILE_NAME} found (set {CONFIG_ENV} or place it in the working directory, $HOME or /etc)"
            ))
        })?;
        let config = Self::from_path(&path)?;
        Ok((config, path))
    }
}

/// `$PUBLICCOMMONS_CONFIG` first, then `publiccommons.toml` in the working
/// directory, the home directory and `/etc`.
pub fn search_config() -> Option<PathBuf> {
    let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let cwd = std::env::current_dir().ok();
    search_config_in(explicit, &[cwd, home, Some(PathBuf::from("/etc"))])
}

pub fn search_config_in(explicit: Option<PathBuf>, dirs: &[Option<PathBuf>]) -> Option<PathBuf> {
    if let Some(path) = explicit.filter(|path| path.exists()) {
        return Some(path);
    }
    dirs.iter()
        .flatten()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.exists())
}
