//! Credential resolution: an optional JSON file, then the environment.

use serde::Deserialize;
use std::path::Path;
use travian_client::Credentials;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} is not given, set it in the config file or {env}")]
    Missing {
        field: &'static str,
        env: &'static str,
    },
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    username: Option<String>,
    password: Option<String>,
    server: Option<String>,
}

/// Login settings for one game server.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub username: String,
    pub password: String,
    /// Game server host, without scheme.
    pub server: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("server", &self.server)
            .finish()
    }
}

impl Config {
    /// Resolve from `path` (or [`DEFAULT_CONFIG_FILE`]) and the process
    /// environment.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::resolve_with(path, |key| std::env::var(key).ok())
    }

    /// Resolve with an explicit environment lookup.
    ///
    /// A file that is absent, unreadable or not valid JSON is ignored. Empty
    /// values count as missing.
    pub fn resolve_with(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let file = read_file(path);

        let pick = |from_file: Option<String>, field: &'static str, env_key: &'static str| {
            from_file
                .filter(|v| !v.is_empty())
                .or_else(|| env(env_key).filter(|v| !v.is_empty()))
                .or_else(|| env(&env_key.to_lowercase()).filter(|v| !v.is_empty()))
                .ok_or(ConfigError::Missing { field, env: env_key })
        };

        Ok(Self {
            username: pick(file.username, "username", "TR_USERNAME")?,
            password: pick(file.password, "password", "TR_PASSWORD")?,
            server: pick(file.server, "server", "TR_SERVER")?,
        })
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password, &self.server)
    }
}

fn read_file(path: &Path) -> FileConfig {
    let Ok(raw) = std::fs::read_to_string(path) else {
        tracing::debug!("No config file at {}", path.display());
        return FileConfig::default();
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::debug!("Ignoring config file {}: {e}", path.display());
        FileConfig::default()
    })
}
