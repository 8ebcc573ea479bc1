//! Layered configuration (ambient stack, SPEC_FULL §10): a TOML file
//! supplies defaults, `ALCHEMY_*` environment variables override it, and
//! anything left unset falls back to hardcoded defaults — the same
//! override order the teacher uses for tool discovery, where an explicit
//! env var (`CC`, `CXX`) always wins over whatever `build.rs` would
//! otherwise pick (`zb_io::build`).

use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::concurrency::DEFAULT_CONCURRENCY;

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_DB_PATH: &str = "data/combinations.json";
const DEFAULT_DEADLINE_MS: u64 = 2_000;
const DEFAULT_MAX_RECIPES: usize = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: SocketAddr,
    pub db_path: PathBuf,
    pub concurrency: usize,
    pub deadline: Duration,
    pub default_max_recipes: usize,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            bind: DEFAULT_BIND.parse().expect("default bind address is valid"),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            concurrency: DEFAULT_CONCURRENCY,
            deadline: Duration::from_millis(DEFAULT_DEADLINE_MS),
            default_max_recipes: DEFAULT_MAX_RECIPES,
        }
    }
}

/// Mirrors [`Config`] but with every field optional, matching what can
/// actually be present in a partial TOML file on disk.
#[derive(Debug, Default, Deserialize)]
struct FileLayer {
    bind: Option<String>,
    db_path: Option<String>,
    concurrency: Option<usize>,
    deadline_ms: Option<u64>,
    default_max_recipes: Option<usize>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidToml { message: String },
    InvalidBind { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidToml { message } => write!(f, "invalid config file: {message}"),
            ConfigError::InvalidBind { value } => write!(f, "invalid bind address {value:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load defaults, overlay a TOML file at `path` if it exists, then
    /// overlay `ALCHEMY_*` environment variables. A missing file is not an
    /// error — it just means the defaults-plus-env layers apply.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let mut config = Config::default();

        if let Some(path) = path {
            if let Ok(contents) = std::fs::read_to_string(path) {
                let layer: FileLayer = toml::from_str(&contents).map_err(|e| ConfigError::InvalidToml {
                    message: e.to_string(),
                })?;
                config.apply_file_layer(layer)?;
            }
        }

        config.apply_env_layer()?;
        Ok(config)
    }

    fn apply_file_layer(&mut self, layer: FileLayer) -> Result<(), ConfigError> {
        if let Some(bind) = layer.bind {
            self.bind = parse_bind(&bind)?;
        }
        if let Some(db_path) = layer.db_path {
            self.db_path = PathBuf::from(db_path);
        }
        if let Some(concurrency) = layer.concurrency {
            self.concurrency = concurrency;
        }
        if let Some(deadline_ms) = layer.deadline_ms {
            self.deadline = Duration::from_millis(deadline_ms);
        }
        if let Some(default_max_recipes) = layer.default_max_recipes {
            self.default_max_recipes = default_max_recipes;
        }
        Ok(())
    }

    fn apply_env_layer(&mut self) -> Result<(), ConfigError> {
        if let Ok(bind) = std::env::var("ALCHEMY_BIND") {
            self.bind = parse_bind(&bind)?;
        }
        if let Ok(db_path) = std::env::var("ALCHEMY_DB_PATH") {
            self.db_path = PathBuf::from(db_path);
        }
        if let Ok(concurrency) = std::env::var("ALCHEMY_CONCURRENCY") {
            if let Ok(n) = concurrency.parse() {
                self.concurrency = n;
            }
        }
        if let Ok(deadline_ms) = std::env::var("ALCHEMY_DEADLINE_MS") {
            if let Ok(ms) = deadline_ms.parse() {
                self.deadline = Duration::from_millis(ms);
            }
        }
        if let Ok(max_recipes) = std::env::var("ALCHEMY_DEFAULT_MAX_RECIPES") {
            if let Ok(n) = max_recipes.parse() {
                self.default_max_recipes = n;
            }
        }
        Ok(())
    }
}

fn parse_bind(value: &str) -> Result<SocketAddr, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidBind {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse_cleanly() {
        let config = Config::default();
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(config.default_max_recipes, DEFAULT_MAX_RECIPES);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load(Some(Path::new("/nonexistent/alchemy.toml"))).unwrap();
        assert_eq!(config.bind, DEFAULT_BIND.parse().unwrap());
    }

    #[test]
    fn env_overrides_default_concurrency() {
        std::env::set_var("ALCHEMY_CONCURRENCY", "3");
        let config = Config::load(None).unwrap();
        std::env::remove_var("ALCHEMY_CONCURRENCY");
        assert_eq!(config.concurrency, 3);
    }

    #[test]
    fn invalid_bind_is_rejected() {
        std::env::set_var("ALCHEMY_BIND", "not-an-address");
        let result = Config::load(None);
        std::env::remove_var("ALCHEMY_BIND");
        assert!(matches!(result, Err(ConfigError::InvalidBind { .. })));
    }
}
