//! Runtime settings, read from the environment.

use std::{
    env,
    net::{Ipv4Addr, SocketAddr},
    path::PathBuf,
};
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got {0:?}")]
    InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    /// Interpreter or executable that runs the scraper.
    pub program: String,
    /// First argument to `program`; `None` when `SCRAPER_SCRIPT` is set but empty.
    pub script: Option<String>,
    pub working_dir: Option<PathBuf>,
    pub static_dir: PathBuf,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            program: "python".to_string(),
            script: Some("./python/scraper.py".to_string()),
            working_dir: None,
            static_dir: PathBuf::from("public"),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();

        if let Some(port) = lookup("PORT") {
            cfg.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }
        if let Some(program) = lookup("SCRAPER_PROGRAM").filter(|p| !p.is_empty()) {
            cfg.program = program;
        }
        if let Some(script) = lookup("SCRAPER_SCRIPT") {
            cfg.script = Some(script).filter(|s| !s.is_empty());
        }
        if let Some(dir) = lookup("SCRAPER_WORKDIR").filter(|d| !d.is_empty()) {
            cfg.working_dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = lookup("STATIC_DIR").filter(|d| !d.is_empty()) {
            cfg.static_dir = PathBuf::from(dir);
        }
        if let Some(level) = lookup("LOG_LEVEL").filter(|l| !l.is_empty()) {
            cfg.log_level = level;
        }

        Ok(cfg)
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}
