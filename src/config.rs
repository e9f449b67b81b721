use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_ADDR: &str = "127.0.0.1:3001";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not defined")]
    MissingVar(&'static str),

    #[error("invalid listen address: {0}")]
    InvalidAddr(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub openai_api_key: Option<String>,
    pub db_path: PathBuf,
    pub listen_addr: SocketAddr,
}

impl Config {
    /// Reads the full configuration from the environment. A missing required
    /// variable is fatal; the caller exits before binding the listener.
    pub fn from_env() -> Result<Self, ConfigError> {
        let gemini_api_key = require("GEMINI_API_KEY")?;
        let db_path = PathBuf::from(require("DOCREADER_DB")?);
        let openai_api_key = optional("OPENAI_API_KEY");

        let addr = optional("DOCREADER_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let listen_addr = addr
            .parse()
            .map_err(|_| ConfigError::InvalidAddr(addr))?;

        Ok(Config {
            gemini_api_key,
            openai_api_key,
            db_path,
            listen_addr,
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::MissingVar(name))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
