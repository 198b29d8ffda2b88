//! Server configuration from environment variables: HOST, PORT, BRACKET_SIZE.

use crate::logic::{BracketSize, DEFAULT_BRACKET_SIZE};
use crate::models::BracketError;

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub bracket_size: BracketSize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            bracket_size: BracketSize::default(),
        }
    }
}

impl Config {
    /// Read the process environment.
    pub fn from_env() -> Result<Self, BracketError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset keys fall back to defaults; set but unparsable values
    /// are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BracketError> {
        let host = lookup("HOST").unwrap_or_else(default_host);
        let port = match lookup("PORT") {
            Some(p) => p
                .trim()
                .parse()
                .map_err(|_| BracketError::Config(format!("PORT must be a port number, got {:?}", p)))?,
            None => default_port(),
        };
        let participants = match lookup("BRACKET_SIZE") {
            Some(s) => s
                .trim()
                .parse()
                .map_err(|_| BracketError::Config(format!("BRACKET_SIZE must be a number, got {:?}", s)))?,
            None => DEFAULT_BRACKET_SIZE,
        };
        Ok(Self {
            host,
            port,
            bracket_size: BracketSize::new(participants)?,
        })
    }
}
