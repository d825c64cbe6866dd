//! Configuration for the Nim server.
//!
//! Defaults can be overridden via environment variables, and the
//! command line (see `main.rs`) overrides those again:
//!
//! - `NIM_HOST`    (default: "0.0.0.0")
//! - `NIM_PORT`    (default: "5678")
//! - `NIM_PILES`   (default: "3,4,5")
//! - `NIM_VERBOSE` (default: "false")

use std::env;
use std::str::FromStr;

use nim_core::{PileSet, MAX_PILES};
use thiserror::Error;

/// Starting position when nothing else is configured.
pub const DEFAULT_PILES: [u8; 3] = [3, 4, 5];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}={value:?} is not valid: {reason}")]
    InvalidVar {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("at least one pile is required")]
    NoPiles,

    #[error("{0} piles exceed the limit of 255")]
    TooManyPiles(usize),

    #[error("pile {index} is empty; every pile needs at least one stick")]
    EmptyPile { index: usize },
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host name or interface to bind to (e.g. "0.0.0.0" or "localhost").
    pub host: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Starting pile sizes for every session.
    pub piles: Vec<u8>,

    /// Log game narration (starts, moves, turns, endings).
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_string(),
            port: 5678,
            piles: DEFAULT_PILES.to_vec(),
            verbose: false,
        }
    }
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let host = env::var("NIM_HOST").unwrap_or(defaults.host);
        let port = read_env_or_default("NIM_PORT", defaults.port)?;
        let verbose = read_env_or_default("NIM_VERBOSE", defaults.verbose)?;
        let piles = match env::var("NIM_PILES") {
            Ok(val) => parse_pile_list(&val).map_err(|reason| ConfigError::InvalidVar {
                key: "NIM_PILES",
                value: val.clone(),
                reason,
            })?,
            Err(_) => defaults.piles,
        };

        Ok(Config {
            host,
            port,
            piles,
            verbose,
        })
    }

    /// Check the starting position is playable and fits on the wire.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.piles.is_empty() {
            return Err(ConfigError::NoPiles);
        }
        if self.piles.len() > MAX_PILES {
            return Err(ConfigError::TooManyPiles(self.piles.len()));
        }
        if let Some(index) = self.piles.iter().position(|&p| p == 0) {
            return Err(ConfigError::EmptyPile { index });
        }
        Ok(())
    }

    /// Starting position as a pile set.
    pub fn pile_set(&self) -> PileSet {
        PileSet::new(self.piles.clone())
    }

    /// Convenience: `host:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn read_env_or_default<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val.parse::<T>().map_err(|e| ConfigError::InvalidVar {
            key,
            reason: e.to_string(),
            value: val,
        }),
        Err(_) => Ok(default),
    }
}

/// Parse "3,4,5" (commas and/or whitespace) into pile sizes.
fn parse_pile_list(s: &str) -> Result<Vec<u8>, String> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u8>()
                .map_err(|e| format!("'{}': {}", part, e))
        })
        .collect()
}
