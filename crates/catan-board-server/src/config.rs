//! Server settings read from the environment.

use std::net::SocketAddr;
use thiserror::Error;

const DEFAULT_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TILE_SPACING: f64 = 1.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SERVER_ADDR `{0}` is not a socket address")]
    Addr(String),

    #[error("BOARD_SEED `{0}` is not an unsigned integer")]
    Seed(String),

    #[error("TILE_SPACING `{0}` is not a positive number")]
    TileSpacing(String),
}

/// Runtime settings for the board server
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address to listen on (`SERVER_ADDR`)
    pub addr: SocketAddr,
    /// Base seed for session RNGs (`BOARD_SEED`); entropy when unset
    pub seed: Option<u64>,
    /// Hex radius used when laying boards out (`TILE_SPACING`)
    pub tile_spacing: f64,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr_text = lookup("SERVER_ADDR").unwrap_or_else(|| DEFAULT_ADDR.into());
        let addr = addr_text
            .parse()
            .map_err(|_| ConfigError::Addr(addr_text.clone()))?;

        let seed = match lookup("BOARD_SEED") {
            Some(text) => Some(text.parse().map_err(|_| ConfigError::Seed(text))?),
            None => None,
        };

        let tile_spacing = match lookup("TILE_SPACING") {
            Some(text) => match text.parse::<f64>() {
                Ok(spacing) if spacing > 0.0 && spacing.is_finite() => spacing,
                _ => return Err(ConfigError::TileSpacing(text)),
            },
            None => DEFAULT_TILE_SPACING,
        };

        Ok(Self {
            addr,
            seed,
            tile_spacing,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: ([0, 0, 0, 0], 8080).into(),
            seed: None,
            tile_spacing: DEFAULT_TILE_SPACING,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_reads_all_keys() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("SERVER_ADDR", "127.0.0.1:9000"),
            ("BOARD_SEED", "42"),
            ("TILE_SPACING", "50"),
        ]))
        .unwrap();
        assert_eq!(config.addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.tile_spacing, 50.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("BOARD_SEED", "-1")])),
            Err(ConfigError::Seed(_))
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("TILE_SPACING", "0")])),
            Err(ConfigError::TileSpacing(_))
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("SERVER_ADDR", "nowhere")])),
            Err(ConfigError::Addr(_))
        ));
    }
}
