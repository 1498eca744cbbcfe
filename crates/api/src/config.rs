//! Process configuration, read from environment variables.
//!
//! | variable | default | meaning |
//! |---|---|---|
//! | `BIND_ADDR` | `0.0.0.0:8080` | listen address |
//! | `USE_PERSISTENT_STORES` | `false` | use Postgres instead of the in-memory store |
//! | `DATABASE_URL` | none | Postgres URL, required when persistent stores are on |

use std::net::SocketAddr;

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid BIND_ADDR {value:?}: {reason}")]
    InvalidBindAddr { value: String, reason: String },

    #[error("invalid USE_PERSISTENT_STORES {0:?}: expected true or false")]
    InvalidFlag(String),

    #[error("DATABASE_URL must be set when USE_PERSISTENT_STORES=true")]
    MissingDatabaseUrl,
}

/// Which product store backs the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    InMemory,
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreConfig,
}

impl AppConfig {
    /// In-memory store on an ephemeral local port (tests/dev).
    pub fn in_memory() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            store: StoreConfig::InMemory,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidBindAddr {
                value: raw_addr.clone(),
                reason: e.to_string(),
            })?;

        let use_persistent = match lookup("USE_PERSISTENT_STORES") {
            None => false,
            Some(raw) => raw
                .trim()
                .to_ascii_lowercase()
                .parse::<bool>()
                .map_err(|_| ConfigError::InvalidFlag(raw))?,
        };

        let store = if use_persistent {
            let database_url = lookup("DATABASE_URL")
                .filter(|url| !url.trim().is_empty())
                .ok_or(ConfigError::MissingDatabaseUrl)?;
            StoreConfig::Postgres { database_url }
        } else {
            StoreConfig::InMemory
        };

        Ok(Self { bind_addr, store })
    }
}
