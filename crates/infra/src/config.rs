//! Configuration loading and representation.
//!
//! Configuration is read once at startup from the environment. Anything invalid
//! aborts startup with a [`ConfigError`]; nothing is validated lazily on the first
//! request.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use catalog_core::{NodeIdentity, RangeError};

pub const NODE_ID_VAR: &str = "CATALOG_NODE_ID";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const BIND_ADDR_VAR: &str = "CATALOG_BIND_ADDR";
pub const REQUEST_TIMEOUT_VAR: &str = "CATALOG_REQUEST_TIMEOUT_MS";
pub const DB_MAX_CONNECTIONS_VAR: &str = "CATALOG_DB_MAX_CONNECTIONS";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("CATALOG_NODE_ID is not set; every node needs a distinct identity between 0 and 9")]
    MissingNodeId,

    #[error("{key} must be an integer, got {value:?}")]
    NotAnInteger { key: &'static str, value: String },

    #[error(transparent)]
    NodeIdOutOfRange(#[from] RangeError),

    #[error("{key} must be a socket address (host:port), got {value:?}")]
    InvalidAddress { key: &'static str, value: String },

    #[error("{key} must be greater than zero")]
    MustBePositive { key: &'static str },
}

/// Process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Identity of this node; the first digit of every identifier it allocates.
    pub node_id: NodeIdentity,
    /// Postgres connection string. Without it the process runs on in-memory
    /// collaborators, which is only safe for a single node.
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub request_timeout: Duration,
    pub db_max_connections: u32,
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_node = lookup(NODE_ID_VAR).ok_or(ConfigError::MissingNodeId)?;
        let node_id = NodeIdentity::try_from(parse_int::<i64>(NODE_ID_VAR, &raw_node)?)?;

        let database_url = lookup(DATABASE_URL_VAR);

        let raw_addr = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidAddress {
                key: BIND_ADDR_VAR,
                value: raw_addr.clone(),
            })?;

        let timeout_ms = match lookup(REQUEST_TIMEOUT_VAR) {
            Some(raw) => parse_int::<u64>(REQUEST_TIMEOUT_VAR, &raw)?,
            None => DEFAULT_REQUEST_TIMEOUT_MS,
        };
        if timeout_ms == 0 {
            return Err(ConfigError::MustBePositive {
                key: REQUEST_TIMEOUT_VAR,
            });
        }

        let db_max_connections = match lookup(DB_MAX_CONNECTIONS_VAR) {
            Some(raw) => parse_int::<u32>(DB_MAX_CONNECTIONS_VAR, &raw)?,
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };
        if db_max_connections == 0 {
            return Err(ConfigError::MustBePositive {
                key: DB_MAX_CONNECTIONS_VAR,
            });
        }

        Ok(Self {
            node_id,
            database_url,
            bind_addr,
            request_timeout: Duration::from_millis(timeout_ms),
            db_max_connections,
        })
    }

    /// Single-node, in-memory configuration (tests/dev).
    pub fn in_memory(node_id: NodeIdentity) -> Self {
        Self {
            node_id,
            database_url: None,
            bind_addr: ([127, 0, 0, 1], 0).into(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
        }
    }
}

fn parse_int<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::NotAnInteger {
        key,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = load(&[(NODE_ID_VAR, "3")]).unwrap();
        assert_eq!(cfg.node_id.get(), 3);
        assert_eq!(cfg.database_url, None);
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(cfg.request_timeout, Duration::from_secs(10));
        assert_eq!(cfg.db_max_connections, 10);
    }

    #[test]
    fn full_config_is_parsed() {
        let cfg = load(&[
            (NODE_ID_VAR, " 9 "),
            (DATABASE_URL_VAR, "postgres://localhost/catalog"),
            (BIND_ADDR_VAR, "127.0.0.1:9000"),
            (REQUEST_TIMEOUT_VAR, "2500"),
            (DB_MAX_CONNECTIONS_VAR, "4"),
        ])
        .unwrap();

        assert_eq!(cfg.node_id.get(), 9);
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/catalog"));
        assert_eq!(cfg.bind_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(cfg.request_timeout, Duration::from_millis(2500));
        assert_eq!(cfg.db_max_connections, 4);
    }

    #[test]
    fn missing_or_blank_node_id_is_fatal() {
        assert_eq!(load(&[]), Err(ConfigError::MissingNodeId));
        assert_eq!(load(&[(NODE_ID_VAR, "  ")]), Err(ConfigError::MissingNodeId));
    }

    #[test]
    fn out_of_range_node_id_is_fatal() {
        let err = load(&[(NODE_ID_VAR, "10")]).unwrap_err();
        assert_eq!(err, ConfigError::NodeIdOutOfRange(RangeError::NodeIdentity(10)));
        assert_eq!(
            err.to_string(),
            "Node ID in configuration must be between 0 and 9. Current value: 10"
        );

        assert!(matches!(
            load(&[(NODE_ID_VAR, "-1")]),
            Err(ConfigError::NodeIdOutOfRange(_))
        ));
    }

    #[test]
    fn non_numeric_node_id_is_fatal() {
        assert_eq!(
            load(&[(NODE_ID_VAR, "one")]),
            Err(ConfigError::NotAnInteger {
                key: NODE_ID_VAR,
                value: "one".to_string()
            })
        );
    }

    #[test]
    fn invalid_bind_addr_and_timeouts_are_fatal() {
        assert!(matches!(
            load(&[(NODE_ID_VAR, "1"), (BIND_ADDR_VAR, "localhost")]),
            Err(ConfigError::InvalidAddress { .. })
        ));
        assert_eq!(
            load(&[(NODE_ID_VAR, "1"), (REQUEST_TIMEOUT_VAR, "0")]),
            Err(ConfigError::MustBePositive {
                key: REQUEST_TIMEOUT_VAR
            })
        );
        assert!(matches!(
            load(&[(NODE_ID_VAR, "1"), (DB_MAX_CONNECTIONS_VAR, "many")]),
            Err(ConfigError::NotAnInteger { .. })
        ));
    }
}
