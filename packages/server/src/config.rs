//! Server configuration, populated from environment variables.

use std::net::SocketAddr;

use jmap_api::Limits;
use thiserror::Error;

/// Errors returned by [`ServerConfig::from_env`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a valid socket address (e.g. 0.0.0.0:8080), got {value:?}")]
    InvalidBind { var: &'static str, value: String },

    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} must start with '/', got {value:?}")]
    InvalidPath { var: &'static str, value: String },
}

/// Runtime configuration for the server.
///
/// Every field has a default, so the server starts with zero configuration.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `JMAP_BIND` | `0.0.0.0:8080` | TCP socket address to listen on |
/// | `JMAP_API_PATH` | `/jmap/api` | Path of the API endpoint |
/// | `JMAP_MAX_SIZE_REQUEST` | `10000000` | Largest accepted request body, in octets |
/// | `JMAP_MAX_CALLS_IN_REQUEST` | `16` | Most method calls accepted in one request |
/// | `JMAP_SESSION_STATE` | (absent = UUIDv7 at startup) | `sessionState` reported in every response |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address the server binds to.
    pub bind_addr: SocketAddr,

    /// Path that accepts `POST`ed requests.
    pub api_path: String,

    /// Limits enforced on every request envelope.
    pub limits: Limits,

    /// Fixed session state token. `None` means generate one at startup.
    pub session_state: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            api_path: "/jmap/api".into(),
            limits: Limits::default(),
            session_state: None,
        }
    }
}

impl ServerConfig {
    /// Populate config from environment variables, applying defaults where absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind_addr = match lookup("JMAP_BIND") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidBind {
                var: "JMAP_BIND",
                value,
            })?,
            None => defaults.bind_addr,
        };

        let api_path = match lookup("JMAP_API_PATH") {
            Some(value) if value.starts_with('/') => value,
            Some(value) => {
                return Err(ConfigError::InvalidPath {
                    var: "JMAP_API_PATH",
                    value,
                })
            }
            None => defaults.api_path,
        };

        let limits = Limits {
            max_size_request: number(&lookup, "JMAP_MAX_SIZE_REQUEST")?
                .unwrap_or(defaults.limits.max_size_request),
            max_calls_in_request: number(&lookup, "JMAP_MAX_CALLS_IN_REQUEST")?
                .unwrap_or(defaults.limits.max_calls_in_request),
        };

        Ok(Self {
            bind_addr,
            api_path,
            limits,
            session_state: lookup("JMAP_SESSION_STATE"),
        })
    }
}

fn number(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<usize>, ConfigError> {
    lookup(var)
        .map(|value| {
            value
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidNumber { var, value })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_vars(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = from_vars(&[]).unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.api_path, "/jmap/api");
        assert_eq!(config.limits, Limits::default());
        assert!(config.session_state.is_none());
    }

    #[test]
    fn overrides_from_vars() {
        let config = from_vars(&[
            ("JMAP_BIND", "127.0.0.1:9000"),
            ("JMAP_API_PATH", "/api"),
            ("JMAP_MAX_SIZE_REQUEST", "1024"),
            ("JMAP_MAX_CALLS_IN_REQUEST", "4"),
            ("JMAP_SESSION_STATE", "s42"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.api_path, "/api");
        assert_eq!(config.limits.max_size_request, 1024);
        assert_eq!(config.limits.max_calls_in_request, 4);
        assert_eq!(config.session_state.as_deref(), Some("s42"));
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(matches!(
            from_vars(&[("JMAP_BIND", "nowhere")]),
            Err(ConfigError::InvalidBind { .. })
        ));
        assert!(matches!(
            from_vars(&[("JMAP_MAX_CALLS_IN_REQUEST", "-1")]),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            from_vars(&[("JMAP_API_PATH", "api")]),
            Err(ConfigError::InvalidPath { .. })
        ));
    }
}
