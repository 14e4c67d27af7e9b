//! Client configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::{net::SocketAddr, time::Duration};
use thiserror::Error;

/// Dealer address used when none is configured.
pub const DEFAULT_SERVER: &str = "127.0.0.1:2396";

/// Default connect timeout in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 1000;

/// Longest name the dealer will show.
pub const MAX_NAME_LEN: usize = 32;

pub const SERVER_VAR: &str = "BIG_TWO_SERVER";
pub const NAME_VAR: &str = "BIG_TWO_NAME";
pub const CONNECT_TIMEOUT_VAR: &str = "BIG_TWO_CONNECT_TIMEOUT_MS";

/// Complete client configuration loaded from environment variables
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ClientConfig {
    /// Dealer address, fixed for the client's life
    pub server: SocketAddr,
    /// Name announced when taking a seat
    pub player_name: String,
    /// How long a single connection attempt may take
    pub connect_timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from the process environment.
    ///
    /// # Arguments
    ///
    /// * `server_override` - Optional dealer address (from CLI args)
    /// * `name_override` - Optional player name (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if the name is missing or a variable can't be parsed.
    pub fn from_env(
        server_override: Option<SocketAddr>,
        name_override: Option<String>,
    ) -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok(), server_override, name_override)
    }

    /// Same as [`ClientConfig::from_env`] with variables read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns error if the name is missing or a variable can't be parsed.
    pub fn from_vars<F>(
        lookup: F,
        server_override: Option<SocketAddr>,
        name_override: Option<String>,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = match server_override {
            Some(server) => server,
            None => {
                let raw = lookup(SERVER_VAR).unwrap_or_else(|| DEFAULT_SERVER.to_string());
                raw.parse().map_err(|_| ConfigError::Invalid {
                    var: SERVER_VAR.to_string(),
                    reason: format!("'{raw}' is not an IP:PORT address"),
                })?
            }
        };

        let player_name = name_override
            .or_else(|| lookup(NAME_VAR))
            .ok_or_else(|| ConfigError::MissingRequired {
                var: NAME_VAR.to_string(),
                hint: "Set it or pass --name".to_string(),
            })?;

        let connect_timeout = Duration::from_millis(parse_var_or(
            &lookup,
            CONNECT_TIMEOUT_VAR,
            DEFAULT_CONNECT_TIMEOUT_MS,
        ));

        Ok(ClientConfig {
            server,
            player_name,
            connect_timeout,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.player_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                var: NAME_VAR.to_string(),
                reason: "Must not be blank".to_string(),
            });
        }

        if self.player_name.chars().count() > MAX_NAME_LEN {
            return Err(ConfigError::Invalid {
                var: NAME_VAR.to_string(),
                reason: format!("Must be at most {MAX_NAME_LEN} characters"),
            });
        }

        if self.connect_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                var: CONNECT_TIMEOUT_VAR.to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse a variable with default fallback
fn parse_var_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_vars(vars(&[(NAME_VAR, "alice")]), None, None).unwrap();
        assert_eq!(config.server, DEFAULT_SERVER.parse().unwrap());
        assert_eq!(config.player_name, "alice");
        assert_eq!(config.connect_timeout, Duration::from_millis(1000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_win() {
        let config = ClientConfig::from_vars(
            vars(&[(NAME_VAR, "alice"), (SERVER_VAR, "10.0.0.1:1")]),
            Some("127.0.0.1:9000".parse().unwrap()),
            Some("bob".to_string()),
        )
        .unwrap();
        assert_eq!(config.server.port(), 9000);
        assert_eq!(config.player_name, "bob");
    }

    #[test]
    fn test_env_values() {
        let config = ClientConfig::from_vars(
            vars(&[
                (NAME_VAR, "carol"),
                (SERVER_VAR, "192.168.1.5:4000"),
                (CONNECT_TIMEOUT_VAR, "250"),
            ]),
            None,
            None,
        )
        .unwrap();
        assert_eq!(config.server, "192.168.1.5:4000".parse().unwrap());
        assert_eq!(config.connect_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_unparsable_timeout_falls_back() {
        let config = ClientConfig::from_vars(
            vars(&[(NAME_VAR, "carol"), (CONNECT_TIMEOUT_VAR, "soon")]),
            None,
            None,
        )
        .unwrap();
        assert_eq!(config.connect_timeout, Duration::from_millis(1000));
    }

    #[test]
    fn test_missing_name() {
        let err = ClientConfig::from_vars(vars(&[]), None, None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired { .. }));
        assert!(err.to_string().contains(NAME_VAR));
    }

    #[test]
    fn test_bad_server() {
        let err = ClientConfig::from_vars(
            vars(&[(NAME_VAR, "dave"), (SERVER_VAR, "localhost")]),
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var, .. } if var == SERVER_VAR));
    }

    #[test]
    fn test_config_validation() {
        let mut config =
            ClientConfig::from_vars(vars(&[(NAME_VAR, "   ")]), None, None).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        config.player_name = "x".repeat(MAX_NAME_LEN + 1);
        assert!(config.validate().is_err());

        config.player_name = "x".repeat(MAX_NAME_LEN);
        assert!(config.validate().is_ok());

        config.connect_timeout = Duration::ZERO;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains(CONNECT_TIMEOUT_VAR));
    }
}
