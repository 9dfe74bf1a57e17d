//! Configuration for the demo client.
//!
//! The config is a TOML file whose path comes from `--config` or the
//! `CONFIG_PATH` environment variable:
//!
//! ```toml
//! env = "local"
//!
//! [rpc]
//! host = "localhost"
//! port = 44044
//! timeout_ms = 5000
//! ```

use std::{
    fmt::{self, Display, Formatter},
    net::Ipv6Addr,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;

/// Host dialed when the config does not name one.
pub const DEFAULT_HOST: &str = "localhost";

/// Errors that can occur while loading a [`Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid TOML or is missing fields.
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// A field has a value the client can't work with.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Deployment environment, selects the log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Env {
    #[default]
    Local,
    Dev,
    Prod,
}

impl Display for Env {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Env::Local => "local",
            Env::Dev => "dev",
            Env::Prod => "prod",
        })
    }
}

/// Top level client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub env: Env,
    pub rpc: RpcConfig,
}

/// Where the chat service lives and how long a single call may take.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RpcConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
    /// Timeout applied to each unary call, in milliseconds.
    pub timeout_ms: u64,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

impl Config {
    /// Read, parse and validate the config file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc.host.is_empty() {
            return Err(ConfigError::Invalid {
                field: "rpc.host",
                reason: "must not be empty",
            });
        }
        if self.rpc.port == 0 {
            return Err(ConfigError::Invalid {
                field: "rpc.port",
                reason: "must be non-zero",
            });
        }
        if self.rpc.timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "rpc.timeout_ms",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }
}

impl RpcConfig {
    /// Timeout for a single unary call.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// `host:port` with IPv6 literals wrapped in brackets.
    pub fn address(&self) -> String {
        if self.host.parse::<Ipv6Addr>().is_ok() {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// URL the HTTP transport connects to.
    pub fn server_url(&self) -> String {
        format!("http://{}", self.address())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_full_config() {
        let file = write_config(
            r#"
            env = "prod"

            [rpc]
            host = "chat.internal"
            port = 44044
            timeout_ms = 2500
            "#,
        );

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.env, Env::Prod);
        assert_eq!(config.rpc.host, "chat.internal");
        assert_eq!(config.rpc.port, 44044);
        assert_eq!(config.rpc.timeout(), Duration::from_millis(2500));
    }

    #[test]
    fn env_and_host_default() {
        let file = write_config(
            r#"
            [rpc]
            port = 44044
            timeout_ms = 5000
            "#,
        );

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.env, Env::Local);
        assert_eq!(config.rpc.host, DEFAULT_HOST);
        assert_eq!(config.rpc.server_url(), "http://localhost:44044");
    }

    #[test]
    fn missing_file_names_path() {
        let err = Config::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }

    #[test]
    fn missing_port_is_parse_error() {
        let file = write_config("[rpc]\ntimeout_ms = 5000\n");
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn unknown_env_is_parse_error() {
        let file = write_config("env = \"staging\"\n[rpc]\nport = 1\ntimeout_ms = 1\n");
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn zero_port_rejected() {
        let file = write_config("[rpc]\nport = 0\ntimeout_ms = 5000\n");
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "rpc.port",
                ..
            }
        ));
    }

    #[test]
    fn zero_timeout_rejected() {
        let file = write_config("[rpc]\nport = 44044\ntimeout_ms = 0\n");
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "rpc.timeout_ms",
                ..
            }
        ));
    }

    #[test]
    fn ipv6_host_is_bracketed() {
        let rpc = RpcConfig {
            host: "::1".to_string(),
            port: 44044,
            timeout_ms: 1,
        };
        assert_eq!(rpc.address(), "[::1]:44044");
        assert_eq!(rpc.server_url(), "http://[::1]:44044");
    }

    #[test]
    fn ipv4_host_is_not_bracketed() {
        let rpc = RpcConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            timeout_ms: 1,
        };
        assert_eq!(rpc.address(), "127.0.0.1:8080");
    }
}
