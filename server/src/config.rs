//! Server configuration read from the environment.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `HOST` | `127.0.0.1` | address to bind |
//! | `PORT` | `3000` | port to bind |
//! | `SORT_COMPLETED_LAST` | `true` | move fully completed lists to the end of the index |
//! | `SESSION_IDLE_SECS` | `3600` | drop a session after this many seconds without a request |
//! | `MAX_SESSIONS` | `10000` | most sessions held at once; the least recently used is dropped |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::ParseIntError;
use std::time::Duration;

use thiserror::Error;
use todo_core::ListOrder;

use crate::store::SessionLimits;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("HOST '{value}' is not an IP address")]
    InvalidHost { value: String },

    #[error("PORT '{value}' is not a valid port: {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("{name} '{value}' is not a boolean (expected true/false/1/0)")]
    InvalidFlag { name: &'static str, value: String },

    #[error("{name} '{value}' is not a positive whole number")]
    InvalidCount { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub list_order: ListOrder,
    pub session_limits: SessionLimits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            list_order: ListOrder::CompletedLast,
            session_limits: SessionLimits::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source. Unset or blank variables
    /// fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let host = match read("HOST") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidHost { value })?,
            None => defaults.host,
        };

        let port = match read("PORT") {
            Some(value) => value
                .parse()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => defaults.port,
        };

        let list_order = match read("SORT_COMPLETED_LAST") {
            Some(value) => {
                if parse_flag("SORT_COMPLETED_LAST", value)? {
                    ListOrder::CompletedLast
                } else {
                    ListOrder::Stored
                }
            }
            None => defaults.list_order,
        };

        let idle_timeout = match read("SESSION_IDLE_SECS") {
            Some(value) => Duration::from_secs(parse_count("SESSION_IDLE_SECS", value)? as u64),
            None => defaults.session_limits.idle_timeout,
        };

        let max_sessions = match read("MAX_SESSIONS") {
            Some(value) => parse_count("MAX_SESSIONS", value)?,
            None => defaults.session_limits.max_sessions,
        };

        Ok(Self {
            host,
            port,
            list_order,
            session_limits: SessionLimits {
                idle_timeout,
                max_sessions,
            },
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_flag(name: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { name, value }),
    }
}

fn parse_count(name: &'static str, value: String) -> Result<usize, ConfigError> {
    match value.parse::<usize>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(ConfigError::InvalidCount { name, value }),
    }
}
