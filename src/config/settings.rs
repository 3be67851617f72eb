//! Runtime settings read from the environment (a `.env` file is loaded first by the binary).

use crate::error::ConfigError;
use std::net::SocketAddr;
use std::str::FromStr;

/// Which `CourseStore` implementation backs the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(ConfigError::Invalid {
                name: "STORE_BACKEND",
                value: s.to_string(),
            }),
        }
    }
}

/// How bearer tokens are checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthMode {
    Jwt { secret: String },
    /// Every token is accepted.
    Disabled,
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub store: StoreBackend,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub auth: AuthMode,
    pub body_limit_bytes: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").unwrap_or_else(|| "postgres://localhost/courses".into());
        let store = match get("STORE_BACKEND") {
            Some(v) => v.parse()?,
            None => StoreBackend::Postgres,
        };
        let bind_addr = parse_or("BIND_ADDR", get("BIND_ADDR"), SocketAddr::from(([127, 0, 0, 1], 50054)))?;
        let max_connections = parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), 5u32)?;
        let body_limit_bytes = parse_or("BODY_LIMIT_BYTES", get("BODY_LIMIT_BYTES"), 64 * 1024usize)?;
        let auth_disabled = parse_or("AUTH_DISABLED", get("AUTH_DISABLED"), false)?;

        let auth = if auth_disabled {
            AuthMode::Disabled
        } else {
            let secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
            AuthMode::Jwt { secret }
        };

        Ok(Settings {
            database_url,
            store,
            bind_addr,
            max_connections,
            auth,
            body_limit_bytes,
        })
    }
}

fn parse_or<T: FromStr>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
