use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_DB_USER: &str = "myuser";
const DEFAULT_DB_PASSWORD: &str = "mypassword";
const DEFAULT_DB_NAME: &str = "mydatabase";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_SLOW_QUERY_MS: u64 = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Full connection string; takes precedence over the individual parts
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    pub slow_query_threshold: Duration,
}

impl Config {
    /// Read configuration from the process environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database = DatabaseConfig {
            url: lookup("DATABASE_URL"),
            host: lookup("BOOKSTORE_DB_HOST").unwrap_or_else(|| DEFAULT_DB_HOST.to_string()),
            port: parse_or(&lookup, "BOOKSTORE_DB_PORT", DEFAULT_DB_PORT)?,
            user: lookup("BOOKSTORE_DB_USER").unwrap_or_else(|| DEFAULT_DB_USER.to_string()),
            password: lookup("BOOKSTORE_DB_PASSWORD")
                .unwrap_or_else(|| DEFAULT_DB_PASSWORD.to_string()),
            name: lookup("BOOKSTORE_DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.to_string()),
            max_connections: parse_or(
                &lookup,
                "BOOKSTORE_DB_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            slow_query_threshold: Duration::from_millis(parse_or(
                &lookup,
                "BOOKSTORE_SLOW_QUERY_MS",
                DEFAULT_SLOW_QUERY_MS,
            )?),
        };

        let bind_addr = parse_value(
            "BOOKSTORE_BIND_ADDR",
            lookup("BOOKSTORE_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        )?;

        if database.max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "BOOKSTORE_DB_MAX_CONNECTIONS",
                value: "0".to_string(),
                reason: "the pool needs at least one connection".to_string(),
            });
        }

        Ok(Config {
            bind_addr,
            database,
        })
    }

    /// Configuration for talking to a specific database URL, with defaults for everything else
    pub fn for_database_url(db_url: impl Into<String>) -> Result<Self, ConfigError> {
        let db_url = db_url.into();
        Self::from_lookup(|key| (key == "DATABASE_URL").then(|| db_url.clone()))
    }
}

impl DatabaseConfig {
    pub fn connection_string(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.name
            ),
        }
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => parse_value(key, value),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}
