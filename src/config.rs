use log::info;
use std::{env, fmt::Display, net::SocketAddr, path::PathBuf, str::FromStr};
use thiserror::Error;

const DEFAULT_ORIGINS: &str = "https://electionpulse2025.com,http://localhost:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub candidates_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let production = env::var("ENVIRONMENT").is_ok_and(|v| v == "production");
        let default_host = if production { "0.0.0.0" } else { "127.0.0.1" };

        let host: String = load("HOST", default_host)?;
        let port: u16 = load("PORT", "8080")?;
        let bind_addr = format!("{host}:{port}")
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                key: "HOST",
                value: host.clone(),
                reason: e.to_string(),
            })?;

        let origins: String = load("ALLOWED_ORIGINS", DEFAULT_ORIGINS)?;

        Ok(Self {
            database_url: load("DATABASE_URL", "sqlite:election_poll.db")?,
            max_connections: load("DB_MAX_CONNECTIONS", "5")?,
            candidates_path: load("CANDIDATES_PATH", "candidates.json")?,
            bind_addr,
            allowed_origins: split_origins(&origins),
        })
    }
}

fn load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
