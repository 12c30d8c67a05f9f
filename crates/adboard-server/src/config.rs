use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub db_readers: usize,
    pub body_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("ADBOARD_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(&lookup, "ADBOARD_PORT", 5000)?;
        let db_path = lookup("ADBOARD_DB_PATH")
            .unwrap_or_else(|| "adboard.db".into())
            .into();
        let db_readers = parse_or(&lookup, "ADBOARD_DB_READERS", 4)?;
        let body_limit = parse_or(&lookup, "ADBOARD_BODY_LIMIT", 64 * 1024)?;

        Ok(Self {
            host,
            port,
            db_path,
            db_readers,
            body_limit,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{} must be a number, got '{}'", key, raw)),
        None => Ok(default),
    }
}
