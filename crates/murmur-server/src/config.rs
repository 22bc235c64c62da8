use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Runtime settings read from `MURMUR_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = get("MURMUR_DB_PATH").unwrap_or_else(|| "murmur.db".into()).into();
        let host = get("MURMUR_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match get("MURMUR_PORT") {
            Some(p) => p.parse().with_context(|| format!("invalid MURMUR_PORT: {:?}", p))?,
            None => 8080,
        };

        Ok(Self { db_path, host, port })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
