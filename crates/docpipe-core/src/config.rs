//! Configuration module
//!
//! Env-driven configuration shared by the API and the worker. Every knob has
//! a default except `DATABASE_URL`, which both binaries require.

use std::env;

const SERVER_PORT: u16 = 8080;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const POLL_INTERVAL_MS: u64 = 1000;
const ERROR_BACKOFF_SECS: u64 = 5;
const MAX_UPLOAD_SIZE_MB: usize = 50;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    server_port: u16,
    database_url: String,
    db_max_connections: u32,
    db_timeout_seconds: u64,
    storage_path: String,
    poll_interval_ms: u64,
    error_backoff_secs: u64,
    max_upload_size_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        Ok(Config {
            server_port: env::var("SERVER_PORT")
                .or_else(|_| env::var("PORT"))
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("SERVER_PORT must be a valid port number"))?,
            database_url,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            storage_path: env::var("STORAGE_PATH")
                .unwrap_or_else(|_| "./data/storage".to_string()),
            poll_interval_ms: env::var("WORKER_POLL_INTERVAL_MS")
                .unwrap_or_else(|_| POLL_INTERVAL_MS.to_string())
                .parse()
                .unwrap_or(POLL_INTERVAL_MS),
            error_backoff_secs: env::var("WORKER_ERROR_BACKOFF_SECS")
                .unwrap_or_else(|_| ERROR_BACKOFF_SECS.to_string())
                .parse()
                .unwrap_or(ERROR_BACKOFF_SECS),
            max_upload_size_bytes: env::var("MAX_UPLOAD_SIZE_MB")
                .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
                .parse::<usize>()
                .unwrap_or(MAX_UPLOAD_SIZE_MB)
                * 1024
                * 1024,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.database_url.trim().is_empty() {
            return Err(anyhow::anyhow!("DATABASE_URL cannot be empty"));
        }
        if self.storage_path.trim().is_empty() {
            return Err(anyhow::anyhow!("STORAGE_PATH cannot be empty"));
        }
        if self.poll_interval_ms == 0 {
            return Err(anyhow::anyhow!("WORKER_POLL_INTERVAL_MS must be > 0"));
        }
        Ok(())
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.db_timeout_seconds
    }

    pub fn storage_path(&self) -> &str {
        &self.storage_path
    }

    pub fn poll_interval_ms(&self) -> u64 {
        self.poll_interval_ms
    }

    pub fn error_backoff_secs(&self) -> u64 {
        self.error_backoff_secs
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.max_upload_size_bytes
    }
}
