//! Application configuration

use std::env;

use anyhow::{Context, Result};

/// Relay configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// WebSocket relay port
    pub server_port: u16,
    /// Retained shared-chronicle entries per session
    pub chronicle_capacity: usize,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            chronicle_capacity: env::var("CHRONICLE_CAPACITY")
                .unwrap_or_else(|_| "200".to_string())
                .parse()
                .context("CHRONICLE_CAPACITY must be a positive integer")?,
        })
    }
}
