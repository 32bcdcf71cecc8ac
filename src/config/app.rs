//! Main application configuration
//!
//! This module defines the primary configuration structures for the team-draw
//! service, including environment variable and TOML file loading and
//! validation.

use crate::config::{BalancerConfig, RosterConfig};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub roster: RosterConfig,
    pub balancer: BalancerConfig,
    pub auth: AuthSettings,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and metrics
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Interface the HTTP server binds to
    pub host: String,
    /// Port for the HTTP API
    pub http_port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
}

/// Password gate settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// File holding the shared password (surrounding whitespace ignored)
    pub password_file: PathBuf,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "team-draw".to_string(),
            log_level: "info".to_string(),
            host: "0.0.0.0".to_string(),
            http_port: 8080,
            shutdown_timeout_seconds: 10,
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            password_file: PathBuf::from("password.txt"),
        }
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid {} value: {}", key, value))
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides(|key| env::var(key).ok())?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; missing keys take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Override settings from a key lookup (environment variables in production)
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Service settings
        if let Some(name) = lookup("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Some(log_level) = lookup("LOG_LEVEL") {
            self.service.log_level = log_level;
        }
        if let Some(host) = lookup("HTTP_HOST") {
            self.service.host = host;
        }
        if let Some(port) = lookup("HTTP_PORT") {
            self.service.http_port = parse_var("HTTP_PORT", &port)?;
        }
        if let Some(timeout) = lookup("SHUTDOWN_TIMEOUT_SECONDS") {
            self.service.shutdown_timeout_seconds =
                parse_var("SHUTDOWN_TIMEOUT_SECONDS", &timeout)?;
        }

        // Roster settings
        if let Some(file) = lookup("PLAYERS_FILE") {
            self.roster.players_file = PathBuf::from(file);
        }
        if let Some(min) = lookup("MIN_RATING") {
            self.roster.min_rating = parse_var("MIN_RATING", &min)?;
        }
        if let Some(max) = lookup("MAX_RATING") {
            self.roster.max_rating = parse_var("MAX_RATING", &max)?;
        }

        // Balancer settings
        if let Some(attempts) = lookup("SWAP_ATTEMPTS") {
            self.balancer.swap_attempts = parse_var("SWAP_ATTEMPTS", &attempts)?;
        }
        if let Some(tolerance) = lookup("SWAP_TOLERANCE") {
            self.balancer.swap_tolerance = parse_var("SWAP_TOLERANCE", &tolerance)?;
        }

        // Auth settings
        if let Some(file) = lookup("PASSWORD_FILE") {
            self.auth.password_file = PathBuf::from(file);
        }

        Ok(())
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.service.shutdown_timeout_seconds)
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.service.host, self.service.http_port)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.http_port == 0 {
        return Err(anyhow!("HTTP port cannot be 0"));
    }
    if config.service.shutdown_timeout_seconds == 0 {
        return Err(anyhow!("Shutdown timeout must be greater than 0"));
    }

    // Validate roster settings
    if config.roster.players_file.as_os_str().is_empty() {
        return Err(anyhow!("Players file path cannot be empty"));
    }
    if !config.roster.min_rating.is_finite() || !config.roster.max_rating.is_finite() {
        return Err(anyhow!("Rating bounds must be finite numbers"));
    }
    if config.roster.min_rating > config.roster.max_rating {
        return Err(anyhow!(
            "Min rating {} is greater than max rating {}",
            config.roster.min_rating,
            config.roster.max_rating
        ));
    }

    // Validate balancer settings
    let tolerance = config.balancer.swap_tolerance;
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(anyhow!("Swap tolerance must be zero or positive"));
    }

    if config.auth.password_file.as_os_str().is_empty() {
        return Err(anyhow!("Password file path cannot be empty"));
    }

    Ok(())
}
