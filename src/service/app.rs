//! Main application state and service coordination
//!
//! This module contains the AppState that wires the roster store, the team
//! balancer, the password gate and metrics together for the HTTP layer.

use crate::balancer::{GreedyTeamBalancer, TeamBalancer};
use crate::config::{validate_config, AppConfig};
use crate::metrics::MetricsCollector;
use crate::roster::{JsonFileRosterStore, RosterStorage};
use crate::service::auth::{FilePasswordVerifier, PasswordVerifier};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

/// Service-level errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Service initialization error: {message}")]
    Initialization { message: String },
}

/// Main application state containing all service components
pub struct AppState {
    /// Application configuration
    config: AppConfig,

    /// Player roster persistence
    roster: Arc<dyn RosterStorage>,

    /// Team balancer used for draws
    balancer: Arc<dyn TeamBalancer>,

    /// Shared-password gate
    password_verifier: Arc<dyn PasswordVerifier>,

    /// Prometheus metrics
    metrics_collector: Arc<MetricsCollector>,

    /// When the state was created
    started_at: Instant,

    /// Service status
    is_running: Arc<RwLock<bool>>,
}

impl AppState {
    /// Initialize the application with production components
    pub fn new(config: AppConfig) -> Result<Self, ServiceError> {
        info!("Initializing team-draw service");
        info!(
            "Configuration: service={}, players_file={}",
            config.service.name,
            config.roster.players_file.display()
        );

        validate_config(&config).map_err(|e| ServiceError::Configuration {
            message: format!("{:#}", e),
        })?;

        let metrics_collector =
            Arc::new(
                MetricsCollector::new().map_err(|e| ServiceError::Initialization {
                    message: format!("Failed to create metrics collector: {}", e),
                })?,
            );

        let roster = JsonFileRosterStore::with_metrics(
            config.roster.players_file.clone(),
            metrics_collector.clone(),
        )
        .map_err(|e| ServiceError::Storage {
            message: format!("Failed to open roster: {:#}", e),
        })?;

        let password_verifier = FilePasswordVerifier::new(config.auth.password_file.clone());
        info!("Roster store ready at {}", roster.path().display());

        let balancer = GreedyTeamBalancer::with_config(config.balancer.clone());
        info!(
            "Team balancer: {} swap attempts, tolerance {}",
            balancer.config().swap_attempts,
            balancer.config().swap_tolerance
        );

        Ok(Self::with_components(
            config,
            Arc::new(roster),
            Arc::new(balancer),
            Arc::new(password_verifier),
            metrics_collector,
        ))
    }

    /// Assemble state from explicit components (for testing and embedding)
    pub fn with_components(
        config: AppConfig,
        roster: Arc<dyn RosterStorage>,
        balancer: Arc<dyn TeamBalancer>,
        password_verifier: Arc<dyn PasswordVerifier>,
        metrics_collector: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            config,
            roster,
            balancer,
            password_verifier,
            metrics_collector,
            started_at: Instant::now(),
            is_running: Arc::new(RwLock::new(true)),
        }
    }

    /// Get service configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the roster store
    pub fn roster(&self) -> Arc<dyn RosterStorage> {
        self.roster.clone()
    }

    /// Get the team balancer
    pub fn balancer(&self) -> Arc<dyn TeamBalancer> {
        self.balancer.clone()
    }

    /// Get the password verifier
    pub fn password_verifier(&self) -> Arc<dyn PasswordVerifier> {
        self.password_verifier.clone()
    }

    /// Get the metrics collector
    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics_collector.clone()
    }

    /// Time since the state was created
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Check if service is running
    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    /// Mark the service as stopping so health probes report it
    pub async fn mark_stopped(&self) {
        *self.is_running.write().await = false;
        info!("Service marked as stopped");
    }
}
