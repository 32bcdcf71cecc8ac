//! Health check reporting
//!
//! This module provides health check functionality for the team-draw
//! service, including readiness and liveness probes.

use crate::service::app::AppState;
use crate::utils::current_timestamp;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

/// Health check status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    /// Gauge value exported to Prometheus
    pub fn as_gauge(&self) -> u8 {
        match self {
            HealthStatus::Healthy => 2,
            HealthStatus::Degraded => 1,
            HealthStatus::Unhealthy => 0,
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Degraded => write!(f, "degraded"),
            HealthStatus::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Overall service status
    pub status: HealthStatus,
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
    /// Current timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Detailed component checks
    pub checks: Vec<ComponentCheck>,
    /// Service statistics
    pub stats: ServiceStats,
}

/// Individual component health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentCheck {
    /// Component name
    pub name: String,
    /// Component status
    pub status: HealthStatus,
    /// Optional error message if unhealthy
    pub message: Option<String>,
    /// Check duration in milliseconds
    pub duration_ms: u64,
}

/// Service statistics for health reporting
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceStats {
    /// Players on the roster
    pub total_players: usize,
    /// Players taking part in draws
    pub active_players: usize,
    /// Draws since service start
    pub draws_performed: u64,
    /// Seconds since service start
    pub uptime_seconds: u64,
}

impl HealthCheck {
    /// Perform a full health check of the service
    pub async fn check(app_state: Arc<AppState>) -> Result<Self> {
        let mut checks = Vec::new();
        let mut overall_status = HealthStatus::Healthy;

        let service_check = Self::check_service_running(&app_state).await;
        if service_check.status != HealthStatus::Healthy {
            overall_status = HealthStatus::Unhealthy;
        }
        checks.push(service_check);

        let (roster_check, stats) = Self::check_roster(&app_state).await;
        if roster_check.status == HealthStatus::Unhealthy {
            overall_status = HealthStatus::Unhealthy;
        } else if roster_check.status == HealthStatus::Degraded
            && overall_status == HealthStatus::Healthy
        {
            overall_status = HealthStatus::Degraded;
        }
        checks.push(roster_check);

        app_state
            .metrics()
            .update_health_status(overall_status.as_gauge());
        app_state.metrics().update_uptime(app_state.uptime());

        Ok(HealthCheck {
            status: overall_status,
            service: app_state.config().service.name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: current_timestamp(),
            checks,
            stats,
        })
    }

    /// Simple liveness check - just verify service is running
    pub async fn liveness_check(app_state: Arc<AppState>) -> Result<HealthStatus> {
        if app_state.is_running().await {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy)
        }
    }

    /// Readiness check - verify service can serve roster requests
    pub async fn readiness_check(app_state: Arc<AppState>) -> Result<HealthStatus> {
        if !app_state.is_running().await {
            return Ok(HealthStatus::Unhealthy);
        }

        let (roster_check, _) = Self::check_roster(&app_state).await;
        Ok(roster_check.status)
    }

    /// Check if service is running
    async fn check_service_running(app_state: &AppState) -> ComponentCheck {
        let start = std::time::Instant::now();

        let (status, message) = if app_state.is_running().await {
            (HealthStatus::Healthy, None)
        } else {
            (
                HealthStatus::Unhealthy,
                Some("Service is not running".to_string()),
            )
        };

        ComponentCheck {
            name: "service_running".to_string(),
            status,
            message,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Check the roster store can be read and gather roster statistics
    async fn check_roster(app_state: &AppState) -> (ComponentCheck, ServiceStats) {
        let start = std::time::Instant::now();
        let roster = app_state.roster();
        let mut stats = ServiceStats {
            draws_performed: app_state.metrics().draw().draws_total.get(),
            uptime_seconds: app_state.uptime().as_secs(),
            ..ServiceStats::default()
        };

        let (status, message) = match tokio::task::spawn_blocking(move || roster.get_all()).await
        {
            Ok(Ok(players)) => {
                let active = players.iter().filter(|p| p.active).count();
                stats.total_players = players.len();
                stats.active_players = active;
                app_state
                    .metrics()
                    .update_roster_size(active, players.len() - active);
                debug!(
                    "Roster check: {} players, {} active",
                    stats.total_players, stats.active_players
                );
                (HealthStatus::Healthy, None)
            }
            Ok(Err(e)) => {
                error!("Roster health check failed: {}", e);
                (
                    HealthStatus::Unhealthy,
                    Some(format!("Roster read failed: {}", e)),
                )
            }
            Err(e) => {
                error!("Roster health check task failed: {}", e);
                (
                    HealthStatus::Degraded,
                    Some("Roster check did not complete".to_string()),
                )
            }
        };

        let check = ComponentCheck {
            name: "roster_store".to_string(),
            status,
            message,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        (check, stats)
    }

    /// Convert health check to JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize health check: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balancer::GreedyTeamBalancer;
    use crate::config::AppConfig;
    use crate::metrics::MetricsCollector;
    use crate::roster::storage::MockRosterStorage;
    use crate::roster::{InMemoryRosterStore, RosterStorage};
    use crate::service::auth::StaticPasswordVerifier;

    fn state_with(roster: Arc<dyn RosterStorage>) -> Arc<AppState> {
        Arc::new(AppState::with_components(
            AppConfig::default(),
            roster,
            Arc::new(GreedyTeamBalancer::new()),
            Arc::new(StaticPasswordVerifier::new("pw")),
            Arc::new(MetricsCollector::new().unwrap()),
        ))
    }

    #[tokio::test]
    async fn test_healthy_service_reports_roster_stats() {
        let roster = Arc::new(InMemoryRosterStore::new());
        roster.add("a", 3.0).unwrap();
        let b = roster.add("b", 2.0).unwrap();
        roster.toggle_active(b.id).unwrap();

        let health = HealthCheck::check(state_with(roster)).await.unwrap();
        assert_eq!(health.status, HealthStatus::Healthy);
        assert_eq!(health.stats.total_players, 2);
        assert_eq!(health.stats.active_players, 1);
        assert_eq!(health.checks.len(), 2);
        assert!(health.to_json().unwrap().contains("roster_store"));
    }

    #[tokio::test]
    async fn test_failing_roster_is_unhealthy() {
        let mut roster = MockRosterStorage::new();
        roster
            .expect_get_all()
            .returning(|| Err(anyhow::anyhow!("disk on fire")));

        let state = state_with(Arc::new(roster));
        let health = HealthCheck::check(state.clone()).await.unwrap();
        assert_eq!(health.status, HealthStatus::Unhealthy);
        assert_eq!(
            HealthCheck::readiness_check(state).await.unwrap(),
            HealthStatus::Unhealthy
        );
    }

    #[tokio::test]
    async fn test_stopped_service_is_not_alive() {
        let state = state_with(Arc::new(InMemoryRosterStore::new()));
        assert_eq!(
            HealthCheck::liveness_check(state.clone()).await.unwrap(),
            HealthStatus::Healthy
        );

        state.mark_stopped().await;
        assert_eq!(
            HealthCheck::liveness_check(state).await.unwrap(),
            HealthStatus::Unhealthy
        );
    }
}
