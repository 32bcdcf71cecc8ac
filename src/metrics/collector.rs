//! Metrics collection using Prometheus
//!
//! This module provides metrics collection for the team-draw service using
//! Prometheus metrics.

use crate::balancer::BalanceOutcome;
use anyhow::Result;
use prometheus::{
    Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for the team-draw service
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Service-level metrics
    service_metrics: ServiceMetrics,

    /// Team draw metrics
    draw_metrics: DrawMetrics,

    /// Roster store metrics
    roster_metrics: RosterMetrics,
}

/// Service-level metrics
#[derive(Clone)]
pub struct ServiceMetrics {
    /// Service uptime in seconds
    pub uptime_seconds: IntGauge,

    /// HTTP requests handled, by route and status class
    pub http_requests_total: IntCounterVec,

    /// Health check status (0=unhealthy, 1=degraded, 2=healthy)
    pub health_status: IntGauge,

    /// Password gate checks by result
    pub password_checks_total: IntCounterVec,
}

/// Team draw metrics
#[derive(Clone)]
pub struct DrawMetrics {
    /// Total successful draws
    pub draws_total: IntCounter,

    /// Draws rejected before balancing (bad team size, empty roster)
    pub draws_rejected_total: IntCounter,

    /// Time spent balancing
    pub draw_duration: Histogram,

    /// Players per draw
    pub draw_players: Histogram,

    /// Swap attempts by outcome (accepted, rejected)
    pub swaps_total: IntCounterVec,
}

/// Roster store metrics
#[derive(Clone)]
pub struct RosterMetrics {
    /// Store operations by operation and status
    pub store_operations_total: IntCounterVec,

    /// Times unreadable storage was reset to an empty roster
    pub store_recoveries_total: IntCounter,

    /// Players currently rostered, by active flag
    pub players: IntGaugeVec,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let service_metrics = ServiceMetrics::new(&registry)?;
        let draw_metrics = DrawMetrics::new(&registry)?;
        let roster_metrics = RosterMetrics::new(&registry)?;

        Ok(Self {
            registry,
            service_metrics,
            draw_metrics,
            roster_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Get service metrics
    pub fn service(&self) -> &ServiceMetrics {
        &self.service_metrics
    }

    /// Get draw metrics
    pub fn draw(&self) -> &DrawMetrics {
        &self.draw_metrics
    }

    /// Get roster metrics
    pub fn roster(&self) -> &RosterMetrics {
        &self.roster_metrics
    }

    /// Record a completed draw
    pub fn record_draw(&self, player_count: usize, outcome: &BalanceOutcome, duration: Duration) {
        self.draw_metrics.draws_total.inc();
        self.draw_metrics
            .draw_duration
            .observe(duration.as_secs_f64());
        self.draw_metrics.draw_players.observe(player_count as f64);

        self.draw_metrics
            .swaps_total
            .with_label_values(&["accepted"])
            .inc_by(outcome.refinement.accepted() as u64);
        self.draw_metrics
            .swaps_total
            .with_label_values(&["rejected"])
            .inc_by(outcome.refinement.rejected as u64);
    }

    /// Record a draw rejected before balancing
    pub fn record_draw_rejected(&self) {
        self.draw_metrics.draws_rejected_total.inc();
    }

    /// Record a roster store operation
    pub fn record_store_operation(&self, operation: &str, success: bool) {
        let status = if success { "success" } else { "error" };

        self.roster_metrics
            .store_operations_total
            .with_label_values(&[operation, status])
            .inc();
    }

    /// Record storage being reset after it could not be read
    pub fn record_store_recovery(&self) {
        self.roster_metrics.store_recoveries_total.inc();
    }

    /// Update the rostered player gauges
    pub fn update_roster_size(&self, active: usize, inactive: usize) {
        self.roster_metrics
            .players
            .with_label_values(&["active"])
            .set(active as i64);
        self.roster_metrics
            .players
            .with_label_values(&["inactive"])
            .set(inactive as i64);
    }

    /// Record a password check
    pub fn record_password_check(&self, valid: bool) {
        let result = if valid { "valid" } else { "invalid" };

        self.service_metrics
            .password_checks_total
            .with_label_values(&[result])
            .inc();
    }

    /// Record an HTTP request
    pub fn record_http_request(&self, route: &str, status: u16) {
        let class = match status {
            200..=299 => "2xx",
            400..=499 => "4xx",
            500..=599 => "5xx",
            _ => "other",
        };

        self.service_metrics
            .http_requests_total
            .with_label_values(&[route, class])
            .inc();
    }

    /// Update health status
    pub fn update_health_status(&self, status: u8) {
        self.service_metrics.health_status.set(status as i64);
    }

    /// Update uptime
    pub fn update_uptime(&self, uptime: Duration) {
        self.service_metrics
            .uptime_seconds
            .set(uptime.as_secs() as i64);
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl ServiceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let uptime_seconds = IntGauge::new("team_draw_uptime_seconds", "Service uptime in seconds")?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        let http_requests_total = IntCounterVec::new(
            Opts::new("team_draw_http_requests_total", "Total HTTP requests handled"),
            &["route", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let health_status = IntGauge::new(
            "team_draw_health_status",
            "Health status (0=unhealthy, 1=degraded, 2=healthy)",
        )?;
        registry.register(Box::new(health_status.clone()))?;

        let password_checks_total = IntCounterVec::new(
            Opts::new("team_draw_password_checks_total", "Password gate checks"),
            &["result"],
        )?;
        registry.register(Box::new(password_checks_total.clone()))?;

        Ok(Self {
            uptime_seconds,
            http_requests_total,
            health_status,
            password_checks_total,
        })
    }
}

impl DrawMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let draws_total = IntCounter::new("team_draw_draws_total", "Total team draws")?;
        registry.register(Box::new(draws_total.clone()))?;

        let draws_rejected_total = IntCounter::new(
            "team_draw_draws_rejected_total",
            "Team draws rejected before balancing",
        )?;
        registry.register(Box::new(draws_rejected_total.clone()))?;

        let draw_duration = Histogram::with_opts(
            HistogramOpts::new(
                "team_draw_draw_duration_seconds",
                "Time spent balancing teams",
            )
            .buckets(vec![0.00001, 0.0001, 0.001, 0.005, 0.01, 0.05, 0.1]),
        )?;
        registry.register(Box::new(draw_duration.clone()))?;

        let draw_players = Histogram::with_opts(
            HistogramOpts::new("team_draw_draw_players", "Players per team draw")
                .buckets(vec![2.0, 5.0, 10.0, 15.0, 20.0, 30.0, 50.0, 100.0]),
        )?;
        registry.register(Box::new(draw_players.clone()))?;

        let swaps_total = IntCounterVec::new(
            Opts::new("team_draw_swaps_total", "Swap refinement attempts"),
            &["outcome"],
        )?;
        registry.register(Box::new(swaps_total.clone()))?;

        Ok(Self {
            draws_total,
            draws_rejected_total,
            draw_duration,
            draw_players,
            swaps_total,
        })
    }
}

impl RosterMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let store_operations_total = IntCounterVec::new(
            Opts::new(
                "team_draw_store_operations_total",
                "Roster store operations",
            ),
            &["operation", "status"],
        )?;
        registry.register(Box::new(store_operations_total.clone()))?;

        let store_recoveries_total = IntCounter::new(
            "team_draw_store_recoveries_total",
            "Unreadable roster storage reset to empty",
        )?;
        registry.register(Box::new(store_recoveries_total.clone()))?;

        let players = IntGaugeVec::new(
            Opts::new("team_draw_players", "Rostered players"),
            &["state"],
        )?;
        registry.register(Box::new(players.clone()))?;

        Ok(Self {
            store_operations_total,
            store_recoveries_total,
            players,
        })
    }
}
