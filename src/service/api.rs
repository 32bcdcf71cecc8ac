//! HTTP API for the roster and team draws
//!
//! Routes mirror the web client's needs: player CRUD, the active toggle, the
//! team draw, the password gate, plus health and Prometheus endpoints. Store
//! calls hold a blocking mutex around file I/O, so they run on the blocking
//! thread pool.

use crate::error::{DrawError, Result};
use crate::metrics::encode_metrics;
use crate::roster::{parse_team_size, validate_player_input, RosterStorage};
use crate::service::app::AppState;
use crate::service::health::{HealthCheck, HealthStatus};
use crate::types::{
    DrawRequest, DrawResponse, Player, PasswordRequest, PlayerId, PlayerInput, TeamView,
};
use crate::utils::team_label;
use anyhow::Context;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        MatchedPath, Path, Request, State,
    },
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Error returned from API handlers, rendered as `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        let status = match err.downcast_ref::<DrawError>() {
            Some(
                DrawError::InvalidTeamSize { .. }
                | DrawError::InvalidPlayer { .. }
                | DrawError::InvalidRequest { .. }
                | DrawError::NoActivePlayers,
            ) => StatusCode::BAD_REQUEST,
            Some(DrawError::PlayerNotFound { .. }) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {:#}", err);
        }

        Self::new(status, err.to_string())
    }
}

impl From<DrawError> for ApiError {
    fn from(err: DrawError) -> Self {
        anyhow::Error::from(err).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

/// Ids that are not non-negative integers cannot name a player
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        debug!("Rejected player path: {}", rejection.body_text());
        Self::new(StatusCode::NOT_FOUND, "Player not found")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Run a roster operation on the blocking pool
async fn with_roster<T, F>(state: &AppState, op: F) -> std::result::Result<T, ApiError>
where
    F: FnOnce(&dyn RosterStorage) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let roster = state.roster();
    tokio::task::spawn_blocking(move || op(roster.as_ref()))
        .await
        .map_err(|e| ApiError::internal(format!("Roster task failed: {}", e)))?
        .map_err(ApiError::from)
}

/// Create the Axum router with every endpoint
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/alive", get(alive_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/players", get(list_players).post(create_player))
        .route("/api/players/{id}", put(update_player).delete(delete_player))
        .route("/api/players/{id}/toggle-active", patch(toggle_player_active))
        .route("/api/draw-teams", post(draw_teams))
        .route("/api/check-password", post(check_password))
        .layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .with_state(state)
}

/// Count requests by matched route and status class
///
/// Runs outside routing, so requests that match no route are labelled
/// `unmatched`.
async fn track_requests(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    state
        .metrics()
        .record_http_request(&route, response.status().as_u16());
    response
}

/// Root endpoint handler - shows service information
async fn root_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "service": state.config().service.name,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/api/players",
            "/api/draw-teams",
            "/api/check-password",
            "/health",
            "/ready",
            "/alive",
            "/metrics"
        ]
    }))
}

/// Full health report
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("Health check requested");

    match HealthCheck::check(state).await {
        Ok(health) => {
            let code = match health.status {
                HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::OK,
            };
            (code, Json(json!(health)))
        }
        Err(e) => {
            error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy", "error": e.to_string() })),
            )
        }
    }
}

/// Readiness check endpoint handler
async fn ready_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("Readiness check requested");

    match HealthCheck::readiness_check(state).await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "Ready"),
        Ok(HealthStatus::Degraded) => (StatusCode::OK, "Degraded but ready"),
        Ok(HealthStatus::Unhealthy) => (StatusCode::SERVICE_UNAVAILABLE, "Not ready"),
        Err(e) => {
            error!("Readiness check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "Not ready")
        }
    }
}

/// Liveness check endpoint handler
async fn alive_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match HealthCheck::liveness_check(state).await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "Alive"),
        _ => (StatusCode::SERVICE_UNAVAILABLE, "Not alive"),
    }
}

/// Prometheus metrics endpoint handler
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    match encode_metrics(&state.metrics()) {
        Ok(output) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
            output,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to encode metrics",
            )
                .into_response()
        }
    }
}

async fn list_players(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<Vec<Player>>, ApiError> {
    let players = with_roster(&state, |roster| roster.get_all()).await?;
    Ok(Json(players))
}

async fn create_player(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<PlayerInput>, JsonRejection>,
) -> std::result::Result<(StatusCode, Json<Player>), ApiError> {
    let Json(input) = payload?;
    let valid = validate_player_input(&input, &state.config().roster)?;

    let player = with_roster(&state, move |roster| roster.add(&valid.name, valid.rating)).await?;
    Ok((StatusCode::CREATED, Json(player)))
}

async fn update_player(
    State(state): State<Arc<AppState>>,
    player_path: std::result::Result<Path<PlayerId>, PathRejection>,
    payload: std::result::Result<Json<PlayerInput>, JsonRejection>,
) -> std::result::Result<Json<Player>, ApiError> {
    let Path(player_id) = player_path?;
    let Json(input) = payload?;
    let valid = validate_player_input(&input, &state.config().roster)?;

    with_roster(&state, move |roster| {
        roster.update(player_id, &valid.name, valid.rating)
    })
    .await?
    .map(Json)
    .ok_or_else(|| DrawError::PlayerNotFound { player_id }.into())
}

async fn delete_player(
    State(state): State<Arc<AppState>>,
    player_path: std::result::Result<Path<PlayerId>, PathRejection>,
) -> std::result::Result<Json<serde_json::Value>, ApiError> {
    let Path(player_id) = player_path?;
    if with_roster(&state, move |roster| roster.delete(player_id)).await? {
        Ok(Json(json!({ "status": "ok" })))
    } else {
        Err(DrawError::PlayerNotFound { player_id }.into())
    }
}

async fn toggle_player_active(
    State(state): State<Arc<AppState>>,
    player_path: std::result::Result<Path<PlayerId>, PathRejection>,
) -> std::result::Result<Json<Player>, ApiError> {
    let Path(player_id) = player_path?;
    with_roster(&state, move |roster| roster.toggle_active(player_id))
        .await?
        .map(Json)
        .ok_or_else(|| DrawError::PlayerNotFound { player_id }.into())
}

async fn draw_teams(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<DrawRequest>, JsonRejection>,
) -> std::result::Result<Json<DrawResponse>, ApiError> {
    let metrics = state.metrics();

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            metrics.record_draw_rejected();
            return Err(rejection.into());
        }
    };

    let team_size = match parse_team_size(&request) {
        Ok(size) if size > 0 => size,
        Ok(size) => {
            metrics.record_draw_rejected();
            return Err(DrawError::InvalidTeamSize { team_size: size }.into());
        }
        Err(e) => {
            metrics.record_draw_rejected();
            return Err(e.into());
        }
    };

    let players = with_roster(&state, |roster| roster.active_players()).await?;
    if players.is_empty() {
        metrics.record_draw_rejected();
        return Err(DrawError::NoActivePlayers.into());
    }

    let player_count = players.len();
    let shared: Vec<Arc<Player>> = players.into_iter().map(Arc::new).collect();

    let timer = metrics.start_timer();
    let outcome = state.balancer().draw(&shared, team_size)?;
    metrics.record_draw(player_count, &outcome, timer.stop());

    info!(
        "Drew {} teams from {} active players (team size {}, {} of {} swaps accepted)",
        outcome.teams.len(),
        player_count,
        team_size,
        outcome.refinement.accepted(),
        outcome.refinement.attempted
    );

    let teams = outcome
        .teams
        .iter()
        .enumerate()
        .map(|(index, team)| TeamView {
            name: team_label(index),
            total_rating: team.total_rating,
            players: team.players.iter().map(|p| Player::clone(p)).collect(),
        })
        .collect();

    Ok(Json(DrawResponse { teams }))
}

async fn check_password(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<PasswordRequest>, JsonRejection>,
) -> std::result::Result<Response, ApiError> {
    let Json(request) = payload?;
    let supplied = request.password.unwrap_or_default();
    let supplied = supplied.trim();

    if supplied.is_empty() {
        return Err(DrawError::InvalidRequest {
            reason: "Password is required".to_string(),
        }
        .into());
    }

    let valid = state.password_verifier().verify(supplied).await?;
    state.metrics().record_password_check(valid);

    if valid {
        Ok((StatusCode::OK, Json(json!({ "valid": true }))).into_response())
    } else {
        warn!("Rejected password check");
        Ok((StatusCode::UNAUTHORIZED, Json(json!({ "valid": false }))).into_response())
    }
}

/// HTTP server serving [`create_router`] until stopped
pub struct ApiServer {
    state: Arc<AppState>,
    shutdown_tx: broadcast::Sender<()>,
}

impl ApiServer {
    pub fn new(state: Arc<AppState>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self { state, shutdown_tx }
    }

    /// Bind the configured address and serve until [`ApiServer::stop`]
    pub async fn start(&self) -> Result<()> {
        let addr: SocketAddr = self
            .state
            .config()
            .bind_address()
            .parse()
            .context("Invalid HTTP server address")?;

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        info!("HTTP server listening on http://{}", addr);

        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let app = create_router(self.state.clone());
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("HTTP server shutdown signal received");
            })
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Ask the server to finish in-flight requests and stop
    pub fn stop(&self) {
        if let Err(e) = self.shutdown_tx.send(()) {
            warn!("Failed to send shutdown signal to HTTP server: {}", e);
        }
    }
}
