//! Test fixtures shared by the integration tests

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use team_draw::balancer::GreedyTeamBalancer;
use team_draw::config::AppConfig;
use team_draw::metrics::MetricsCollector;
use team_draw::roster::{InMemoryRosterStore, RosterStorage};
use team_draw::service::{create_router, AppState, StaticPasswordVerifier};
use team_draw::types::Player;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "letmein";

/// Application state backed by an in-memory roster
pub fn create_test_state() -> Arc<AppState> {
    create_test_state_with(Arc::new(InMemoryRosterStore::new()))
}

pub fn create_test_state_with(roster: Arc<dyn RosterStorage>) -> Arc<AppState> {
    Arc::new(AppState::with_components(
        AppConfig::default(),
        roster,
        Arc::new(GreedyTeamBalancer::new()),
        Arc::new(StaticPasswordVerifier::new(TEST_PASSWORD)),
        Arc::new(MetricsCollector::new().expect("metrics collector")),
    ))
}

/// Thin client that drives the router in-process
#[derive(Clone)]
pub struct TestClient {
    router: Router,
}

impl TestClient {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            router: create_router(state),
        }
    }

    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("PUT", uri, Some(body)).await
    }

    /// Add a player through the API and return the stored record
    pub async fn add_player(&self, name: &str, rating: f64) -> Player {
        let (status, body) = self
            .post(
                "/api/players",
                serde_json::json!({ "name": name, "rating": rating }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "unexpected body: {}", body);
        serde_json::from_value(body).unwrap()
    }
}

/// Ratings of the reference eight-player roster
pub fn reference_ratings() -> Vec<f64> {
    vec![5.0, 5.0, 4.0, 4.0, 3.0, 3.0, 2.0, 2.0]
}

/// Build shared players with sequential ids
pub fn players_with_ratings(ratings: &[f64]) -> Vec<Arc<Player>> {
    ratings
        .iter()
        .enumerate()
        .map(|(i, &rating)| Arc::new(Player::new(i as u64 + 1, format!("player_{}", i + 1), rating)))
        .collect()
}
