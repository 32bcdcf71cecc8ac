//! Integration tests for the team-draw service
//!
//! These tests drive the HTTP router in-process and cover:
//! - Roster CRUD and the active toggle
//! - Team draws over the stored roster
//! - The password gate
//! - Input validation and error shapes
//! - The JSON file store behind the API

mod fixtures;

use axum::http::StatusCode;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use team_draw::roster::{JsonFileRosterStore, RosterStorage};
use team_draw::types::{DrawResponse, Player};

use fixtures::{create_test_state, create_test_state_with, reference_ratings, TestClient, TEST_PASSWORD};

#[tokio::test]
async fn test_complete_roster_workflow() {
    let client = TestClient::new(create_test_state());

    // Step 1: Empty roster
    let (status, body) = client.get("/api/players").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    // Step 2: Add players
    let alice = client.add_player("Alice", 4.5).await;
    let bob = client.add_player("Bob", 3.0).await;
    assert_eq!(alice.id, 1);
    assert_eq!(bob.id, 2);
    assert!(alice.active);

    // Step 3: Update
    let (status, body) = client
        .put(
            &format!("/api/players/{}", bob.id),
            json!({ "name": "Robert", "rating": 3.5 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let updated: Player = serde_json::from_value(body).unwrap();
    assert_eq!(updated.name, "Robert");
    assert_eq!(updated.rating, 3.5);
    assert!(updated.active);

    // Step 4: Toggle
    let (status, body) = client
        .send("PATCH", &format!("/api/players/{}/toggle-active", alice.id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], json!(false));

    // Step 5: Delete
    let (status, body) = client
        .send("DELETE", &format!("/api/players/{}", alice.id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    let (_, body) = client.get("/api/players").await;
    let players: Vec<Player> = serde_json::from_value(body).unwrap();
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].name, "Robert");
}

#[tokio::test]
async fn test_ids_are_not_reused_after_delete() {
    let client = TestClient::new(create_test_state());

    let first = client.add_player("First", 1.0).await;
    let second = client.add_player("Second", 1.0).await;
    client
        .send("DELETE", &format!("/api/players/{}", second.id), None)
        .await;

    let third = client.add_player("Third", 1.0).await;
    assert_eq!(first.id, 1);
    assert_eq!(third.id, 3);
}

#[tokio::test]
async fn test_unknown_player_is_404() {
    let client = TestClient::new(create_test_state());

    let (status, body) = client
        .put("/api/players/42", json!({ "name": "Ghost", "rating": 1.0 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("42"));

    let (status, _) = client.send("DELETE", "/api/players/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = client
        .send("PATCH", "/api/players/42/toggle-active", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Ids that are not non-negative integers get the same JSON 404
    for uri in ["/api/players/abc", "/api/players/-1"] {
        let (status, body) = client.send("DELETE", uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert!(body["error"].is_string(), "{} returned {}", uri, body);

        let (status, body) = client
            .put(uri, json!({ "name": "Ghost", "rating": 1.0 }))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert!(body["error"].is_string());
    }

    let (status, body) = client
        .send("PATCH", "/api/players/abc/toggle-active", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_player_validation_errors() {
    let client = TestClient::new(create_test_state());

    let cases = vec![
        json!({ "name": "NoRating" }),
        json!({ "rating": 2.0 }),
        json!({ "name": "   ", "rating": 2.0 }),
        json!({ "name": "Word", "rating": "strong" }),
        json!({ "name": "High", "rating": 5.5 }),
        json!({ "name": "Low", "rating": -0.5 }),
    ];

    for body in cases {
        let (status, response) = client.post("/api/players", body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {} was accepted", body);
        assert!(response["error"].is_string());
    }

    let (_, players) = client.get("/api/players").await;
    assert_eq!(players, json!([]));
}

#[tokio::test]
async fn test_player_input_is_normalized() {
    let client = TestClient::new(create_test_state());

    let (status, body) = client
        .post("/api/players", json!({ "name": "  Dana  ", "rating": "2.5" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], json!("Dana"));
    assert_eq!(body["rating"], json!(2.5));

    // Bounds are inclusive
    let (status, _) = client
        .post("/api/players", json!({ "name": "Max", "rating": 5.0 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = client
        .post("/api/players", json!({ "name": "Min", "rating": 0 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let client = TestClient::new(create_test_state());

    let (status, _) = client
        .send("POST", "/api/players", Some(json!("not an object")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_draw_reference_roster() {
    let client = TestClient::new(create_test_state());
    for (i, rating) in reference_ratings().into_iter().enumerate() {
        client.add_player(&format!("P{}", i + 1), rating).await;
    }

    let (status, body) = client.post("/api/draw-teams", json!({ "team_size": 4 })).await;
    assert_eq!(status, StatusCode::OK);

    let response: DrawResponse = serde_json::from_value(body).unwrap();
    assert_eq!(response.teams.len(), 2);
    assert_eq!(response.teams[0].name, "Team 1");
    assert_eq!(response.teams[1].name, "Team 2");

    let mut seen = HashSet::new();
    for team in &response.teams {
        assert_eq!(team.players.len(), 4);
        let sum: f64 = team.players.iter().map(|p| p.rating).sum();
        assert!((team.total_rating - sum).abs() < 1e-9);
        for player in &team.players {
            assert!(seen.insert(player.id));
        }
    }
    assert_eq!(seen.len(), 8);

    // Greedy placement splits this roster evenly and only equal ratings can swap
    assert_eq!(response.teams[0].total_rating, 14.0);
    assert_eq!(response.teams[1].total_rating, 14.0);
}

#[tokio::test]
async fn test_draw_uses_only_active_players() {
    let client = TestClient::new(create_test_state());
    let mut ids = Vec::new();
    for i in 0..6 {
        ids.push(client.add_player(&format!("P{}", i), 3.0).await.id);
    }
    client
        .send("PATCH", &format!("/api/players/{}/toggle-active", ids[0]), None)
        .await;

    let (status, body) = client.post("/api/draw-teams", json!({ "team_size": 2 })).await;
    assert_eq!(status, StatusCode::OK);

    let response: DrawResponse = serde_json::from_value(body).unwrap();
    let sizes: Vec<usize> = response.teams.iter().map(|t| t.players.len()).collect();
    assert_eq!(sizes, vec![2, 2, 1]);
    assert!(response
        .teams
        .iter()
        .flat_map(|t| t.players.iter())
        .all(|p| p.id != ids[0]));
}

#[tokio::test]
async fn test_draw_request_errors() {
    let client = TestClient::new(create_test_state());

    // No active players
    let (status, body) = client.post("/api/draw-teams", json!({ "team_size": 3 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("No active players"));

    client.add_player("Solo", 2.0).await;

    for request in [
        json!({}),
        json!({ "team_size": 0 }),
        json!({ "team_size": -2 }),
        json!({ "team_size": "abc" }),
        json!({ "team_size": 2.5 }),
    ] {
        let (status, _) = client.post("/api/draw-teams", request.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "request {} was accepted", request);
    }

    // Integer strings are accepted
    let (status, body) = client
        .post("/api/draw-teams", json!({ "team_size": "3" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["teams"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_password_gate() {
    let client = TestClient::new(create_test_state());

    let (status, body) = client
        .post("/api/check-password", json!({ "password": TEST_PASSWORD }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "valid": true }));

    let (status, body) = client
        .post("/api/check-password", json!({ "password": "wrong" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "valid": false }));

    let (status, _) = client.post("/api/check-password", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = client
        .post("/api/check-password", json!({ "password": "   " }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_reports_roster() {
    let state = create_test_state();
    let client = TestClient::new(state.clone());
    client.add_player("A", 1.0).await;
    client.add_player("B", 2.0).await;

    let (status, body) = client.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["stats"]["total_players"], json!(2));
    assert_eq!(body["stats"]["active_players"], json!(2));

    state.mark_stopped().await;
    let (status, _) = client.get("/alive").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_api_over_json_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("players.json");
    let store = Arc::new(JsonFileRosterStore::new(&path).unwrap());

    let client = TestClient::new(create_test_state_with(store.clone()));
    let created = client.add_player("Persisted", 4.0).await;

    // A fresh store over the same file sees the record
    let reopened = JsonFileRosterStore::new(&path).unwrap();
    let players = reopened.get_all().unwrap();
    assert_eq!(players, vec![created]);

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["last_id"], json!(1));
    assert_eq!(raw["players"][0]["name"], json!("Persisted"));
}

#[tokio::test]
async fn test_concurrent_adds_through_api() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileRosterStore::new(dir.path().join("players.json")).unwrap());
    let client = TestClient::new(create_test_state_with(store.clone()));

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move { client.add_player(&format!("P{}", i), 2.0).await })
        })
        .collect();

    let results = futures::future::join_all(tasks).await;
    let ids: HashSet<u64> = results.into_iter().map(|r| r.unwrap().id).collect();
    assert_eq!(ids.len(), 20);

    let stored = store.get_all().unwrap();
    assert_eq!(stored.len(), 20);
    assert_eq!(ids, (1..=20).collect::<HashSet<u64>>());
}
