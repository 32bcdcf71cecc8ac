//! Common types used throughout the team draw service

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Stable identifier assigned to players by the roster store
pub type PlayerId = u64;

/// A rostered player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Skill weight; conventionally 0.0 to 5.0 in 0.5 steps
    pub rating: f64,
    /// Whether the player takes part in draws
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, rating: f64) -> Self {
        Self {
            id,
            name: name.into(),
            rating,
            active: true,
        }
    }
}

/// A team produced by the balancer
///
/// Players are shared with the snapshot handed to the balancer rather than
/// copied out of it.
#[derive(Debug, Clone)]
pub struct Team {
    pub players: Vec<Arc<Player>>,
    pub total_rating: f64,
    /// Number of players this team was planned to hold
    pub capacity: usize,
}

impl Team {
    /// Create an empty team with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            players: Vec::with_capacity(capacity),
            total_rating: 0.0,
            capacity,
        }
    }

    /// Whether the team can take another player without exceeding capacity
    pub fn has_room(&self) -> bool {
        self.players.len() < self.capacity
    }

    /// Append a player and add their rating to the running total
    pub fn push(&mut self, player: Arc<Player>) {
        self.total_rating += player.rating;
        self.players.push(player);
    }

    /// Recompute `total_rating` as the exact sum of current members
    pub fn recompute_total(&mut self) {
        self.total_rating = self.players.iter().map(|p| p.rating).sum();
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// Request body for creating or updating a player
///
/// Fields stay loosely typed so validation can report what is wrong
/// instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rating: Option<Value>,
}

/// Request body for drawing teams
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrawRequest {
    #[serde(default)]
    pub team_size: Option<Value>,
}

/// A team as returned to API clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamView {
    pub name: String,
    pub total_rating: f64,
    pub players: Vec<Player>,
}

/// Response body for a team draw
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawResponse {
    pub teams: Vec<TeamView>,
}

/// Request body for the password gate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PasswordRequest {
    #[serde(default)]
    pub password: Option<String>,
}
