//! In-memory form of the persisted roster
//!
//! Both store implementations load a [`RosterDocument`], mutate it with the
//! methods below and (for the file store) write it back.

use crate::types::{Player, PlayerId};
use serde::{Deserialize, Serialize};

/// Persisted roster: the id counter plus every player record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterDocument {
    #[serde(default)]
    pub last_id: PlayerId,
    #[serde(default)]
    pub players: Vec<Player>,
}

impl RosterDocument {
    /// Reserve the next player id and advance the counter.
    ///
    /// Never hands out an id already present, even if the stored counter
    /// lags behind the records.
    pub fn next_id(&mut self) -> PlayerId {
        let highest = self.players.iter().map(|p| p.id).max().unwrap_or(0);
        self.last_id = self.last_id.max(highest) + 1;
        self.last_id
    }

    /// Append a new active player
    pub fn add(&mut self, name: &str, rating: f64) -> Player {
        let id = self.next_id();
        let player = Player::new(id, name, rating);
        self.players.push(player.clone());
        player
    }

    /// Replace name and rating of an existing player
    pub fn update(&mut self, id: PlayerId, name: &str, rating: f64) -> Option<Player> {
        let player = self.players.iter_mut().find(|p| p.id == id)?;
        player.name = name.to_string();
        player.rating = rating;
        Some(player.clone())
    }

    /// Remove a player; `false` when no record has that id
    pub fn delete(&mut self, id: PlayerId) -> bool {
        let before = self.players.len();
        self.players.retain(|p| p.id != id);
        self.players.len() != before
    }

    /// Flip a player's active flag
    pub fn toggle_active(&mut self, id: PlayerId) -> Option<Player> {
        let player = self.players.iter_mut().find(|p| p.id == id)?;
        player.active = !player.active;
        Some(player.clone())
    }
}
