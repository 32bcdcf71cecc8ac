//! Roster storage and validation configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the roster lives and which ratings the API accepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// JSON file holding `last_id` and the player records
    pub players_file: PathBuf,
    /// Lowest rating accepted on create/update
    pub min_rating: f64,
    /// Highest rating accepted on create/update
    pub max_rating: f64,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            players_file: PathBuf::from("data/players.json"),
            min_rating: 0.0,
            max_rating: 5.0,
        }
    }
}
