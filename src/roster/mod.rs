//! Player roster persistence and input validation
//!
//! The roster is a flat list of players plus an id counter. Stores never
//! know about teams; the balancer never knows about stores.

pub mod document;
pub mod storage;
pub mod validation;

// Re-export commonly used types
pub use document::RosterDocument;
pub use storage::{InMemoryRosterStore, JsonFileRosterStore, RosterStorage};
pub use validation::{parse_team_size, validate_player_input, ValidPlayer};
