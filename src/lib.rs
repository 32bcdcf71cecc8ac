//! Team Draw - roster keeping and balanced team draws
//!
//! This crate keeps a roster of rated players in a JSON file and splits the
//! active ones into teams of near-equal total rating, served over HTTP.

pub mod balancer;
pub mod config;
pub mod error;
pub mod metrics;
pub mod roster;
pub mod service;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{DrawError, Result};
pub use types::*;

// Re-export key components
pub use balancer::{balance, GreedyTeamBalancer, TeamBalancer};
pub use roster::{InMemoryRosterStore, JsonFileRosterStore, RosterStorage};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
