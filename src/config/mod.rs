//! Configuration management for the team draw service
//!
//! This module handles configuration loading from environment variables and
//! TOML files, validation, and default values.

pub mod app;
pub mod balancer;
pub mod roster;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, AuthSettings, ServiceSettings};
pub use balancer::BalancerConfig;
pub use roster::RosterConfig;
