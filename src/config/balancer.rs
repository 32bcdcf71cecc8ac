//! Team balancer configuration

use serde::{Deserialize, Serialize};

/// Settings for the swap refinement phase of a draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancerConfig {
    /// Number of swap attempts after greedy placement
    pub swap_attempts: usize,
    /// Largest rating difference (inclusive) allowed for a swap
    pub swap_tolerance: f64,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            swap_attempts: 5,
            swap_tolerance: 0.5,
        }
    }
}
