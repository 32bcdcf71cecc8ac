//! Team balancing for drawing rating-balanced teams
//!
//! A draw runs in two phases:
//! - [`capacity`] and [`placement`]: plan team capacities, order players by
//!   rating and place each one on the open team with the lowest total
//! - [`refinement`]: a fixed number of randomized, rating-bounded swaps so
//!   repeated draws over the same roster produce different line-ups
//!
//! The balancer holds no shared state and never touches storage.

pub mod capacity;
pub mod placement;
pub mod refinement;

pub use capacity::plan_capacities;
pub use placement::{order_by_rating, place_greedy};
pub use refinement::{refine, RefinementReport, SwapRecord};

use crate::config::BalancerConfig;
use crate::error::{DrawError, Result};
use crate::types::{Player, Team};
use rand::Rng;
use std::sync::Arc;
use tracing::debug;

/// Result of a balancing run
#[derive(Debug, Clone)]
pub struct BalanceOutcome {
    /// Teams in creation order, remainder team last
    pub teams: Vec<Team>,
    /// What the swap refinement did
    pub refinement: RefinementReport,
}

/// Trait for team balancing strategies
pub trait TeamBalancer: Send + Sync {
    /// Partition `players` into teams of `team_size`
    fn draw(&self, players: &[Arc<Player>], team_size: i64) -> Result<BalanceOutcome>;
}

/// Greedy lowest-total balancer with randomized swap refinement
#[derive(Debug, Clone, Default)]
pub struct GreedyTeamBalancer {
    config: BalancerConfig,
}

impl GreedyTeamBalancer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BalancerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BalancerConfig {
        &self.config
    }

    /// Balance using the supplied random source
    pub fn draw_with_rng<R: Rng>(
        &self,
        players: &[Arc<Player>],
        team_size: i64,
        rng: &mut R,
    ) -> Result<BalanceOutcome> {
        let team_size = validate_team_size(team_size)?;

        if players.is_empty() {
            return Ok(BalanceOutcome {
                teams: Vec::new(),
                refinement: RefinementReport::default(),
            });
        }

        let capacities = plan_capacities(players.len(), team_size);
        debug!(
            "Balancing {} players into {} teams (capacities {:?})",
            players.len(),
            capacities.len(),
            capacities
        );

        let ordered = order_by_rating(players, rng);
        let mut teams = place_greedy(&ordered, &capacities);

        let refinement = refine(
            &mut teams,
            self.config.swap_attempts,
            self.config.swap_tolerance,
            rng,
        );

        Ok(BalanceOutcome { teams, refinement })
    }
}

impl TeamBalancer for GreedyTeamBalancer {
    fn draw(&self, players: &[Arc<Player>], team_size: i64) -> Result<BalanceOutcome> {
        self.draw_with_rng(players, team_size, &mut rand::rng())
    }
}

/// Reject non-positive team sizes
fn validate_team_size(team_size: i64) -> Result<usize> {
    if team_size <= 0 {
        return Err(DrawError::InvalidTeamSize { team_size }.into());
    }
    usize::try_from(team_size).map_err(|_| DrawError::InvalidTeamSize { team_size }.into())
}

/// Balance `players` into teams of `team_size` with default settings
pub fn balance(players: &[Arc<Player>], team_size: i64) -> Result<Vec<Team>> {
    GreedyTeamBalancer::new()
        .draw(players, team_size)
        .map(|outcome| outcome.teams)
}
