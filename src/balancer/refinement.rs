//! Randomized swap refinement
//!
//! After greedy placement, a fixed number of swap attempts shuffle which
//! players end up together. A swap is only carried out between players whose
//! ratings are within the configured tolerance, so each swap moves a team
//! total by at most that tolerance.

use crate::types::{PlayerId, Team};
use crate::utils::{rating_difference, ratings_within_tolerance};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A swap that was carried out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapRecord {
    pub first_team: usize,
    pub second_team: usize,
    pub first_player: PlayerId,
    pub second_player: PlayerId,
    pub rating_difference: f64,
}

/// Summary of a refinement pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefinementReport {
    /// Attempts made (always the configured count when two or more teams exist)
    pub attempted: usize,
    /// Attempts rejected by the rating tolerance or an empty team
    pub rejected: usize,
    /// Swaps carried out, in order
    pub swaps: Vec<SwapRecord>,
}

impl RefinementReport {
    pub fn accepted(&self) -> usize {
        self.swaps.len()
    }
}

/// Pick two distinct team indices uniformly at random.
fn pick_team_pair<R: Rng>(team_count: usize, rng: &mut R) -> (usize, usize) {
    let first = rng.random_range(0..team_count);
    let mut second = rng.random_range(0..team_count - 1);
    if second >= first {
        second += 1;
    }
    (first, second)
}

/// Run `attempts` swap attempts over `teams`.
///
/// Each attempt picks two distinct teams and one player from each. The pair
/// is swapped in place when their ratings differ by at most `tolerance`.
/// Both teams' totals are then recomputed from their members whether or not
/// the swap happened. Rejected attempts are not retried. With fewer than two
/// teams there is nothing to swap and no attempt is made.
pub fn refine<R: Rng>(
    teams: &mut [Team],
    attempts: usize,
    tolerance: f64,
    rng: &mut R,
) -> RefinementReport {
    let mut report = RefinementReport::default();

    if teams.len() < 2 {
        return report;
    }

    for _ in 0..attempts {
        report.attempted += 1;

        let (first, second) = pick_team_pair(teams.len(), rng);

        if teams[first].is_empty() || teams[second].is_empty() {
            report.rejected += 1;
            continue;
        }

        let first_slot = rng.random_range(0..teams[first].len());
        let second_slot = rng.random_range(0..teams[second].len());

        let first_rating = teams[first].players[first_slot].rating;
        let second_rating = teams[second].players[second_slot].rating;

        if ratings_within_tolerance(first_rating, second_rating, tolerance) {
            let record = SwapRecord {
                first_team: first,
                second_team: second,
                first_player: teams[first].players[first_slot].id,
                second_player: teams[second].players[second_slot].id,
                rating_difference: rating_difference(first_rating, second_rating),
            };

            swap_players(teams, (first, first_slot), (second, second_slot));

            debug!(
                "Swapped player {} (team {}) with player {} (team {})",
                record.first_player,
                first + 1,
                record.second_player,
                second + 1
            );
            report.swaps.push(record);
        } else {
            report.rejected += 1;
        }

        teams[first].recompute_total();
        teams[second].recompute_total();
    }

    report
}

/// Exchange two players held by different teams, keeping their slots.
fn swap_players(teams: &mut [Team], a: (usize, usize), b: (usize, usize)) {
    let (low, high) = if a.0 < b.0 { (a, b) } else { (b, a) };
    let (head, tail) = teams.split_at_mut(high.0);
    std::mem::swap(&mut head[low.0].players[low.1], &mut tail[0].players[high.1]);
}
