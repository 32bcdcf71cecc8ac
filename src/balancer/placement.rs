//! Rating ordering and greedy lowest-total placement
//!
//! This phase is deterministic once the ordering is fixed: tests can build
//! an ordering by hand and call [`place_greedy`] directly.

use crate::types::{Player, Team};
use rand::Rng;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, warn};

/// Sort players by rating, highest first.
///
/// Each player draws an independent random key that decides the order among
/// equal ratings, so identical rosters can come out in different orders.
pub fn order_by_rating<R: Rng>(players: &[Arc<Player>], rng: &mut R) -> Vec<Arc<Player>> {
    let mut keyed: Vec<(u64, Arc<Player>)> = players
        .iter()
        .map(|player| (rng.random::<u64>(), Arc::clone(player)))
        .collect();

    keyed.sort_by(|(key_a, a), (key_b, b)| {
        match b.rating.total_cmp(&a.rating) {
            Ordering::Equal => key_a.cmp(key_b),
            other => other,
        }
    });

    keyed.into_iter().map(|(_, player)| player).collect()
}

/// Index of the team with room and the lowest total rating.
///
/// Ties go to the earliest team.
fn lowest_open_team(teams: &[Team]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (index, team) in teams.iter().enumerate() {
        if !team.has_room() {
            continue;
        }

        match best {
            Some((_, best_total)) if team.total_rating >= best_total => {}
            _ => best = Some((index, team.total_rating)),
        }
    }

    best.map(|(index, _)| index)
}

/// Assign `ordered` players to teams of the given capacities.
///
/// Each player goes to the open team with the lowest running total. If no
/// team has room left the player is appended to the last team anyway, so
/// the draw never fails on a capacity mismatch.
pub fn place_greedy(ordered: &[Arc<Player>], capacities: &[usize]) -> Vec<Team> {
    let mut teams: Vec<Team> = capacities
        .iter()
        .map(|&capacity| Team::with_capacity(capacity))
        .collect();

    for player in ordered {
        match lowest_open_team(&teams) {
            Some(index) => {
                debug!(
                    "Placing player {} (rating {:.1}) on team {} (total {:.1})",
                    player.id,
                    player.rating,
                    index + 1,
                    teams[index].total_rating
                );
                teams[index].push(Arc::clone(player));
            }
            None => {
                if teams.is_empty() {
                    teams.push(Team::with_capacity(0));
                }
                let last = teams.len() - 1;
                warn!(
                    "No team has room for player {}, overfilling team {} beyond capacity {}",
                    player.id,
                    last + 1,
                    teams[last].capacity
                );
                teams[last].push(Arc::clone(player));
            }
        }
    }

    teams
}
