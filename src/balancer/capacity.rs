//! Team count and per-team capacity planning
//!
//! Full-size teams are preferred over an even spread: 17 players at a team
//! size of 5 give `[5, 5, 5, 2]`, not `[5, 4, 4, 4]`.

/// Plan the capacity of every team for `player_count` players.
///
/// Returns one entry per team in creation order: `player_count / team_size`
/// entries of `team_size`, followed by a single remainder entry when the
/// division is not exact. `team_size` must be non-zero.
pub fn plan_capacities(player_count: usize, team_size: usize) -> Vec<usize> {
    debug_assert!(team_size > 0, "team_size must be positive");

    let full_teams = player_count / team_size;
    let remainder = player_count % team_size;

    let mut capacities = vec![team_size; full_teams];
    if remainder > 0 {
        capacities.push(remainder);
    }
    capacities
}
